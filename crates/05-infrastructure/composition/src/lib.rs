//! # 容器组合层
//!
//! 这个 crate 负责把组件注册表、工厂和声明式配置组合成一个完整的、可运行的
//! 进程容器。
//!
//! ## 主要功能
//!
//! - **容器构建器**: 使用构建者模式注册工厂、类型和组件列表
//! - **声明式配置**: 从 JSON 或 YAML 读取组件列表
//! - **生命周期管理**: 管理整个容器的打开和关闭
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use refer_composition::{Container, ContainerConfig, LoggingConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ContainerConfig::from_yaml(
//!         r#"
//! components:
//!   - descriptor: "lorn:logger:console:default:1.0"
//!     level: info
//! "#,
//!     )?;
//!
//!     let container = Container::builder("ad-engine")
//!         .with_config(config)
//!         .with_logging(LoggingConfig::development())
//!         .build()?;
//!
//!     // 打开容器，等待 Ctrl-C 后关闭
//!     container.run_until_shutdown().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod config;
pub mod container;
pub mod container_references;

#[cfg(test)]
mod tests;

// 重新导出主要类型
pub use builder::{ContainerBuilder, LoggingConfig};
pub use config::{ComponentConfig, ContainerConfig};
pub use container::{container_factory_descriptor, Container, ContainerStatus};
pub use container_references::ContainerReferences;

// 重新导出错误类型
pub use refer_common::ContainerError;
