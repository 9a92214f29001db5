//! # Refer Common
//!
//! 组件注册表的公共基础类型。
//!
//! ## 核心类型
//!
//! - [`Descriptor`] - 五段式组件描述符，支持通配符匹配
//! - [`Locator`] - 组件定位器（描述符或字符串键）
//! - [`ConfigSection`] - 组件配置节
//! - [`ContainerError`] - 容器错误类型

pub mod configuration;
pub mod errors;
pub mod locator;

pub use configuration::*;
pub use errors::*;
pub use locator::*;
