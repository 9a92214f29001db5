//! # Refer Impl
//!
//! 组件注册表的具体实现。
//!
//! ## 核心类型
//!
//! - [`ReferencesStore`] - 基础组件注册表，逆序查找
//! - [`Factory`] / [`CompositeFactory`] - 按定位器创建组件
//! - [`DependencyResolver`] - 依赖名称到定位器的映射
//! - [`BuildReferences`] / [`LinkReferences`] / [`RunReferences`] - 构建、链接、运行装饰器
//! - [`ManagedReferences`] - 组装好装饰器链的托管注册表
//! - [`Opener`] / [`Closer`] / [`Cleaner`] / [`Referencer`] - 生命周期辅助工具

pub mod decorators;
pub mod factory;
pub mod lifecycle;
pub mod managed;
pub mod references;
pub mod resolver;

pub use decorators::*;
pub use factory::*;
pub use lifecycle::*;
pub use managed::*;
pub use references::*;
pub use resolver::*;
