//! # Refer Abstractions
//!
//! 组件注册表抽象层，定义组件能力契约和注册表的核心接口。
//!
//! ## 核心接口
//!
//! - [`Component`] - 组件基础接口及能力访问器
//! - [`References`] - 组件注册表接口
//! - [`ComponentFactory`] - 组件工厂接口
//! - [`Reference`] - 注册表中的（定位器，组件）对

pub mod component;
pub mod factory;
pub mod reference;
pub mod references;

pub use component::*;
pub use factory::*;
pub use reference::*;
pub use references::*;
