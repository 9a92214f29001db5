//! 组件基础接口与能力契约
//!
//! 注册表中的组件之间不知道彼此的具体类型。容器在每个生命周期节点通过
//! [`Component`] 上的能力访问器询问组件是否具备某种能力：
//!
//! | 能力 | 容器调用时机 |
//! |------|--------------|
//! | [`Referenceable`] | 链接：打开容器或者容器打开期间放入组件 |
//! | [`Unreferenceable`] | 解除链接：关闭容器或者容器打开期间移除组件 |
//! | [`Openable`] / [`Closable`] | 运行：打开/关闭容器 |
//! | [`Cleanable`] | 由 `Cleaner` 显式触发 |
//! | [`ComponentFactory`] | 按需构建缺失的组件 |
//! | [`Configurable`] | 从声明式配置放入组件之后 |

use crate::factory::ComponentFactory;
use crate::references::References;
use async_trait::async_trait;
use refer_common::{ConfigSection, ContainerResult};
use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

/// 共享的组件句柄
pub type ComponentRef = Arc<dyn Component>;

/// 类型擦除支持
///
/// 对所有 `Any + Send + Sync` 类型自动实现，用于把组件句柄还原为具体类型。
pub trait AsAny: Any + Send + Sync {
    /// 借用为 [`Any`]
    fn as_any(&self) -> &dyn Any;

    /// 转换为共享的 [`Any`] 句柄
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// 组件基础 trait
///
/// 所有放入注册表的组件都必须实现此 trait。能力访问器默认返回 `None`，
/// 组件通过返回 `Some(self)` 声明自己具备对应能力。只覆盖了
/// [`Component::as_openable`] 的组件也会被视为可关闭。
pub trait Component: AsAny + Debug {
    /// 可设置引用的能力
    fn as_referenceable(&self) -> Option<&dyn Referenceable> {
        None
    }

    /// 可解除引用的能力
    fn as_unreferenceable(&self) -> Option<&dyn Unreferenceable> {
        None
    }

    /// 可打开的能力
    fn as_openable(&self) -> Option<&dyn Openable> {
        None
    }

    /// 可关闭的能力，默认与可打开的能力一致
    fn as_closable(&self) -> Option<&dyn Closable> {
        self.as_openable().map(|openable| openable.as_dyn_closable())
    }

    /// 可清理的能力
    fn as_cleanable(&self) -> Option<&dyn Cleanable> {
        None
    }

    /// 工厂能力
    fn as_factory(&self) -> Option<&dyn ComponentFactory> {
        None
    }

    /// 可配置的能力
    fn as_configurable(&self) -> Option<&dyn Configurable> {
        None
    }
}

/// 可设置引用的组件
///
/// 组件在这里通过注册表查找自己依赖的协作者。
#[async_trait]
pub trait Referenceable: Send + Sync {
    /// 设置组件引用
    async fn set_references(&self, references: Arc<dyn References>) -> ContainerResult<()>;
}

/// 可解除引用的组件
#[async_trait]
pub trait Unreferenceable: Send + Sync {
    /// 解除之前设置的组件引用
    async fn unset_references(&self) -> ContainerResult<()>;
}

/// 可关闭的组件
#[async_trait]
pub trait Closable: Send + Sync {
    /// 关闭组件并释放资源
    async fn close(&self) -> ContainerResult<()>;
}

/// 取得组件的 [`Closable`] 视图
pub trait AsClosable: Closable {
    /// 借用为 [`Closable`]
    fn as_dyn_closable(&self) -> &dyn Closable;
}

impl<T: Closable> AsClosable for T {
    fn as_dyn_closable(&self) -> &dyn Closable {
        self
    }
}

/// 可打开的组件
///
/// 打开过的组件总能被关闭。
#[async_trait]
pub trait Openable: AsClosable {
    /// 组件是否已打开
    fn is_open(&self) -> bool;

    /// 打开组件
    async fn open(&self) -> ContainerResult<()>;
}

/// 可清理的组件
#[async_trait]
pub trait Cleanable: Send + Sync {
    /// 清理组件状态
    async fn clear(&self) -> ContainerResult<()>;
}

/// 可配置的组件
pub trait Configurable: Send + Sync {
    /// 应用配置
    fn configure(&self, config: &ConfigSection) -> ContainerResult<()>;
}

/// 将组件句柄还原为具体类型
pub fn downcast_component<T: Component>(component: &ComponentRef) -> Option<Arc<T>> {
    Arc::clone(component).into_any().downcast::<T>().ok()
}

/// 借用组件的具体类型
pub fn component_as<T: Component>(component: &dyn Component) -> Option<&T> {
    component.as_any().downcast_ref::<T>()
}

/// 两个句柄是否指向同一个组件实例
pub fn same_component(left: &ComponentRef, right: &ComponentRef) -> bool {
    std::ptr::eq(
        Arc::as_ptr(left).cast::<()>(),
        Arc::as_ptr(right).cast::<()>(),
    )
}
