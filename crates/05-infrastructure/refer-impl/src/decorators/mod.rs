//! 注册表装饰器
//!
//! 每层装饰器持有下一层注册表和最外层注册表的弱引用。自动构建的组件总是
//! 放入最外层，使所有层都能看到它。

mod build;
mod link;
mod run;

pub use build::BuildReferences;
pub use link::LinkReferences;
pub use run::RunReferences;

use async_trait::async_trait;
use refer_abstractions::{ComponentRef, References, Removal};
use refer_common::{ContainerResult, Locator};
use std::fmt;
use std::sync::{Arc, Weak};

/// 注册表装饰器基础
///
/// 所有操作直接委托给下一层。
pub struct ReferencesDecorator {
    next: Arc<dyn References>,
    top: Option<Weak<dyn References>>,
}

impl ReferencesDecorator {
    /// 创建装饰器，`top` 为空时最外层就是下一层
    pub fn new(next: Arc<dyn References>, top: Option<Weak<dyn References>>) -> Self {
        Self { next, top }
    }

    /// 下一层注册表
    pub fn next(&self) -> &Arc<dyn References> {
        &self.next
    }

    /// 最外层注册表
    pub fn top(&self) -> Arc<dyn References> {
        self.top
            .as_ref()
            .and_then(Weak::upgrade)
            .unwrap_or_else(|| Arc::clone(&self.next))
    }
}

#[async_trait]
impl References for ReferencesDecorator {
    async fn put(&self, locator: Locator, component: ComponentRef) -> ContainerResult<()> {
        self.next.put(locator, component).await
    }

    async fn remove(&self, locator: &Locator) -> ContainerResult<Option<ComponentRef>> {
        self.next.remove(locator).await
    }

    async fn remove_all(&self, locator: &Locator) -> ContainerResult<Vec<ComponentRef>> {
        self.next.remove_all(locator).await
    }

    async fn take(&self, locator: &Locator) -> Removal {
        self.next.take(locator).await
    }

    async fn take_all(&self, locator: &Locator) -> Removal {
        self.next.take_all(locator).await
    }

    fn get_all_locators(&self) -> Vec<Locator> {
        self.next.get_all_locators()
    }

    fn get_all(&self) -> Vec<ComponentRef> {
        self.next.get_all()
    }

    async fn find(&self, locator: &Locator, required: bool) -> ContainerResult<Vec<ComponentRef>> {
        self.next.find(locator, required).await
    }
}

impl fmt::Debug for ReferencesDecorator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferencesDecorator")
            .field("components", &self.next.get_all().len())
            .field("has_top", &self.top.is_some())
            .finish()
    }
}
