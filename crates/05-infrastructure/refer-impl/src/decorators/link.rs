//! 链接装饰器

use super::ReferencesDecorator;
use crate::lifecycle::Referencer;
use async_trait::async_trait;
use refer_abstractions::{Closable, ComponentRef, Openable, References, Removal};
use refer_common::{ContainerResult, Locator};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, error, warn};

/// 链接装饰器
///
/// 打开时为所有组件设置引用，关闭时解除引用。打开期间放入的组件在存入后
/// 立即设置引用，移除的组件立即解除引用。解除引用失败时组件仍然交回。
#[derive(Debug)]
pub struct LinkReferences {
    base: ReferencesDecorator,
    opened: AtomicBool,
}

impl LinkReferences {
    /// 创建链接装饰器
    pub fn new(next: Arc<dyn References>, top: Option<Weak<dyn References>>) -> Self {
        Self {
            base: ReferencesDecorator::new(next, top),
            opened: AtomicBool::new(false),
        }
    }

    async fn unlink(&self, removal: &mut Removal) {
        if !self.is_open() {
            return;
        }
        let result = Referencer::unset_references(removal.components()).await;
        if let Err(err) = &result {
            warn!("移除的组件解除引用失败: {}", err);
        }
        removal.record(result);
    }
}

#[async_trait]
impl Closable for LinkReferences {
    async fn close(&self) -> ContainerResult<()> {
        if !self.opened.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        debug!("解除所有组件引用");
        Referencer::unset_references(&self.base.get_all()).await
    }
}

#[async_trait]
impl Openable for LinkReferences {
    fn is_open(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }

    async fn open(&self) -> ContainerResult<()> {
        if self.opened.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        // 先置位，链接期间自动构建的组件在放入时也会被设置引用
        debug!("设置所有组件引用");
        let components = self.base.get_all();
        if let Err(err) = Referencer::set_references(&self.base.top(), &components).await {
            error!("设置组件引用失败: {}", err);
            self.opened.store(false, Ordering::SeqCst);
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl References for LinkReferences {
    async fn put(&self, locator: Locator, component: ComponentRef) -> ContainerResult<()> {
        self.base.put(locator, Arc::clone(&component)).await?;
        if self.is_open() {
            Referencer::set_references_for_one(&self.base.top(), &*component).await?;
        }
        Ok(())
    }

    async fn remove(&self, locator: &Locator) -> ContainerResult<Option<ComponentRef>> {
        Ok(self.take(locator).await.into_result()?.into_iter().next())
    }

    async fn remove_all(&self, locator: &Locator) -> ContainerResult<Vec<ComponentRef>> {
        self.take_all(locator).await.into_result()
    }

    async fn take(&self, locator: &Locator) -> Removal {
        let mut removal = self.base.take(locator).await;
        self.unlink(&mut removal).await;
        removal
    }

    async fn take_all(&self, locator: &Locator) -> Removal {
        let mut removal = self.base.take_all(locator).await;
        self.unlink(&mut removal).await;
        removal
    }

    fn get_all_locators(&self) -> Vec<Locator> {
        self.base.get_all_locators()
    }

    fn get_all(&self) -> Vec<ComponentRef> {
        self.base.get_all()
    }

    async fn find(&self, locator: &Locator, required: bool) -> ContainerResult<Vec<ComponentRef>> {
        self.base.find(locator, required).await
    }
}
