//! 运行装饰器

use super::ReferencesDecorator;
use crate::lifecycle::{Closer, Opener};
use async_trait::async_trait;
use refer_abstractions::{Closable, ComponentRef, Openable, References, Removal};
use refer_common::{ContainerResult, Locator};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, error, warn};

/// 运行装饰器
///
/// 打开时按插入顺序打开所有组件，第一个失败立即中止并保持关闭状态。
/// 关闭时尽力关闭所有组件并返回第一个错误。打开期间移除的组件总会被关闭，
/// 即使下层拆除失败。
#[derive(Debug)]
pub struct RunReferences {
    base: ReferencesDecorator,
    opened: AtomicBool,
}

impl RunReferences {
    /// 创建运行装饰器
    pub fn new(next: Arc<dyn References>, top: Option<Weak<dyn References>>) -> Self {
        Self {
            base: ReferencesDecorator::new(next, top),
            opened: AtomicBool::new(false),
        }
    }

    async fn stop(&self, removal: &mut Removal) {
        if !self.is_open() {
            return;
        }
        let result = Closer::close(removal.components()).await;
        if let Err(err) = &result {
            warn!("移除的组件关闭失败: {}", err);
        }
        removal.record(result);
    }
}

#[async_trait]
impl Closable for RunReferences {
    async fn close(&self) -> ContainerResult<()> {
        if !self.opened.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        debug!("关闭所有组件");
        Closer::close(&self.base.get_all()).await
    }
}

#[async_trait]
impl Openable for RunReferences {
    fn is_open(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }

    async fn open(&self) -> ContainerResult<()> {
        if self.is_open() {
            return Ok(());
        }

        debug!("打开所有组件");
        if let Err(err) = Opener::open(&self.base.get_all()).await {
            error!("打开组件失败: {}", err);
            return Err(err);
        }
        self.opened.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl References for RunReferences {
    async fn put(&self, locator: Locator, component: ComponentRef) -> ContainerResult<()> {
        self.base.put(locator, Arc::clone(&component)).await?;
        if self.is_open() {
            Opener::open_one(&*component).await?;
        }
        Ok(())
    }

    async fn remove(&self, locator: &Locator) -> ContainerResult<Option<ComponentRef>> {
        Ok(self.take(locator).await.into_result()?.into_iter().next())
    }

    async fn remove_all(&self, locator: &Locator) -> ContainerResult<Vec<ComponentRef>> {
        self.take_all(locator).await.into_result()
    }

    // 下层的链接装饰器先解除引用，这里再关闭
    async fn take(&self, locator: &Locator) -> Removal {
        let mut removal = self.base.take(locator).await;
        self.stop(&mut removal).await;
        removal
    }

    async fn take_all(&self, locator: &Locator) -> Removal {
        let mut removal = self.base.take_all(locator).await;
        self.stop(&mut removal).await;
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
