//! 托管组件注册表

use crate::decorators::{BuildReferences, LinkReferences, RunReferences};
use crate::references::ReferencesStore;
use async_trait::async_trait;
use refer_abstractions::{Closable, ComponentRef, Openable, References, Removal};
use refer_common::{ContainerResult, Locator};
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{info, warn};

/// 托管组件注册表
///
/// 由基础注册表依次包装构建、链接、运行三层装饰器组成，每层的最外层指针都
/// 指向本注册表。打开时先链接再运行，关闭时先停止再解除链接。
///
/// ```
/// use refer_abstractions::{Openable, References};
/// use refer_impl::ManagedReferences;
///
/// # #[tokio::main]
/// # async fn main() {
/// let references = ManagedReferences::new();
/// references.open().await.unwrap();
/// assert!(references.is_open());
/// assert!(references.get_all().is_empty());
/// # }
/// ```
pub struct ManagedReferences {
    store: Arc<ReferencesStore>,
    builder: Arc<BuildReferences>,
    linker: Arc<LinkReferences>,
    runner: Arc<RunReferences>,
}

impl ManagedReferences {
    /// 创建空的托管注册表
    pub fn new() -> Arc<Self> {
        Self::from_tuples(Vec::new())
    }

    /// 从（定位器，组件）对创建托管注册表
    pub fn from_tuples<I>(tuples: I) -> Arc<Self>
    where
        I: IntoIterator<Item = (Locator, ComponentRef)>,
    {
        let store = Arc::new(ReferencesStore::from_tuples(tuples));

        Arc::new_cyclic(|this: &Weak<Self>| {
            let top: Weak<dyn References> = this.clone();
            let builder = Arc::new(BuildReferences::new(store.clone(), Some(top.clone())));
            let linker = Arc::new(LinkReferences::new(builder.clone(), Some(top.clone())));
            let runner = Arc::new(RunReferences::new(linker.clone(), Some(top)));
            Self {
                store,
                builder,
                linker,
                runner,
            }
        })
    }

    /// 构建层，用于查找工厂和补全定位器
    pub fn builder(&self) -> &BuildReferences {
        &self.builder
    }

    /// 链接层
    pub fn linker(&self) -> &LinkReferences {
        &self.linker
    }

    /// 运行层
    pub fn runner(&self) -> &RunReferences {
        &self.runner
    }

    /// 组件数量
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[async_trait]
impl References for ManagedReferences {
    async fn put(&self, locator: Locator, component: ComponentRef) -> ContainerResult<()> {
        self.runner.put(locator, component).await
    }

    async fn remove(&self, locator: &Locator) -> ContainerResult<Option<ComponentRef>> {
        self.runner.remove(locator).await
    }

    async fn remove_all(&self, locator: &Locator) -> ContainerResult<Vec<ComponentRef>> {
        self.runner.remove_all(locator).await
    }

    async fn take(&self, locator: &Locator) -> Removal {
        self.runner.take(locator).await
    }

    async fn take_all(&self, locator: &Locator) -> Removal {
        self.runner.take_all(locator).await
    }

    fn get_all_locators(&self) -> Vec<Locator> {
        self.runner.get_all_locators()
    }

    fn get_all(&self) -> Vec<ComponentRef> {
        self.runner.get_all()
    }

    async fn find(&self, locator: &Locator, required: bool) -> ContainerResult<Vec<ComponentRef>> {
        self.runner.find(locator, required).await
    }
}

#[async_trait]
impl Closable for ManagedReferences {
    async fn close(&self) -> ContainerResult<()> {
        let stopped = self.runner.close().await;
        let unlinked = self.linker.close().await;
        if let Err(err) = &unlinked {
            warn!("解除组件引用失败: {}", err);
        }
        info!("托管注册表已关闭");
        stopped.and(unlinked)
    }
}

#[async_trait]
impl Openable for ManagedReferences {
    fn is_open(&self) -> bool {
        self.linker.is_open() && self.runner.is_open()
    }

    async fn open(&self) -> ContainerResult<()> {
        self.linker.open().await?;
        self.runner.open().await?;
        info!("托管注册表已打开, 组件数量: {}", self.len());
        Ok(())
    }
}

impl fmt::Debug for ManagedReferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagedReferences")
            .field("locators", &self.get_all_locators())
            .field("linked", &self.linker.is_open())
            .field("running", &self.runner.is_open())
            .finish()
    }
}
