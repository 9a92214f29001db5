//! 组件注册表实现的集成测试

use async_trait::async_trait;
use parking_lot::Mutex;
use refer_abstractions::{
    same_component, Closable, Component, ComponentRef, Openable, Referenceable, References,
    ReferencesExt,
};
use refer_common::{ContainerResult, Descriptor, Locator};
use refer_impl::{DependencyResolver, Factory, ManagedReferences, ReferencesStore};
use std::sync::Arc;

/// 测试组件
#[derive(Debug, Default)]
struct MemoryCache {
    capacity: usize,
}

impl Component for MemoryCache {}

/// 通过依赖解析器查找协作者的组件
#[derive(Debug, Default)]
struct CacheClient {
    resolver: DependencyResolver,
    cache: Mutex<Option<Arc<MemoryCache>>>,
}

impl CacheClient {
    fn new() -> Self {
        let client = Self::default();
        client
            .resolver
            .put("cache", Descriptor::new("*", "cache", "*", "*", "1.0"));
        client
    }
}

#[async_trait]
impl Referenceable for CacheClient {
    async fn set_references(&self, references: Arc<dyn References>) -> ContainerResult<()> {
        self.resolver.set_references(references).await?;
        let cache = self.resolver.get_one_required_as::<MemoryCache>("cache").await?;
        *self.cache.lock() = Some(cache);
        Ok(())
    }
}

impl Component for CacheClient {
    fn as_referenceable(&self) -> Option<&dyn Referenceable> {
        Some(self)
    }
}

#[tokio::test]
async fn test_store_reverse_priority() {
    let store = ReferencesStore::new();
    let locator: Locator = Descriptor::new("lorn", "cache", "memory", "default", "1.0").into();
    let first: ComponentRef = Arc::new(MemoryCache { capacity: 1 });
    let second: ComponentRef = Arc::new(MemoryCache { capacity: 2 });

    store.put(locator.clone(), first.clone()).await.unwrap();
    store.put(locator.clone(), second.clone()).await.unwrap();

    let found = store.find(&locator, false).await.unwrap();
    assert!(same_component(&found[0], &second));
    assert!(same_component(&found[1], &first));

    let cache = store.get_one_required_as::<MemoryCache>(&locator).await.unwrap();
    assert_eq!(cache.capacity, 2);

    let removed = store.remove_all(&locator).await.unwrap();
    assert_eq!(removed.len(), 2);
    assert!(store.find(&locator, false).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_managed_references_wires_auto_built_dependency() {
    let mut factory = Factory::new();
    factory.register_type(Descriptor::new("lorn", "cache", "memory", "*", "1.0"), || MemoryCache {
        capacity: 64,
    });

    let client = Arc::new(CacheClient::new());
    let references = ManagedReferences::new();
    references
        .put(
            Descriptor::new("lorn", "factory", "cache", "default", "1.0").into(),
            Arc::new(factory),
        )
        .await
        .unwrap();
    references
        .put(Descriptor::new("lorn", "client", "cache", "default", "1.0").into(), client.clone())
        .await
        .unwrap();

    references.open().await.unwrap();
    assert!(references.is_open());

    let wired = client.cache.lock().clone().expect("缓存应该已注入");
    let found = references
        .get_one_optional_as::<MemoryCache>(&Descriptor::new("*", "cache", "*", "*", "*").into())
        .await
        .unwrap()
        .expect("缓存应该已注册");
    assert!(Arc::ptr_eq(&wired, &found));
    assert_eq!(found.capacity, 64);
    assert_eq!(references.len(), 3);

    references.close().await.unwrap();
    assert!(!references.is_open());
}
