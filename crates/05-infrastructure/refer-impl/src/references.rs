//! 基础组件注册表实现

use async_trait::async_trait;
use parking_lot::RwLock;
use refer_abstractions::{ComponentRef, Reference, References};
use refer_common::{ContainerResult, Locator, ReferenceError};
use tracing::debug;

/// 基础组件注册表
///
/// 按插入顺序保存引用，按逆序查找。定位器允许重复，最后放入的匹配组件优先。
#[derive(Debug, Default)]
pub struct ReferencesStore {
    references: RwLock<Vec<Reference>>,
}

impl ReferencesStore {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 从（定位器，组件）对创建注册表
    pub fn from_tuples<I>(tuples: I) -> Self
    where
        I: IntoIterator<Item = (Locator, ComponentRef)>,
    {
        Self {
            references: RwLock::new(
                tuples
                    .into_iter()
                    .map(|(locator, component)| Reference::new(locator, component))
                    .collect(),
            ),
        }
    }

    /// 引用数量
    pub fn len(&self) -> usize {
        self.references.read().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.references.read().is_empty()
    }

    /// 清空注册表，不触发任何生命周期调用
    pub fn clear(&self) {
        self.references.write().clear();
    }

    fn collect_matches(&self, locator: &Locator) -> Vec<ComponentRef> {
        self.references
            .read()
            .iter()
            .rev()
            .filter(|reference| reference.matches(locator))
            .map(|reference| reference.component().clone())
            .collect()
    }
}

#[async_trait]
impl References for ReferencesStore {
    async fn put(&self, locator: Locator, component: ComponentRef) -> ContainerResult<()> {
        debug!("放入组件: {}", locator);
        self.references
            .write()
            .push(Reference::new(locator, component));
        Ok(())
    }

    async fn remove(&self, locator: &Locator) -> ContainerResult<Option<ComponentRef>> {
        let mut references = self.references.write();
        let position = references
            .iter()
            .rposition(|reference| reference.matches(locator));
        let removed = position.map(|index| references.remove(index).into_component());

        if removed.is_some() {
            debug!("移除组件: {}", locator);
        }
        Ok(removed)
    }

    async fn remove_all(&self, locator: &Locator) -> ContainerResult<Vec<ComponentRef>> {
        let mut references = self.references.write();
        let mut removed = Vec::new();

        for index in (0..references.len()).rev() {
            if references[index].matches(locator) {
                removed.push(references.remove(index).into_component());
            }
        }

        debug!("移除 {} 个组件: {}", removed.len(), locator);
        Ok(removed)
    }

    fn get_all_locators(&self) -> Vec<Locator> {
        self.references
            .read()
            .iter()
            .map(|reference| reference.locator().clone())
            .collect()
    }

    fn get_all(&self) -> Vec<ComponentRef> {
        self.references
            .read()
            .iter()
            .map(|reference| reference.component().clone())
            .collect()
    }

    async fn find(&self, locator: &Locator, required: bool) -> ContainerResult<Vec<ComponentRef>> {
        let components = self.collect_matches(locator);
        if required && components.is_empty() {
            return Err(ReferenceError::not_found(locator.clone()).into());
        }
        Ok(components)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refer_abstractions::{same_component, Component};
    use refer_common::Descriptor;
    use std::sync::Arc;

    #[derive(Debug)]
    struct Named(&'static str);

    impl Component for Named {}

    fn component(name: &'static str) -> ComponentRef {
        Arc::new(Named(name))
    }

    fn logger_locator() -> Locator {
        Descriptor::new("lorn", "logger", "console", "default", "1.0").into()
    }

    /// 测试逆序查找：最后放入的组件优先
    #[tokio::test]
    async fn test_find_prefers_latest() {
        let store = ReferencesStore::new();
        let a = component("a");
        let b = component("b");
        store.put(logger_locator(), a.clone()).await.unwrap();
        store.put(logger_locator(), b.clone()).await.unwrap();

        let found = store.find(&logger_locator(), false).await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(same_component(&found[0], &b));
        assert!(same_component(&found[1], &a));

        let all = store.get_all();
        assert!(same_component(&all[0], &a), "get_all 应该保持插入顺序");
    }

    /// 测试按通配符查找
    #[tokio::test]
    async fn test_find_by_wildcard() {
        let store = ReferencesStore::new();
        store.put(logger_locator(), component("logger")).await.unwrap();
        store
            .put(Descriptor::new("lorn", "cache", "memory", "default", "1.0").into(), component("cache"))
            .await
            .unwrap();

        let query: Locator = Descriptor::new("*", "logger", "*", "*", "*").into();
        let found = store.get_one_required(&query).await.unwrap();
        assert!(format!("{found:?}").contains("logger"));

        let none = store
            .get_one_optional(&Descriptor::new("*", "counters", "*", "*", "*").into())
            .await
            .unwrap();
        assert!(none.is_none());
    }

    /// 测试 required 查找失败返回引用未找到错误
    #[tokio::test]
    async fn test_required_not_found() {
        let store = ReferencesStore::new();
        let err = store.find(&logger_locator(), true).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(store.find(&logger_locator(), false).await.unwrap().is_empty());
        assert!(store.get_one_required(&logger_locator()).await.unwrap_err().is_not_found());
    }

    /// 测试移除最后放入的匹配组件
    #[tokio::test]
    async fn test_remove_latest() {
        let store = ReferencesStore::new();
        let a = component("a");
        let b = component("b");
        store.put(logger_locator(), a.clone()).await.unwrap();
        store.put(logger_locator(), b.clone()).await.unwrap();

        let removed = store.remove(&logger_locator()).await.unwrap().unwrap();
        assert!(same_component(&removed, &b));
        assert_eq!(store.len(), 1);

        let missing = store.remove(&Locator::from("missing")).await.unwrap();
        assert!(missing.is_none(), "没有匹配时不应该报错");
    }

    /// 测试移除所有匹配组件
    #[tokio::test]
    async fn test_remove_all() {
        let store = ReferencesStore::from_tuples(vec![
            (logger_locator(), component("a")),
            (Locator::from("other"), component("other")),
            (logger_locator(), component("b")),
        ]);

        let removed = store.remove_all(&logger_locator()).await.unwrap();
        assert_eq!(removed.len(), 2);
        assert!(store.find(&logger_locator(), false).await.unwrap().is_empty());
        assert_eq!(store.get_all_locators(), vec![Locator::from("other")]);
    }
}
