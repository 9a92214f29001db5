//! 构建装饰器

use super::ReferencesDecorator;
use async_trait::async_trait;
use refer_abstractions::{ComponentRef, References, Removal};
use refer_common::{ContainerResult, CreateResult, Locator, ReferenceError};
use std::sync::{Arc, Weak};
use tracing::debug;

/// 构建装饰器
///
/// 查找没有结果时，用注册表中的工厂组件按需构建缺失的组件，并以补全后的
/// 定位器放入最外层注册表，之后的查找直接命中，不会重复构建。
#[derive(Debug)]
pub struct BuildReferences {
    base: ReferencesDecorator,
}

impl BuildReferences {
    /// 创建构建装饰器
    pub fn new(next: Arc<dyn References>, top: Option<Weak<dyn References>>) -> Self {
        Self {
            base: ReferencesDecorator::new(next, top),
        }
    }

    /// 查找可以创建该定位器的工厂组件
    ///
    /// 逆序扫描，最后放入的工厂优先。返回工厂和它登记的定位器。
    pub fn find_factory(&self, locator: &Locator) -> Option<(ComponentRef, Locator)> {
        self.base.get_all().into_iter().rev().find_map(|component| {
            let registered = component.as_factory()?.can_create(locator)?;
            Some((component, registered))
        })
    }

    /// 使用工厂创建组件
    ///
    /// 没有工厂匹配时返回 `None`，工厂创建失败时返回创建错误。
    pub fn create(&self, locator: &Locator) -> CreateResult<Option<(ComponentRef, Locator)>> {
        let Some((factory, registered)) = self.find_factory(locator) else {
            return Ok(None);
        };
        let Some(factory) = factory.as_factory() else {
            return Ok(None);
        };
        let component = factory.create(locator)?;
        Ok(Some((component, registered)))
    }

    /// 用工厂登记的定位器补全查询定位器中不受约束的字段
    pub fn clarify_locator(locator: &Locator, registered: &Locator) -> Locator {
        match (locator, registered) {
            (Locator::Descriptor(query), Locator::Descriptor(registered)) => {
                Locator::Descriptor(query.clarify(registered))
            }
            _ => locator.clone(),
        }
    }
}

#[async_trait]
impl References for BuildReferences {
    async fn put(&self, locator: Locator, component: ComponentRef) -> ContainerResult<()> {
        self.base.put(locator, component).await
    }

    async fn remove(&self, locator: &Locator) -> ContainerResult<Option<ComponentRef>> {
        self.base.remove(locator).await
    }

    async fn remove_all(&self, locator: &Locator) -> ContainerResult<Vec<ComponentRef>> {
        self.base.remove_all(locator).await
    }

    async fn take(&self, locator: &Locator) -> Removal {
        self.base.take(locator).await
    }

    async fn take_all(&self, locator: &Locator) -> Removal {
        self.base.take_all(locator).await
    }

    fn get_all_locators(&self) -> Vec<Locator> {
        self.base.get_all_locators()
    }

    fn get_all(&self) -> Vec<ComponentRef> {
        self.base.get_all()
    }

    async fn find(&self, locator: &Locator, required: bool) -> ContainerResult<Vec<ComponentRef>> {
        let mut components = self.base.find(locator, false).await?;

        if components.is_empty() {
            if let Some((component, registered)) = self.create(locator)? {
                let clarified = Self::clarify_locator(locator, &registered);
                debug!("自动构建组件: {} -> {}", locator, clarified);
                self.base.top().put(clarified, Arc::clone(&component)).await?;
                components.push(component);
            }
        }

        if required && components.is_empty() {
            return Err(ReferenceError::not_found(locator.clone()).into());
        }
        Ok(components)
    }
}
