//! 组件注册表抽象接口

use crate::component::{downcast_component, Component, ComponentRef};
use async_trait::async_trait;
use refer_common::{ContainerError, ContainerResult, Locator, ReferenceError};
use std::sync::Arc;

/// 移除结果
///
/// 保存已经离开注册表的组件以及拆除过程中遇到的第一个错误。拆除失败时组件
/// 仍然交回调用方，外层装饰器可以继续关闭它们。
#[derive(Debug, Default)]
pub struct Removal {
    components: Vec<ComponentRef>,
    error: Option<ContainerError>,
}

impl Removal {
    /// 由已移除的组件创建
    pub fn new(components: Vec<ComponentRef>) -> Self {
        Self {
            components,
            error: None,
        }
    }

    /// 由普通的移除结果创建
    pub fn from_result(result: ContainerResult<Vec<ComponentRef>>) -> Self {
        match result {
            Ok(components) => Self::new(components),
            Err(err) => Self {
                components: Vec::new(),
                error: Some(err),
            },
        }
    }

    /// 已移除的组件
    pub fn components(&self) -> &[ComponentRef] {
        &self.components
    }

    /// 第一个拆除错误
    pub fn error(&self) -> Option<&ContainerError> {
        self.error.as_ref()
    }

    /// 记录一步拆除的结果，只保留第一个错误
    pub fn record(&mut self, result: ContainerResult<()>) {
        if let Err(err) = result {
            self.error.get_or_insert(err);
        }
    }

    /// 拆分为组件和第一个错误
    pub fn into_parts(self) -> (Vec<ComponentRef>, Option<ContainerError>) {
        (self.components, self.error)
    }

    /// 有错误时返回错误，否则返回组件
    pub fn into_result(self) -> ContainerResult<Vec<ComponentRef>> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.components),
        }
    }
}

/// 组件注册表 trait
///
/// 查找按插入顺序的逆序进行，多个组件匹配时最后放入的组件优先。
#[async_trait]
pub trait References: Send + Sync {
    /// 放入组件，允许重复的定位器
    async fn put(&self, locator: Locator, component: ComponentRef) -> ContainerResult<()>;

    /// 移除最后放入的匹配组件
    async fn remove(&self, locator: &Locator) -> ContainerResult<Option<ComponentRef>>;

    /// 移除所有匹配组件
    async fn remove_all(&self, locator: &Locator) -> ContainerResult<Vec<ComponentRef>>;

    /// 按插入顺序获取所有定位器
    fn get_all_locators(&self) -> Vec<Locator>;

    /// 按插入顺序获取所有组件
    fn get_all(&self) -> Vec<ComponentRef>;

    /// 按逆序查找所有匹配组件
    ///
    /// `required` 为真且没有匹配时返回引用未找到错误。
    async fn find(&self, locator: &Locator, required: bool) -> ContainerResult<Vec<ComponentRef>>;

    /// 获取所有匹配组件，允许为空
    async fn get_optional(&self, locator: &Locator) -> ContainerResult<Vec<ComponentRef>> {
        self.find(locator, false).await
    }

    /// 获取所有匹配组件，至少需要一个
    async fn get_required(&self, locator: &Locator) -> ContainerResult<Vec<ComponentRef>> {
        self.find(locator, true).await
    }

    /// 获取一个匹配组件，允许为空
    async fn get_one_optional(&self, locator: &Locator) -> ContainerResult<Option<ComponentRef>> {
        Ok(self.find(locator, false).await?.into_iter().next())
    }

    /// 移除最后放入的匹配组件，拆除失败时仍然交回组件
    ///
    /// 装饰器覆盖此方法以便在自身拆除失败后，外层还能拿到已移除的组件。
    async fn take(&self, locator: &Locator) -> Removal {
        Removal::from_result(
            self.remove(locator)
                .await
                .map(|removed| removed.into_iter().collect()),
        )
    }

    /// 移除所有匹配组件，拆除失败时仍然交回组件
    async fn take_all(&self, locator: &Locator) -> Removal {
        Removal::from_result(self.remove_all(locator).await)
    }

    /// 获取一个匹配组件，必须存在
    async fn get_one_required(&self, locator: &Locator) -> ContainerResult<ComponentRef> {
        self.find(locator, true)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ReferenceError::not_found(locator.clone()).into())
    }
}

fn type_mismatch<T>(locator: &Locator) -> ReferenceError {
    ReferenceError::TypeMismatch {
        locator: locator.clone(),
        expected: std::any::type_name::<T>(),
    }
}

/// 注册表的类型化查找扩展
#[async_trait]
pub trait ReferencesExt: References {
    /// 获取一个指定类型的组件，必须存在
    async fn get_one_required_as<T: Component>(&self, locator: &Locator) -> ContainerResult<Arc<T>> {
        let component = self.get_one_required(locator).await?;
        downcast_component::<T>(&component).ok_or_else(|| type_mismatch::<T>(locator).into())
    }

    /// 获取一个指定类型的组件，允许为空
    async fn get_one_optional_as<T: Component>(
        &self,
        locator: &Locator,
    ) -> ContainerResult<Option<Arc<T>>> {
        match self.get_one_optional(locator).await? {
            Some(component) => downcast_component::<T>(&component)
                .map(Some)
                .ok_or_else(|| type_mismatch::<T>(locator).into()),
            None => Ok(None),
        }
    }

    /// 获取所有指定类型的匹配组件，跳过类型不符的组件
    async fn get_optional_as<T: Component>(&self, locator: &Locator) -> ContainerResult<Vec<Arc<T>>> {
        Ok(self
            .get_optional(locator)
            .await?
            .iter()
            .filter_map(downcast_component::<T>)
            .collect())
    }
}

impl<R: References + ?Sized> ReferencesExt for R {}
