//! 组件引用

use crate::component::ComponentRef;
use refer_common::Locator;

/// 组件引用
///
/// 不可变的（定位器，组件）对。组件句柄不可能为空。
#[derive(Debug, Clone)]
pub struct Reference {
    locator: Locator,
    component: ComponentRef,
}

impl Reference {
    /// 创建新的组件引用
    pub fn new(locator: impl Into<Locator>, component: ComponentRef) -> Self {
        Self {
            locator: locator.into(),
            component,
        }
    }

    /// 判断引用是否匹配查询定位器
    pub fn matches(&self, query: &Locator) -> bool {
        self.locator.matches(query)
    }

    /// 注册时使用的定位器
    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    /// 组件句柄
    pub fn component(&self) -> &ComponentRef {
        &self.component
    }

    /// 取出组件句柄
    pub fn into_component(self) -> ComponentRef {
        self.component
    }
}
