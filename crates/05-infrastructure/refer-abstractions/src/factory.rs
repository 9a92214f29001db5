//! 组件工厂抽象接口
//!
//! 提供按定位器按需创建组件的能力

use crate::component::ComponentRef;
use refer_common::{CreateResult, Locator};

/// 组件工厂 trait
///
/// 工厂本身也是注册表中的组件，构建装饰器会在查找不到组件时询问已注册的工厂。
pub trait ComponentFactory: Send + Sync {
    /// 检查能否创建指定定位器的组件
    ///
    /// 返回工厂中登记的定位器（可能比查询定位器更具体），无法创建时返回 `None`。
    fn can_create(&self, locator: &Locator) -> Option<Locator>;

    /// 创建组件实例
    fn create(&self, locator: &Locator) -> CreateResult<ComponentRef>;
}
