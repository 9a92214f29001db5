//! 组件工厂实现

use refer_abstractions::{Component, ComponentFactory, ComponentRef};
use refer_common::{BoxError, CreateError, CreateResult, Locator};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error};

/// 组件构造函数类型
pub type Constructor = Box<dyn Fn(&Locator) -> Result<ComponentRef, BoxError> + Send + Sync>;

struct Registration {
    locator: Locator,
    constructor: Constructor,
}

/// 基础组件工厂
///
/// 按注册顺序保存（定位器，构造函数）对。在同一个工厂内先注册的匹配项优先。
///
/// ```
/// use refer_abstractions::{Component, ComponentFactory};
/// use refer_common::Descriptor;
/// use refer_impl::Factory;
///
/// #[derive(Debug, Default)]
/// struct MemoryCache;
///
/// impl Component for MemoryCache {}
///
/// let mut factory = Factory::new();
/// factory.register_default::<MemoryCache>(Descriptor::new("lorn", "cache", "memory", "*", "1.0"));
///
/// let query = Descriptor::new("lorn", "cache", "memory", "default", "1.0").into();
/// assert!(factory.can_create(&query).is_some());
/// assert!(factory.create(&query).is_ok());
/// ```
#[derive(Default)]
pub struct Factory {
    registrations: Vec<Registration>,
}

impl Factory {
    /// 创建空工厂
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册构造函数
    ///
    /// 构造函数接收调用方的查询定位器。
    pub fn register<F>(&mut self, locator: impl Into<Locator>, constructor: F)
    where
        F: Fn(&Locator) -> Result<ComponentRef, BoxError> + Send + Sync + 'static,
    {
        let locator = locator.into();
        debug!("注册组件构造函数: {}", locator);
        self.registrations.push(Registration {
            locator,
            constructor: Box::new(constructor),
        });
    }

    /// 注册无参构造函数
    pub fn register_type<T, F>(&mut self, locator: impl Into<Locator>, constructor: F)
    where
        T: Component,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.register(locator, move |_| Ok(Arc::new(constructor()) as ComponentRef));
    }

    /// 使用 [`Default`] 注册组件类型
    pub fn register_default<T>(&mut self, locator: impl Into<Locator>)
    where
        T: Component + Default,
    {
        self.register_type(locator, T::default);
    }

    /// 已注册的构造函数数量
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// 是否没有任何注册
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    fn find_registration(&self, locator: &Locator) -> Option<&Registration> {
        self.registrations
            .iter()
            .find(|registration| registration.locator.matches(locator))
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "未知原因".to_string()
    }
}

impl ComponentFactory for Factory {
    fn can_create(&self, locator: &Locator) -> Option<Locator> {
        self.find_registration(locator)
            .map(|registration| registration.locator.clone())
    }

    fn create(&self, locator: &Locator) -> CreateResult<ComponentRef> {
        let registration = self
            .find_registration(locator)
            .ok_or_else(|| CreateError::not_supported(locator.clone()))?;

        match panic::catch_unwind(AssertUnwindSafe(|| (registration.constructor)(locator))) {
            Ok(Ok(component)) => {
                debug!("创建组件: {}", locator);
                Ok(component)
            }
            Ok(Err(source)) => {
                error!("组件创建失败: {}, 原因: {}", locator, source);
                Err(CreateError::Failed {
                    locator: locator.clone(),
                    source,
                })
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!("组件构造函数崩溃: {}, 原因: {}", locator, message);
                Err(CreateError::Panicked {
                    locator: locator.clone(),
                    message,
                })
            }
        }
    }
}

impl Component for Factory {
    fn as_factory(&self) -> Option<&dyn ComponentFactory> {
        Some(self)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field(
                "registrations",
                &self
                    .registrations
                    .iter()
                    .map(|registration| registration.locator.to_string())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// 组合工厂
///
/// 聚合多个工厂。与单个工厂相反，后加入的工厂优先，便于覆盖默认实现。
#[derive(Default)]
pub struct CompositeFactory {
    factories: Vec<Arc<dyn ComponentFactory>>,
}

impl CompositeFactory {
    /// 创建空的组合工厂
    pub fn new() -> Self {
        Self::default()
    }

    /// 从工厂列表创建
    pub fn from_factories(factories: Vec<Arc<dyn ComponentFactory>>) -> Self {
        Self { factories }
    }

    /// 加入工厂
    pub fn add(&mut self, factory: Arc<dyn ComponentFactory>) {
        self.factories.push(factory);
    }

    /// 按实例移除工厂
    pub fn remove(&mut self, factory: &Arc<dyn ComponentFactory>) {
        let target = Arc::as_ptr(factory).cast::<()>();
        self.factories
            .retain(|existing| !std::ptr::eq(Arc::as_ptr(existing).cast::<()>(), target));
    }

    /// 工厂数量
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl ComponentFactory for CompositeFactory {
    fn can_create(&self, locator: &Locator) -> Option<Locator> {
        self.factories
            .iter()
            .rev()
            .find_map(|factory| factory.can_create(locator))
    }

    fn create(&self, locator: &Locator) -> CreateResult<ComponentRef> {
        self.factories
            .iter()
            .rev()
            .find(|factory| factory.can_create(locator).is_some())
            .ok_or_else(|| CreateError::not_supported(locator.clone()))?
            .create(locator)
    }
}

impl Component for CompositeFactory {
    fn as_factory(&self) -> Option<&dyn ComponentFactory> {
        Some(self)
    }
}

impl fmt::Debug for CompositeFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeFactory")
            .field("factories", &self.factories.len())
            .finish()
    }
}
