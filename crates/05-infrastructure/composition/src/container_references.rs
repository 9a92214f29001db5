//! 容器组件注册表

use crate::config::{ComponentConfig, ContainerConfig, DESCRIPTOR_KEY};
use async_trait::async_trait;
use parking_lot::RwLock;
use refer_abstractions::{
    Closable, Component, ComponentFactory, ComponentRef, Openable, References, Removal,
};
use refer_common::{ConfigError, ContainerResult, CreateError, Locator};
use refer_impl::{BuildReferences, CompositeFactory, Factory, ManagedReferences, Referencer};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// 容器组件注册表
///
/// 在托管注册表之上增加类型注册表和从声明式配置放入组件的能力。
pub struct ContainerReferences {
    references: Arc<ManagedReferences>,
    types: RwLock<CompositeFactory>,
}

impl ContainerReferences {
    /// 创建空的容器注册表
    pub fn new() -> Self {
        Self {
            references: ManagedReferences::new(),
            types: RwLock::new(CompositeFactory::new()),
        }
    }

    /// 使用已有的类型注册表创建
    pub fn with_types(types: Arc<dyn ComponentFactory>) -> Self {
        let references = Self::new();
        references.types.write().add(types);
        references
    }

    /// 注册类型构造函数，后注册的同名类型覆盖先注册的
    pub fn register_type<T, F>(&self, type_name: impl Into<String>, constructor: F)
    where
        T: Component,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let mut factory = Factory::new();
        factory.register_type(Locator::Key(type_name.into()), constructor);
        self.types.write().add(Arc::new(factory));
    }

    /// 底层托管注册表
    pub fn managed(&self) -> &Arc<ManagedReferences> {
        &self.references
    }

    fn create_component(&self, entry: &ComponentConfig) -> ContainerResult<(Locator, ComponentRef)> {
        if let Some(type_name) = &entry.type_name {
            let key = Locator::Key(type_name.clone());
            let component = self.types.read().create(&key)?;
            let locator = entry.descriptor.clone().map_or(key, Locator::from);
            return Ok((locator, component));
        }

        let Some(descriptor) = &entry.descriptor else {
            return Err(ConfigError::missing_field(DESCRIPTOR_KEY).into());
        };
        let locator = Locator::from(descriptor);
        match self.references.builder().create(&locator)? {
            Some((component, registered)) => Ok((
                BuildReferences::clarify_locator(&locator, &registered),
                component,
            )),
            None => Err(CreateError::not_supported(locator).into()),
        }
    }

    /// 按声明顺序创建并放入组件
    ///
    /// 任何一个组件创建失败都会中止整个批次，已放入的组件不会回滚。
    pub async fn put_from_config(&self, config: &ContainerConfig) -> ContainerResult<()> {
        let top: Arc<dyn References> = self.references.clone();

        for entry in &config.components {
            let (locator, component) = self.create_component(entry)?;
            debug!("从配置放入组件: {}", locator);
            self.references.put(locator, Arc::clone(&component)).await?;

            if let Some(configurable) = component.as_configurable() {
                configurable.configure(&entry.config)?;
            }

            // 工厂立即获得引用，后续条目的构建可以使用它
            if component.as_factory().is_some() {
                Referencer::set_references_for_one(&top, &*component).await?;
            }
        }

        info!("从配置放入 {} 个组件", config.len());
        Ok(())
    }
}

impl Default for ContainerReferences {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl References for ContainerReferences {
    async fn put(&self, locator: Locator, component: ComponentRef) -> ContainerResult<()> {
        self.references.put(locator, component).await
    }

    async fn remove(&self, locator: &Locator) -> ContainerResult<Option<ComponentRef>> {
        self.references.remove(locator).await
    }

    async fn remove_all(&self, locator: &Locator) -> ContainerResult<Vec<ComponentRef>> {
        self.references.remove_all(locator).await
    }

    async fn take(&self, locator: &Locator) -> Removal {
        self.references.take(locator).await
    }

    async fn take_all(&self, locator: &Locator) -> Removal {
        self.references.take_all(locator).await
    }

    fn get_all_locators(&self) -> Vec<Locator> {
        self.references.get_all_locators()
    }

    fn get_all(&self) -> Vec<ComponentRef> {
        self.references.get_all()
    }

    async fn find(&self, locator: &Locator, required: bool) -> ContainerResult<Vec<ComponentRef>> {
        self.references.find(locator, required).await
    }
}

#[async_trait]
impl Closable for ContainerReferences {
    async fn close(&self) -> ContainerResult<()> {
        self.references.close().await
    }
}

#[async_trait]
impl Openable for ContainerReferences {
    fn is_open(&self) -> bool {
        self.references.is_open()
    }

    async fn open(&self) -> ContainerResult<()> {
        self.references.open().await
    }
}

impl fmt::Debug for ContainerReferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerReferences")
            .field("references", &self.references)
            .field("types", &self.types.read().len())
            .finish()
    }
}
