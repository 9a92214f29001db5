//! 依赖解析器

use async_trait::async_trait;
use parking_lot::RwLock;
use refer_abstractions::{
    Component, ComponentRef, Configurable, Referenceable, References, ReferencesExt,
};
use refer_common::{
    ConfigError, ConfigResult, ConfigSection, ContainerResult, Locator, ReferenceError,
};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 依赖配置节的键
pub const DEPENDENCIES_SECTION: &str = "dependencies";

/// 依赖解析器
///
/// 把组件使用的依赖名称映射到定位器，再交给注入的注册表完成查找。
/// 在设置注册表之前进行任何查找都会 panic。
///
/// ```yaml
/// dependencies:
///   logger: "*:logger:*:*:1.0"
///   persistence: "lorn:persistence:*:*:1.0"
/// ```
#[derive(Default)]
pub struct DependencyResolver {
    dependencies: RwLock<HashMap<String, Locator>>,
    references: RwLock<Option<Arc<dyn References>>>,
}

impl DependencyResolver {
    /// 创建空解析器
    pub fn new() -> Self {
        Self::default()
    }

    /// 从（名称，定位器）对创建解析器
    pub fn from_tuples<N, L, I>(tuples: I) -> Self
    where
        N: Into<String>,
        L: Into<Locator>,
        I: IntoIterator<Item = (N, L)>,
    {
        Self {
            dependencies: RwLock::new(
                tuples
                    .into_iter()
                    .map(|(name, locator)| (name.into(), locator.into()))
                    .collect(),
            ),
            references: RwLock::new(None),
        }
    }

    /// 同时读取配置并设置注册表
    pub fn with_references(
        config: &ConfigSection,
        references: Arc<dyn References>,
    ) -> ConfigResult<Self> {
        let resolver = Self::new();
        resolver.configure_dependencies(config)?;
        *resolver.references.write() = Some(references);
        Ok(resolver)
    }

    /// 从 `dependencies` 配置节读取依赖
    ///
    /// 值先尝试解析为描述符，失败时保留为字符串键。
    pub fn configure_dependencies(&self, config: &ConfigSection) -> ConfigResult<()> {
        let section = config.get_section(DEPENDENCIES_SECTION);
        let mut dependencies = self.dependencies.write();

        for (name, value) in &section.data {
            let Value::String(text) = value else {
                return Err(ConfigError::invalid_value(
                    format!("{DEPENDENCIES_SECTION}.{name}"),
                    format!("期望定位器字符串, 实际: {value}"),
                ));
            };
            let locator = Locator::parse_lenient(text);
            debug!("配置依赖: {} -> {}", name, locator);
            dependencies.insert(name.clone(), locator);
        }
        Ok(())
    }

    /// 设置依赖定位器，覆盖同名依赖
    pub fn put(&self, name: impl Into<String>, locator: impl Into<Locator>) {
        self.dependencies.write().insert(name.into(), locator.into());
    }

    /// 查找依赖名称对应的定位器
    pub fn locate(&self, name: &str) -> Option<Locator> {
        self.dependencies.read().get(name).cloned()
    }

    fn references(&self) -> Arc<dyn References> {
        match self.references.read().as_ref() {
            Some(references) => Arc::clone(references),
            None => panic!("依赖解析器在设置注册表之前被调用"),
        }
    }

    fn locate_required(&self, name: &str) -> ContainerResult<Locator> {
        self.locate(name)
            .ok_or_else(|| ReferenceError::not_found(Locator::Key(name.to_string())).into())
    }

    /// 获取依赖的所有组件，未配置的依赖返回空
    pub async fn get_optional(&self, name: &str) -> ContainerResult<Vec<ComponentRef>> {
        let references = self.references();
        match self.locate(name) {
            Some(locator) => references.get_optional(&locator).await,
            None => Ok(Vec::new()),
        }
    }

    /// 获取依赖的所有组件，至少需要一个
    pub async fn get_required(&self, name: &str) -> ContainerResult<Vec<ComponentRef>> {
        let references = self.references();
        let locator = self.locate_required(name)?;
        references.get_required(&locator).await
    }

    /// 获取依赖的一个组件，允许为空
    pub async fn get_one_optional(&self, name: &str) -> ContainerResult<Option<ComponentRef>> {
        let references = self.references();
        match self.locate(name) {
            Some(locator) => references.get_one_optional(&locator).await,
            None => Ok(None),
        }
    }

    /// 获取依赖的一个组件，必须存在
    pub async fn get_one_required(&self, name: &str) -> ContainerResult<ComponentRef> {
        let references = self.references();
        let locator = self.locate_required(name)?;
        references.get_one_required(&locator).await
    }

    /// 获取依赖的一个指定类型组件，必须存在
    pub async fn get_one_required_as<T: Component>(&self, name: &str) -> ContainerResult<Arc<T>> {
        let references = self.references();
        let locator = self.locate_required(name)?;
        references.get_one_required_as::<T>(&locator).await
    }

    /// 按依赖名称查找
    pub async fn find(&self, name: &str, required: bool) -> ContainerResult<Vec<ComponentRef>> {
        if required {
            self.get_required(name).await
        } else {
            self.get_optional(name).await
        }
    }
}

impl Configurable for DependencyResolver {
    fn configure(&self, config: &ConfigSection) -> ContainerResult<()> {
        Ok(self.configure_dependencies(config)?)
    }
}

#[async_trait]
impl Referenceable for DependencyResolver {
    async fn set_references(&self, references: Arc<dyn References>) -> ContainerResult<()> {
        *self.references.write() = Some(references);
        Ok(())
    }
}

impl Component for DependencyResolver {
    fn as_referenceable(&self) -> Option<&dyn Referenceable> {
        Some(self)
    }

    fn as_configurable(&self) -> Option<&dyn Configurable> {
        Some(self)
    }
}

impl fmt::Debug for DependencyResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyResolver")
            .field("dependencies", &*self.dependencies.read())
            .field("has_references", &self.references.read().is_some())
            .finish()
    }
}
