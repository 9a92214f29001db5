//! 容器构建器

use crate::config::ContainerConfig;
use crate::container::Container;
use refer_abstractions::{Component, ComponentFactory};
use refer_common::{ContainerError, ContainerResult, Locator};
use refer_impl::{CompositeFactory, Factory};
use std::sync::Arc;
use tracing::{debug, info};

/// 容器构建器
///
/// 使用建造者模式组装容器
pub struct ContainerBuilder {
    /// 容器名称
    name: String,
    /// 容器描述
    description: Option<String>,
    /// 容器提供的工厂
    factories: CompositeFactory,
    /// 类型注册表
    types: Factory,
    /// 组件列表
    config: ContainerConfig,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl ContainerBuilder {
    /// 创建新的容器构建器
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            factories: CompositeFactory::new(),
            types: Factory::new(),
            config: ContainerConfig::new(),
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 设置容器名称
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 设置容器描述
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 添加工厂，后添加的工厂优先
    pub fn with_factory(mut self, factory: Arc<dyn ComponentFactory>) -> Self {
        debug!("添加容器工厂");
        self.factories.add(factory);
        self
    }

    /// 注册类型构造函数，配置中的 `type` 字段引用这里的名称
    pub fn with_type<T, F>(mut self, type_name: impl Into<String>, constructor: F) -> Self
    where
        T: Component,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let type_name = type_name.into();
        debug!("注册组件类型: {}", type_name);
        self.types.register_type(Locator::Key(type_name), constructor);
        self
    }

    /// 设置组件列表
    pub fn with_config(mut self, config: ContainerConfig) -> Self {
        info!("设置容器配置, 组件数量: {}", config.len());
        self.config = config;
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true; // 启用日志初始化
        self
    }

    /// 构建容器
    pub fn build(self) -> ContainerResult<Container> {
        // 只有在明确配置了日志时才初始化日志
        // 避免在测试环境中重复初始化
        if self.logging_enabled {
            self.logging_config.initialize()?;
        }

        info!("构建容器: {}", self.name);
        Ok(Container::new(
            self.name,
            self.description,
            Arc::new(self.factories),
            Arc::new(self.types),
            self.config,
        ))
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }

    /// 安装全局日志订阅器
    pub fn initialize(&self) -> ContainerResult<()> {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(self.level)
            .with_target(self.show_target)
            .with_thread_ids(self.show_thread_ids)
            .with_file(self.show_file)
            .with_line_number(self.show_line_number);

        if self.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| ContainerError::component_with_source("日志初始化失败", e))?;

        info!("日志系统初始化完成");
        Ok(())
    }
}
