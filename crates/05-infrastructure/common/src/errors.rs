//! 错误类型定义

use crate::locator::Locator;
use thiserror::Error;

/// 通用装箱错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("描述符格式无效: {value:?}, 期望 5 段, 实际 {tokens} 段")]
    InvalidDescriptor { value: String, tokens: usize },

    #[error("配置缺少字段: {field}")]
    MissingField { field: String },

    #[error("配置值无效: {key}, 原因: {message}")]
    InvalidValue { key: String, message: String },

    #[error("配置解析失败: {source}")]
    ParseError { source: BoxError },

    #[error("配置绑定失败: {source}")]
    BindError {
        #[from]
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// 创建缺少字段错误
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// 创建配置值无效错误
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// 引用错误类型
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("无法找到引用: {locator}")]
    NotFound { locator: Locator },

    #[error("引用类型不匹配: {locator}, 期望类型: {expected}")]
    TypeMismatch {
        locator: Locator,
        expected: &'static str,
    },
}

impl ReferenceError {
    /// 创建引用未找到错误
    pub fn not_found(locator: impl Into<Locator>) -> Self {
        Self::NotFound {
            locator: locator.into(),
        }
    }

    /// 未满足的定位器
    pub fn locator(&self) -> &Locator {
        match self {
            Self::NotFound { locator } | Self::TypeMismatch { locator, .. } => locator,
        }
    }
}

/// 组件创建错误类型
#[derive(Error, Debug)]
pub enum CreateError {
    #[error("没有工厂可以创建组件: {locator}")]
    NotSupported { locator: Locator },

    #[error("组件创建失败: {locator}, 原因: {source}")]
    Failed { locator: Locator, source: BoxError },

    #[error("组件构造函数崩溃: {locator}, 原因: {message}")]
    Panicked { locator: Locator, message: String },
}

impl CreateError {
    /// 创建不支持错误
    pub fn not_supported(locator: impl Into<Locator>) -> Self {
        Self::NotSupported {
            locator: locator.into(),
        }
    }

    /// 创建失败的定位器
    pub fn locator(&self) -> &Locator {
        match self {
            Self::NotSupported { locator }
            | Self::Failed { locator, .. }
            | Self::Panicked { locator, .. } => locator,
        }
    }
}

/// 容器错误类型
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("引用错误: {source}")]
    ReferenceError {
        #[from]
        source: ReferenceError,
    },

    #[error("创建错误: {source}")]
    CreateError {
        #[from]
        source: CreateError,
    },

    #[error("组件操作失败: {message}")]
    Component {
        message: String,
        source: Option<BoxError>,
    },
}

impl ContainerError {
    /// 创建组件操作错误
    pub fn component(message: impl Into<String>) -> Self {
        Self::Component {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带原因的组件操作错误
    pub fn component_with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Component {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 是否为引用未找到错误
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ReferenceError {
                source: ReferenceError::NotFound { .. }
            }
        )
    }

    /// 是否为组件创建错误
    pub fn is_create_error(&self) -> bool {
        matches!(self, Self::CreateError { .. })
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ReferenceResult<T> = Result<T, ReferenceError>;
pub type CreateResult<T> = Result<T, CreateError>;
pub type ContainerResult<T> = Result<T, ContainerError>;
