//! 声明式组件配置
//!
//! 组件列表可以是顶层数组，也可以是带 `components` 字段的对象：
//!
//! ```yaml
//! components:
//!   - descriptor: "lorn:logger:console:default:1.0"
//!     level: debug
//!   - type: "memory-cache"
//!     descriptor: "lorn:cache:memory:default:1.0"
//!     capacity: 1024
//! ```

use refer_common::{ConfigError, ConfigResult, ConfigSection, Descriptor};
use serde_json::Value;

/// 组件列表字段
pub const COMPONENTS_KEY: &str = "components";
/// 描述符字段
pub const DESCRIPTOR_KEY: &str = "descriptor";
/// 类型注册键字段
pub const TYPE_KEY: &str = "type";

/// 单个组件的声明
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentConfig {
    /// 组件描述符，通过已注册的工厂创建
    pub descriptor: Option<Descriptor>,
    /// 类型注册键，直接调用注册的构造函数
    pub type_name: Option<String>,
    /// 整个条目，创建后传给可配置组件
    pub config: ConfigSection,
}

impl ComponentConfig {
    /// 从配置节读取组件声明
    ///
    /// `descriptor` 和 `type` 至少需要一个。
    pub fn from_section(section: &ConfigSection) -> ConfigResult<Self> {
        let descriptor = section
            .get_str(DESCRIPTOR_KEY)
            .map(str::parse::<Descriptor>)
            .transpose()?;
        let type_name = section.get_str(TYPE_KEY).map(str::to_string);

        if descriptor.is_none() && type_name.is_none() {
            return Err(ConfigError::missing_field(DESCRIPTOR_KEY));
        }

        Ok(Self {
            descriptor,
            type_name,
            config: section.clone(),
        })
    }
}

/// 容器的组件列表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerConfig {
    /// 按声明顺序排列的组件
    pub components: Vec<ComponentConfig>,
}

impl ContainerConfig {
    /// 创建空配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从配置节列表读取
    pub fn from_sections<'a, I>(sections: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = &'a ConfigSection>,
    {
        let components = sections
            .into_iter()
            .map(ComponentConfig::from_section)
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(Self { components })
    }

    /// 从 JSON 值读取
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        let entries = match value {
            Value::Array(entries) => entries,
            Value::Object(mut map) => match map.remove(COMPONENTS_KEY) {
                Some(Value::Array(entries)) => entries,
                Some(other) => {
                    return Err(ConfigError::invalid_value(
                        COMPONENTS_KEY,
                        format!("期望数组, 实际: {other}"),
                    ))
                }
                None => Vec::new(),
            },
            Value::Null => Vec::new(),
            other => {
                return Err(ConfigError::invalid_value(
                    "<root>",
                    format!("期望数组或对象, 实际: {other}"),
                ))
            }
        };

        let sections = entries
            .into_iter()
            .map(ConfigSection::from_value)
            .collect::<ConfigResult<Vec<_>>>()?;
        Self::from_sections(&sections)
    }

    /// 从 JSON 文本读取
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })?;
        Self::from_value(value)
    }

    /// 从 YAML 文本读取
    pub fn from_yaml(text: &str) -> ConfigResult<Self> {
        let value: Value = serde_yaml::from_str(text).map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })?;
        Self::from_value(value)
    }

    /// 追加组件声明
    pub fn add(&mut self, component: ComponentConfig) {
        self.components.push(component);
    }

    /// 组件数量
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
