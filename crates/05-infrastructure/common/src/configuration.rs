//! 配置节定义

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// 配置节
///
/// 组件配置的键值集合，值保持为 JSON 形式，可以按需绑定到具体类型。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigSection {
    /// 配置数据
    pub data: HashMap<String, Value>,
}

impl ConfigSection {
    /// 创建新的配置节
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// 从键值对创建配置节
    pub fn from_tuples<K, I>(tuples: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self {
            data: tuples.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// 从 JSON 对象创建配置节
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(map) => Ok(Self {
                data: map.into_iter().collect(),
            }),
            other => Err(ConfigError::invalid_value(
                "<root>",
                format!("期望对象, 实际: {other}"),
            )),
        }
    }

    /// 插入配置项
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.data.insert(key.into(), value);
    }

    /// 获取配置项
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// 获取字符串配置项
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// 获取子配置节
    ///
    /// 键不存在或者不是对象时返回空配置节。
    pub fn get_section(&self, key: &str) -> ConfigSection {
        match self.data.get(key) {
            Some(Value::Object(map)) => Self {
                data: map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            },
            _ => Self::new(),
        }
    }

    /// 配置项数量
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 绑定到具体类型
    pub fn bind<T>(&self) -> Result<T, ConfigError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let value = Value::Object(
            self.data
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        );

        serde_json::from_value(value).map_err(|e| ConfigError::BindError { source: e })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct CacheOptions {
        timeout: u64,
        #[serde(default)]
        max_size: Option<usize>,
    }

    /// 测试子配置节和类型绑定
    #[test]
    fn test_section_and_bind() {
        let section = ConfigSection::from_value(json!({
            "descriptor": "lorn:cache:memory:default:1.0",
            "options": { "timeout": 30, "max_size": 100 },
        }))
        .unwrap();

        assert_eq!(section.get_str("descriptor"), Some("lorn:cache:memory:default:1.0"));

        let options: CacheOptions = section.get_section("options").bind().unwrap();
        assert_eq!(
            options,
            CacheOptions {
                timeout: 30,
                max_size: Some(100)
            }
        );

        assert!(section.get_section("missing").is_empty());
        assert!(section.get_section("descriptor").is_empty());
    }

    /// 测试非对象无法构造配置节
    #[test]
    fn test_from_non_object_fails() {
        assert!(ConfigSection::from_value(json!([1, 2])).is_err());
    }
}
