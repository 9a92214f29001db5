//! 组件定位器
//!
//! 组件通过定位器注册和发现。定位器有两种形式：
//!
//! - [`Descriptor`] - 五段式组合键 `group:type:kind:name:version`，支持通配符
//! - 任意字符串键 - 仅按相等比较
//!
//! 描述符的任一字段为空（或通配符 `*`）时表示该字段不受约束。

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 通配符
pub const WILDCARD: &str = "*";

/// 组件描述符
///
/// 由 group、type、kind、name、version 五个字段组成。`None` 表示该字段不受约束，
/// 构造时空字符串和 `*` 都会被规范化为 `None`。
///
/// ```
/// use refer_common::Descriptor;
///
/// let descriptor = Descriptor::new("lorn", "logger", "console", "*", "1.0");
/// assert_eq!(descriptor.name(), None);
/// assert_eq!(descriptor.to_string(), "lorn:logger:console:*:1.0");
///
/// let query: Descriptor = "*:logger:*:*:1.0".parse().unwrap();
/// assert!(descriptor.matches(&query));
/// assert!(!descriptor.exact_match(&query));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Descriptor {
    group: Option<String>,
    type_name: Option<String>,
    kind: Option<String>,
    name: Option<String>,
    version: Option<String>,
}

fn normalize(value: &str) -> Option<String> {
    if value.is_empty() || value == WILDCARD {
        None
    } else {
        Some(value.to_string())
    }
}

fn field_matches(left: Option<&str>, right: Option<&str>) -> bool {
    match (left, right) {
        (None, _) | (_, None) => true,
        (Some(l), Some(r)) => l == r,
    }
}

impl Descriptor {
    /// 创建新的描述符
    pub fn new(group: &str, type_name: &str, kind: &str, name: &str, version: &str) -> Self {
        Self {
            group: normalize(group),
            type_name: normalize(type_name),
            kind: normalize(kind),
            name: normalize(name),
            version: normalize(version),
        }
    }

    /// 所有字段都不受约束的描述符
    pub fn any() -> Self {
        Self::default()
    }

    /// 逻辑分组
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// 组件逻辑类型（接口）
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// 组件实现类型
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    /// 组件实例名称
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 实现版本
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    fn fields(&self) -> [Option<&str>; 5] {
        [
            self.group(),
            self.type_name(),
            self.kind(),
            self.name(),
            self.version(),
        ]
    }

    /// 部分匹配
    ///
    /// 五个字段中每一个字段要么至少一侧不受约束，要么两侧完全相等（区分大小写）。
    pub fn matches(&self, other: &Descriptor) -> bool {
        self.fields()
            .iter()
            .zip(other.fields().iter())
            .all(|(l, r)| field_matches(*l, *r))
    }

    /// 精确匹配
    ///
    /// 每个字段必须两侧相等，或者两侧都不受约束。
    pub fn exact_match(&self, other: &Descriptor) -> bool {
        self == other
    }

    /// 是否所有字段都受约束
    pub fn is_complete(&self) -> bool {
        self.fields().iter().all(Option::is_some)
    }

    /// 用另一个描述符补全本描述符中不受约束的字段
    ///
    /// 本描述符已受约束的字段保持不变。
    pub fn clarify(&self, other: &Descriptor) -> Self {
        let pick = |own: &Option<String>, theirs: &Option<String>| own.clone().or_else(|| theirs.clone());
        Self {
            group: pick(&self.group, &other.group),
            type_name: pick(&self.type_name, &other.type_name),
            kind: pick(&self.kind, &other.kind),
            name: pick(&self.name, &other.name),
            version: pick(&self.version, &other.version),
        }
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<&str> = self
            .fields()
            .iter()
            .map(|field| field.unwrap_or(WILDCARD))
            .collect();
        write!(f, "{}", rendered.join(":"))
    }
}

impl FromStr for Descriptor {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = value.split(':').collect();
        if value.is_empty() || tokens.len() != 5 {
            return Err(ConfigError::InvalidDescriptor {
                value: value.to_string(),
                tokens: if value.is_empty() { 0 } else { tokens.len() },
            });
        }

        Ok(Self::new(
            tokens[0].trim(),
            tokens[1].trim(),
            tokens[2].trim(),
            tokens[3].trim(),
            tokens[4].trim(),
        ))
    }
}

impl TryFrom<String> for Descriptor {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Descriptor> for String {
    fn from(descriptor: Descriptor) -> Self {
        descriptor.to_string()
    }
}

/// 组件定位器
///
/// 描述符按通配规则匹配，字符串键按相等匹配，两种形式之间互不匹配。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// 五段式描述符
    Descriptor(Descriptor),
    /// 不透明的字符串键
    Key(String),
}

impl Locator {
    /// 判断两个定位器是否匹配
    pub fn matches(&self, other: &Locator) -> bool {
        match (self, other) {
            (Self::Descriptor(left), Self::Descriptor(right)) => left.matches(right),
            (Self::Key(left), Self::Key(right)) => left == right,
            _ => false,
        }
    }

    /// 获取描述符形式
    pub fn as_descriptor(&self) -> Option<&Descriptor> {
        match self {
            Self::Descriptor(descriptor) => Some(descriptor),
            Self::Key(_) => None,
        }
    }

    /// 解析定位器字符串
    ///
    /// 能解析为描述符时返回描述符，否则保留为字符串键。
    pub fn parse_lenient(value: &str) -> Self {
        match value.parse::<Descriptor>() {
            Ok(descriptor) => Self::Descriptor(descriptor),
            Err(_) => Self::Key(value.to_string()),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Descriptor(descriptor) => descriptor.fmt(f),
            Self::Key(key) => f.write_str(key),
        }
    }
}

impl From<Descriptor> for Locator {
    fn from(descriptor: Descriptor) -> Self {
        Self::Descriptor(descriptor)
    }
}

impl From<&Descriptor> for Locator {
    fn from(descriptor: &Descriptor) -> Self {
        Self::Descriptor(descriptor.clone())
    }
}

impl From<&str> for Locator {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for Locator {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}
