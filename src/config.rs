//! 上下文配置
//!
//! 应用可以从自己的配置文件中反序列化 [`ContextConfig`]，
//! 用 epoch 标识或显式的 scheme 名称列表描述哈希策略。
//!
//! ```rust
//! use passlib::{Context, ContextConfig};
//!
//! let config: ContextConfig = serde_json::from_str(r#"{ "defaults": "20180601" }"#).unwrap();
//! let ctx = Context::from_config(&config).unwrap();
//! assert_eq!(ctx.default_scheme().name(), "argon2");
//! ```

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};
use crate::registry;
use crate::scheme::SchemeRef;

/// 哈希策略配置
///
/// `defaults` 与 `schemes` 最多设置一个；都不设置时使用最旧的 epoch。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContextConfig {
    /// epoch 标识：`YYYYMMDD` 或 `"latest"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<String>,

    /// 显式的 scheme 名称列表，最优先的在前
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schemes: Option<Vec<String>>,
}

impl ContextConfig {
    /// 使用 epoch 标识
    pub fn with_defaults(identifier: impl Into<String>) -> Self {
        Self {
            defaults: Some(identifier.into()),
            schemes: None,
        }
    }

    /// 使用 scheme 名称列表
    pub fn with_schemes<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            defaults: None,
            schemes: Some(names.into_iter().map(Into::into).collect()),
        }
    }

    /// 解析为 scheme 偏好列表
    pub fn resolve(&self) -> Result<Vec<SchemeRef>> {
        match (&self.defaults, &self.schemes) {
            (Some(_), Some(_)) => Err(Error::config(
                "`defaults` and `schemes` are mutually exclusive",
            )),
            (Some(identifier), None) => Ok(defaults::resolve_epoch(identifier)?.to_vec()),
            (None, Some(names)) => {
                if names.is_empty() {
                    return Err(Error::EmptySchemeList);
                }
                registry::lookup_all(names.as_slice())
            }
            (None, None) => Ok(defaults::oldest().schemes().to_vec()),
        }
    }
}
