//! 统一错误类型模块
//!
//! 提供 passlib 中所有操作的错误类型定义。
//!
//! 密码错误**不是**错误：`verify` 在格式正确但密码不匹配时返回 `Ok(false)`，
//! 这样调用方可以区分“密码错误”和“哈希损坏”。

use thiserror::Error;

/// passlib 的统一结果类型
pub type Result<T> = std::result::Result<T, Error>;

/// passlib 的错误类型
#[derive(Debug, Error)]
pub enum Error {
    /// 注册表中不存在的 scheme 名称
    #[error("unknown scheme {0:?}")]
    UnknownScheme(String),

    /// 无法解析的 defaults 标识（既不是 `latest` 也不是 `YYYYMMDD`）
    #[error("invalid defaults identifier {0:?}: expected \"latest\" or a YYYYMMDD date")]
    InvalidEpoch(String),

    /// 当前 Context 中没有任何 scheme 认领该哈希
    #[error("unrecognized hash format")]
    UnrecognizedHash,

    /// scheme 列表为空
    #[error("scheme list must not be empty")]
    EmptySchemeList,

    /// 具体 scheme 的哈希错误
    #[error("Password hash error: {0}")]
    Hash(#[from] HashError),

    /// 加密原语错误
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// 配置错误
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// 创建一个配置错误
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// 是否为“无法识别的哈希格式”
    ///
    /// 调用方应将其视为认证失败，而非临时错误。
    pub fn is_unrecognized_hash(&self) -> bool {
        matches!(self, Error::UnrecognizedHash)
    }
}

/// 具体 scheme 的哈希相关错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// 哈希字符串不属于该 scheme，或字段损坏
    #[error("invalid {scheme} hash: {reason}")]
    InvalidFormat { scheme: &'static str, reason: String },

    /// 参数超出算法允许的范围
    #[error("invalid {scheme} parameters: {reason}")]
    InvalidParams { scheme: &'static str, reason: String },

    /// 算法内部失败（编码等）
    #[error("{scheme} hash generation failed: {reason}")]
    Internal { scheme: &'static str, reason: String },
}

impl HashError {
    pub(crate) fn invalid_format(scheme: &'static str, reason: impl Into<String>) -> Self {
        HashError::InvalidFormat {
            scheme,
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_params(scheme: &'static str, reason: impl Into<String>) -> Self {
        HashError::InvalidParams {
            scheme,
            reason: reason.into(),
        }
    }

    pub(crate) fn internal(scheme: &'static str, reason: impl Into<String>) -> Self {
        HashError::Internal {
            scheme,
            reason: reason.into(),
        }
    }
}

/// 加密相关错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// 随机数生成失败
    #[error("random number generation failed: {0}")]
    RngFailed(String),
}
