//! bcrypt (`$2a$` / `$2b$` / `$2y$`)
//!
//! bcrypt 只使用密码的前 72 字节，更长的密码会被静默截断而不是报错。
//! 需要完整长度时使用 `bcrypt-sha256`。

use super::Scheme;
use super::encoding::is_bcrypt_b64;
use crate::error::{HashError, Result};

const NAME: &str = "bcrypt";
const HASH_LEN: usize = 60;
const IDENTS: [&str; 3] = ["2a", "2b", "2y"];

/// bcrypt scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BcryptScheme {
    cost: u32,
}

impl Default for BcryptScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl BcryptScheme {
    /// 默认 cost
    pub const DEFAULT_COST: u32 = 12;

    /// 使用默认 cost 创建
    pub const fn new() -> Self {
        Self::with_cost(Self::DEFAULT_COST)
    }

    /// 设置 cost 参数
    ///
    /// # Panics
    ///
    /// 如果 cost 不在 4-31 范围内会 panic
    pub const fn with_cost(cost: u32) -> Self {
        assert!(
            cost >= 4 && cost <= 31,
            "bcrypt cost must be between 4 and 31"
        );
        Self { cost }
    }

    /// 当前 cost
    pub const fn cost(&self) -> u32 {
        self.cost
    }
}

/// 解析 `$2b$NN$<53 字符>`，返回 cost
pub(crate) fn parse_cost(hash: &str) -> Option<u32> {
    if hash.len() != HASH_LEN || !hash.is_ascii() {
        return None;
    }
    let fields = super::mcf_fields(hash)?;
    let [ident, cost, rest] = fields.as_slice() else {
        return None;
    };
    if !IDENTS.contains(ident) || cost.len() != 2 || rest.len() != 53 || !is_bcrypt_b64(rest) {
        return None;
    }
    let cost: u32 = cost.parse().ok()?;
    (4..=31).contains(&cost).then_some(cost)
}

impl Scheme for BcryptScheme {
    fn name(&self) -> &'static str {
        NAME
    }

    fn identify(&self, hash: &str) -> bool {
        parse_cost(hash).is_some()
    }

    fn hash(&self, password: &str) -> Result<String> {
        ::bcrypt::hash(password, self.cost)
            .map_err(|e| HashError::internal(NAME, e.to_string()).into())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        if !self.identify(hash) {
            return Err(HashError::invalid_format(NAME, "not a bcrypt hash").into());
        }
        ::bcrypt::verify(password, hash)
            .map_err(|e| HashError::invalid_format(NAME, e.to_string()).into())
    }

    fn needs_update(&self, hash: &str) -> bool {
        match parse_cost(hash) {
            Some(cost) => cost < self.cost,
            None => true,
        }
    }
}
