//! Argon2 (PHC 字符串格式)
//!
//! 新哈希使用 Argon2id；`$argon2i$` 与 `$argon2d$` 仍可验证，但会被标记为需要升级。

use ::argon2::{Algorithm, Argon2, Params, Version};
use password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};

use super::Scheme;
use crate::error::{HashError, Result};
use crate::random;

const NAME: &str = "argon2";
const IDENTS: [&str; 3] = ["argon2id", "argon2i", "argon2d"];
const SALT_LEN: usize = 16;

/// Argon2 scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Scheme {
    m_cost: u32,
    t_cost: u32,
    p_cost: u32,
}

impl Default for Argon2Scheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Argon2Scheme {
    /// 默认内存开销（KiB）
    pub const DEFAULT_M_COST: u32 = 32 * 1024;
    /// 默认迭代次数
    pub const DEFAULT_T_COST: u32 = 4;
    /// 默认并行度
    pub const DEFAULT_P_COST: u32 = 4;
    /// 验证时允许的最大内存开销（KiB，即 1 GiB）
    ///
    /// 超出上限的哈希不会被识别，存储中的异常参数无法耗尽内存。
    pub const MAX_M_COST: u32 = 1 << 20;

    /// 使用推荐参数创建
    pub const fn new() -> Self {
        Self::with_params(
            Self::DEFAULT_M_COST,
            Self::DEFAULT_T_COST,
            Self::DEFAULT_P_COST,
        )
    }

    /// 使用自定义参数创建
    ///
    /// # Panics
    ///
    /// 参数超出 Argon2 允许范围时 panic（`p_cost` 1..=0xFFFFFF，`t_cost` >= 1，
    /// `m_cost` >= 8 * `p_cost` 且不超过 [`Self::MAX_M_COST`]）
    pub const fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Self {
        assert!(
            p_cost >= 1 && p_cost <= 0x00FF_FFFF,
            "argon2 p_cost must be between 1 and 16777215"
        );
        assert!(t_cost >= 1, "argon2 t_cost must be at least 1");
        assert!(
            m_cost >= 8 * p_cost,
            "argon2 m_cost must be at least 8 * p_cost"
        );
        assert!(
            m_cost <= Self::MAX_M_COST,
            "argon2 m_cost exceeds MAX_M_COST"
        );
        Self {
            m_cost,
            t_cost,
            p_cost,
        }
    }

    fn hasher(&self) -> Result<Argon2<'static>> {
        let params = Params::new(self.m_cost, self.t_cost, self.p_cost, None)
            .map_err(|e| HashError::invalid_params(NAME, e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    fn parse<'a>(&self, hash: &'a str) -> Option<(PasswordHash<'a>, Params)> {
        let parsed = PasswordHash::new(hash).ok()?;
        if !IDENTS.contains(&parsed.algorithm.as_str()) {
            return None;
        }
        if parsed.salt.is_none() || parsed.hash.is_none() {
            return None;
        }
        let params = Params::try_from(&parsed).ok()?;
        if params.m_cost() > Self::MAX_M_COST {
            return None;
        }
        Some((parsed, params))
    }
}

impl Scheme for Argon2Scheme {
    fn name(&self) -> &'static str {
        NAME
    }

    fn identify(&self, hash: &str) -> bool {
        self.parse(hash).is_some()
    }

    fn hash(&self, password: &str) -> Result<String> {
        let mut salt_bytes = [0u8; SALT_LEN];
        random::fill_salt(&mut salt_bytes)?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| HashError::internal(NAME, format!("failed to encode salt: {}", e)))?;

        self.hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| HashError::internal(NAME, e.to_string()).into())
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let (parsed, _) = self
            .parse(hash)
            .ok_or_else(|| HashError::invalid_format(NAME, "not an argon2 PHC string"))?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashError::invalid_format(NAME, e.to_string()).into()),
        }
    }

    fn needs_update(&self, hash: &str) -> bool {
        let Some((parsed, params)) = self.parse(hash) else {
            return true;
        };
        parsed.algorithm.as_str() != "argon2id"
            || parsed.version != Some(Version::V0x13 as u32)
            || params.m_cost() < self.m_cost
            || params.t_cost() < self.t_cost
            || params.p_cost() < self.p_cost
    }
}
