//! scrypt-sha256
//!
//! 格式：`$s2$<N>$<r>$<p>$<base64 盐值>$<base64 摘要>`

use ::scrypt::{Params, scrypt};

use super::Scheme;
use super::encoding::{b64_decode, b64_encode};
use crate::error::{HashError, Result};
use crate::random::{self, constant_time_compare};

const NAME: &str = "scrypt-sha256";
const IDENT: &str = "s2";
const SALT_LEN: usize = 16;
const KEY_LEN: usize = 32;

/// scrypt 的内存开销 `128 * r * (N + p)` 字节，溢出时为 `None`
const fn memory_cost(log_n: u8, r: u32, p: u32) -> Option<u64> {
    if log_n >= 64 {
        return None;
    }
    let Some(blocks) = (1u64 << log_n).checked_add(p as u64) else {
        return None;
    };
    let Some(block_bytes) = (r as u64).checked_mul(128) else {
        return None;
    };
    blocks.checked_mul(block_bytes)
}

const fn within_memory_limit(log_n: u8, r: u32, p: u32) -> bool {
    match memory_cost(log_n, r, p) {
        Some(bytes) => bytes <= ScryptSha256Scheme::MAX_MEMORY,
        None => false,
    }
}

/// scrypt scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScryptSha256Scheme {
    log_n: u8,
    r: u32,
    p: u32,
}

impl Default for ScryptSha256Scheme {
    fn default() -> Self {
        Self::new()
    }
}

struct Parsed {
    log_n: u8,
    r: u32,
    p: u32,
    salt: Vec<u8>,
    key: Vec<u8>,
}

fn parse(hash: &str) -> Option<Parsed> {
    let fields = super::mcf_fields(hash)?;
    let [ident, n, r, p, salt, key] = fields.as_slice() else {
        return None;
    };
    if *ident != IDENT {
        return None;
    }
    let n: u64 = parse_decimal(n)?;
    if n < 2 || !n.is_power_of_two() {
        return None;
    }
    let log_n = u8::try_from(n.trailing_zeros()).ok()?;
    let r: u32 = parse_decimal(r)?;
    let p: u32 = parse_decimal(p)?;
    if !within_memory_limit(log_n, r, p) {
        return None;
    }
    let salt = b64_decode(salt)?;
    let key = b64_decode(key)?;
    // scrypt 允许的输出长度
    if !(Params::RECOMMENDED_LEN..=64).contains(&key.len()) {
        return None;
    }
    Params::new(log_n, r, p, key.len()).ok()?;
    Some(Parsed {
        log_n,
        r,
        p,
        salt,
        key,
    })
}

fn parse_decimal<T: std::str::FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) || s.starts_with('0') {
        return None;
    }
    s.parse().ok()
}

impl ScryptSha256Scheme {
    /// 默认 log2(N)，N = 16384
    pub const DEFAULT_LOG_N: u8 = 14;
    /// 默认块大小
    pub const DEFAULT_R: u32 = 8;
    /// 默认并行度
    pub const DEFAULT_P: u32 = 1;
    /// 验证时允许的最大内存开销（字节）
    ///
    /// 超出上限的哈希不会被识别，存储中的异常参数无法耗尽内存。
    pub const MAX_MEMORY: u64 = 1 << 30;

    /// 使用推荐参数创建
    pub const fn new() -> Self {
        Self::with_params(Self::DEFAULT_LOG_N, Self::DEFAULT_R, Self::DEFAULT_P)
    }

    /// 使用自定义参数创建
    ///
    /// # Panics
    ///
    /// `log_n` 不在 1..64 之间、`r`、`p` 为 0 或内存开销超过 [`Self::MAX_MEMORY`] 时 panic
    pub const fn with_params(log_n: u8, r: u32, p: u32) -> Self {
        assert!(
            log_n >= 1 && log_n < 64,
            "scrypt log_n must be between 1 and 63"
        );
        assert!(r >= 1 && p >= 1, "scrypt r and p must be positive");
        assert!(
            within_memory_limit(log_n, r, p),
            "scrypt memory cost exceeds MAX_MEMORY"
        );
        Self { log_n, r, p }
    }

    fn derive(log_n: u8, r: u32, p: u32, password: &str, salt: &[u8], out: &mut [u8]) -> Result<()> {
        let params = Params::new(log_n, r, p, out.len())
            .map_err(|e| HashError::invalid_params(NAME, e.to_string()))?;
        scrypt(password.as_bytes(), salt, &params, out)
            .map_err(|e| HashError::internal(NAME, e.to_string()))?;
        Ok(())
    }
}

impl Scheme for ScryptSha256Scheme {
    fn name(&self) -> &'static str {
        NAME
    }

    fn identify(&self, hash: &str) -> bool {
        parse(hash).is_some()
    }

    fn hash(&self, password: &str) -> Result<String> {
        let mut salt = [0u8; SALT_LEN];
        random::fill_salt(&mut salt)?;
        let mut key = [0u8; KEY_LEN];
        Self::derive(self.log_n, self.r, self.p, password, &salt, &mut key)?;

        Ok(format!(
            "${}${}${}${}${}${}",
            IDENT,
            1u64 << self.log_n,
            self.r,
            self.p,
            b64_encode(&salt),
            b64_encode(&key)
        ))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed = parse(hash).ok_or_else(|| HashError::invalid_format(NAME, "not an s2 hash"))?;

        let mut key = vec![0u8; parsed.key.len()];
        Self::derive(parsed.log_n, parsed.r, parsed.p, password, &parsed.salt, &mut key)?;
        Ok(constant_time_compare(&key, &parsed.key))
    }

    fn needs_update(&self, hash: &str) -> bool {
        match parse(hash) {
            Some(parsed) => {
                parsed.log_n < self.log_n
                    || parsed.r < self.r
                    || parsed.p < self.p
                    || parsed.salt.len() < SALT_LEN
            }
            None => true,
        }
    }
}
