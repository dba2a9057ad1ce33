//! bcrypt-sha256
//!
//! 密码先做 SHA-256 再 base64 编码（44 字节），然后交给 bcrypt，
//! 从而绕开 bcrypt 的 72 字节截断。
//!
//! 格式：`$bcrypt-sha256$2b,12$<22 字符盐值>$<31 字符摘要>`

use base64::{Engine, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};

use super::Scheme;
use super::encoding::is_bcrypt_b64;
use crate::error::{HashError, Result};
use crate::random;

const NAME: &str = "bcrypt-sha256";
const IDENT: &str = "bcrypt-sha256";
const IDENTS: [&str; 3] = ["2a", "2b", "2y"];

/// bcrypt-sha256 scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BcryptSha256Scheme {
    cost: u32,
}

impl Default for BcryptSha256Scheme {
    fn default() -> Self {
        Self::new()
    }
}

struct Parsed<'a> {
    ident: &'a str,
    cost: u32,
    salt: &'a str,
    digest: &'a str,
}

impl Parsed<'_> {
    /// 还原为 bcrypt 能直接验证的 `$2b$NN$...` 字符串
    fn to_bcrypt(&self) -> String {
        format!("${}${:02}${}{}", self.ident, self.cost, self.salt, self.digest)
    }
}

fn parse(hash: &str) -> Option<Parsed<'_>> {
    let fields = super::mcf_fields(hash)?;
    let [ident, config, salt, digest] = fields.as_slice() else {
        return None;
    };
    if *ident != IDENT {
        return None;
    }
    let (variant, cost) = config.split_once(',')?;
    if !IDENTS.contains(&variant) {
        return None;
    }
    if cost.is_empty() || cost.len() > 2 || !cost.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let cost: u32 = cost.parse().ok()?;
    if !(4..=31).contains(&cost) {
        return None;
    }
    if salt.len() != 22 || digest.len() != 31 || !is_bcrypt_b64(salt) || !is_bcrypt_b64(digest) {
        return None;
    }
    Some(Parsed {
        ident: variant,
        cost,
        salt: *salt,
        digest: *digest,
    })
}

fn prehash(password: &str) -> String {
    STANDARD.encode(Sha256::digest(password.as_bytes()))
}

impl BcryptSha256Scheme {
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
}

impl Scheme for BcryptSha256Scheme {
    fn name(&self) -> &'static str {
        NAME
    }

    fn identify(&self, hash: &str) -> bool {
        parse(hash).is_some()
    }

    fn hash(&self, password: &str) -> Result<String> {
        let mut salt = [0u8; 16];
        random::fill_salt(&mut salt)?;

        let raw = ::bcrypt::hash_with_salt(prehash(password), self.cost, salt)
            .map_err(|e| HashError::internal(NAME, e.to_string()))?
            .format_for_version(::bcrypt::Version::TwoB);

        // raw: "$2b$NN$" + 22 字符盐值 + 31 字符摘要
        let body = raw
            .get(7..)
            .filter(|body| body.len() == 53)
            .ok_or_else(|| HashError::internal(NAME, "unexpected bcrypt output"))?;
        let (salt, digest) = body.split_at(22);

        Ok(format!("${}$2b,{}${}${}", IDENT, self.cost, salt, digest))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed =
            parse(hash).ok_or_else(|| HashError::invalid_format(NAME, "not a bcrypt-sha256 hash"))?;

        ::bcrypt::verify(prehash(password), &parsed.to_bcrypt())
            .map_err(|e| HashError::invalid_format(NAME, e.to_string()).into())
    }

    fn needs_update(&self, hash: &str) -> bool {
        match parse(hash) {
            Some(parsed) => parsed.cost < self.cost,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static FAST: BcryptSha256Scheme = BcryptSha256Scheme::with_cost(4);

    #[test]
    fn test_hash_and_verify() {
        let hash = FAST.hash("test_password_123").unwrap();
        assert!(hash.starts_with("$bcrypt-sha256$2b,4$"));
        assert!(FAST.identify(&hash));

        assert!(FAST.verify("test_password_123", &hash).unwrap());
        assert!(!FAST.verify("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_long_password_not_truncated() {
        let base = "a".repeat(72);
        let hash = FAST.hash(&format!("{}tail", base)).unwrap();
        assert!(FAST.verify(&format!("{}tail", base), &hash).unwrap());
        assert!(!FAST.verify(&base, &hash).unwrap());
    }

    #[test]
    fn test_not_claimed_by_plain_bcrypt() {
        let hash = FAST.hash("test").unwrap();
        assert!(!crate::scheme::BCRYPT.identify(&hash));

        let plain = crate::scheme::BcryptScheme::with_cost(4).hash("test").unwrap();
        assert!(!FAST.identify(&plain));
    }

    #[test]
    fn test_identify_rejects_malformed() {
        assert!(!FAST.identify("$bcrypt-sha256$2b,4$short$short"));
        assert!(!FAST.identify("$bcrypt-sha256$2b$salt$digest"));
        assert!(!FAST.identify("$bcrypt-sha256$2b,99$abcdefghijklmnopqrstuv$abcdefghijklmnopqrstuvwxyz01234"));
        assert!(FAST.identify("$bcrypt-sha256$2b,12$abcdefghijklmnopqrstuv$abcdefghijklmnopqrstuvwxyz01234"));
    }

    #[test]
    fn test_needs_update() {
        let hash = FAST.hash("test").unwrap();
        assert!(!FAST.needs_update(&hash));
        assert!(BcryptSha256Scheme::with_cost(6).needs_update(&hash));
    }
}
