//! 密码哈希 scheme
//!
//! 每个哈希算法都实现同一个 [`Scheme`] 契约：识别、哈希、验证、检查是否需要升级。
//!
//! ## 内置 scheme
//!
//! | 名称 | 格式前缀 |
//! |---|---|
//! | `argon2` | `$argon2id$` / `$argon2i$` / `$argon2d$` |
//! | `scrypt-sha256` | `$s2$` |
//! | `sha256-crypt` | `$5$` |
//! | `sha512-crypt` | `$6$` |
//! | `bcrypt` | `$2a$` / `$2b$` / `$2y$` |
//! | `bcrypt-sha256` | `$bcrypt-sha256$` |
//! | `pbkdf2-sha1` | `$pbkdf2$` |
//! | `pbkdf2-sha256` | `$pbkdf2-sha256$` |
//! | `pbkdf2-sha512` | `$pbkdf2-sha512$` |
//!
//! 各格式的标签互不相同，因此任意一个合法的哈希字符串最多只会被一个 scheme 认领。
//!
//! ## 自定义参数
//!
//! 每个 scheme 都提供 `const fn` 构造器，可以声明自己的 `static` 实例：
//!
//! ```rust
//! use passlib::Context;
//! use passlib::scheme::{BcryptScheme, SchemeRef};
//!
//! static FAST_BCRYPT: BcryptScheme = BcryptScheme::with_cost(4);
//!
//! let schemes: [SchemeRef; 1] = [&FAST_BCRYPT];
//! let ctx = Context::new(&schemes).unwrap();
//! let hash = ctx.hash("hunter2").unwrap();
//! assert!(hash.starts_with("$2b$04$"));
//! ```

use std::fmt;

use crate::error::Result;

mod argon2;
mod bcrypt;
mod bcrypt_sha256;
mod encoding;
mod pbkdf2;
mod scrypt;
mod sha2crypt;

pub use self::argon2::Argon2Scheme;
pub use self::bcrypt::BcryptScheme;
pub use self::bcrypt_sha256::BcryptSha256Scheme;
pub use self::pbkdf2::{Pbkdf2Digest, Pbkdf2Scheme};
pub use self::scrypt::ScryptSha256Scheme;
pub use self::sha2crypt::{Sha2CryptScheme, Sha2Variant};

/// 密码哈希算法契约
///
/// 实现必须是无状态的：同一个实例会被多个线程并发调用。
pub trait Scheme: Send + Sync + fmt::Debug {
    /// 稳定的 scheme 名称，例如 `"argon2"`
    fn name(&self) -> &'static str;

    /// 判断哈希字符串是否属于该 scheme
    ///
    /// 只检查格式（标签、字段数量、编码），不做任何 KDF 计算。
    /// 对格式错误的输入返回 `false`，绝不 panic。
    fn identify(&self, hash: &str) -> bool;

    /// 使用当前默认参数和新的随机盐值哈希密码
    ///
    /// 空密码和长密码都是合法输入。
    fn hash(&self, password: &str) -> Result<String>;

    /// 验证密码
    ///
    /// 密码正确返回 `Ok(true)`，密码错误返回 `Ok(false)`；
    /// 哈希不属于该 scheme 时返回 [`HashError::InvalidFormat`](crate::error::HashError::InvalidFormat)。
    fn verify(&self, password: &str, hash: &str) -> Result<bool>;

    /// 哈希中嵌入的参数是否弱于当前默认参数
    fn needs_update(&self, hash: &str) -> bool;
}

/// 对进程级 scheme 单例的引用
pub type SchemeRef = &'static dyn Scheme;

// ============================================================================
// 内置单例
// ============================================================================

/// `argon2`
pub static ARGON2: Argon2Scheme = Argon2Scheme::new();

/// `scrypt-sha256`
pub static SCRYPT_SHA256: ScryptSha256Scheme = ScryptSha256Scheme::new();

/// `sha256-crypt`
pub static SHA256_CRYPT: Sha2CryptScheme = Sha2CryptScheme::sha256();

/// `sha512-crypt`
pub static SHA512_CRYPT: Sha2CryptScheme = Sha2CryptScheme::sha512();

/// `bcrypt`
pub static BCRYPT: BcryptScheme = BcryptScheme::new();

/// `bcrypt-sha256`
pub static BCRYPT_SHA256: BcryptSha256Scheme = BcryptSha256Scheme::new();

/// `pbkdf2-sha1`
pub static PBKDF2_SHA1: Pbkdf2Scheme = Pbkdf2Scheme::sha1();

/// `pbkdf2-sha256`
pub static PBKDF2_SHA256: Pbkdf2Scheme = Pbkdf2Scheme::sha256();

/// `pbkdf2-sha512`
pub static PBKDF2_SHA512: Pbkdf2Scheme = Pbkdf2Scheme::sha512();

/// 以 `$` 分隔的哈希字段
///
/// 以 `$` 开头的字符串，第一个空字段会被跳过。
pub(crate) fn mcf_fields(hash: &str) -> Option<Vec<&str>> {
    let rest = hash.strip_prefix('$')?;
    Some(rest.split('$').collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mcf_fields() {
        assert_eq!(
            mcf_fields("$pbkdf2$10$salt$hash"),
            Some(vec!["pbkdf2", "10", "salt", "hash"])
        );
        assert_eq!(mcf_fields("pbkdf2$10"), None);
        assert_eq!(mcf_fields("$"), Some(vec![""]));
    }

    #[test]
    fn test_builtin_names() {
        let all: [SchemeRef; 9] = [
            &ARGON2,
            &SCRYPT_SHA256,
            &SHA256_CRYPT,
            &SHA512_CRYPT,
            &BCRYPT,
            &BCRYPT_SHA256,
            &PBKDF2_SHA1,
            &PBKDF2_SHA256,
            &PBKDF2_SHA512,
        ];
        let names: Vec<_> = all.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            [
                "argon2",
                "scrypt-sha256",
                "sha256-crypt",
                "sha512-crypt",
                "bcrypt",
                "bcrypt-sha256",
                "pbkdf2-sha1",
                "pbkdf2-sha256",
                "pbkdf2-sha512",
            ]
        );
    }

    #[test]
    fn test_garbage_claimed_by_none() {
        let all: [SchemeRef; 9] = [
            &ARGON2,
            &SCRYPT_SHA256,
            &SHA256_CRYPT,
            &SHA512_CRYPT,
            &BCRYPT,
            &BCRYPT_SHA256,
            &PBKDF2_SHA1,
            &PBKDF2_SHA256,
            &PBKDF2_SHA512,
        ];
        for garbage in ["", "$", "$$$$", "plaintext", "$2b$", "$6$", "$argon2id$", "$s2$"] {
            for scheme in all {
                assert!(
                    !scheme.identify(garbage),
                    "{} claimed {:?}",
                    scheme.name(),
                    garbage
                );
            }
        }
    }
}
