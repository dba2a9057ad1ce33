//! SHA-256-crypt / SHA-512-crypt (`$5$` / `$6$`)
//!
//! 新哈希总是写出显式的 `rounds=`；省略 rounds 的旧哈希按 5000 轮验证。

use sha_crypt::{Sha256Params, Sha512Params, sha256_crypt_b64, sha512_crypt_b64};

use super::Scheme;
use crate::error::{HashError, Result};
use crate::random::{self, constant_time_compare};

const ROUNDS_DEFAULT: u32 = 5_000;
const ROUNDS_MIN: u32 = 1_000;
const ROUNDS_MAX: u32 = 999_999_999;
const SALT_LEN: usize = 16;
const CRYPT_ALPHABET: &[u8; 64] =
    b"./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// SHA-2 crypt 的摘要变体
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sha2Variant {
    /// `$5$`
    Sha256,
    /// `$6$`
    Sha512,
}

impl Sha2Variant {
    const fn name(self) -> &'static str {
        match self {
            Sha2Variant::Sha256 => "sha256-crypt",
            Sha2Variant::Sha512 => "sha512-crypt",
        }
    }

    const fn ident(self) -> &'static str {
        match self {
            Sha2Variant::Sha256 => "5",
            Sha2Variant::Sha512 => "6",
        }
    }

    /// 摘要部分的字符数
    const fn checksum_len(self) -> usize {
        match self {
            Sha2Variant::Sha256 => 43,
            Sha2Variant::Sha512 => 86,
        }
    }

    /// 计算 crypt 字母表编码的摘要
    fn checksum(self, password: &str, salt: &str, rounds: u32) -> Result<String> {
        let rounds = rounds as usize;
        let (password, salt) = (password.as_bytes(), salt.as_bytes());
        let result = match self {
            Sha2Variant::Sha256 => Sha256Params::new(rounds)
                .and_then(|params| sha256_crypt_b64(password, salt, &params)),
            Sha2Variant::Sha512 => Sha512Params::new(rounds)
                .and_then(|params| sha512_crypt_b64(password, salt, &params)),
        };
        result.map_err(|e| HashError::internal(self.name(), format!("{:?}", e)).into())
    }
}

struct Parsed<'a> {
    rounds: u32,
    salt: &'a str,
    checksum: &'a str,
}

/// SHA-2 crypt scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sha2CryptScheme {
    variant: Sha2Variant,
    rounds: u32,
}

impl Sha2CryptScheme {
    /// `sha256-crypt` 默认 rounds
    pub const DEFAULT_SHA256_ROUNDS: u32 = 535_000;
    /// `sha512-crypt` 默认 rounds
    pub const DEFAULT_SHA512_ROUNDS: u32 = 656_000;

    /// `sha256-crypt`，默认 rounds
    pub const fn sha256() -> Self {
        Self::with_rounds(Sha2Variant::Sha256, Self::DEFAULT_SHA256_ROUNDS)
    }

    /// `sha512-crypt`，默认 rounds
    pub const fn sha512() -> Self {
        Self::with_rounds(Sha2Variant::Sha512, Self::DEFAULT_SHA512_ROUNDS)
    }

    /// 自定义 rounds
    ///
    /// # Panics
    ///
    /// rounds 不在 1000-999999999 范围内时 panic
    pub const fn with_rounds(variant: Sha2Variant, rounds: u32) -> Self {
        assert!(
            rounds >= ROUNDS_MIN && rounds <= ROUNDS_MAX,
            "sha2-crypt rounds must be between 1000 and 999999999"
        );
        Self { variant, rounds }
    }

    /// 解析 `$5$[rounds=R$]salt$checksum`，省略 rounds 时为 5000
    fn parse<'a>(&self, hash: &'a str) -> Option<Parsed<'a>> {
        let fields = super::mcf_fields(hash)?;
        let (rounds, salt, checksum) = match fields.as_slice() {
            [ident, rounds, salt, checksum] if *ident == self.variant.ident() => {
                let rounds = rounds.strip_prefix("rounds=")?;
                if rounds.is_empty() || !rounds.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let rounds: u32 = rounds.parse().ok()?;
                (rounds, *salt, *checksum)
            }
            [ident, salt, checksum] if *ident == self.variant.ident() => {
                (ROUNDS_DEFAULT, *salt, *checksum)
            }
            _ => return None,
        };
        if !(ROUNDS_MIN..=ROUNDS_MAX).contains(&rounds) {
            return None;
        }
        if salt.len() > SALT_LEN || !is_crypt_b64(salt) || salt.starts_with("rounds=") {
            return None;
        }
        if checksum.len() != self.variant.checksum_len() || !is_crypt_b64(checksum) {
            return None;
        }
        Some(Parsed {
            rounds,
            salt,
            checksum,
        })
    }
}

fn is_crypt_b64(data: &str) -> bool {
    data.bytes()
        .all(|b| b == b'.' || b == b'/' || b.is_ascii_alphanumeric())
}

/// 从 CSPRNG 生成 16 个 crypt 字母表字符；64 整除 256，取模无偏差
fn generate_crypt_salt() -> Result<String> {
    let mut bytes = [0u8; SALT_LEN];
    random::fill_salt(&mut bytes)?;
    Ok(bytes
        .iter()
        .map(|b| CRYPT_ALPHABET[usize::from(*b) % CRYPT_ALPHABET.len()] as char)
        .collect())
}

impl Scheme for Sha2CryptScheme {
    fn name(&self) -> &'static str {
        self.variant.name()
    }

    fn identify(&self, hash: &str) -> bool {
        self.parse(hash).is_some()
    }

    fn hash(&self, password: &str) -> Result<String> {
        let salt = generate_crypt_salt()?;
        let checksum = self.variant.checksum(password, &salt, self.rounds)?;
        Ok(format!(
            "${}$rounds={}${}${}",
            self.variant.ident(),
            self.rounds,
            salt,
            checksum
        ))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed = self.parse(hash).ok_or_else(|| {
            HashError::invalid_format(self.name(), "not a crypt hash of this variant")
        })?;
        let checksum = self
            .variant
            .checksum(password, parsed.salt, parsed.rounds)?;
        Ok(constant_time_compare(
            checksum.as_bytes(),
            parsed.checksum.as_bytes(),
        ))
    }

    fn needs_update(&self, hash: &str) -> bool {
        match self.parse(hash) {
            Some(parsed) => parsed.rounds < self.rounds,
            None => true,
        }
    }
}
