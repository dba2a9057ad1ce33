//! PBKDF2-HMAC (`$pbkdf2$` / `$pbkdf2-sha256$` / `$pbkdf2-sha512$`)
//!
//! 格式：`$<ident>$<rounds>$<ab64 盐值>$<ab64 摘要>`，摘要长度等于底层哈希的输出长度。

use ::pbkdf2::pbkdf2_hmac;
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use super::Scheme;
use super::encoding::{ab64_decode, ab64_encode};
use crate::error::{HashError, Result};
use crate::random::{self, constant_time_compare};

const SALT_LEN: usize = 16;

/// PBKDF2 使用的 HMAC 摘要
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pbkdf2Digest {
    /// HMAC-SHA1
    Sha1,
    /// HMAC-SHA256
    Sha256,
    /// HMAC-SHA512
    Sha512,
}

impl Pbkdf2Digest {
    const fn name(self) -> &'static str {
        match self {
            Pbkdf2Digest::Sha1 => "pbkdf2-sha1",
            Pbkdf2Digest::Sha256 => "pbkdf2-sha256",
            Pbkdf2Digest::Sha512 => "pbkdf2-sha512",
        }
    }

    const fn ident(self) -> &'static str {
        match self {
            Pbkdf2Digest::Sha1 => "pbkdf2",
            Pbkdf2Digest::Sha256 => "pbkdf2-sha256",
            Pbkdf2Digest::Sha512 => "pbkdf2-sha512",
        }
    }

    const fn output_len(self) -> usize {
        match self {
            Pbkdf2Digest::Sha1 => 20,
            Pbkdf2Digest::Sha256 => 32,
            Pbkdf2Digest::Sha512 => 64,
        }
    }

    fn derive(self, password: &[u8], salt: &[u8], rounds: u32, out: &mut [u8]) {
        match self {
            Pbkdf2Digest::Sha1 => pbkdf2_hmac::<Sha1>(password, salt, rounds, out),
            Pbkdf2Digest::Sha256 => pbkdf2_hmac::<Sha256>(password, salt, rounds, out),
            Pbkdf2Digest::Sha512 => pbkdf2_hmac::<Sha512>(password, salt, rounds, out),
        }
    }
}

/// PBKDF2 scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pbkdf2Scheme {
    digest: Pbkdf2Digest,
    rounds: u32,
}

struct Parsed {
    rounds: u32,
    salt: Vec<u8>,
    checksum: Vec<u8>,
}

impl Pbkdf2Scheme {
    /// `pbkdf2-sha1` 默认 rounds
    pub const DEFAULT_SHA1_ROUNDS: u32 = 131_000;
    /// `pbkdf2-sha256` 默认 rounds
    pub const DEFAULT_SHA256_ROUNDS: u32 = 29_000;
    /// `pbkdf2-sha512` 默认 rounds
    pub const DEFAULT_SHA512_ROUNDS: u32 = 25_000;

    /// `pbkdf2-sha1`
    pub const fn sha1() -> Self {
        Self::with_rounds(Pbkdf2Digest::Sha1, Self::DEFAULT_SHA1_ROUNDS)
    }

    /// `pbkdf2-sha256`
    pub const fn sha256() -> Self {
        Self::with_rounds(Pbkdf2Digest::Sha256, Self::DEFAULT_SHA256_ROUNDS)
    }

    /// `pbkdf2-sha512`
    pub const fn sha512() -> Self {
        Self::with_rounds(Pbkdf2Digest::Sha512, Self::DEFAULT_SHA512_ROUNDS)
    }

    /// 自定义 rounds
    ///
    /// # Panics
    ///
    /// rounds 为 0 时 panic
    pub const fn with_rounds(digest: Pbkdf2Digest, rounds: u32) -> Self {
        assert!(rounds >= 1, "pbkdf2 rounds must be positive");
        Self { digest, rounds }
    }

    fn parse(&self, hash: &str) -> Option<Parsed> {
        let fields = super::mcf_fields(hash)?;
        let [ident, rounds, salt, checksum] = fields.as_slice() else {
            return None;
        };
        if *ident != self.digest.ident() {
            return None;
        }
        if rounds.is_empty() || rounds.starts_with('0') || !rounds.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let rounds: u32 = rounds.parse().ok()?;
        let salt = ab64_decode(salt)?;
        let checksum = ab64_decode(checksum)?;
        if checksum.len() != self.digest.output_len() {
            return None;
        }
        Some(Parsed {
            rounds,
            salt,
            checksum,
        })
    }
}

impl Scheme for Pbkdf2Scheme {
    fn name(&self) -> &'static str {
        self.digest.name()
    }

    fn identify(&self, hash: &str) -> bool {
        self.parse(hash).is_some()
    }

    fn hash(&self, password: &str) -> Result<String> {
        let mut salt = [0u8; SALT_LEN];
        random::fill_salt(&mut salt)?;
        let mut checksum = vec![0u8; self.digest.output_len()];
        self.digest
            .derive(password.as_bytes(), &salt, self.rounds, &mut checksum);

        Ok(format!(
            "${}${}${}${}",
            self.digest.ident(),
            self.rounds,
            ab64_encode(&salt),
            ab64_encode(&checksum)
        ))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed = self
            .parse(hash)
            .ok_or_else(|| HashError::invalid_format(self.name(), "not a pbkdf2 hash of this digest"))?;

        let mut checksum = vec![0u8; parsed.checksum.len()];
        self.digest
            .derive(password.as_bytes(), &parsed.salt, parsed.rounds, &mut checksum);
        Ok(constant_time_compare(&checksum, &parsed.checksum))
    }

    fn needs_update(&self, hash: &str) -> bool {
        match self.parse(hash) {
            Some(parsed) => parsed.rounds < self.rounds || parsed.salt.len() < SALT_LEN,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static FAST_SHA1: Pbkdf2Scheme = Pbkdf2Scheme::with_rounds(Pbkdf2Digest::Sha1, 1_000);
    static FAST_SHA256: Pbkdf2Scheme = Pbkdf2Scheme::with_rounds(Pbkdf2Digest::Sha256, 1_000);
    static FAST_SHA512: Pbkdf2Scheme = Pbkdf2Scheme::with_rounds(Pbkdf2Digest::Sha512, 1_000);

    #[test]
    fn test_hash_and_verify() {
        for scheme in [&FAST_SHA1, &FAST_SHA256, &FAST_SHA512] {
            let hash = scheme.hash("test_password_123").unwrap();
            assert!(scheme.identify(&hash), "{}", scheme.name());
            assert!(scheme.verify("test_password_123", &hash).unwrap());
            assert!(!scheme.verify("wrong_password", &hash).unwrap());
        }
    }

    #[test]
    fn test_known_vectors() {
        // hashlib.pbkdf2_hmac(.., b"legacy-password", b"saltsaltsaltsalt", 1000)
        let sha1 = "$pbkdf2$1000$c2FsdHNhbHRzYWx0c2FsdA$GCprHkgioePr2kPr6VXTOJKSsQU";
        let sha256 = "$pbkdf2-sha256$1000$c2FsdHNhbHRzYWx0c2FsdA$XafJvDe5Ygc5dnqY05Z/XTdqNBlCJe0MGXkEy0PjKdo";
        let sha512 = "$pbkdf2-sha512$1000$c2FsdHNhbHRzYWx0c2FsdA$aKeLvCx.S49wGhSUXJ21VU8uzTunvifQJP0I6SdM7f3j4dv74BtcT845Dq6HDhOmFGbaza9E4D7Qz0gMPySL5g";

        assert!(FAST_SHA1.verify("legacy-password", sha1).unwrap());
        assert!(FAST_SHA256.verify("legacy-password", sha256).unwrap());
        assert!(FAST_SHA512.verify("legacy-password", sha512).unwrap());
        assert!(!FAST_SHA512.verify("legacy-passwort", sha512).unwrap());
    }

    #[test]
    fn test_digests_are_exclusive() {
        let hash = FAST_SHA256.hash("x").unwrap();
        assert!(!FAST_SHA1.identify(&hash));
        assert!(!FAST_SHA512.identify(&hash));
        assert!(FAST_SHA1.verify("x", &hash).is_err());
    }

    #[test]
    fn test_identify_rejects_wrong_checksum_len() {
        // sha1 长度的摘要挂在 sha256 标签下
        let forged = "$pbkdf2-sha256$1000$c2FsdHNhbHRzYWx0c2FsdA$GCprHkgioePr2kPr6VXTOJKSsQU";
        assert!(!FAST_SHA256.identify(forged));
        assert!(!FAST_SHA256.identify("$pbkdf2-sha256$0$c2FsdA$GCprHkgioePr2kPr6VXTOJKSsQU"));
    }

    #[test]
    fn test_needs_update() {
        let hash = FAST_SHA256.hash("x").unwrap();
        assert!(!FAST_SHA256.needs_update(&hash));
        assert!(Pbkdf2Scheme::sha256().needs_update(&hash));
    }
}
