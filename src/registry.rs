//! Scheme 注册表
//!
//! 名称到 scheme 单例的固定映射。注册表在编译期确定，运行时不能增删，
//! 因此同一个名称在进程生命周期内总是指向同一个 scheme。
//!
//! 名称是持久化/配置契约的一部分，改名会破坏保存了名称的调用方。
//!
//! ```rust
//! use passlib::registry::{lookup, lookup_all};
//!
//! let argon2 = lookup("argon2").unwrap();
//! assert_eq!(argon2.name(), "argon2");
//! assert!(lookup("md5-crypt").is_none());
//!
//! let err = lookup_all(&["argon2", "bogus", "bcrypt"]).unwrap_err();
//! assert_eq!(err.to_string(), "unknown scheme \"bogus\"");
//! ```

use crate::error::{Error, Result};
use crate::scheme::{self, SchemeRef};

static REGISTRY: [SchemeRef; 9] = [
    &scheme::ARGON2,
    &scheme::SCRYPT_SHA256,
    &scheme::SHA256_CRYPT,
    &scheme::SHA512_CRYPT,
    &scheme::BCRYPT,
    &scheme::BCRYPT_SHA256,
    &scheme::PBKDF2_SHA256,
    &scheme::PBKDF2_SHA512,
    &scheme::PBKDF2_SHA1,
];

/// 按名称精确查找 scheme，不存在时返回 `None`
pub fn lookup(name: &str) -> Option<SchemeRef> {
    REGISTRY.iter().copied().find(|s| s.name() == name)
}

/// 把名称列表按顺序解析为 scheme 列表
///
/// 遇到第一个未知名称即失败，错误中包含该名称；不会返回部分结果。
pub fn lookup_all<S: AsRef<str>>(names: &[S]) -> Result<Vec<SchemeRef>> {
    names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            lookup(name).ok_or_else(|| Error::UnknownScheme(name.to_string()))
        })
        .collect()
}

/// 所有已注册的 scheme 名称
pub fn scheme_names() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|s| s.name())
}

/// 所有已注册的 scheme
pub fn all() -> &'static [SchemeRef] {
    &REGISTRY
}
