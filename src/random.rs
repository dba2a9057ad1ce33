//! 盐值生成与常量时间比较
//!
//! 所有 scheme 的盐值都来自操作系统提供的密码学安全随机数生成器 (CSPRNG)。

use crate::error::{CryptoError, Error, Result};

/// 用随机字节填充缓冲区
///
/// 熵源失败时返回 [`CryptoError::RngFailed`]，不会静默重试。
pub fn fill_salt(salt: &mut [u8]) -> Result<()> {
    getrandom::fill(salt).map_err(|e| Error::Crypto(CryptoError::RngFailed(e.to_string())))
}

/// 生成指定长度的随机盐值
///
/// # Example
///
/// ```rust
/// use passlib::random::generate_salt;
///
/// let salt = generate_salt(16).unwrap();
/// assert_eq!(salt.len(), 16);
/// ```
pub fn generate_salt(length: usize) -> Result<Vec<u8>> {
    let mut salt = vec![0u8; length];
    fill_salt(&mut salt)?;
    Ok(salt)
}

/// 常量时间比较两个字节数组
///
/// 比较时间只与长度有关，与内容无关，用于比较派生出的摘要。
///
/// ```rust
/// use passlib::random::constant_time_compare;
///
/// assert!(constant_time_compare(b"digest", b"digest"));
/// assert!(!constant_time_compare(b"digest", b"digesT"));
/// ```
pub fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    use subtle::ConstantTimeEq;
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_salt() {
        let salt = generate_salt(32).unwrap();
        assert_eq!(salt.len(), 32);

        // 两次生成不应相同
        let salt2 = generate_salt(32).unwrap();
        assert_ne!(salt, salt2);
    }

    #[test]
    fn test_fill_salt_empty() {
        let mut empty: [u8; 0] = [];
        assert!(fill_salt(&mut empty).is_ok());
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare(b"hello", b"hello"));
        assert!(!constant_time_compare(b"hello", b"world"));
        assert!(!constant_time_compare(b"hello", b"hell"));
    }
}
