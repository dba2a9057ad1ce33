//! 哈希字符串中使用的 base64 变体

use base64::{
    Engine,
    engine::general_purpose::{STANDARD, STANDARD_NO_PAD},
};

/// 标准 base64（带填充）
pub(crate) fn b64_encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

pub(crate) fn b64_decode(data: &str) -> Option<Vec<u8>> {
    STANDARD.decode(data).ok()
}

/// "adapted base64"：标准字母表，`+` 换成 `.`，无填充
///
/// 用于 PBKDF2 格式，使哈希中不出现 `+`。
pub(crate) fn ab64_encode(data: &[u8]) -> String {
    STANDARD_NO_PAD.encode(data).replace('+', ".")
}

pub(crate) fn ab64_decode(data: &str) -> Option<Vec<u8>> {
    if data.contains('+') || data.contains('=') {
        return None;
    }
    STANDARD_NO_PAD.decode(data.replace('.', "+")).ok()
}

/// bcrypt 使用的字母表 `./A-Za-z0-9`
pub(crate) fn is_bcrypt_b64(data: &str) -> bool {
    data.bytes()
        .all(|b| b == b'.' || b == b'/' || b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ab64_has_no_plus() {
        // 0xfb 0xef 0xbe 在标准 base64 中编码为 "++++"
        let encoded = ab64_encode(&[0xfb, 0xef, 0xbe]);
        assert_eq!(encoded, "....");
        assert_eq!(ab64_decode(&encoded).unwrap(), vec![0xfb, 0xef, 0xbe]);
    }

    #[test]
    fn test_ab64_rejects_foreign_chars() {
        assert!(ab64_decode("++++").is_none());
        assert!(ab64_decode("YQ==").is_none());
        assert!(ab64_decode("!!").is_none());
    }

    #[test]
    fn test_b64_decode_invalid() {
        assert!(b64_decode("not base64!").is_none());
        assert_eq!(b64_decode(&b64_encode(b"salt")).unwrap(), b"salt");
    }

    #[test]
    fn test_is_bcrypt_b64() {
        assert!(is_bcrypt_b64("./AZaz09"));
        assert!(!is_bcrypt_b64("ab+c"));
        assert!(!is_bcrypt_b64("ab$c"));
    }
}
