//! 版本化默认策略
//!
//! 每个 epoch 是一个发布时确定的、不可变的 scheme 偏好列表（最优先的在前）。
//! epoch 只能追加，已发布的列表永远不会修改，因此固定在旧 epoch 上的调用方
//! 在后续版本中行为保持不变。
//!
//! ## 解析规则
//!
//! - `"latest"`：总是最新的 epoch。每次升级本库都可能改变默认行为，需谨慎使用。
//! - `YYYYMMDD`：按 UTC 日历日期解析，取 cutover 日期不晚于该日期的最新 epoch；
//!   早于最旧 epoch 的日期解析为最旧 epoch，晚于最新 epoch 的日期解析为最新 epoch。
//! - 其他任何输入都返回 [`Error::InvalidEpoch`]。
//!
//! ```rust
//! use passlib::defaults::{resolve_epoch, DEFAULTS_20160922, DEFAULTS_LATEST};
//!
//! let old = resolve_epoch(DEFAULTS_20160922).unwrap();
//! assert_eq!(old[0].name(), "scrypt-sha256");
//!
//! let new = resolve_epoch(DEFAULTS_LATEST).unwrap();
//! assert_eq!(new[0].name(), "argon2");
//!
//! assert!(resolve_epoch("not-a-date").is_err());
//! ```

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::error::{Error, Result};
use crate::registry;
use crate::scheme::{self, SchemeRef};

/// 第一组默认值，优先 scrypt-sha256。已过时，但仍是全局默认值。
pub const DEFAULTS_20160922: &str = "20160922";

/// 当前推荐的默认值，优先 argon2。需要显式选择。
pub const DEFAULTS_20180601: &str = "20180601";

/// 总是使用最新的默认值
///
/// 除非确定后续版本中的哈希升级不会破坏应用，否则不要使用。
pub const DEFAULTS_LATEST: &str = "latest";

static SCHEMES_20160922: [SchemeRef; 9] = [
    &scheme::SCRYPT_SHA256,
    &scheme::ARGON2,
    &scheme::SHA512_CRYPT,
    &scheme::SHA256_CRYPT,
    &scheme::BCRYPT_SHA256,
    &scheme::PBKDF2_SHA512,
    &scheme::PBKDF2_SHA256,
    &scheme::BCRYPT,
    &scheme::PBKDF2_SHA1,
];

static SCHEMES_20180601: [SchemeRef; 9] = [
    &scheme::ARGON2,
    &scheme::SCRYPT_SHA256,
    &scheme::SHA512_CRYPT,
    &scheme::SHA256_CRYPT,
    &scheme::BCRYPT_SHA256,
    &scheme::PBKDF2_SHA512,
    &scheme::PBKDF2_SHA256,
    &scheme::BCRYPT,
    &scheme::PBKDF2_SHA1,
];

/// 一个发布时确定的默认 scheme 列表
#[derive(Debug)]
pub struct Epoch {
    id: &'static str,
    cutover: u32,
    schemes: &'static [SchemeRef],
}

impl Epoch {
    /// epoch 标识，即 `YYYYMMDD` 形式的 cutover 日期
    pub fn id(&self) -> &'static str {
        self.id
    }

    /// cutover 日期
    pub fn cutover(&self) -> NaiveDate {
        // 表中的日期都是合法日期
        NaiveDate::from_ymd_opt(
            (self.cutover / 10_000) as i32,
            self.cutover / 100 % 100,
            self.cutover % 100,
        )
        .unwrap_or(NaiveDate::MIN)
    }

    /// 偏好列表，最优先的在前
    pub fn schemes(&self) -> &'static [SchemeRef] {
        self.schemes
    }
}

/// 所有 epoch，按 cutover 日期升序排列，只允许追加
pub static EPOCHS: [Epoch; 2] = [
    Epoch {
        id: DEFAULTS_20160922,
        cutover: 2016_09_22,
        schemes: &SCHEMES_20160922,
    },
    Epoch {
        id: DEFAULTS_20180601,
        cutover: 2018_06_01,
        schemes: &SCHEMES_20180601,
    },
];

/// 最旧的 epoch（全局默认值）
pub fn oldest() -> &'static Epoch {
    &EPOCHS[0]
}

/// 最新的 epoch
pub fn latest() -> &'static Epoch {
    &EPOCHS[EPOCHS.len() - 1]
}

/// 把 epoch 标识解析为 [`Epoch`]
pub fn resolve(identifier: &str) -> Result<&'static Epoch> {
    if identifier == DEFAULTS_LATEST {
        warn!(
            epoch = latest().id(),
            "using the latest password hashing defaults; behaviour may change on upgrade"
        );
        return Ok(latest());
    }

    let date = parse_date(identifier)?;
    Ok(epoch_for_date(date))
}

/// 把 epoch 标识解析为 scheme 偏好列表
pub fn resolve_epoch(identifier: &str) -> Result<&'static [SchemeRef]> {
    resolve(identifier).map(Epoch::schemes)
}

/// 按名称构造自定义偏好列表，完全绕过 epoch
pub fn resolve_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<SchemeRef>> {
    registry::lookup_all(names)
}

/// 取 cutover 不晚于 `date` 的最新 epoch，没有时取最旧的
pub fn epoch_for_date(date: NaiveDate) -> &'static Epoch {
    let key = date_key(date);
    EPOCHS
        .iter()
        .rev()
        .find(|epoch| epoch.cutover <= key)
        .unwrap_or_else(oldest)
}

fn parse_date(identifier: &str) -> Result<NaiveDate> {
    if identifier.len() != 8 || !identifier.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidEpoch(identifier.to_string()));
    }
    NaiveDate::parse_from_str(identifier, "%Y%m%d")
        .map_err(|_| Error::InvalidEpoch(identifier.to_string()))
}

fn date_key(date: NaiveDate) -> u32 {
    // 8 位日期字符串解析出的年份总在 0..=9999 之内
    date.year().max(0) as u32 * 10_000 + date.month() * 100 + date.day()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_name(identifier: &str) -> &'static str {
        resolve_epoch(identifier).unwrap()[0].name()
    }

    #[test]
    fn test_epochs_sorted_and_consistent() {
        for pair in EPOCHS.windows(2) {
            assert!(pair[0].cutover < pair[1].cutover);
        }
        for epoch in &EPOCHS {
            assert_eq!(epoch.id(), epoch.cutover().format("%Y%m%d").to_string());
        }
    }

    #[test]
    fn test_epochs_contain_same_scheme_set() {
        let mut old: Vec<_> = oldest().schemes().iter().map(|s| s.name()).collect();
        let mut new: Vec<_> = latest().schemes().iter().map(|s| s.name()).collect();
        old.sort_unstable();
        new.sort_unstable();
        assert_eq!(old, new);

        let mut registered: Vec<_> = registry::scheme_names().collect();
        registered.sort_unstable();
        assert_eq!(old, registered);
    }

    #[test]
    fn test_resolve_release_tags() {
        assert_eq!(first_name(DEFAULTS_20160922), "scrypt-sha256");
        assert_eq!(first_name(DEFAULTS_20180601), "argon2");
        assert_eq!(first_name(DEFAULTS_LATEST), "argon2");
    }

    #[test]
    fn test_resolve_before_oldest() {
        assert_eq!(first_name("20160101"), "scrypt-sha256");
        assert_eq!(first_name("19700101"), "scrypt-sha256");
        assert_eq!(first_name("00010101"), "scrypt-sha256");
    }

    #[test]
    fn test_resolve_between_epochs() {
        assert_eq!(first_name("20160923"), "scrypt-sha256");
        assert_eq!(first_name("20180531"), "scrypt-sha256");
    }

    #[test]
    fn test_resolve_future_dates() {
        assert_eq!(first_name("20180602"), "argon2");
        assert_eq!(first_name("20991231"), "argon2");
        assert_eq!(first_name("99991231"), "argon2");
    }

    #[test]
    fn test_resolve_returns_static_lists() {
        assert!(std::ptr::eq(
            resolve_epoch("20991231").unwrap(),
            resolve_epoch(DEFAULTS_LATEST).unwrap()
        ));
        assert!(std::ptr::eq(resolve("20170101").unwrap(), oldest()));
    }

    #[test]
    fn test_resolve_invalid() {
        for bad in [
            "not-a-date",
            "",
            "Latest",
            "2016-09-22",
            "2016092",
            "201609221",
            "20160231",
            "20161301",
            "+2016092",
            " 20160922",
        ] {
            let err = resolve_epoch(bad).unwrap_err();
            assert!(
                matches!(err, Error::InvalidEpoch(ref id) if id == bad),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_resolve_names() {
        let schemes = resolve_names(&["bcrypt", "argon2"]).unwrap();
        assert_eq!(schemes[0].name(), "bcrypt");
        assert!(matches!(
            resolve_names(&["bcrypt", "nope"]),
            Err(Error::UnknownScheme(_))
        ));
    }
}
