//! 全局默认上下文集成测试
//!
//! 全局状态在同一进程的所有测试间共享，所有修改都放在一个测试函数中顺序执行，
//! 结束时恢复为最旧的 epoch。

use passlib::{
    DEFAULTS_20160922, DEFAULTS_20180601, Error, VerifyOutcome, default_schemes, hash,
    needs_update, use_default_schemes, use_defaults, verify, verify_and_update,
};

/// 测试全局默认值的初始状态、替换与升级
#[test]
fn test_global_defaults_lifecycle() {
    // 初始为最旧 epoch
    assert_eq!(default_schemes()[0].name(), "scrypt-sha256");
    assert_eq!(default_schemes().len(), 9);

    let old_hash = hash("global-password").unwrap();
    assert!(old_hash.starts_with("$s2$"));
    assert!(verify("global-password", &old_hash).unwrap());
    assert!(!verify("wrong", &old_hash).unwrap());
    assert!(!needs_update(&old_hash));

    // 切换到推荐 epoch 后旧哈希需要升级
    use_defaults(DEFAULTS_20180601).unwrap();
    assert_eq!(default_schemes()[0].name(), "argon2");
    assert!(needs_update(&old_hash));

    let outcome = verify_and_update("global-password", &old_hash).unwrap();
    let new_hash = outcome.new_hash().unwrap().to_string();
    assert!(new_hash.starts_with("$argon2id$"));
    assert_eq!(
        verify_and_update("global-password", &new_hash).unwrap(),
        VerifyOutcome::Valid
    );

    // 非法标识不改变当前状态
    assert!(matches!(
        use_defaults("not-a-date"),
        Err(Error::InvalidEpoch(_))
    ));
    assert_eq!(default_schemes()[0].name(), "argon2");

    // 按名称替换
    use_default_schemes(&["pbkdf2-sha256", "argon2"]).unwrap();
    assert_eq!(default_schemes().len(), 2);
    assert!(hash("global-password").unwrap().starts_with("$pbkdf2-sha256$"));
    assert!(verify("global-password", &new_hash).unwrap());
    assert!(matches!(
        verify("global-password", &old_hash),
        Err(Error::UnrecognizedHash)
    ));

    assert!(matches!(
        use_default_schemes(&["pbkdf2-sha256", "bogus"]),
        Err(Error::UnknownScheme(_))
    ));
    assert!(matches!(
        use_default_schemes::<&str>(&[]),
        Err(Error::EmptySchemeList)
    ));
    assert_eq!(default_schemes().len(), 2);

    use_defaults(DEFAULTS_20160922).unwrap();
    assert_eq!(default_schemes()[0].name(), "scrypt-sha256");
}
