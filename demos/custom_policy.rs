//! 自定义哈希策略示例
//!
//! 展示如何从配置文件加载 scheme 列表，以及如何使用自定义参数的 scheme。
//!
//! 运行: cargo run --example custom_policy

use passlib::scheme::{BcryptScheme, Pbkdf2Digest, Pbkdf2Scheme, Scheme, SchemeRef};
use passlib::{Context, ContextConfig, scheme_names};

/// 比默认值更高的 bcrypt 成本
static STRONG_BCRYPT: BcryptScheme = BcryptScheme::with_cost(13);

/// 只用于校验遗留数据库中的 PBKDF2 哈希
static LEGACY_PBKDF2: Pbkdf2Scheme = Pbkdf2Scheme::with_rounds(Pbkdf2Digest::Sha256, 10_000);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== passlib 自定义策略示例 ===\n");

    // 1. 可用的 scheme
    println!("📚 已注册的 scheme:");
    for name in scheme_names() {
        println!("   - {}", name);
    }
    println!();

    // 2. 从 JSON 配置加载
    let raw = r#"{ "schemes": ["bcrypt-sha256", "bcrypt", "pbkdf2-sha1"] }"#;
    let config: ContextConfig = serde_json::from_str(raw)?;
    let ctx = Context::from_config(&config)?;
    println!("⚙️  配置加载的上下文: {:?}", ctx);

    let hash = ctx.hash("correct horse battery staple")?;
    println!("   新哈希: {}\n", hash);

    // 3. 配置中的未知 scheme 会被拒绝
    let bad = ContextConfig::with_schemes(["argon2", "md5-crypt"]);
    match Context::from_config(&bad) {
        Ok(_) => println!("❗ 意外地接受了未知 scheme"),
        Err(e) => println!("❌ 拒绝配置: {}\n", e),
    }

    // 4. 自定义参数
    let ctx = Context::new(&[&STRONG_BCRYPT as SchemeRef, &LEGACY_PBKDF2])?;
    let legacy = LEGACY_PBKDF2.hash("legacy-password")?;
    println!("🔍 遗留哈希: {}", legacy);
    println!("   验证: {}", ctx.verify("legacy-password", &legacy)?);
    println!("   需要升级: {}", ctx.needs_update(&legacy));

    if let Some(upgraded) = ctx
        .verify_and_update("legacy-password", &legacy)?
        .new_hash()
    {
        println!("   升级后: {}", upgraded);
    }

    Ok(())
}
