//! 哈希升级示例
//!
//! 展示旧用户在登录时如何从旧 epoch 的哈希透明地升级到当前推荐的 scheme。
//!
//! 运行: cargo run --example upgrade_flow

use std::collections::HashMap;

use passlib::{Context, DEFAULTS_20160922, DEFAULTS_20180601, VerifyOutcome};

/// 简单的用户存储（实际应用中应使用数据库）
struct UserStore {
    hashes: HashMap<String, String>,
}

impl UserStore {
    fn new() -> Self {
        Self {
            hashes: HashMap::new(),
        }
    }

    fn save(&mut self, username: &str, hash: String) {
        self.hashes.insert(username.to_string(), hash);
    }

    fn get(&self, username: &str) -> Option<&str> {
        self.hashes.get(username).map(String::as_str)
    }
}

/// 登录服务
struct LoginService {
    ctx: Context,
    store: UserStore,
}

impl LoginService {
    fn register(&mut self, username: &str, password: &str) -> Result<(), String> {
        let hash = self
            .ctx
            .hash(password)
            .map_err(|e| format!("密码哈希失败: {}", e))?;
        self.store.save(username, hash);
        Ok(())
    }

    /// 登录，必要时把新哈希写回存储
    fn login(&mut self, username: &str, password: &str) -> Result<bool, String> {
        let stored = self
            .store
            .get(username)
            .ok_or_else(|| "用户名或密码错误".to_string())?;

        match self
            .ctx
            .verify_and_update(password, stored)
            .map_err(|e| format!("密码验证失败: {}", e))?
        {
            VerifyOutcome::Invalid => Ok(false),
            VerifyOutcome::Valid => Ok(true),
            VerifyOutcome::Upgraded(new_hash) => {
                println!("   ⬆️  哈希已升级: {}", scheme_of(&new_hash));
                self.store.save(username, new_hash);
                Ok(true)
            }
        }
    }
}

fn scheme_of(hash: &str) -> &str {
    hash.split('$').nth(1).unwrap_or("?")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== passlib 哈希升级示例 ===\n");

    // 1. 应用最初固定在最旧的 epoch
    let mut service = LoginService {
        ctx: Context::from_epoch(DEFAULTS_20160922)?,
        store: UserStore::new(),
    };

    println!("📝 使用 {} 注册用户...", DEFAULTS_20160922);
    service.register("alice", "AliceSecure#2024!")?;
    service.register("bob", "BobSecure#2024!")?;
    let alice_hash = service.store.get("alice").unwrap_or_default();
    println!("   alice: {}\n", scheme_of(alice_hash));

    // 2. 新版本切换到推荐 epoch
    println!("🔧 切换默认值到 {}...", DEFAULTS_20180601);
    service.ctx.use_defaults(DEFAULTS_20180601)?;
    println!("   首选 scheme: {}\n", service.ctx.default_scheme().name());

    // 3. 登录时机会式升级
    println!("🔐 alice 登录...");
    println!("   结果: {}", service.login("alice", "AliceSecure#2024!")?);

    println!("🔐 alice 再次登录...");
    println!("   结果: {}", service.login("alice", "AliceSecure#2024!")?);

    println!("🔐 bob 使用错误密码登录...");
    println!("   结果: {}\n", service.login("bob", "wrong")?);

    for user in ["alice", "bob"] {
        let hash = service.store.get(user).unwrap_or_default();
        println!(
            "📦 {}: {} (需要升级: {})",
            user,
            scheme_of(hash),
            service.ctx.needs_update(hash)
        );
    }

    Ok(())
}
