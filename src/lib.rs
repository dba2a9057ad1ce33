//! # passlib
//!
//! 支持算法演进的密码哈希库。
//!
//! 应用用当前首选算法哈希新密码，同时能验证由以往任何首选算法生成的哈希，
//! 并在验证成功时按需把旧哈希升级到当前首选算法，无需集中迁移。
//!
//! ## 功能特性
//!
//! - **统一的 scheme 契约**: argon2、scrypt、bcrypt、bcrypt-sha256、sha256-crypt、
//!   sha512-crypt、pbkdf2-sha1/sha256/sha512
//! - **自描述的哈希格式**: 仅凭哈希字符串即可确定算法与参数
//! - **版本化默认值**: 按发布日期（epoch）选择偏好列表，已发布的列表永不改变
//! - **机会式升级**: 验证成功后检测哈希是否弱于当前策略并重新生成
//!
//! ## 推荐用法：显式的 Context
//!
//! ```rust
//! use passlib::{Context, VerifyOutcome, defaults::DEFAULTS_20180601};
//!
//! let ctx = Context::from_epoch(DEFAULTS_20180601).unwrap();
//!
//! let hash = ctx.hash("my_secure_password").unwrap();
//! assert!(hash.starts_with("$argon2id$"));
//!
//! match ctx.verify_and_update("my_secure_password", &hash).unwrap() {
//!     VerifyOutcome::Valid => {}
//!     VerifyOutcome::Upgraded(_new_hash) => { /* 保存新哈希 */ }
//!     VerifyOutcome::Invalid => { /* 密码错误 */ }
//! }
//! ```
//!
//! ## 自定义偏好列表
//!
//! ```rust
//! use passlib::Context;
//!
//! let ctx = Context::from_names(&["bcrypt-sha256", "bcrypt", "pbkdf2-sha1"]).unwrap();
//! assert_eq!(ctx.default_scheme().name(), "bcrypt-sha256");
//! ```
//!
//! ## 全局默认值
//!
//! 为兼容旧用法，[`hash`]、[`verify`] 等函数使用进程级的默认上下文，
//! 它固定在最旧的 epoch（`20160922`，优先 scrypt-sha256）。
//! 库代码应始终使用自己的 [`Context`]。

pub mod config;
pub mod context;
pub mod defaults;
pub mod error;
pub mod global;
pub mod random;
pub mod registry;
pub mod scheme;

pub use error::{Error, Result};

// ============================================================================
// 上下文与配置
// ============================================================================

pub use config::ContextConfig;
pub use context::{Context, VerifyOutcome};

// ============================================================================
// Scheme 与注册表
// ============================================================================

pub use registry::{lookup, lookup_all, scheme_names};
pub use scheme::{Scheme, SchemeRef};

// ============================================================================
// 版本化默认值
// ============================================================================

pub use defaults::{
    DEFAULTS_20160922, DEFAULTS_20180601, DEFAULTS_LATEST, resolve_epoch, resolve_names,
};

// ============================================================================
// 全局默认上下文
// ============================================================================

pub use global::{
    default_schemes, hash, needs_update, use_default_schemes, use_defaults, verify,
    verify_and_update,
};
