//! 进程级默认上下文
//!
//! 为了与旧版本保持兼容而保留的全局状态。它在首次使用时初始化为最旧的
//! epoch（`20160922`），只有显式调用 [`use_defaults`] 或
//! [`use_default_schemes`] 才会改变。
//!
//! **库代码不要使用这里的函数**：全局状态会被同一进程内的所有调用方共享。
//! 请构造自己的 [`Context`]。
//!
//! ```rust
//! let hash = passlib::hash("correct horse").unwrap();
//! assert!(passlib::verify("correct horse", &hash).unwrap());
//! assert!(!passlib::needs_update(&hash));
//! ```

use std::sync::LazyLock;

use tracing::info;

use crate::context::{Context, VerifyOutcome};
use crate::error::Result;
use crate::scheme::SchemeRef;

static DEFAULT_CONTEXT: LazyLock<Context> = LazyLock::new(Context::default);

/// 全局默认上下文
pub fn default_context() -> &'static Context {
    &DEFAULT_CONTEXT
}

/// 当前全局默认 scheme 列表的快照
pub fn default_schemes() -> Vec<SchemeRef> {
    DEFAULT_CONTEXT.schemes()
}

/// 按 epoch 标识替换全局默认值
///
/// 强烈建议改为创建自己的 [`Context`]，因为这里修改的是全局行为。
pub fn use_defaults(identifier: &str) -> Result<()> {
    DEFAULT_CONTEXT.use_defaults(identifier)?;
    info!(
        epoch = identifier,
        preferred = DEFAULT_CONTEXT.default_scheme().name(),
        "global password hashing defaults replaced"
    );
    Ok(())
}

/// 按 scheme 名称列表替换全局默认值
pub fn use_default_schemes<S: AsRef<str>>(names: &[S]) -> Result<()> {
    DEFAULT_CONTEXT.use_scheme_names(names)?;
    info!(
        preferred = DEFAULT_CONTEXT.default_scheme().name(),
        "global password hashing schemes replaced"
    );
    Ok(())
}

/// 使用全局默认上下文哈希密码
pub fn hash(password: &str) -> Result<String> {
    DEFAULT_CONTEXT.hash(password)
}

/// 使用全局默认上下文验证密码
pub fn verify(password: &str, hash: &str) -> Result<bool> {
    DEFAULT_CONTEXT.verify(password, hash)
}

/// 哈希是否应该用全局首选 scheme 重新生成
pub fn needs_update(hash: &str) -> bool {
    DEFAULT_CONTEXT.needs_update(hash)
}

/// 使用全局默认上下文验证并在需要时升级
pub fn verify_and_update(password: &str, hash: &str) -> Result<VerifyOutcome> {
    DEFAULT_CONTEXT.verify_and_update(password, hash)
}
