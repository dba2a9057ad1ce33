//! 哈希上下文
//!
//! [`Context`] 持有调用方当前的 scheme 偏好列表：
//!
//! - 新密码总是用列表中的第一个 scheme 哈希；
//! - 验证时按顺序询问每个 scheme 是否认领该哈希，交给第一个认领者验证；
//! - 哈希不是由第一个 scheme 生成，或参数弱于当前默认值时，建议升级。
//!
//! 偏好列表可以随时整体替换（例如重新加载策略）。替换是原子的：
//! 并发的 hash/verify 只会看到替换前或替换后的完整列表。
//!
//! ## 示例
//!
//! ```rust
//! use passlib::{Context, VerifyOutcome};
//! use passlib::scheme::{BcryptScheme, Pbkdf2Digest, Pbkdf2Scheme, SchemeRef};
//!
//! static FAST_BCRYPT: BcryptScheme = BcryptScheme::with_cost(4);
//! static FAST_PBKDF2: Pbkdf2Scheme = Pbkdf2Scheme::with_rounds(Pbkdf2Digest::Sha256, 1_000);
//!
//! let ctx = Context::new(&[&FAST_PBKDF2 as SchemeRef, &FAST_BCRYPT]).unwrap();
//! let stored = ctx.hash("s3cret").unwrap();
//! assert!(ctx.verify("s3cret", &stored).unwrap());
//!
//! // 策略变更：bcrypt 成为首选
//! ctx.set_schemes(&[&FAST_BCRYPT as SchemeRef, &FAST_PBKDF2]).unwrap();
//! assert!(ctx.needs_update(&stored));
//!
//! match ctx.verify_and_update("s3cret", &stored).unwrap() {
//!     VerifyOutcome::Upgraded(new_hash) => assert!(new_hash.starts_with("$2b$")),
//!     other => panic!("unexpected outcome: {:?}", other),
//! }
//! ```

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::config::ContextConfig;
use crate::defaults;
use crate::error::{Error, Result};
use crate::registry;
use crate::scheme::SchemeRef;

/// [`Context::verify_and_update`] 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// 密码错误
    Invalid,
    /// 密码正确，哈希无需升级
    Valid,
    /// 密码正确，并已用首选 scheme 重新哈希；调用方应持久化新哈希
    Upgraded(String),
}

impl VerifyOutcome {
    /// 密码是否正确
    pub fn is_valid(&self) -> bool {
        !matches!(self, VerifyOutcome::Invalid)
    }

    /// 升级后的新哈希（如果有）
    pub fn new_hash(&self) -> Option<&str> {
        match self {
            VerifyOutcome::Upgraded(hash) => Some(hash),
            _ => None,
        }
    }
}

/// 非空的 scheme 偏好列表快照
type Schemes = Arc<[SchemeRef]>;

/// 哈希上下文
///
/// 可以在线程间共享（`&Context` 或 `Arc<Context>`）。
pub struct Context {
    schemes: RwLock<Schemes>,
}

impl Context {
    /// 使用显式的 scheme 列表创建
    ///
    /// 列表会被复制，调用方之后对原切片的修改不影响上下文。
    ///
    /// # Errors
    ///
    /// 列表为空时返回 [`Error::EmptySchemeList`]
    pub fn new(schemes: &[SchemeRef]) -> Result<Self> {
        Ok(Self::from_snapshot(snapshot_of(schemes)?))
    }

    /// 使用 epoch 标识（`YYYYMMDD` 或 `"latest"`）创建
    ///
    /// ```rust
    /// use passlib::{Context, defaults::DEFAULTS_20180601};
    ///
    /// let ctx = Context::from_epoch(DEFAULTS_20180601).unwrap();
    /// assert_eq!(ctx.default_scheme().name(), "argon2");
    /// ```
    pub fn from_epoch(identifier: &str) -> Result<Self> {
        Self::new(defaults::resolve_epoch(identifier)?)
    }

    /// 使用 scheme 名称列表创建
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        Self::new(&registry::lookup_all(names)?)
    }

    /// 使用配置创建
    pub fn from_config(config: &ContextConfig) -> Result<Self> {
        Self::new(&config.resolve()?)
    }

    fn from_snapshot(schemes: Schemes) -> Self {
        Self {
            schemes: RwLock::new(schemes),
        }
    }

    /// 当前偏好列表的快照
    pub fn schemes(&self) -> Vec<SchemeRef> {
        self.snapshot().to_vec()
    }

    /// 用于新哈希的 scheme
    pub fn default_scheme(&self) -> SchemeRef {
        self.snapshot()[0]
    }

    /// 原子地整体替换偏好列表
    ///
    /// # Errors
    ///
    /// 列表为空时返回 [`Error::EmptySchemeList`]，原列表保持不变
    pub fn set_schemes(&self, schemes: &[SchemeRef]) -> Result<()> {
        let snapshot = snapshot_of(schemes)?;
        *self.schemes.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
        Ok(())
    }

    /// 用 epoch 对应的列表替换偏好列表
    pub fn use_defaults(&self, identifier: &str) -> Result<()> {
        self.set_schemes(defaults::resolve_epoch(identifier)?)
    }

    /// 用名称列表替换偏好列表
    pub fn use_scheme_names<S: AsRef<str>>(&self, names: &[S]) -> Result<()> {
        self.set_schemes(&registry::lookup_all(names)?)
    }

    fn snapshot(&self) -> Schemes {
        // 锁内只做 Arc 替换，不会留下半更新状态，中毒时可直接取值
        self.schemes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 使用首选 scheme 哈希密码
    pub fn hash(&self, password: &str) -> Result<String> {
        hash_with(&self.snapshot(), password)
    }

    /// 找到认领该哈希的 scheme（按偏好顺序的第一个）
    pub fn identify(&self, hash: &str) -> Option<SchemeRef> {
        identify_in(&self.snapshot(), hash).map(|(_, scheme)| scheme)
    }

    /// 验证密码
    ///
    /// 密码正确返回 `Ok(true)`，密码错误返回 `Ok(false)`。
    ///
    /// # Errors
    ///
    /// 当前列表中没有 scheme 认领该哈希时返回 [`Error::UnrecognizedHash`]，
    /// 即使该哈希属于注册表中的其他 scheme。
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let (_, scheme) =
            identify_in(&self.snapshot(), hash).ok_or(Error::UnrecognizedHash)?;
        let ok = scheme.verify(password, hash)?;
        debug!(scheme = scheme.name(), ok, "password verified");
        Ok(ok)
    }

    /// 哈希是否应该用首选 scheme 重新生成
    ///
    /// 无法识别的哈希返回 `false`：它无法被验证，也就无从升级。
    pub fn needs_update(&self, hash: &str) -> bool {
        needs_update_in(&self.snapshot(), hash)
    }

    /// 验证密码，并在需要时用首选 scheme 重新哈希
    ///
    /// 整个过程使用同一个列表快照。本库不做任何持久化，
    /// [`VerifyOutcome::Upgraded`] 中的新哈希需要调用方保存。
    pub fn verify_and_update(&self, password: &str, hash: &str) -> Result<VerifyOutcome> {
        let schemes = self.snapshot();
        let (_, scheme) = identify_in(&schemes, hash).ok_or(Error::UnrecognizedHash)?;

        if !scheme.verify(password, hash)? {
            return Ok(VerifyOutcome::Invalid);
        }
        if !needs_update_in(&schemes, hash) {
            return Ok(VerifyOutcome::Valid);
        }

        let new_hash = hash_with(&schemes, password)?;
        debug!(
            from = scheme.name(),
            to = schemes[0].name(),
            "password hash upgraded"
        );
        Ok(VerifyOutcome::Upgraded(new_hash))
    }
}

fn snapshot_of(schemes: &[SchemeRef]) -> Result<Schemes> {
    if schemes.is_empty() {
        return Err(Error::EmptySchemeList);
    }
    Ok(Arc::from(schemes))
}

fn hash_with(schemes: &[SchemeRef], password: &str) -> Result<String> {
    let scheme = schemes.first().ok_or(Error::EmptySchemeList)?;
    scheme.hash(password)
}

fn identify_in(schemes: &[SchemeRef], hash: &str) -> Option<(usize, SchemeRef)> {
    schemes
        .iter()
        .copied()
        .enumerate()
        .find(|(_, scheme)| scheme.identify(hash))
}

fn needs_update_in(schemes: &[SchemeRef], hash: &str) -> bool {
    match identify_in(schemes, hash) {
        Some((0, scheme)) => scheme.needs_update(hash),
        Some((_, scheme)) => {
            debug!(scheme = scheme.name(), "hash not produced by preferred scheme");
            true
        }
        None => false,
    }
}

impl Default for Context {
    /// 最旧 epoch 的默认值
    fn default() -> Self {
        Self::from_snapshot(Arc::from(defaults::oldest().schemes()))
    }
}

impl Clone for Context {
    /// 得到持有相同快照的独立上下文
    fn clone(&self) -> Self {
        Self::from_snapshot(self.snapshot())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field(
                "schemes",
                &self.snapshot().iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
