//! 统一错误类型模块
//!
//! 提供 steamguard 库中所有操作的错误类型定义。
//!
//! 验证码与确认密钥的生成在实际使用中不会失败（HMAC 接受任意长度的密钥），
//! 唯一真正可观察到的失败来自服务器时间同步。

use std::fmt;

/// steamguard 库的统一结果类型
pub type Result<T> = std::result::Result<T, Error>;

/// steamguard 库的错误类型
#[derive(Debug)]
pub enum Error {
    /// 验证错误
    Validation(String),

    /// 配置错误
    Config(ConfigError),

    /// 加密错误
    Crypto(CryptoError),

    /// 时间同步错误
    TimeSync(TimeSyncError),

    /// 内部错误
    Internal(String),
}

impl Error {
    /// 创建一个内部错误
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// 创建一个验证错误
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// 创建一个时间同步错误
    pub fn time_sync(err: TimeSyncError) -> Self {
        Error::TimeSync(err)
    }
}

/// 配置相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 缺少必需的配置
    MissingRequired(String),
    /// 无效的配置值
    InvalidValue { key: String, message: String },
}

/// 加密相关错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// 密钥无效
    InvalidKey(String),
}

/// 服务器时间同步相关错误
///
/// 对外的 [`query_time_offset`](crate::time_sync::query_time_offset)
/// 会把这些错误统一折叠为 `None`。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeSyncError {
    /// 网络传输失败（连接、超时等）
    Transport(String),
    /// 服务器返回非成功状态码
    Status(u16),
    /// 响应体不是合法 JSON
    InvalidBody(String),
    /// 响应中缺少必需字段
    MissingField(String),
}

// ============================================================================
// Display 实现
// ============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(msg) => write!(f, "Validation error: {}", msg),
            Error::Config(e) => write!(f, "Config error: {}", e),
            Error::Crypto(e) => write!(f, "Crypto error: {}", e),
            Error::TimeSync(e) => write!(f, "Time sync error: {}", e),
            Error::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingRequired(key) => {
                write!(f, "missing required configuration: {}", key)
            }
            ConfigError::InvalidValue { key, message } => {
                write!(f, "invalid configuration value for '{}': {}", key, message)
            }
        }
    }
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::InvalidKey(msg) => write!(f, "invalid key: {}", msg),
        }
    }
}

impl fmt::Display for TimeSyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeSyncError::Transport(msg) => write!(f, "request failed: {}", msg),
            TimeSyncError::Status(code) => write!(f, "unexpected HTTP status {}", code),
            TimeSyncError::InvalidBody(msg) => write!(f, "invalid response body: {}", msg),
            TimeSyncError::MissingField(field) => {
                write!(f, "missing field in response: {}", field)
            }
        }
    }
}

// ============================================================================
// std::error::Error 实现
// ============================================================================

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
            Error::Crypto(e) => Some(e),
            Error::TimeSync(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for CryptoError {}
impl std::error::Error for TimeSyncError {}

// ============================================================================
// From 实现 - 方便错误转换
// ============================================================================

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<CryptoError> for Error {
    fn from(err: CryptoError) -> Self {
        Error::Crypto(err)
    }
}

impl From<TimeSyncError> for Error {
    fn from(err: TimeSyncError) -> Self {
        Error::TimeSync(err)
    }
}

impl From<hmac::digest::InvalidLength> for Error {
    fn from(err: hmac::digest::InvalidLength) -> Self {
        Error::Crypto(CryptoError::InvalidKey(err.to_string()))
    }
}
