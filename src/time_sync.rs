//! 服务器时间同步模块
//!
//! 向 Steam 的 `ITwoFactorService/QueryTime` 接口查询服务器时间，
//! 计算本地时钟相对服务器的偏移量。偏移量表示本地时间**落后**服务器多少秒，
//! 可以直接传给 [`get_auth_code`](crate::get_auth_code) 或
//! [`GuardConfig::with_time_offset`](crate::guard::GuardConfig::with_time_offset)。
//!
//! 所有失败（网络错误、非成功状态码、非 JSON 响应、缺少字段）
//! 都会被折叠为 `None`，调用方应回退到 0 偏移量。
//!
//! ## 示例
//!
//! ```rust,no_run
//! use steamguard::time_sync::{TimeSync, TimeSyncConfig, query_time_offset};
//! use std::time::Duration;
//!
//! // 使用默认配置
//! let offset = query_time_offset().unwrap_or(0);
//!
//! // 自定义超时
//! let sync = TimeSync::new(TimeSyncConfig::default().with_timeout(Duration::from_secs(3))).unwrap();
//! let offset = sync.query_offset().unwrap_or(0);
//! ```

use std::time::Duration;

use reqwest::{Url, blocking::Client, header::CONTENT_LENGTH};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, Error, Result, TimeSyncError};
use crate::guard::current_timestamp;

/// Steam 服务器时间查询接口
pub const QUERY_TIME_URL: &str = "http://api.steampowered.com/ITwoFactorService/QueryTime/v1/";

/// 默认请求超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// 时间同步配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSyncConfig {
    /// 查询接口地址
    pub endpoint: String,

    /// 请求超时
    pub timeout: Duration,
}

impl Default for TimeSyncConfig {
    fn default() -> Self {
        Self {
            endpoint: QUERY_TIME_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TimeSyncConfig {
    /// 创建新的配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置查询接口地址
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// 设置请求超时
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct QueryTimeEnvelope {
    response: Option<QueryTimeResponse>,
}

#[derive(Debug, Deserialize)]
struct QueryTimeResponse {
    server_time: Option<Value>,
}

/// 服务器时间同步客户端
#[derive(Debug, Clone)]
pub struct TimeSync {
    config: TimeSyncConfig,
    client: Client,
}

impl TimeSync {
    /// 创建新的时间同步客户端
    ///
    /// 接口地址为空或无法解析时返回配置错误。
    pub fn new(config: TimeSyncConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingRequired("endpoint".to_string()).into());
        }
        Url::parse(&config.endpoint).map_err(|e| ConfigError::InvalidValue {
            key: "endpoint".to_string(),
            message: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// 查询服务器时间并返回本地时钟偏移量，失败时返回 `None`
    pub fn query_offset(&self) -> Option<i64> {
        match self.fetch_server_time() {
            Ok(server_time) => {
                let Some(offset) = server_time.checked_sub(current_timestamp()) else {
                    warn!(server_time, endpoint = %self.config.endpoint, "server time out of range");
                    return None;
                };
                info!(server_time, offset, "synchronized with server time");
                Some(offset)
            }
            Err(e) => {
                warn!(error = %e, endpoint = %self.config.endpoint, "server time unavailable");
                None
            }
        }
    }

    /// 查询服务器时间（Unix 秒），保留具体的失败原因
    pub fn fetch_server_time(&self) -> Result<i64> {
        debug!(endpoint = %self.config.endpoint, "querying server time");

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(CONTENT_LENGTH, "0")
            .send()
            .map_err(|e| TimeSyncError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TimeSyncError::Status(status.as_u16()).into());
        }

        let body = response
            .text()
            .map_err(|e| TimeSyncError::Transport(e.to_string()))?;

        parse_server_time(&body)
    }

    /// 获取配置
    pub fn config(&self) -> &TimeSyncConfig {
        &self.config
    }
}

/// 从 QueryTime 响应体中解析 `response.server_time`
///
/// 字段可以是 JSON 数字，也可以是数字字符串（Steam 实际返回字符串）。
/// 负值不是合法的服务器时间，按无效响应处理。
///
/// # Example
///
/// ```rust
/// use steamguard::time_sync::parse_server_time;
///
/// let body = r#"{"response":{"server_time":"1700000000","skew_tolerance_seconds":"60"}}"#;
/// assert_eq!(parse_server_time(body).unwrap(), 1700000000);
/// ```
pub fn parse_server_time(body: &str) -> Result<i64> {
    let envelope: QueryTimeEnvelope =
        serde_json::from_str(body).map_err(|e| TimeSyncError::InvalidBody(e.to_string()))?;

    let value = envelope
        .response
        .and_then(|response| response.server_time)
        .ok_or_else(|| TimeSyncError::MissingField("response.server_time".to_string()))?;

    let server_time = match &value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    match server_time {
        Some(time) if time >= 0 => Ok(time),
        Some(time) => {
            Err(TimeSyncError::InvalidBody(format!("server_time out of range: {}", time)).into())
        }
        None => Err(TimeSyncError::InvalidBody(format!(
            "server_time is not numeric: {}",
            value
        ))
        .into()),
    }
}

/// 便捷函数：使用默认配置查询本地时钟偏移量
pub fn query_time_offset() -> Option<i64> {
    match TimeSync::new(TimeSyncConfig::default()) {
        Ok(sync) => sync.query_offset(),
        Err(e) => {
            warn!(error = %e, "failed to create time sync client");
            None
        }
    }
}
