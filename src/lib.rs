//! # steamguard
//!
//! Steam Guard 兼容的两步验证工具库。
//!
//! ## 功能特性
//!
//! - **登录验证码**: 生成 Steam 手机令牌兼容的 5 位验证码
//! - **交易确认密钥**: 生成移动端交易确认使用的 base64 签名
//! - **设备 ID**: 从 SteamID 派生稳定的 `android:` 设备标识
//! - **密钥规范化**: 自动识别十六进制、base64 或原始字节形式的密钥
//! - **时间同步**: 查询 Steam 服务器时间，计算本地时钟偏移量
//!
//! ## Features
//!
//! - `time-sync` - 启用服务器时间同步（默认启用，依赖 `reqwest`）
//! - `full` - 启用所有功能
//!
//! ## 验证码示例
//!
//! ```rust
//! use steamguard::{get_auth_code, get_auth_code_at};
//!
//! // 十六进制与 base64 形式的同一密钥得到相同结果
//! let from_hex = get_auth_code_at("3132333435363738393031323334353637383930", 1234567890).unwrap();
//! let from_b64 = get_auth_code_at("MTIzNDU2Nzg5MDEyMzQ1Njc4OTA=", 1234567890).unwrap();
//! assert_eq!(from_hex, "VHHQY");
//! assert_eq!(from_hex, from_b64);
//!
//! // 生成当前验证码，第二个参数为时钟偏移量（秒）
//! let code = get_auth_code("MTIzNDU2Nzg5MDEyMzQ1Njc4OTA=", 0).unwrap();
//! assert_eq!(code.len(), 5);
//! ```
//!
//! ## 确认密钥示例
//!
//! ```rust
//! use steamguard::get_confirmation_key;
//!
//! let key = get_confirmation_key("MTIzNDU2Nzg5MDEyMzQ1Njc4OTA=", 1234567890, "conf").unwrap();
//! assert_eq!(key, "FE/z8GCX3Zgrr6Pwdqx2FF2/M4U=");
//! ```
//!
//! ## 设备 ID 示例
//!
//! ```rust
//! use steamguard::get_device_id;
//!
//! let device_id = get_device_id(76561197960287930u64);
//! assert!(device_id.starts_with("android:"));
//! ```

pub mod crypto;
pub mod device;
pub mod error;
pub mod guard;
pub mod secret;
#[cfg(feature = "time-sync")]
pub mod time_sync;

pub use error::{Error, Result};

// ============================================================================
// 密钥相关导出
// ============================================================================

pub use secret::{SecretEncoding, SteamSecret, normalize_secret};

// ============================================================================
// Steam Guard 相关导出
// ============================================================================

pub use guard::{
    AuthCodeGenerator, ConfirmationKeyGenerator, ConfirmationTag, GuardConfig, get_auth_code,
    get_auth_code_at, get_confirmation_key,
};

// ============================================================================
// 设备 ID 相关导出
// ============================================================================

pub use device::{AccountId, get_device_id};

// ============================================================================
// 时间同步相关导出
// ============================================================================

#[cfg(feature = "time-sync")]
pub use time_sync::{TimeSync, TimeSyncConfig, query_time_offset};
