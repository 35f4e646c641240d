//! Steam Guard 模块
//!
//! 提供 Steam 两步验证相关的生成功能。
//!
//! ## 支持的功能
//!
//! - **登录验证码**: 5 位字母数字验证码（Steam 手机令牌兼容）
//! - **交易确认密钥**: 移动端交易确认使用的 base64 签名
//!
//! ## 验证码示例
//!
//! ```rust
//! use steamguard::guard::{AuthCodeGenerator, GuardConfig};
//! use steamguard::secret::SteamSecret;
//!
//! // 使用服务器时间偏移量创建生成器
//! let config = GuardConfig::default().with_time_offset(0);
//! let generator = AuthCodeGenerator::new(config);
//!
//! let secret = SteamSecret::from_encoded("MTIzNDU2Nzg5MDEyMzQ1Njc4OTA=");
//! let code = generator.generate_code(&secret).unwrap();
//! println!("验证码: {} （剩余 {} 秒）", code, generator.time_remaining());
//! ```
//!
//! ## 确认密钥示例
//!
//! ```rust
//! use steamguard::guard::{ConfirmationKeyGenerator, GuardConfig};
//! use steamguard::secret::SteamSecret;
//!
//! let generator = ConfirmationKeyGenerator::new(GuardConfig::default());
//! let identity = SteamSecret::from_encoded("MTIzNDU2Nzg5MDEyMzQ1Njc4OTA=");
//!
//! let (time, key) = generator.generate_key_now(&identity, "conf").unwrap();
//! assert_eq!(key.len(), 28);
//! # let _ = time;
//! ```

use chrono::Utc;

pub mod code;
pub mod confirmation;

pub use code::{
    AuthCodeGenerator, CHARSET, CODE_LENGTH, GuardConfig, GuardVerifyResult, TIME_STEP,
    get_auth_code, get_auth_code_at,
};
pub use confirmation::{
    ConfirmationKeyGenerator, ConfirmationTag, confirmation_message, get_confirmation_key,
};

/// 获取当前 Unix 时间戳（秒）
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp()
}
