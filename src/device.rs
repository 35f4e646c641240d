//! 设备 ID 派生模块
//!
//! Steam 手机令牌在登录与确认请求中携带一个设备 ID。
//! 这里使用与官方客户端兼容的确定性派生方式：
//! 对 64 位 SteamID 的十进制字符串做 SHA1，取前 32 个十六进制字符，
//! 按 `8-4-4-4-12` 分组并加上 `android:` 前缀。
//!
//! ## 示例
//!
//! ```rust
//! use steamguard::device::get_device_id;
//!
//! let id = get_device_id("76561197960287930");
//! assert_eq!(id, "android:6d3f10d9-6369-a1ae-97a0-94df28b95192");
//!
//! // 数字形式与字符串形式等价
//! assert_eq!(get_device_id(76561197960287930u64), id);
//! ```

use std::fmt;

use crate::crypto::sha1_hex;

/// 设备 ID 前缀
pub const DEVICE_ID_PREFIX: &str = "android:";

/// 账号标识，可以是文本或 64 位 SteamID
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccountId {
    /// 文本形式，按原样参与哈希
    Text(String),
    /// 数字形式，以十进制字符串参与哈希
    SteamId(u64),
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountId::Text(text) => f.write_str(text),
            AccountId::SteamId(id) => write!(f, "{}", id),
        }
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        AccountId::Text(value.to_string())
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        AccountId::Text(value)
    }
}

impl From<&String> for AccountId {
    fn from(value: &String) -> Self {
        AccountId::Text(value.clone())
    }
}

impl From<u64> for AccountId {
    fn from(value: u64) -> Self {
        AccountId::SteamId(value)
    }
}

/// 派生设备 ID
pub fn get_device_id(account_id: impl Into<AccountId>) -> String {
    let hash = sha1_hex(account_id.into().to_string());
    format!(
        "{}{}-{}-{}-{}-{}",
        DEVICE_ID_PREFIX,
        &hash[0..8],
        &hash[8..12],
        &hash[12..16],
        &hash[16..20],
        &hash[20..32]
    )
}
