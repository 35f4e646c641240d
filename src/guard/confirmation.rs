//! 移动端交易确认密钥模块
//!
//! 确认密钥是对 `时间 || 标签` 的 HMAC-SHA1 签名，以标准 base64 输出。
//! 时间编码为 8 字节大端整数，标签为空时不追加任何字节。
//!
//! 同一密钥按约定只能使用一次，这一约束由调用方与服务器保证，本模块不做限制。
//!
//! ## 示例
//!
//! ```rust
//! use steamguard::guard::{ConfirmationKeyGenerator, ConfirmationTag, GuardConfig};
//! use steamguard::secret::SteamSecret;
//!
//! let identity = SteamSecret::from_encoded("MTIzNDU2Nzg5MDEyMzQ1Njc4OTA=");
//! let generator = ConfirmationKeyGenerator::new(GuardConfig::default());
//!
//! let key = generator
//!     .generate_key_for(&identity, 1234567890, ConfirmationTag::Conf)
//!     .unwrap();
//! assert_eq!(key, "FE/z8GCX3Zgrr6Pwdqx2FF2/M4U=");
//! ```

use std::fmt;
use std::str::FromStr;

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::crypto::hmac_sha1;
use crate::error::{Error, Result};
use crate::guard::code::GuardConfig;
use crate::guard::current_timestamp;
use crate::secret::SteamSecret;

/// 已知的确认操作标签
///
/// 生成函数把标签当作不透明字节串处理，这里只是常用取值的便捷表示。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfirmationTag {
    /// 加载确认列表页
    Conf,
    /// 加载交易详情
    Details,
    /// 确认交易
    Allow,
    /// 取消交易
    Cancel,
}

impl ConfirmationTag {
    /// 获取标签字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfirmationTag::Conf => "conf",
            ConfirmationTag::Details => "details",
            ConfirmationTag::Allow => "allow",
            ConfirmationTag::Cancel => "cancel",
        }
    }
}

impl fmt::Display for ConfirmationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfirmationTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "conf" => Ok(ConfirmationTag::Conf),
            "details" => Ok(ConfirmationTag::Details),
            "allow" => Ok(ConfirmationTag::Allow),
            "cancel" => Ok(ConfirmationTag::Cancel),
            other => Err(Error::validation(format!(
                "unknown confirmation tag: {}",
                other
            ))),
        }
    }
}

/// 交易确认密钥生成器
#[derive(Debug, Clone, Default)]
pub struct ConfirmationKeyGenerator {
    config: GuardConfig,
}

impl ConfirmationKeyGenerator {
    /// 创建新的生成器
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    /// 生成指定时间与标签的确认密钥
    ///
    /// # 参数
    ///
    /// * `identity_secret` - 身份密钥
    /// * `time` - Unix 时间（秒），通常为当前服务器时间
    /// * `tag` - 操作标签，空字符串表示不带标签
    pub fn generate_key(
        &self,
        identity_secret: &SteamSecret,
        time: u64,
        tag: &str,
    ) -> Result<String> {
        let message = confirmation_message(time, tag);
        let digest = hmac_sha1(identity_secret.as_bytes(), &message)?;
        Ok(STANDARD.encode(digest))
    }

    /// 使用已知标签生成确认密钥
    pub fn generate_key_for(
        &self,
        identity_secret: &SteamSecret,
        time: u64,
        tag: ConfirmationTag,
    ) -> Result<String> {
        self.generate_key(identity_secret, time, tag.as_str())
    }

    /// 以当前时间（加上配置的时钟偏移量）生成确认密钥
    ///
    /// 返回 `(time, key)`，请求确认接口时需要同时提交两者。
    pub fn generate_key_now(
        &self,
        identity_secret: &SteamSecret,
        tag: &str,
    ) -> Result<(u64, String)> {
        let time = self.current_time();
        let key = self.generate_key(identity_secret, time, tag)?;
        Ok((time, key))
    }

    /// 当前服务器时间（本地时间加上时钟偏移量，早于纪元时为 0）
    pub fn current_time(&self) -> u64 {
        let timestamp = current_timestamp().saturating_add(self.config.time_offset);
        u64::try_from(timestamp).unwrap_or(0)
    }

    /// 获取配置
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }
}

/// 构造被签名的消息：8 字节大端时间，非空标签时追加标签的原始字节
///
/// 只有空字符串算作无标签，`"0"` 等其他取值都会原样追加。
pub fn confirmation_message(time: u64, tag: &str) -> Vec<u8> {
    let mut message = Vec::with_capacity(8 + tag.len());
    message.extend_from_slice(&time.to_be_bytes());
    if !tag.is_empty() {
        message.extend_from_slice(tag.as_bytes());
    }
    message
}

/// 便捷函数：生成确认密钥
///
/// # Example
///
/// ```rust
/// use steamguard::get_confirmation_key;
///
/// let key = get_confirmation_key("MTIzNDU2Nzg5MDEyMzQ1Njc4OTA=", 1234567890, "allow").unwrap();
/// assert_eq!(key, "LRhd5JE11D7wbol0Fgf1/sZXq5Q=");
/// ```
pub fn get_confirmation_key(
    identity_secret: impl Into<SteamSecret>,
    time: u64,
    tag: &str,
) -> Result<String> {
    ConfirmationKeyGenerator::default().generate_key(&identity_secret.into(), time, tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> SteamSecret {
        SteamSecret::from_encoded("3132333435363738393031323334353637383930")
    }

    #[test]
    fn test_message_layout() {
        let message = confirmation_message(1234567890, "conf");
        assert_eq!(
            message,
            [0, 0, 0, 0, 0x49, 0x96, 0x02, 0xd2, b'c', b'o', b'n', b'f']
        );

        let message = confirmation_message(1234567890, "");
        assert_eq!(message, [0, 0, 0, 0, 0x49, 0x96, 0x02, 0xd2]);
    }

    #[test]
    fn test_zero_tag_is_not_empty() {
        let message = confirmation_message(1234567890, "0");
        assert_eq!(message, [0, 0, 0, 0, 0x49, 0x96, 0x02, 0xd2, b'0']);
        assert_ne!(
            get_confirmation_key(identity(), 1234567890, "0").unwrap(),
            get_confirmation_key(identity(), 1234567890, "").unwrap()
        );
    }

    #[test]
    fn test_message_uses_full_64_bits() {
        let message = confirmation_message(u64::MAX, "");
        assert_eq!(message, [0xff; 8]);
    }

    #[test]
    fn test_known_keys() {
        let generator = ConfirmationKeyGenerator::default();
        let cases = [
            ("", "SgxoNFNBq9Giz94Ub9+akhYhpX0="),
            ("conf", "FE/z8GCX3Zgrr6Pwdqx2FF2/M4U="),
            ("details", "yUOdKCkYSCnHInRb7XccQYfS01o="),
            ("allow", "LRhd5JE11D7wbol0Fgf1/sZXq5Q="),
            ("cancel", "wtahL3P0+P4rOJqv+0VUVa3w34k="),
        ];
        for (tag, expected) in cases {
            let key = generator.generate_key(&identity(), 1234567890, tag).unwrap();
            assert_eq!(key, expected, "tag {:?}", tag);
        }
    }

    #[test]
    fn test_tag_enum_matches_str() {
        let generator = ConfirmationKeyGenerator::default();
        for tag in [
            ConfirmationTag::Conf,
            ConfirmationTag::Details,
            ConfirmationTag::Allow,
            ConfirmationTag::Cancel,
        ] {
            let by_enum = generator.generate_key_for(&identity(), 1000, tag).unwrap();
            let by_str = generator.generate_key(&identity(), 1000, tag.as_str()).unwrap();
            assert_eq!(by_enum, by_str);
        }
    }

    #[test]
    fn test_tag_from_str() {
        assert_eq!("conf".parse::<ConfirmationTag>().unwrap(), ConfirmationTag::Conf);
        assert_eq!(
            "cancel".parse::<ConfirmationTag>().unwrap(),
            ConfirmationTag::Cancel
        );
        assert!("CONF".parse::<ConfirmationTag>().is_err());
        assert_eq!(ConfirmationTag::Details.to_string(), "details");
    }

    #[test]
    fn test_unknown_tag_is_accepted() {
        let key = get_confirmation_key(identity(), 1234567890, "tradeoffer").unwrap();
        assert_eq!(key.len(), 28);
        assert_ne!(key, get_confirmation_key(identity(), 1234567890, "").unwrap());
    }

    #[test]
    fn test_generate_key_now() {
        let generator = ConfirmationKeyGenerator::default();
        let (time, key) = generator.generate_key_now(&identity(), "conf").unwrap();
        assert_eq!(key, generator.generate_key(&identity(), time, "conf").unwrap());
    }

    #[test]
    fn test_current_time_applies_offset() {
        let ahead = ConfirmationKeyGenerator::new(GuardConfig::new().with_time_offset(3600));
        let plain = ConfirmationKeyGenerator::default();
        let diff = ahead.current_time() - plain.current_time();
        assert!((3599..=3601).contains(&diff));

        let before_epoch =
            ConfirmationKeyGenerator::new(GuardConfig::new().with_time_offset(i64::MIN));
        assert_eq!(before_epoch.current_time(), 0);
    }
}
