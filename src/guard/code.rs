//! Steam Guard 登录验证码模块
//!
//! Steam 的验证码是 RFC 6238 TOTP 的变体：HMAC-SHA1 与动态截断与标准一致，
//! 但截断结果不取十进制，而是映射到 26 个字符的自定义字母表，得到 5 位验证码。
//!
//! ## 特性
//!
//! - 30 秒时间步长，64 位大端计数器
//! - 字母表 `23456789BCDFGHJKMNPQRTVWXY`（去除易混淆字符）
//! - 支持本地时钟偏移量（来自服务器时间同步）
//! - 带时间窗口的常量时间验证
//!
//! ## 示例
//!
//! ```rust
//! use steamguard::guard::{AuthCodeGenerator, GuardConfig};
//! use steamguard::secret::SteamSecret;
//!
//! let secret = SteamSecret::from_encoded("3132333435363738393031323334353637383930");
//! let generator = AuthCodeGenerator::new(GuardConfig::default());
//!
//! // 指定时间生成验证码
//! let code = generator.generate_code_at(&secret, 1234567890).unwrap();
//! assert_eq!(code, "VHHQY");
//!
//! // 生成当前验证码并验证
//! let code = generator.generate_code(&secret).unwrap();
//! assert!(generator.verify(&secret, &code).unwrap());
//! ```

use tracing::debug;

use crate::crypto::{DIGEST_LENGTH, hmac_sha1};
use crate::error::Result;
use crate::guard::current_timestamp;
use crate::secret::SteamSecret;

/// Steam 验证码字母表
pub const CHARSET: &[u8; 26] = b"23456789BCDFGHJKMNPQRTVWXY";

/// 验证码长度
pub const CODE_LENGTH: usize = 5;

/// 时间步长（秒）
pub const TIME_STEP: u64 = 30;

/// Steam Guard 配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// 时间步长（秒），默认 30 秒
    pub time_step: u64,

    /// 验证码长度，默认 5 位
    pub code_length: usize,

    /// 本地时钟相对服务器的偏移量（秒），加到本地时间上得到服务器时间
    pub time_offset: i64,

    /// 验证时允许的时间偏差窗口（前后各多少个时间步）
    pub skew: u64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            time_step: TIME_STEP,
            code_length: CODE_LENGTH,
            time_offset: 0,
            skew: 1,
        }
    }
}

impl GuardConfig {
    /// 创建新的配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置时间步长
    pub fn with_time_step(mut self, seconds: u64) -> Self {
        assert!(seconds > 0, "time step must be positive");
        self.time_step = seconds;
        self
    }

    /// 设置验证码长度
    pub fn with_code_length(mut self, length: usize) -> Self {
        assert!(
            (1..=10).contains(&length),
            "code length must be between 1 and 10"
        );
        self.code_length = length;
        self
    }

    /// 设置时钟偏移量
    pub fn with_time_offset(mut self, seconds: i64) -> Self {
        self.time_offset = seconds;
        self
    }

    /// 设置时间偏差窗口
    pub fn with_skew(mut self, skew: u64) -> Self {
        self.skew = skew;
        self
    }
}

/// 验证结果
#[derive(Debug, Clone)]
pub struct GuardVerifyResult {
    /// 是否验证成功
    pub valid: bool,

    /// 匹配的时间步偏移量（0 表示当前步，负数表示过去，正数表示未来）
    pub time_step_offset: i64,

    /// 验证时使用的时间戳（已包含时钟偏移）
    pub verified_at: i64,
}

/// Steam Guard 验证码生成器
#[derive(Debug, Clone, Default)]
pub struct AuthCodeGenerator {
    config: GuardConfig,
}

impl AuthCodeGenerator {
    /// 创建新的生成器
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    /// 生成当前的验证码（使用配置中的时钟偏移量）
    pub fn generate_code(&self, secret: &SteamSecret) -> Result<String> {
        self.generate_code_with_offset(secret, self.config.time_offset)
    }

    /// 使用指定的时钟偏移量生成当前的验证码
    ///
    /// 偏移量可正可负，不做范围限制。
    pub fn generate_code_with_offset(&self, secret: &SteamSecret, offset: i64) -> Result<String> {
        let timestamp = current_timestamp().saturating_add(offset);
        self.generate_code_at(secret, timestamp)
    }

    /// 生成指定 Unix 时间的验证码
    ///
    /// 早于 Unix 纪元的时间戳向下取整，负计数器以补码形式写入 64 位字段。
    pub fn generate_code_at(&self, secret: &SteamSecret, timestamp: i64) -> Result<String> {
        let counter = self.counter_at(timestamp);
        debug!(timestamp, counter, "generating auth code");
        self.generate_code_for_counter(secret, counter)
    }

    /// 生成指定计数器的验证码
    pub fn generate_code_for_counter(&self, secret: &SteamSecret, counter: u64) -> Result<String> {
        let digest = hmac_sha1(secret.as_bytes(), &counter.to_be_bytes())?;
        let fullcode = dynamic_truncate(&digest);
        Ok(encode_code(fullcode, self.config.code_length))
    }

    /// 验证用户输入的验证码
    pub fn verify(&self, secret: &SteamSecret, code: &str) -> Result<bool> {
        let result = self.verify_with_result(secret, code)?;
        Ok(result.valid)
    }

    /// 验证用户输入的验证码并返回详细结果
    pub fn verify_with_result(
        &self,
        secret: &SteamSecret,
        code: &str,
    ) -> Result<GuardVerifyResult> {
        let timestamp = current_timestamp().saturating_add(self.config.time_offset);
        self.verify_at(secret, code, timestamp)
    }

    /// 以指定 Unix 时间为基准验证验证码
    ///
    /// 输入中的空格和连字符会被忽略，大小写不敏感。
    pub fn verify_at(
        &self,
        secret: &SteamSecret,
        code: &str,
        timestamp: i64,
    ) -> Result<GuardVerifyResult> {
        let normalized_code = code.replace([' ', '-'], "").to_uppercase();
        let rejected = GuardVerifyResult {
            valid: false,
            time_step_offset: 0,
            verified_at: timestamp,
        };

        if normalized_code.len() != self.config.code_length {
            return Ok(rejected);
        }

        let current_counter = self.counter_at(timestamp);
        let skew = i64::try_from(self.config.skew).unwrap_or(i64::MAX);

        for offset in -skew..=skew {
            let check_counter = current_counter.wrapping_add_signed(offset);
            let expected_code = self.generate_code_for_counter(secret, check_counter)?;

            if constant_time_eq(normalized_code.as_bytes(), expected_code.as_bytes()) {
                return Ok(GuardVerifyResult {
                    valid: true,
                    time_step_offset: offset,
                    verified_at: timestamp,
                });
            }
        }

        Ok(rejected)
    }

    /// 获取当前验证码的剩余有效时间（秒）
    pub fn time_remaining(&self) -> u64 {
        let timestamp = current_timestamp().saturating_add(self.config.time_offset);
        self.time_remaining_at(timestamp)
    }

    /// 获取指定时间下验证码的剩余有效时间（秒），范围 1..=time_step
    pub fn time_remaining_at(&self, timestamp: i64) -> u64 {
        let step = self.config.time_step;
        let elapsed = (i128::from(timestamp)).rem_euclid(i128::from(step)) as u64;
        step - elapsed
    }

    /// 计算指定时间的计数器
    ///
    /// 计数器为 `floor(timestamp / time_step)`，负值按补码转换为 `u64`。
    pub fn counter_at(&self, timestamp: i64) -> u64 {
        let counter = i128::from(timestamp).div_euclid(i128::from(self.config.time_step));
        // |counter| <= |timestamp|，截断到 i64 不会丢失数值
        counter as i64 as u64
    }

    /// 获取配置
    pub fn config(&self) -> &GuardConfig {
        &self.config
    }
}

/// 动态截断：以摘要最后一个字节的低 4 位为偏移，读取 4 字节大端整数并清除最高位
pub fn dynamic_truncate(digest: &[u8; DIGEST_LENGTH]) -> u32 {
    let start = (digest[DIGEST_LENGTH - 1] & 0x0f) as usize;
    let window = [
        digest[start],
        digest[start + 1],
        digest[start + 2],
        digest[start + 3],
    ];
    u32::from_be_bytes(window) & 0x7fff_ffff
}

/// 把截断值映射为验证码字符串，最低位的字符在前
pub fn encode_code(mut fullcode: u32, length: usize) -> String {
    let base = CHARSET.len() as u32;
    let mut code = String::with_capacity(length);
    for _ in 0..length {
        code.push(CHARSET[(fullcode % base) as usize] as char);
        fullcode /= base;
    }
    code
}

/// 便捷函数：使用时钟偏移量生成当前的验证码
///
/// # Example
///
/// ```rust
/// use steamguard::get_auth_code;
///
/// let code = get_auth_code("MTIzNDU2Nzg5MDEyMzQ1Njc4OTA=", 0).unwrap();
/// assert_eq!(code.len(), 5);
/// ```
pub fn get_auth_code(shared_secret: impl Into<SteamSecret>, time_offset: i64) -> Result<String> {
    AuthCodeGenerator::default().generate_code_with_offset(&shared_secret.into(), time_offset)
}

/// 便捷函数：生成指定 Unix 时间的验证码
pub fn get_auth_code_at(shared_secret: impl Into<SteamSecret>, timestamp: i64) -> Result<String> {
    AuthCodeGenerator::default().generate_code_at(&shared_secret.into(), timestamp)
}

/// 常量时间字符串比较
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    use subtle::ConstantTimeEq;
    a.ct_eq(b).into()
}
