//! 共享密钥规范化模块
//!
//! Steam 下发的 `shared_secret` / `identity_secret` 通常是 base64 字符串，
//! 但调用方手头的形式各不相同：十六进制文本、base64 文本或已经解码的原始字节。
//! 本模块把这三种形式统一转换为 HMAC 使用的原始字节。
//!
//! ## 识别规则（按顺序）
//!
//! 1. 输入中**任意位置**出现连续 40 个十六进制字符时按十六进制解码
//! 2. 输入整体是合法的标准 base64（含规范填充）时按 base64 解码
//! 3. 否则原样作为原始字节使用
//!
//! 规范化永远不会失败：无法识别的输入会直接作为密钥参与 HMAC 计算。
//!
//! ## 示例
//!
//! ```rust
//! use steamguard::secret::{SecretEncoding, SteamSecret, normalize_secret};
//!
//! let from_hex = normalize_secret("3132333435363738393031323334353637383930");
//! let from_b64 = normalize_secret("MTIzNDU2Nzg5MDEyMzQ1Njc4OTA=");
//! assert_eq!(from_hex, b"12345678901234567890");
//! assert_eq!(from_hex, from_b64);
//!
//! let secret = SteamSecret::from_encoded("MTIzNDU2Nzg5MDEyMzQ1Njc4OTA=");
//! assert_eq!(secret.encoding(), SecretEncoding::Base64);
//! assert_eq!(secret.len(), 20);
//! ```

use std::fmt;

use base64::{
    Engine,
    alphabet,
    engine::{GeneralPurpose, GeneralPurposeConfig},
};
use tracing::debug;

/// 触发十六进制解码所需的连续十六进制字符数
pub const HEX_SECRET_LENGTH: usize = 40;

/// 标准 base64 字母表，要求规范填充，但容忍末尾多余的比特位
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// 识别出的密钥编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretEncoding {
    /// 十六进制文本
    Hex,
    /// 标准 base64 文本
    Base64,
    /// 原始字节
    Raw,
}

impl SecretEncoding {
    /// 获取编码名称
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretEncoding::Hex => "hex",
            SecretEncoding::Base64 => "base64",
            SecretEncoding::Raw => "raw",
        }
    }
}

impl fmt::Display for SecretEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 规范化后的 Steam 密钥
///
/// `Debug` 输出只包含编码和长度，不会泄露密钥内容。
#[derive(Clone, PartialEq, Eq)]
pub struct SteamSecret {
    raw: Vec<u8>,
    encoding: SecretEncoding,
}

impl SteamSecret {
    /// 从任意编码的输入创建，自动识别十六进制 / base64 / 原始字节
    pub fn from_encoded(input: impl AsRef<[u8]>) -> Self {
        let (raw, encoding) = decode(input.as_ref());
        Self { raw, encoding }
    }

    /// 直接使用原始字节，不做任何编码识别
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            raw: bytes,
            encoding: SecretEncoding::Raw,
        }
    }

    /// 获取原始密钥字节
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// 创建时识别出的编码
    pub fn encoding(&self) -> SecretEncoding {
        self.encoding
    }

    /// 密钥长度（字节）
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// 密钥是否为空
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl fmt::Debug for SteamSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SteamSecret")
            .field("encoding", &self.encoding)
            .field("len", &self.raw.len())
            .finish_non_exhaustive()
    }
}

impl AsRef<[u8]> for SteamSecret {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}

impl From<&str> for SteamSecret {
    fn from(value: &str) -> Self {
        Self::from_encoded(value)
    }
}

impl From<String> for SteamSecret {
    fn from(value: String) -> Self {
        Self::from_encoded(value)
    }
}

impl From<&String> for SteamSecret {
    fn from(value: &String) -> Self {
        Self::from_encoded(value)
    }
}

impl From<&[u8]> for SteamSecret {
    fn from(value: &[u8]) -> Self {
        Self::from_encoded(value)
    }
}

impl From<Vec<u8>> for SteamSecret {
    fn from(value: Vec<u8>) -> Self {
        Self::from_encoded(value)
    }
}

impl From<&SteamSecret> for SteamSecret {
    fn from(value: &SteamSecret) -> Self {
        value.clone()
    }
}

/// 把任意编码的密钥转换为原始字节
///
/// # Example
///
/// ```rust
/// use steamguard::secret::normalize_secret;
///
/// // 无法识别的输入原样返回
/// assert_eq!(normalize_secret("not a secret!"), b"not a secret!");
/// ```
pub fn normalize_secret(input: impl AsRef<[u8]>) -> Vec<u8> {
    decode(input.as_ref()).0
}

/// 识别输入的编码，不做解码
pub fn detect_encoding(input: impl AsRef<[u8]>) -> SecretEncoding {
    decode(input.as_ref()).1
}

fn decode(input: &[u8]) -> (Vec<u8>, SecretEncoding) {
    if let Some(raw) = decode_hex(input) {
        debug!(len = raw.len(), "secret decoded as hex");
        return (raw, SecretEncoding::Hex);
    }

    if !input.is_empty() {
        if let Ok(raw) = LENIENT_STANDARD.decode(input) {
            debug!(len = raw.len(), "secret decoded as base64");
            return (raw, SecretEncoding::Base64);
        }
    }

    debug!(len = input.len(), "secret used as raw bytes");
    (input.to_vec(), SecretEncoding::Raw)
}

/// 整体为十六进制时解码整个输入，否则只解码第一段 40 字符的十六进制串
///
/// 奇数长度时最后一个半字节补 0，即 `abc` 解码为 `[0xab, 0xc0]`。
fn decode_hex(input: &[u8]) -> Option<Vec<u8>> {
    let start = find_hex_run(input)?;

    if input.iter().all(u8::is_ascii_hexdigit) {
        if input.len() % 2 == 0 {
            return hex::decode(input).ok();
        }
        let mut padded = input.to_vec();
        padded.push(b'0');
        return hex::decode(padded).ok();
    }

    hex::decode(&input[start..start + HEX_SECRET_LENGTH]).ok()
}

fn find_hex_run(input: &[u8]) -> Option<usize> {
    let mut run = 0;
    for (i, byte) in input.iter().enumerate() {
        if byte.is_ascii_hexdigit() {
            run += 1;
            if run == HEX_SECRET_LENGTH {
                return Some(i + 1 - HEX_SECRET_LENGTH);
            }
        } else {
            run = 0;
        }
    }
    None
}
