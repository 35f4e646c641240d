//! HMAC-SHA1 与 SHA1 摘要
//!
//! Steam 的验证码与确认密钥都建立在 HMAC-SHA1 之上，
//! 设备 ID 则是账号 ID 的 SHA1 十六进制摘要。

use hmac::{Hmac, Mac};
use sha1::{Digest, Sha1};

use crate::error::Result;

type HmacSha1 = Hmac<Sha1>;

/// SHA1 / HMAC-SHA1 的输出长度（字节）
pub const DIGEST_LENGTH: usize = 20;

/// 计算 HMAC-SHA1
///
/// 密钥可以是任意长度（包括空密钥），超过块大小的密钥会先被哈希。
///
/// # Arguments
///
/// * `key` - HMAC 密钥
/// * `message` - 要认证的消息
///
/// # Returns
///
/// 返回 20 字节的摘要
pub fn hmac_sha1(key: &[u8], message: &[u8]) -> Result<[u8; DIGEST_LENGTH]> {
    let mut mac = HmacSha1::new_from_slice(key)?;
    mac.update(message);
    let mut digest = [0u8; DIGEST_LENGTH];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    Ok(digest)
}

/// 计算 SHA1 并返回 40 个字符的小写十六进制字符串
pub fn sha1_hex(data: impl AsRef<[u8]>) -> String {
    hex::encode(Sha1::digest(data.as_ref()))
}
