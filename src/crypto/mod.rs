//! 密码学工具模块
//!
//! 提供 Steam Guard 算法所需的底层原语。
//!
//! ## 功能
//!
//! - **HMAC-SHA1**: 验证码与确认密钥共同使用的消息认证码
//! - **SHA1 十六进制摘要**: 设备 ID 派生使用
//!
//! ## 示例
//!
//! ```rust
//! use steamguard::crypto::{hmac_sha1, sha1_hex};
//!
//! let digest = hmac_sha1(b"key", b"message").unwrap();
//! assert_eq!(digest.len(), 20);
//!
//! let hex = sha1_hex("abc");
//! assert_eq!(hex, "a9993e364706816aba3e25717850c26c9cd0d89d");
//! ```

pub mod mac;

pub use mac::{DIGEST_LENGTH, hmac_sha1, sha1_hex};
