//! Steam Guard 命令行示例
//!
//! 展示如何同步服务器时间、生成登录验证码、确认密钥和设备 ID。
//!
//! 运行: cargo run --example steam_guard -- <shared_secret> [identity_secret] [steamid]
//!
//! 设置 `RUST_LOG=debug` 可以查看密钥识别与计数器的调试日志。

use std::env;
use std::process::exit;

use steamguard::guard::{AuthCodeGenerator, ConfirmationKeyGenerator, ConfirmationTag, GuardConfig};
use steamguard::secret::SteamSecret;
use steamguard::{get_device_id, query_time_offset};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(shared_secret) = args.first() else {
        eprintln!("用法: steam_guard <shared_secret> [identity_secret] [steamid]");
        exit(1);
    };

    // 1. 同步服务器时间，失败时使用 0 偏移量
    let offset = query_time_offset().unwrap_or(0);
    println!("时钟偏移: {} 秒", offset);

    let config = GuardConfig::default().with_time_offset(offset);

    // 2. 登录验证码
    let generator = AuthCodeGenerator::new(config.clone());
    let secret = SteamSecret::from_encoded(shared_secret);
    match generator.generate_code(&secret) {
        Ok(code) => println!(
            "验证码: {} （{} 密钥，剩余 {} 秒）",
            code,
            secret.encoding(),
            generator.time_remaining()
        ),
        Err(e) => {
            eprintln!("验证码生成失败: {}", e);
            exit(1);
        }
    }

    // 3. 交易确认密钥
    if let Some(identity_secret) = args.get(1) {
        let confirmations = ConfirmationKeyGenerator::new(config);
        let identity = SteamSecret::from_encoded(identity_secret);
        for tag in [ConfirmationTag::Conf, ConfirmationTag::Allow] {
            match confirmations.generate_key_now(&identity, tag.as_str()) {
                Ok((time, key)) => println!("确认密钥 [{}] @{}: {}", tag, time, key),
                Err(e) => eprintln!("确认密钥生成失败: {}", e),
            }
        }
    }

    // 4. 设备 ID
    if let Some(steam_id) = args.get(2) {
        println!("设备 ID: {}", get_device_id(steam_id));
    }
}
