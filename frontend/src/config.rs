//! 构建期配置
//!
//! 通过环境变量在编译时注入（Trunk 构建时设置），未设置时使用默认值。

use std::fmt::Display;
use std::str::FromStr;

use reliefclaim_shared::{DEFAULT_API_URL, DEFAULT_NOTIFICATION_POLL_MS, DEFAULT_TOKEN_KEY};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    pub token_key: String,
    pub notification_poll_ms: u32,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let notification_poll_ms = try_load(
            "RELIEFCLAIM_NOTIFICATION_POLL_MS",
            option_env!("RELIEFCLAIM_NOTIFICATION_POLL_MS"),
            DEFAULT_NOTIFICATION_POLL_MS,
        );

        Self {
            api_url: try_load(
                "RELIEFCLAIM_API_URL",
                option_env!("RELIEFCLAIM_API_URL"),
                DEFAULT_API_URL.to_string(),
            ),
            token_key: try_load(
                "RELIEFCLAIM_TOKEN_KEY",
                option_env!("RELIEFCLAIM_TOKEN_KEY"),
                DEFAULT_TOKEN_KEY.to_string(),
            ),
            notification_poll_ms: if notification_poll_ms == 0 {
                warn!("RELIEFCLAIM_NOTIFICATION_POLL_MS must be positive, using default");
                DEFAULT_NOTIFICATION_POLL_MS
            } else {
                notification_poll_ms
            },
        }
    }
}

/// 解析构建期变量；缺失或无效时回退到默认值
fn try_load<T>(key: &str, value: Option<&str>, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = value else {
        info!("{key} not set, using default: {default}");
        return default;
    };
    raw.trim().parse().unwrap_or_else(|e| {
        warn!("Invalid {key} value: {e}, using default: {default}");
        default
    })
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
