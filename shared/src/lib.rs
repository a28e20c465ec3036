//! ReliefClaim 共享逻辑
//!
//! 不依赖 DOM 的业务层：数据模型、API 网关、会话与路由守卫、
//! 以及各个表单的状态机。浏览器相关的实现（fetch、localStorage）
//! 通过 [`transport::HttpClient`] 和 [`session::TokenStorage`] 注入。

pub mod claim_form;
pub mod credentials;
pub mod dashboard;
pub mod error;
pub mod gateway;
pub mod help;
pub mod models;
pub mod notifications;
pub mod preferences;
pub mod profile;
pub mod protocol;
pub mod route;
pub mod session;
pub mod transport;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 默认 API 地址
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
/// 会话令牌在 localStorage 中的键
pub const DEFAULT_TOKEN_KEY: &str = "reliefclaim_token";
/// 通知轮询间隔（毫秒）
pub const DEFAULT_NOTIFICATION_POLL_MS: u32 = 30_000;

pub use error::{ApiError, ApiResult, FieldErrors};
pub use gateway::{ApiConfig, ClaimsApi};
pub use route::{AppRoute, RouteDecision, guard};
pub use session::{SessionStore, TokenStorage};
