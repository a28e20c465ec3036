//! 认证模块
//!
//! 会话令牌由共享层的 [`SessionStore`] 持有并持久化到 localStorage，
//! 这里把它包装成 Leptos 上下文：令牌信号驱动路由守卫，`api()` 为每次请求
//! 构建带令牌的网关。

use leptos::prelude::*;
use reliefclaim_shared::credentials::{LoginForm, RegisterForm};
use reliefclaim_shared::{ApiConfig, ApiError, FieldErrors, SessionStore};
use tracing::{info, warn};

use crate::api::Api;
use crate::config::AppConfig;
use crate::web::{BrowserStorage, FetchClient};

/// 认证上下文
///
/// 所有字段都是 arena 句柄，上下文本身是 `Copy`，可以直接 move 进闭包。
#[derive(Clone, Copy)]
pub struct AuthContext {
    session: StoredValue<SessionStore<BrowserStorage>>,
    /// 当前令牌，由 session 的订阅回调同步
    token: RwSignal<Option<String>>,
    config: StoredValue<AppConfig>,
}

impl AuthContext {
    /// 打开会话存储并恢复上次的令牌
    pub fn new(config: AppConfig) -> Self {
        let mut session = SessionStore::open(BrowserStorage, config.token_key.clone());
        let token = RwSignal::new(session.token().map(str::to_string));
        session.subscribe(move |t| {
            token.try_set(t.map(str::to_string));
        });

        Self {
            session: StoredValue::new(session),
            token,
            config: StoredValue::new(config),
        }
    }

    /// 认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let token = self.token;
        Signal::derive(move || token.with(Option::is_some))
    }

    pub fn config(&self) -> AppConfig {
        self.config.get_value()
    }

    /// 使用当前令牌构建 API 网关
    pub fn api(&self) -> Api {
        let config = ApiConfig::new(self.config.with_value(|c| c.api_url.clone()));
        Api::new(config, FetchClient).with_token(self.token.get_untracked())
    }

    /// 处理请求错误：401 意味着令牌已失效，清除会话后由路由守卫跳转登录页
    pub fn report(&self, error: &ApiError) -> String {
        if matches!(error, ApiError::Unauthorized) && self.token.get_untracked().is_some() {
            warn!("session rejected by server, signing out");
            logout(self);
        }
        error.user_message()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 登录失败时的结果：字段错误或整体提示
#[derive(Debug, Clone, PartialEq)]
pub enum AuthFailure {
    Fields(FieldErrors),
    Message(String),
}

impl AuthFailure {
    fn from_api(error: ApiError) -> Self {
        match error {
            ApiError::Validation(errors) if errors.general().is_empty() => Self::Fields(errors),
            ApiError::Unauthorized => {
                Self::Message("Invalid username or password.".to_string())
            }
            other => Self::Message(other.user_message()),
        }
    }

    pub fn message(&self) -> Option<String> {
        match self {
            Self::Message(m) => Some(m.clone()),
            Self::Fields(_) => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<String> {
        match self {
            Self::Fields(errors) => errors.first(name),
            Self::Message(_) => None,
        }
    }
}

/// 登录并保存令牌
///
/// 成功后不需要手动导航，路由服务会监听认证状态变化并自动重定向。
pub async fn login(ctx: &AuthContext, form: LoginForm) -> Result<(), AuthFailure> {
    let request = form.validate().map_err(AuthFailure::Fields)?;
    let token = ctx
        .api()
        .login(&request)
        .await
        .map_err(AuthFailure::from_api)?;

    ctx.session.update_value(|s| s.save(token));
    info!(username = %request.username, "signed in");
    Ok(())
}

/// 注册新账号，成功后由调用方跳转到登录页
pub async fn register(ctx: &AuthContext, form: RegisterForm) -> Result<(), AuthFailure> {
    let request = form.validate().map_err(AuthFailure::Fields)?;
    ctx.api()
        .register(&request)
        .await
        .map_err(AuthFailure::from_api)?;
    info!(username = %request.username, "account registered");
    Ok(())
}

/// 注销并清除状态
pub fn logout(ctx: &AuthContext) {
    ctx.session.update_value(|s| s.clear());
}
