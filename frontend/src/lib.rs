//! ReliefClaim 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `reliefclaim_shared`: 领域模型、API 网关、会话与路由守卫（不依赖 DOM）
//! - `web`: 浏览器 API 适配（fetch、localStorage、History、定时器）
//! - `auth`: 认证上下文
//! - `components`: UI 组件层

mod api;
mod auth;
mod config;
mod components {
    pub mod claim_form;
    pub mod claims;
    pub mod dashboard;
    mod feedback;
    pub mod feeds;
    pub mod help;
    mod icons;
    pub mod login;
    pub mod nav;
    pub mod notifications;
    pub mod profile;
    pub mod register;
    pub mod settings;

    pub use feedback::{ErrorAlert, FieldError, Spinner, Toast};
}

use crate::auth::AuthContext;
use crate::components::claim_form::NewClaimPage;
use crate::components::claims::ClaimsPage;
use crate::components::dashboard::DashboardPage;
use crate::components::feeds::{DisasterUpdatesPage, ResourcesPage};
use crate::components::help::HelpPage;
use crate::components::login::LoginPage;
use crate::components::nav::AppShell;
use crate::components::notifications::NotificationsPage;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;
use crate::components::settings::SettingsPage;
use crate::config::AppConfig;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    mod http;
    pub mod router;
    mod storage;
    mod theme;
    mod timer;

    pub use http::{BrowserFile, FetchClient};
    pub use storage::BrowserStorage;
    pub use theme::apply_preferences;
    pub use timer::Interval;
}

use reliefclaim_shared::AppRoute;
use reliefclaim_shared::preferences::Preferences;
use web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件，受保护页面套上导航外框。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Dashboard => view! { <AppShell><DashboardPage /></AppShell> }.into_any(),
        AppRoute::Claims => view! { <AppShell><ClaimsPage /></AppShell> }.into_any(),
        AppRoute::NewClaim => view! { <AppShell><NewClaimPage /></AppShell> }.into_any(),
        AppRoute::Profile => view! { <AppShell><ProfilePage /></AppShell> }.into_any(),
        AppRoute::DisasterUpdates => {
            view! { <AppShell><DisasterUpdatesPage /></AppShell> }.into_any()
        }
        AppRoute::Resources => view! { <AppShell><ResourcesPage /></AppShell> }.into_any(),
        AppRoute::Notifications => {
            view! { <AppShell><NotificationsPage /></AppShell> }.into_any()
        }
        AppRoute::Settings => view! { <AppShell><SettingsPage /></AppShell> }.into_any(),
        AppRoute::Help => view! { <AppShell><HelpPage /></AppShell> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <Link to=AppRoute::Dashboard class="btn btn-primary mt-6">"Back to dashboard"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 0. 应用本地保存的主题与字号
    web::apply_preferences(&Preferences::load(&web::BrowserStorage));

    // 1. 创建认证上下文（从 localStorage 恢复令牌）
    let auth_ctx = AuthContext::new(AppConfig::from_env());
    provide_context(auth_ctx);

    // 2. 获取认证状态信号，用于注入路由服务（解耦！）
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        // 3. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
