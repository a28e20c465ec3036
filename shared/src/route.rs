//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其访问规则，路由服务只负责执行守卫的决定。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    Register,
    /// 控制面板 (认证后的默认落地页)
    Dashboard,
    Claims,
    NewClaim,
    Profile,
    DisasterUpdates,
    Resources,
    Notifications,
    Settings,
    Help,
    /// 页面未找到
    NotFound,
}

/// 路由的访问类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// 只给未登录用户（登录、注册）
    Public,
    /// 需要会话（包括未知路径）
    Protected,
}

/// 守卫的决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Proceed(AppRoute),
    Redirect(AppRoute),
}

impl RouteDecision {
    /// 最终要渲染的路由
    pub fn route(&self) -> AppRoute {
        match self {
            RouteDecision::Proceed(r) | RouteDecision::Redirect(r) => *r,
        }
    }
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        match path {
            "" | "/login" => Self::Login,
            "/register" => Self::Register,
            "/dashboard" => Self::Dashboard,
            "/claims" => Self::Claims,
            "/claims/new" => Self::NewClaim,
            "/profile" => Self::Profile,
            "/disaster-updates" => Self::DisasterUpdates,
            "/resources" => Self::Resources,
            "/notifications" => Self::Notifications,
            "/settings" => Self::Settings,
            "/help" => Self::Help,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/dashboard",
            Self::Claims => "/claims",
            Self::NewClaim => "/claims/new",
            Self::Profile => "/profile",
            Self::DisasterUpdates => "/disaster-updates",
            Self::Resources => "/resources",
            Self::Notifications => "/notifications",
            Self::Settings => "/settings",
            Self::Help => "/help",
            Self::NotFound => "/404",
        }
    }

    pub fn access(&self) -> RouteAccess {
        match self {
            Self::Login | Self::Register => RouteAccess::Public,
            _ => RouteAccess::Protected,
        }
    }

    pub fn requires_auth(&self) -> bool {
        self.access() == RouteAccess::Protected
    }

    /// 导航栏标题
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Register => "Create account",
            Self::Dashboard => "Dashboard",
            Self::Claims => "My Claims",
            Self::NewClaim => "File a Claim",
            Self::Profile => "Profile",
            Self::DisasterUpdates => "Disaster Updates",
            Self::Resources => "Resources",
            Self::Notifications => "Notifications",
            Self::Settings => "Settings",
            Self::Help => "Help & Support",
            Self::NotFound => "Not Found",
        }
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 已认证用户离开公开页面时的落地页
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

/// **核心守卫逻辑**
///
/// 同步求值，没有中间状态：未登录访问受保护页面（含未知路径）-> 登录页；
/// 已登录访问登录/注册页 -> 控制面板。
pub fn guard(target: AppRoute, authenticated: bool) -> RouteDecision {
    match (target.access(), authenticated) {
        (RouteAccess::Protected, false) => RouteDecision::Redirect(AppRoute::auth_failure_redirect()),
        (RouteAccess::Public, true) => RouteDecision::Redirect(AppRoute::auth_success_redirect()),
        _ => RouteDecision::Proceed(target),
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [AppRoute; 12] = [
        AppRoute::Login,
        AppRoute::Register,
        AppRoute::Dashboard,
        AppRoute::Claims,
        AppRoute::NewClaim,
        AppRoute::Profile,
        AppRoute::DisasterUpdates,
        AppRoute::Resources,
        AppRoute::Notifications,
        AppRoute::Settings,
        AppRoute::Help,
        AppRoute::NotFound,
    ];

    #[test]
    fn test_paths_resolve_back_to_route() {
        for route in ALL.into_iter().filter(|r| *r != AppRoute::NotFound) {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
        assert_eq!(AppRoute::from_path("/"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/claims/"), AppRoute::Claims);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn test_anonymous_user_is_sent_to_login() {
        for route in ALL.into_iter().filter(AppRoute::requires_auth) {
            assert_eq!(guard(route, false), RouteDecision::Redirect(AppRoute::Login));
        }
        assert_eq!(guard(AppRoute::Register, false), RouteDecision::Proceed(AppRoute::Register));
    }

    #[test]
    fn test_authenticated_user_skips_public_pages() {
        assert_eq!(guard(AppRoute::Login, true), RouteDecision::Redirect(AppRoute::Dashboard));
        assert_eq!(guard(AppRoute::Register, true), RouteDecision::Redirect(AppRoute::Dashboard));
        assert_eq!(guard(AppRoute::Profile, true), RouteDecision::Proceed(AppRoute::Profile));
    }

    #[test]
    fn test_unknown_path_needs_session() {
        let target = AppRoute::from_path("/no-such-page");
        assert_eq!(guard(target, false), RouteDecision::Redirect(AppRoute::Login));
        assert_eq!(guard(target, true), RouteDecision::Proceed(AppRoute::NotFound));
    }
}
