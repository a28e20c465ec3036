//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 每次导航都交给共享层的 [`guard`] 求值，路由服务只负责执行它的决定。

use leptos::prelude::*;
use reliefclaim_shared::{AppRoute, RouteDecision, guard};
use tracing::debug;
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn write_history(path: &str, push: bool) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let _ = if push {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))
    } else {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))
    };
}

/// 路由器服务
///
/// 通过注入认证检查信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: RwSignal<AppRoute>,
    is_authenticated: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>) -> Self {
        let requested = AppRoute::from_path(&current_path());
        let decision = guard(requested, is_authenticated.get_untracked());
        if let RouteDecision::Redirect(to) = decision {
            write_history(to.to_path(), false);
        }

        Self {
            current_route: RwSignal::new(decision.route()),
            is_authenticated,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route.read_only()
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, path: &str) {
        self.go(AppRoute::from_path(path), true);
    }

    pub fn navigate_to(&self, route: AppRoute) {
        self.go(route, true);
    }

    /// 请求 -> 守卫 -> 写 History -> 更新信号
    ///
    /// 被重定向时使用 replaceState，避免后退回到被拒绝的页面。
    fn go(&self, target: AppRoute, push: bool) {
        let decision = guard(target, self.is_authenticated.get_untracked());
        match decision {
            RouteDecision::Proceed(route) => write_history(route.to_path(), push),
            RouteDecision::Redirect(route) => {
                debug!(from = %target, to = %route, "route guard redirect");
                write_history(route.to_path(), false);
            }
        }
        self.current_route.set(decision.route());
    }

    /// 浏览器后退/前进也要经过守卫
    fn init_popstate_listener(&self) {
        let router = *self;
        let closure = Closure::<dyn Fn()>::new(move || {
            router.go(AppRoute::from_path(&current_path()), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 登录/注销后对当前页面重新求值
    fn setup_auth_redirect(&self) {
        let router = *self;
        Effect::new(move |_| {
            let is_auth = router.is_authenticated.get();
            let route = router.current_route.get_untracked();
            if let RouteDecision::Redirect(to) = guard(route, is_auth) {
                debug!(authenticated = is_auth, to = %to, "session changed, redirecting");
                write_history(to.to_path(), true);
                router.current_route.set(to);
            }
        });
    }
}

fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated);
    router.init_popstate_listener();
    router.setup_auth_redirect();
    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated);
    children()
}

/// 路由出口组件
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();
    move || matcher(router.current_route().get())
}

/// 站内链接：拦截点击改为客户端导航
#[component]
pub fn Link(
    to: AppRoute,
    #[prop(into, optional)] class: Signal<String>,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let on_click = move |ev: web_sys::MouseEvent| {
        // 保留 Ctrl/Cmd 点击在新标签页打开
        if ev.ctrl_key() || ev.meta_key() || ev.shift_key() {
            return;
        }
        ev.prevent_default();
        router.navigate_to(to);
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
