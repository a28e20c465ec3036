//! 已登录页面的外框：顶部导航栏 + 未读通知角标

use leptos::prelude::*;
use leptos::task::spawn_local;
use reliefclaim_shared::AppRoute;
use tracing::debug;

use crate::auth::{AuthContext, logout, use_auth};
use crate::components::icons::*;
use crate::web::Interval;
use crate::web::router::{Link, use_router};

/// 未读通知数，通知页面标记已读后也会刷新它
#[derive(Clone, Copy)]
pub struct UnreadCounter {
    count: RwSignal<u64>,
    auth: AuthContext,
}

impl UnreadCounter {
    pub fn get(&self) -> u64 {
        self.count.get()
    }

    pub fn set(&self, count: u64) {
        self.count.try_set(count);
    }

    /// 从服务器重新获取
    pub fn refresh(&self) {
        let counter = *self;
        let api = self.auth.api();
        spawn_local(async move {
            match api.unread_count().await {
                Ok(count) => counter.set(count),
                Err(e) => debug!(error = %e, "unread count unavailable"),
            }
        });
    }
}

pub fn use_unread_counter() -> Option<UnreadCounter> {
    use_context::<UnreadCounter>()
}

const NAV_ITEMS: [AppRoute; 6] = [
    AppRoute::Dashboard,
    AppRoute::Claims,
    AppRoute::NewClaim,
    AppRoute::DisasterUpdates,
    AppRoute::Resources,
    AppRoute::Profile,
];

fn nav_icon(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Dashboard => view! { <LayoutDashboard attr:class="h-4 w-4" /> }.into_any(),
        AppRoute::Claims => view! { <FileText attr:class="h-4 w-4" /> }.into_any(),
        AppRoute::NewClaim => view! { <FilePlus attr:class="h-4 w-4" /> }.into_any(),
        AppRoute::DisasterUpdates => view! { <AlertTriangle attr:class="h-4 w-4" /> }.into_any(),
        AppRoute::Resources => view! { <BookOpen attr:class="h-4 w-4" /> }.into_any(),
        _ => view! { <UserRound attr:class="h-4 w-4" /> }.into_any(),
    }
}

#[component]
pub fn AppShell(children: Children) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let counter = UnreadCounter {
        count: RwSignal::new(0),
        auth,
    };
    provide_context(counter);
    counter.refresh();

    let poller = Interval::new(auth.config().notification_poll_ms, move || counter.refresh());
    // 随 owner 一起释放，drop 时清除定时器
    StoredValue::new_local(poller);

    let current = router.current_route();
    let link_class = move |route: AppRoute| {
        move || {
            if current.get() == route {
                "active gap-2".to_string()
            } else {
                "gap-2".to_string()
            }
        }
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <div class="navbar bg-base-100 shadow-md px-4">
                <div class="flex-1 gap-2">
                    <ShieldCheck attr:class="text-primary h-6 w-6" />
                    <Link to=AppRoute::Dashboard class="btn btn-ghost text-xl">"ReliefClaim"</Link>
                </div>
                <div class="flex-none gap-2">
                    <ul class="menu menu-horizontal px-1 hidden lg:flex">
                        {NAV_ITEMS
                            .into_iter()
                            .map(|route| {
                                view! {
                                    <li>
                                        <Link to=route class=Signal::derive(link_class(route))>
                                            {nav_icon(route)}
                                            {route.title()}
                                        </Link>
                                    </li>
                                }
                            })
                            .collect_view()}
                    </ul>
                    <Link to=AppRoute::Help class="btn btn-ghost btn-circle">
                        <HelpCircle attr:class="h-5 w-5" />
                    </Link>
                    <Link to=AppRoute::Settings class="btn btn-ghost btn-circle">
                        <Settings attr:class="h-5 w-5" />
                    </Link>
                    <Link to=AppRoute::Notifications class="btn btn-ghost btn-circle">
                        <div class="indicator">
                            <Bell attr:class="h-5 w-5" />
                            <Show when=move || { counter.get() > 0 }>
                                <span class="badge badge-sm badge-error indicator-item">
                                    {move || counter.get()}
                                </span>
                            </Show>
                        </div>
                    </Link>
                    <button on:click=move |_| logout(&auth) class="btn btn-outline btn-error btn-sm gap-2">
                        <LogOut attr:class="h-4 w-4" /> "Sign out"
                    </button>
                </div>
            </div>
            <main class="max-w-7xl mx-auto p-4 md:p-8 space-y-8">{children()}</main>
        </div>
    }
}
