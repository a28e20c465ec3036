use crate::auth::{AuthContext, use_auth};
use crate::components::icons::{Bell, Check, Trash2};
use crate::components::nav::{UnreadCounter, use_unread_counter};
use crate::components::{ErrorAlert, Spinner, Toast};
use crate::web::Interval;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reliefclaim_shared::notifications::NotificationFeed;
use tracing::debug;

/// 通知页面的状态，全部是 arena 句柄
#[derive(Clone, Copy)]
struct FeedState {
    auth: AuthContext,
    feed: RwSignal<NotificationFeed>,
    loaded: RwSignal<bool>,
    error: RwSignal<Option<String>>,
    notice: RwSignal<Option<(String, bool)>>,
    counter: Option<UnreadCounter>,
}

impl FeedState {
    /// 拉取完整列表；轮询时不去重，后到的响应覆盖先到的
    fn poll(self) {
        let api = self.auth.api();
        spawn_local(async move {
            match api.notifications().await {
                Ok(items) => {
                    self.feed.try_update(|f| f.replace(items));
                    self.error.try_set(None);
                }
                Err(e) => {
                    self.error.try_set(Some(self.auth.report(&e)));
                }
            }
            self.loaded.try_set(true);
        });
    }

    fn sync_badge(self) {
        let unread = self.feed.with_untracked(|f| f.unread_count() as u64);
        if let Some(counter) = self.counter {
            counter.set(unread);
        }
    }

    fn failed(self, e: reliefclaim_shared::ApiError) {
        let message = self.auth.report(&e);
        self.notice.try_set(Some((message, true)));
    }

    fn mark_read(self, id: u64) {
        let api = self.auth.api();
        spawn_local(async move {
            match api.mark_notification_read(id).await {
                Ok(()) => {
                    self.feed.try_update(|f| f.mark_read(id));
                    self.sync_badge();
                }
                Err(e) => self.failed(e),
            }
        });
    }

    fn mark_all_read(self) {
        let api = self.auth.api();
        spawn_local(async move {
            match api.mark_all_notifications_read().await {
                Ok(()) => {
                    let marked = self.feed.try_update(|f| f.mark_all_read()).unwrap_or(0);
                    debug!(marked, "notifications marked read");
                    self.sync_badge();
                }
                Err(e) => self.failed(e),
            }
        });
    }

    fn remove(self, id: u64) {
        let api = self.auth.api();
        spawn_local(async move {
            match api.delete_notification(id).await {
                Ok(()) => {
                    self.feed.try_update(|f| f.remove(id));
                    self.sync_badge();
                    self.notice.try_set(Some(("Notification deleted.".to_string(), false)));
                }
                Err(e) => self.failed(e),
            }
        });
    }
}

#[component]
pub fn NotificationsPage() -> impl IntoView {
    let state = FeedState {
        auth: use_auth(),
        feed: RwSignal::new(NotificationFeed::new()),
        loaded: RwSignal::new(false),
        error: RwSignal::new(None),
        notice: RwSignal::new(None),
        counter: use_unread_counter(),
    };

    state.poll();
    let poller = Interval::new(state.auth.config().notification_poll_ms, move || state.poll());
    // 随 owner 一起释放，drop 时清除定时器
    StoredValue::new_local(poller);

    let unread = move || state.feed.with(|f| f.unread_count());
    let items = move || state.feed.with(|f| f.items().to_vec());

    view! {
        <Toast notice=state.notice />
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <div>
                        <h3 class="card-title gap-2">
                            <Bell attr:class="h-5 w-5" /> "Notifications"
                            <Show when=move || { unread() > 0 }>
                                <span class="badge badge-error">{unread}</span>
                            </Show>
                        </h3>
                        <p class="text-base-content/70 text-sm">"Updates about your claims and account."</p>
                    </div>
                    <button class="btn btn-sm btn-outline gap-2"
                        disabled=move || unread() == 0
                        on:click=move |_| state.mark_all_read()
                    >
                        <Check attr:class="h-4 w-4" /> "Mark all as read"
                    </button>
                </div>

                <ErrorAlert message=state.error />

                <Show when=move || state.loaded.get() fallback=|| view! { <Spinner /> }>
                    <Show when=move || state.feed.with(NotificationFeed::is_empty)>
                        <p class="text-center py-8 text-base-content/50">"You're all caught up."</p>
                    </Show>
                    <ul class="divide-y divide-base-200">
                        <For
                            each=items
                            key=|n| (n.id, n.read)
                            children=move |n| {
                                let id = n.id;
                                let read = n.read;
                                let row_class = if read { "py-3 flex gap-4 opacity-60" } else { "py-3 flex gap-4 font-semibold" };
                                let when = n
                                    .created_at
                                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                                    .unwrap_or_default();
                                view! {
                                    <li class=row_class>
                                        <div class="flex-1">
                                            {n.title.map(|t| view! { <p class="font-bold">{t}</p> })}
                                            <p class="text-sm">{n.message}</p>
                                            <p class="text-xs opacity-60">{when}</p>
                                        </div>
                                        <div class="flex gap-1 items-start">
                                            <Show when=move || !read>
                                                <button class="btn btn-ghost btn-xs" on:click=move |_| state.mark_read(id)>
                                                    "Mark read"
                                                </button>
                                            </Show>
                                            <button class="btn btn-ghost btn-xs text-error" on:click=move |_| state.remove(id)>
                                                <Trash2 attr:class="h-4 w-4" />
                                            </button>
                                        </div>
                                    </li>
                                }
                            }
                        />
                    </ul>
                </Show>
            </div>
        </div>
    }
}
