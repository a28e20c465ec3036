//! 只读信息流：灾情动态与援助资源

use crate::api::{Loadable, load_into};
use crate::auth::use_auth;
use crate::components::icons::{AlertTriangle, BookOpen, ExternalLink, RefreshCw};
use crate::components::{ErrorAlert, Spinner};
use leptos::prelude::*;
use reliefclaim_shared::models::{DisasterUpdate, Resource};

fn severity_class(severity: Option<&str>) -> &'static str {
    match severity.map(str::to_ascii_lowercase).as_deref() {
        Some("critical" | "high") => "badge badge-error",
        Some("medium" | "moderate") => "badge badge-warning",
        Some(_) => "badge badge-info",
        None => "hidden",
    }
}

/// 列表页共用的外框
#[component]
fn FeedCard(
    title: &'static str,
    subtitle: &'static str,
    loading: Signal<bool>,
    error: Signal<Option<String>>,
    on_refresh: Callback<()>,
    children: ChildrenFn,
) -> impl IntoView {
    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <div>
                        <h3 class="card-title">{title}</h3>
                        <p class="text-base-content/70 text-sm">{subtitle}</p>
                    </div>
                    <button on:click=move |_| on_refresh.run(()) disabled=move || loading.get() class="btn btn-ghost btn-circle">
                        <RefreshCw attr:class=move || if loading.get() { "h-5 w-5 animate-spin" } else { "h-5 w-5" } />
                    </button>
                </div>
                <ErrorAlert message=error />
                <Show when=move || !loading.get() fallback=|| view! { <Spinner /> }>
                    {children()}
                </Show>
            </div>
        </div>
    }
}

#[component]
pub fn DisasterUpdatesPage() -> impl IntoView {
    let auth = use_auth();
    let updates = RwSignal::new(Loadable::<Vec<DisasterUpdate>>::Loading);
    let load = move || load_into(auth, updates, |api| async move { api.disaster_updates().await });
    load();

    let items = move || updates.with(|u| u.ready().cloned().unwrap_or_default());

    view! {
        <FeedCard
            title="Disaster Updates"
            subtitle="Latest alerts for active disasters."
            loading=Signal::derive(move || updates.with(Loadable::is_loading))
            error=Signal::derive(move || updates.with(|u| u.error().map(str::to_string)))
            on_refresh=Callback::new(move |_| load())
        >
            <Show when=move || items().is_empty()>
                <p class="text-center py-8 text-base-content/50">"No disaster updates right now."</p>
            </Show>
            <div class="space-y-4">
                <For
                    each=items
                    key=|u| u.id
                    children=move |update| {
                        let badge = severity_class(update.severity.as_deref());
                        let meta = [update.disaster_type.clone(), update.location.clone(), update.source.clone()]
                            .into_iter()
                            .flatten()
                            .collect::<Vec<_>>()
                            .join(" · ");
                        let posted = update
                            .created_at
                            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                            .unwrap_or_default();
                        view! {
                            <div class="alert shadow-sm items-start">
                                <AlertTriangle attr:class="h-6 w-6 text-warning" />
                                <div class="space-y-1">
                                    <h4 class="font-bold flex items-center gap-2">
                                        {update.title}
                                        <span class=badge>{update.severity.unwrap_or_default()}</span>
                                    </h4>
                                    <p class="text-sm">{update.description}</p>
                                    <p class="text-xs opacity-60">{meta} " " {posted}</p>
                                    {update.url.map(|url| view! {
                                        <a href=url target="_blank" rel="noopener noreferrer" class="link link-primary text-xs flex items-center gap-1">
                                            "Read more" <ExternalLink attr:class="h-3 w-3" />
                                        </a>
                                    })}
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </FeedCard>
    }
}

#[component]
pub fn ResourcesPage() -> impl IntoView {
    let auth = use_auth();
    let resources = RwSignal::new(Loadable::<Vec<Resource>>::Loading);
    let load = move || load_into(auth, resources, |api| async move { api.resources().await });
    load();

    let items = move || resources.with(|r| r.ready().cloned().unwrap_or_default());

    view! {
        <FeedCard
            title="Resources"
            subtitle="Guides and assistance programs for disaster recovery."
            loading=Signal::derive(move || resources.with(Loadable::is_loading))
            error=Signal::derive(move || resources.with(|r| r.error().map(str::to_string)))
            on_refresh=Callback::new(move |_| load())
        >
            <Show when=move || items().is_empty()>
                <p class="text-center py-8 text-base-content/50">"No resources available."</p>
            </Show>
            <div class="grid md:grid-cols-2 gap-4">
                <For
                    each=items
                    key=|r| r.id
                    children=move |resource| {
                        view! {
                            <div class="card bg-base-200">
                                <div class="card-body p-4">
                                    <h4 class="card-title text-base gap-2">
                                        <BookOpen attr:class="h-4 w-4 text-primary" />
                                        {resource.title}
                                    </h4>
                                    {resource.category.map(|c| view! { <span class="badge badge-outline">{c}</span> })}
                                    <p class="text-sm">{resource.description}</p>
                                    {resource.url.map(|url| view! {
                                        <a href=url target="_blank" rel="noopener noreferrer" class="link link-primary text-sm flex items-center gap-1">
                                            "Open resource" <ExternalLink attr:class="h-3 w-3" />
                                        </a>
                                    })}
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </FeedCard>
    }
}
