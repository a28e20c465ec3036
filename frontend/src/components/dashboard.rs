use crate::api::{Loadable, load_into};
use crate::auth::use_auth;
use crate::components::claims::ClaimsTable;
use crate::components::icons::*;
use crate::components::{ErrorAlert, Spinner};
use crate::web::router::Link;
use leptos::prelude::*;
use reliefclaim_shared::AppRoute;
use reliefclaim_shared::dashboard::{ClaimStats, RECENT_CLAIMS, format_money, recent_claims};
use reliefclaim_shared::models::Claim;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let claims = RwSignal::new(Loadable::<Vec<Claim>>::Loading);

    let load = move || load_into(auth, claims, |api| async move { api.list_claims().await });
    load();

    // 统计数据的派生值
    let stats = Memo::new(move |_| {
        claims.with(|c| c.ready().map(|list| ClaimStats::from_claims(list)).unwrap_or_default())
    });
    let recent = Signal::derive(move || {
        claims.with(|c| {
            c.ready()
                .map(|list| recent_claims(list, RECENT_CLAIMS))
                .unwrap_or_default()
        })
    });
    let error = Signal::derive(move || claims.with(|c| c.error().map(str::to_string)));
    let approval_rate = move || {
        stats
            .get()
            .approval_rate()
            .map(|r| format!("{r:.0}% approval rate"))
            .unwrap_or_else(|| "No decisions yet".to_string())
    };

    view! {
        <ErrorAlert message=error />

        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
            <div class="stat">
                <div class="stat-figure text-primary">
                    <FileText attr:class="inline-block w-8 h-8" />
                </div>
                <div class="stat-title">"Total claims"</div>
                <div class="stat-value text-primary">{move || stats.get().total}</div>
                <div class="stat-desc">{approval_rate}</div>
            </div>

            <div class="stat">
                <div class="stat-title">"Pending"</div>
                <div class="stat-value text-warning">{move || stats.get().pending}</div>
                <div class="stat-desc">"Including claims under review"</div>
            </div>

            <div class="stat">
                <div class="stat-figure text-success">
                    <Check attr:class="inline-block w-8 h-8" />
                </div>
                <div class="stat-title">"Approved"</div>
                <div class="stat-value text-success">{move || stats.get().approved}</div>
                <div class="stat-desc">{move || format!("{} rejected", stats.get().rejected)}</div>
            </div>

            <div class="stat">
                <div class="stat-title">"Estimated losses"</div>
                <div class="stat-value text-secondary text-2xl">
                    {move || format_money(stats.get().total_estimated_loss)}
                </div>
            </div>
        </div>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="flex items-center justify-between p-6 pb-2">
                    <div>
                        <h3 class="card-title">"Recent claims"</h3>
                        <p class="text-base-content/70 text-sm">"Your latest filings."</p>
                    </div>
                    <div class="flex gap-2">
                        <Link to=AppRoute::NewClaim class="btn btn-primary btn-sm gap-2">
                            <FilePlus attr:class="h-4 w-4" /> "File a claim"
                        </Link>
                        <button on:click=move |_| load() class="btn btn-ghost btn-circle btn-sm">
                            <RefreshCw attr:class="h-5 w-5" />
                        </button>
                    </div>
                </div>
                <Show when=move || !claims.with(Loadable::is_loading) fallback=|| view! { <Spinner /> }>
                    <ClaimsTable claims=recent />
                </Show>
                <div class="p-4 text-right">
                    <Link to=AppRoute::Claims class="link link-primary text-sm">"View all claims"</Link>
                </div>
            </div>
        </div>
    }
}
