use crate::api::{Loadable, load_into};
use crate::auth::use_auth;
use crate::components::icons::{FilePlus, RefreshCw};
use crate::components::{ErrorAlert, Spinner};
use crate::web::router::Link;
use leptos::prelude::*;
use reliefclaim_shared::AppRoute;
use reliefclaim_shared::dashboard::format_money;
use reliefclaim_shared::models::{Claim, ClaimStatus};

#[component]
pub fn StatusBadge(status: ClaimStatus) -> impl IntoView {
    let class = match status {
        ClaimStatus::Pending => "badge badge-warning",
        ClaimStatus::UnderReview => "badge badge-info",
        ClaimStatus::Approved => "badge badge-success",
        ClaimStatus::Settled => "badge badge-success badge-outline",
        ClaimStatus::Rejected => "badge badge-error",
    };
    view! { <span class=class>{status.label()}</span> }
}

fn prediction(claim: &Claim) -> String {
    let Some(approval) = claim.predicted_approval else {
        return "—".to_string();
    };
    let verdict = match (approval.is_likely(), approval.percent()) {
        (true, Some(pct)) => format!("Likely approved ({pct:.0}%)"),
        (true, None) => "Likely approved".to_string(),
        (false, Some(pct)) => format!("Unlikely to be approved ({pct:.0}%)"),
        (false, None) => "Unlikely to be approved".to_string(),
    };
    match claim.predicted_limit {
        Some(limit) if approval.is_likely() => format!("{verdict}, up to {}", format_money(limit)),
        _ => verdict,
    }
}

/// 理赔表格，控制面板和列表页共用
#[component]
pub fn ClaimsTable(#[prop(into)] claims: Signal<Vec<Claim>>) -> impl IntoView {
    view! {
        <div class="overflow-x-auto w-full">
            <table class="table table-zebra w-full">
                <thead>
                    <tr>
                        <th>"#"</th>
                        <th>"Disaster"</th>
                        <th class="hidden md:table-cell">"Property"</th>
                        <th>"Estimated loss"</th>
                        <th>"Status"</th>
                        <th class="hidden lg:table-cell">"Prediction"</th>
                        <th class="hidden md:table-cell">"Filed"</th>
                    </tr>
                </thead>
                <tbody>
                    <Show when=move || claims.with(Vec::is_empty)>
                        <tr>
                            <td colspan="7" class="text-center py-8 text-base-content/50">
                                "No claims filed yet."
                            </td>
                        </tr>
                    </Show>
                    <For
                        each=move || claims.get()
                        key=|c| c.id
                        children=move |claim| {
                            let hint = prediction(&claim);
                            let filed = claim
                                .created_at
                                .map(|t| t.format("%Y-%m-%d").to_string())
                                .unwrap_or_default();
                            view! {
                                <tr>
                                    <td class="font-mono text-sm opacity-70">{claim.id}</td>
                                    <td class="font-bold">{claim.disaster_type.label()}</td>
                                    <td class="hidden md:table-cell">{claim.property_type.label()}</td>
                                    <td class="font-mono">{format_money(claim.estimated_loss)}</td>
                                    <td><StatusBadge status=claim.status /></td>
                                    <td class="hidden lg:table-cell text-sm opacity-70">{hint}</td>
                                    <td class="hidden md:table-cell text-sm opacity-70">{filed}</td>
                                </tr>
                            }
                        }
                    />
                </tbody>
            </table>
        </div>
    }
}

#[component]
pub fn ClaimsPage() -> impl IntoView {
    let auth = use_auth();
    let claims = RwSignal::new(Loadable::<Vec<Claim>>::Loading);

    let load = move || load_into(auth, claims, |api| async move { api.list_claims().await });
    load();

    let rows = Signal::derive(move || claims.with(|c| c.ready().cloned().unwrap_or_default()));
    let error = Signal::derive(move || claims.with(|c| c.error().map(str::to_string)));

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body p-0">
                <div class="flex items-center justify-between p-6 pb-2">
                    <div>
                        <h3 class="card-title">"My Claims"</h3>
                        <p class="text-base-content/70 text-sm">"Every claim you have filed and its current status."</p>
                    </div>
                    <div class="flex gap-2">
                        <Link to=AppRoute::NewClaim class="btn btn-primary btn-sm gap-2">
                            <FilePlus attr:class="h-4 w-4" /> "New claim"
                        </Link>
                        <button on:click=move |_| load() class="btn btn-ghost btn-circle btn-sm">
                            <RefreshCw attr:class="h-5 w-5" />
                        </button>
                    </div>
                </div>
                <div class="px-6">
                    <ErrorAlert message=error />
                </div>
                <Show when=move || !claims.with(Loadable::is_loading) fallback=|| view! { <Spinner /> }>
                    <ClaimsTable claims=rows />
                </Show>
            </div>
        </div>
    }
}
