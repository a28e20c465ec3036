//! 理赔提交向导页面
//!
//! 组件树：
//! - `form_state`: 向导状态的信号封装
//! - `basic_info_step` / `details_step` / `documents_step`: 三个步骤的输入渲染

mod basic_info_step;
mod details_step;
mod documents_step;
mod form_state;

use leptos::prelude::*;
use reliefclaim_shared::AppRoute;
use reliefclaim_shared::claim_form::{ClaimStep, SubmissionStatus};
use reliefclaim_shared::dashboard::format_money;
use reliefclaim_shared::models::SubmittedClaim;

use self::basic_info_step::BasicInfoStep;
use self::details_step::DetailsStep;
use self::documents_step::DocumentsStep;
use self::form_state::ClaimFormState;
use crate::auth::use_auth;
use crate::components::ErrorAlert;
use crate::components::icons::Check;
use crate::web::router::Link;

/// 顶部步骤条，只能点击已经经过的步骤
#[component]
fn StepIndicator(state: ClaimFormState) -> impl IntoView {
    ClaimStep::ALL
        .into_iter()
        .map(|step| {
            let class = move || {
                if step.number() <= state.step().number() {
                    "step step-primary cursor-pointer"
                } else {
                    "step"
                }
            };
            view! {
                <li class=class on:click=move |_| state.update(|w| {
                    w.go_to(step);
                })>
                    {step.title()}
                </li>
            }
        })
        .collect_view()
}

/// 提交成功后展示后端给出的预测结果
#[component]
fn PredictionCard(outcome: SubmittedClaim, on_dismiss: Callback<()>) -> impl IntoView {
    let verdict = match outcome.predicted_approval {
        Some(p) if p.is_likely() => "Your claim is likely to be approved.",
        Some(_) => "Your claim may not be approved. An adjuster will review it.",
        None => "Your claim has been received and is awaiting review.",
    };
    let score = outcome
        .predicted_approval
        .and_then(|p| p.percent())
        .map(|pct| format!("Predicted approval: {pct:.0}%"));
    let limit = outcome
        .predicted_limit
        .map(|l| format!("Predicted coverage limit: {}", format_money(l)));

    view! {
        <div role="alert" class="alert alert-success shadow-lg">
            <Check attr:class="h-6 w-6" />
            <div>
                <h3 class="font-bold">"Claim submitted"</h3>
                <div class="text-sm">{verdict}</div>
                {score.map(|s| view! { <div class="text-sm font-mono">{s}</div> })}
                {limit.map(|l| view! { <div class="text-sm font-mono">{l}</div> })}
            </div>
            <div class="flex gap-2">
                <Link to=AppRoute::Claims class="btn btn-sm">"View claims"</Link>
                <button class="btn btn-sm btn-ghost" on:click=move |_| on_dismiss.run(())>
                    "File another"
                </button>
            </div>
        </div>
    }
}

#[component]
pub fn NewClaimPage() -> impl IntoView {
    let auth = use_auth();
    let state = ClaimFormState::new();

    let failure = Signal::derive(move || match state.status() {
        SubmissionStatus::Failed(message) => Some(message),
        _ => None,
    });
    let dismiss = Callback::new(move |_| state.update(|w| w.dismiss_status()));

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        // 回车键在前两步等同于“下一步”
        if state.step() == ClaimStep::Documents {
            state.submit(auth);
        } else {
            state.update(|w| {
                w.advance();
            });
        }
    };

    view! {
        <div class="card bg-base-100 shadow-xl max-w-3xl mx-auto">
            <div class="card-body space-y-4">
                <h3 class="card-title">"File a new claim"</h3>
                <ul class="steps w-full">
                    <StepIndicator state=state />
                </ul>

                {move || match state.status() {
                    SubmissionStatus::Succeeded(outcome) => {
                        view! { <PredictionCard outcome=outcome on_dismiss=dismiss /> }.into_any()
                    }
                    _ => view! { <ErrorAlert message=failure /> }.into_any(),
                }}

                <form on:submit=on_submit class="space-y-4">
                    {move || match state.step() {
                        ClaimStep::BasicInfo => view! { <BasicInfoStep state=state /> }.into_any(),
                        ClaimStep::Details => view! { <DetailsStep state=state /> }.into_any(),
                        ClaimStep::Documents => view! { <DocumentsStep state=state /> }.into_any(),
                    }}

                    <div class="card-actions justify-between pt-4">
                        <button type="button" class="btn btn-ghost"
                            disabled=move || state.step() == ClaimStep::BasicInfo || state.is_submitting()
                            on:click=move |_| state.update(|w| {
                                w.back();
                            })
                        >
                            "Back"
                        </button>
                        <span class="text-sm opacity-60 self-center">
                            {move || format!("Step {} of {}", state.step().number(), ClaimStep::ALL.len())}
                        </span>
                        <button type="submit" class="btn btn-primary" disabled=move || state.is_submitting()>
                            {move || match (state.step(), state.is_submitting()) {
                                (_, true) => view! { <span class="loading loading-spinner"></span> "Submitting..." }.into_any(),
                                (ClaimStep::Documents, false) => "Submit claim".into_any(),
                                _ => "Next".into_any(),
                            }}
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
