//! 第二步：损失描述与估计金额

use leptos::prelude::*;
use reliefclaim_shared::claim_form::{FIELD_DESCRIPTION, FIELD_ESTIMATED_LOSS};

use super::form_state::ClaimFormState;
use crate::components::FieldError;

#[component]
pub fn DetailsStep(state: ClaimFormState) -> impl IntoView {
    view! {
        <div class="form-control">
            <label for="description" class="label">
                <span class="label-text">"What happened?"</span>
            </label>
            <textarea id="description" rows="5"
                class="textarea textarea-bordered w-full"
                placeholder="Describe the damage to your property"
                prop:value=move || state.with(|w| w.draft().description.clone())
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    state.update(|w| w.set_description(value));
                }
            ></textarea>
            <FieldError error=state.error(FIELD_DESCRIPTION) />
        </div>

        <div class="form-control">
            <label for="estimated_loss" class="label">
                <span class="label-text">"Estimated loss (USD)"</span>
            </label>
            <input id="estimated_loss" type="number" min="0" step="0.01"
                class="input input-bordered w-full"
                placeholder="0.00"
                prop:value=move || state.with(|w| w.draft().estimated_loss.clone())
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    state.update(|w| w.set_estimated_loss(value));
                }
            />
            <FieldError error=state.error(FIELD_ESTIMATED_LOSS) />
        </div>
    }
}
