//! 第一步：灾害类型与财产类型

use leptos::prelude::*;
use reliefclaim_shared::claim_form::{FIELD_DISASTER_TYPE, FIELD_PROPERTY_TYPE};
use reliefclaim_shared::models::{DisasterType, PropertyType};

use super::form_state::ClaimFormState;
use crate::components::FieldError;

#[component]
pub fn BasicInfoStep(state: ClaimFormState) -> impl IntoView {
    let disaster = move || {
        state.with(|w| w.draft().disaster_type.map(|d| d.as_str()).unwrap_or_default())
    };
    let property = move || {
        state.with(|w| w.draft().property_type.map(|p| p.as_str()).unwrap_or_default())
    };

    view! {
        <div class="grid md:grid-cols-2 gap-4">
            <div class="form-control">
                <label for="disaster_type" class="label">
                    <span class="label-text">"Disaster type"</span>
                </label>
                <select id="disaster_type" class="select select-bordered w-full"
                    prop:value=disaster
                    on:change=move |ev| {
                        let value = event_target_value(&ev).parse::<DisasterType>().ok();
                        state.update(|w| w.set_disaster_type(value));
                    }
                >
                    <option value="" disabled selected=move || disaster().is_empty()>"Select a disaster"</option>
                    {DisasterType::ALL
                        .into_iter()
                        .map(|d| view! { <option value=d.as_str()>{d.label()}</option> })
                        .collect_view()}
                </select>
                <FieldError error=state.error(FIELD_DISASTER_TYPE) />
            </div>

            <div class="form-control">
                <label for="property_type" class="label">
                    <span class="label-text">"Property type"</span>
                </label>
                <select id="property_type" class="select select-bordered w-full"
                    prop:value=property
                    on:change=move |ev| {
                        let value = event_target_value(&ev).parse::<PropertyType>().ok();
                        state.update(|w| w.set_property_type(value));
                    }
                >
                    <option value="" disabled selected=move || property().is_empty()>"Select a property"</option>
                    {PropertyType::ALL
                        .into_iter()
                        .map(|p| view! { <option value=p.as_str()>{p.label()}</option> })
                        .collect_view()}
                </select>
                <FieldError error=state.error(FIELD_PROPERTY_TYPE) />
            </div>
        </div>
    }
}
