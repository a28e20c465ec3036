use crate::api::{Loadable, load_into};
use crate::auth::use_auth;
use crate::components::icons::UserRound;
use crate::components::{ErrorAlert, FieldError, Spinner, Toast};
use leptos::prelude::*;
use leptos::task::spawn_local;
use reliefclaim_shared::models::Profile;
use reliefclaim_shared::profile::{ProfileDraft, ProfileEditor, SaveOutcome};

type Getter = fn(&ProfileDraft) -> &String;
type Setter = fn(&mut ProfileDraft) -> &mut String;

/// (字段名, 标签, 读, 写)
const FIELDS: [(&str, &str, Getter, Setter); 8] = [
    ("username", "Username", |d| &d.username, |d| &mut d.username),
    ("phone_number", "Phone number", |d| &d.phone_number, |d| &mut d.phone_number),
    ("street_address", "Street address", |d| &d.street_address, |d| &mut d.street_address),
    ("city", "City", |d| &d.city, |d| &mut d.city),
    ("state", "State / Province", |d| &d.state, |d| &mut d.state),
    ("country", "Country", |d| &d.country, |d| &mut d.country),
    ("postal_code", "Postal code", |d| &d.postal_code, |d| &mut d.postal_code),
    ("emergency_contact", "Emergency contact", |d| &d.emergency_contact, |d| &mut d.emergency_contact),
];

#[component]
fn ProfileForm(editor: RwSignal<ProfileEditor>) -> impl IntoView {
    let auth = use_auth();
    let (saving, set_saving) = signal(false);
    let notice = RwSignal::new(Option::<(String, bool)>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() {
            return;
        }
        let request = match editor.try_update(|e| e.prepare_update()) {
            Some(Ok(Some(request))) => request,
            Some(Ok(None)) => {
                notice.set(Some(("No changes to save.".to_string(), false)));
                return;
            }
            _ => return,
        };

        set_saving.set(true);
        let api = auth.api();
        spawn_local(async move {
            let result = api.update_profile(&request).await;
            if let Err(e) = &result {
                auth.report(e);
            }
            let outcome = editor.try_update(|e| e.apply_result(result));
            let message = match outcome {
                Some(SaveOutcome::Saved) => Some(("Profile updated.".to_string(), false)),
                Some(SaveOutcome::Failed(m)) => Some((m, true)),
                _ => None,
            };
            if message.is_some() {
                notice.try_set(message);
            }
            set_saving.try_set(false);
        });
    };

    let general = Signal::derive(move || {
        editor.with(|e| e.errors.general().first().map(|m| m.to_string()))
    });

    view! {
        <Toast notice=notice />
        <form on:submit=on_submit class="space-y-4">
            <ErrorAlert message=general />
            <div class="grid md:grid-cols-2 gap-4">
                {FIELDS
                    .into_iter()
                    .map(|(name, label, get, set)| {
                        let error = Signal::derive(move || editor.with(|e| e.errors.first(name)));
                        view! {
                            <div class="form-control">
                                <label for=name class="label">
                                    <span class="label-text">{label}</span>
                                </label>
                                <input id=name type="text"
                                    class=move || if error.with(Option::is_some) { "input input-bordered input-error" } else { "input input-bordered" }
                                    prop:value=move || editor.with(|e| get(&e.draft).clone())
                                    on:input=move |ev| {
                                        let value = event_target_value(&ev);
                                        editor.update(|e| {
                                            *set(&mut e.draft) = value;
                                            e.errors.remove(name);
                                        });
                                    }
                                />
                                <FieldError error=error />
                            </div>
                        }
                    })
                    .collect_view()}
            </div>
            <div class="card-actions justify-end">
                <button type="button" class="btn btn-ghost"
                    disabled=move || !editor.with(ProfileEditor::is_dirty)
                    on:click=move |_| editor.update(ProfileEditor::reset)
                >
                    "Discard changes"
                </button>
                <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                    {move || if saving.get() {
                        view! { <span class="loading loading-spinner"></span> "Saving..." }.into_any()
                    } else {
                        "Save profile".into_any()
                    }}
                </button>
            </div>
        </form>
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let profile = RwSignal::new(Loadable::<Profile>::Loading);
    load_into(auth, profile, |api| async move { api.current_profile().await });

    view! {
        <div class="card bg-base-100 shadow-xl max-w-3xl mx-auto">
            <div class="card-body">
                {move || match profile.get() {
                    Loadable::Loading => view! { <Spinner /> }.into_any(),
                    Loadable::Failed(message) => {
                        view! { <ErrorAlert message=Signal::derive(move || Some(message.clone())) /> }.into_any()
                    }
                    Loadable::Ready(p) => {
                        let picture = p.profile_picture_url.clone();
                        let header = format!("{} · {}", p.username, p.email);
                        let editor = RwSignal::new(ProfileEditor::new(p));
                        view! {
                            <div class="flex items-center gap-4 mb-4">
                                <div class="avatar placeholder">
                                    <div class="bg-neutral text-neutral-content w-16 rounded-full">
                                        {match picture {
                                            Some(url) => view! { <img src=url alt="Profile picture" /> }.into_any(),
                                            None => view! { <UserRound attr:class="h-8 w-8" /> }.into_any(),
                                        }}
                                    </div>
                                </div>
                                <div>
                                    <h3 class="card-title">"Profile"</h3>
                                    <p class="text-sm opacity-70">{header}</p>
                                </div>
                            </div>
                            <ProfileForm editor=editor />
                        }
                        .into_any()
                    }
                }}
            </div>
        </div>
    }
}
