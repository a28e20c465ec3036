//! 本地偏好设置页面（不与后端同步）

use crate::components::Toast;
use crate::components::icons::Settings;
use crate::web::{BrowserStorage, apply_preferences};
use leptos::prelude::*;
use reliefclaim_shared::preferences::{FontSize, Language, Preferences, Theme};

type Flag = fn(&mut Preferences) -> &mut bool;

const NOTIFICATION_TOGGLES: [(&str, &str, Flag); 3] = [
    ("email-notifications", "Email notifications", |p| &mut p.email_notifications),
    ("push-notifications", "Push notifications", |p| &mut p.push_notifications),
    ("sms-notifications", "SMS notifications", |p| &mut p.sms_notifications),
];

const PRIVACY_TOGGLES: [(&str, &str, Flag); 2] = [
    ("show-profile", "Show my profile to other users", |p| &mut p.show_profile),
    ("share-data", "Share anonymous usage data", |p| &mut p.share_usage_data),
];

fn toggles(
    prefs: RwSignal<Preferences>,
    items: &'static [(&'static str, &'static str, Flag)],
) -> impl IntoView {
    items
        .iter()
        .map(|&(id, label, flag)| {
            view! {
                <label for=id class="label cursor-pointer justify-start gap-4">
                    <input id=id type="checkbox" class="toggle toggle-primary"
                        prop:checked=move || {
                            let mut p = prefs.get();
                            *flag(&mut p)
                        }
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            prefs.update(|p| *flag(p) = checked);
                        }
                    />
                    <span class="label-text">{label}</span>
                </label>
            }
        })
        .collect_view()
}

/// 下拉选择：(值, 标签) 列表 + 当前值
fn choice_select(
    id: &'static str,
    options: Vec<(&'static str, &'static str)>,
    current: impl Fn() -> &'static str + Send + Sync + 'static,
    on_change: impl Fn(String) + 'static,
) -> impl IntoView {
    view! {
        <select id=id class="select select-bordered w-full"
            prop:value=current
            on:change=move |ev| on_change(event_target_value(&ev))
        >
            {options
                .into_iter()
                .map(|(value, label)| view! { <option value=value>{label}</option> })
                .collect_view()}
        </select>
    }
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    let prefs = RwSignal::new(Preferences::load(&BrowserStorage));
    let notice = RwSignal::new(Option::<(String, bool)>::None);

    let save = move |_| {
        let current = prefs.get_untracked();
        if current.save(&BrowserStorage) {
            apply_preferences(&current);
            notice.set(Some(("Settings saved.".to_string(), false)));
        } else {
            notice.set(Some(("Could not save settings in this browser.".to_string(), true)));
        }
    };
    let reset = move |_| prefs.set(Preferences::default());

    view! {
        <Toast notice=notice />
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body divide-y divide-base-200">
                <h3 class="card-title gap-2 pb-4">
                    <Settings attr:class="h-5 w-5 text-primary" /> "Settings"
                </h3>

                <section class="py-4">
                    <h4 class="font-bold mb-2">"Notifications"</h4>
                    {toggles(prefs, &NOTIFICATION_TOGGLES)}
                </section>

                <section class="py-4">
                    <h4 class="font-bold mb-2">"Privacy"</h4>
                    {toggles(prefs, &PRIVACY_TOGGLES)}
                </section>

                <section class="py-4 grid md:grid-cols-2 gap-4">
                    <div class="form-control">
                        <label for="theme" class="label"><span class="label-text">"Theme"</span></label>
                        {choice_select(
                            "theme",
                            Theme::ALL.iter().map(|t| (t.as_str(), t.label())).collect(),
                            move || prefs.with(|p| p.theme.as_str()),
                            move |v| {
                                if let Ok(theme) = v.parse::<Theme>() {
                                    prefs.update(|p| p.theme = theme);
                                }
                            },
                        )}
                    </div>
                    <div class="form-control">
                        <label for="font-size" class="label"><span class="label-text">"Font size"</span></label>
                        {choice_select(
                            "font-size",
                            FontSize::ALL.iter().map(|f| (f.as_str(), f.label())).collect(),
                            move || prefs.with(|p| p.font_size.as_str()),
                            move |v| {
                                if let Ok(size) = v.parse::<FontSize>() {
                                    prefs.update(|p| p.font_size = size);
                                }
                            },
                        )}
                    </div>
                </section>

                <section class="py-4 form-control">
                    <label for="language" class="label"><span class="label-text font-bold">"Language"</span></label>
                    {choice_select(
                        "language",
                        Language::ALL.iter().map(|l| (l.as_str(), l.label())).collect(),
                        move || prefs.with(|p| p.language.as_str()),
                        move |v| {
                            if let Ok(language) = v.parse::<Language>() {
                                prefs.update(|p| p.language = language);
                            }
                        },
                    )}
                </section>

                <div class="card-actions justify-end pt-4">
                    <button class="btn btn-ghost" on:click=reset>"Reset to defaults"</button>
                    <button class="btn btn-primary" on:click=save>"Save Changes"</button>
                </div>
            </div>
        </div>
    }
}
