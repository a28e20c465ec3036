use crate::auth::{AuthFailure, register, use_auth};
use crate::components::icons::ShieldCheck;
use crate::components::{ErrorAlert, FieldError};
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use reliefclaim_shared::AppRoute;
use reliefclaim_shared::credentials::RegisterForm;

/// 注册表单的一个输入框
#[component]
fn RegisterField(
    id: &'static str,
    label: &'static str,
    #[prop(default = "text")] kind: &'static str,
    value: RwSignal<String>,
    #[prop(into)] error: Signal<Option<String>>,
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label" for=id>
                <span class="label-text">{label}</span>
            </label>
            <input
                id=id
                type=kind
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=value
                class=move || if error.with(Option::is_some) { "input input-bordered input-error" } else { "input input-bordered" }
            />
            <FieldError error=error />
        </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let failure = RwSignal::new(Option::<AuthFailure>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }
        set_is_submitting.set(true);
        failure.set(None);

        let form = RegisterForm {
            username: username.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            confirm_password: confirm.get_untracked(),
        };
        spawn_local(async move {
            match register(&auth, form).await {
                Ok(()) => router.navigate_to(AppRoute::Login),
                Err(e) => {
                    failure.try_set(Some(e));
                }
            }
            set_is_submitting.try_set(false);
        });
    };

    let message = Signal::derive(move || failure.with(|f| f.as_ref().and_then(AuthFailure::message)));
    let field = move |name: &'static str| {
        Signal::derive(move || failure.with(|f| f.as_ref().and_then(|f| f.field(name))))
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="flex flex-col items-center gap-2 mb-4">
                    <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                        <ShieldCheck attr:class="h-8 w-8" />
                    </div>
                    <h1 class="text-3xl font-bold">"Create your account"</h1>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert message=message />
                        <RegisterField id="username" label="Username" value=username error=field("username") />
                        <RegisterField id="email" label="Email" kind="email" value=email error=field("email") />
                        <RegisterField id="password" label="Password" kind="password" value=password error=field("password") />
                        <RegisterField id="confirm_password" label="Confirm password" kind="password" value=confirm error=field("confirm_password") />
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Register".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Already registered? "
                            <Link to=AppRoute::Login class="link link-primary">"Sign in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
