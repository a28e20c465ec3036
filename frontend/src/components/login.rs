use crate::auth::{AuthFailure, login, use_auth};
use crate::components::icons::ShieldCheck;
use crate::components::{ErrorAlert, FieldError};
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reliefclaim_shared::AppRoute;
use reliefclaim_shared::credentials::LoginForm;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let failure = RwSignal::new(Option::<AuthFailure>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }
        set_is_submitting.set(true);
        failure.set(None);

        let form = LoginForm {
            username: username.get_untracked(),
            password: password.get_untracked(),
        };
        // 成功后路由服务监听到令牌变化，自动跳转到控制面板
        spawn_local(async move {
            if let Err(e) = login(&auth, form).await {
                failure.try_set(Some(e));
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
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <ShieldCheck attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"ReliefClaim"</h1>
                        <p class="text-base-content/70">"Sign in to manage your disaster claims"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorAlert message=message />

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                autocomplete="username"
                                on:input=move |ev| username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                            />
                            <FieldError error=field("username") />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                autocomplete="current-password"
                                placeholder="••••••••"
                                on:input=move |ev| password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                            />
                            <FieldError error=field("password") />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Sign in".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "No account yet? "
                            <Link to=AppRoute::Register class="link link-primary">"Create one"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
