//! 提示类小组件

use leptos::prelude::*;

/// 整体错误提示
#[component]
pub fn ErrorAlert(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.with(Option::is_some)>
            <div role="alert" class="alert alert-error text-sm py-2">
                <svg xmlns="http://www.w3.org/2000/svg" class="stroke-current shrink-0 h-6 w-6" fill="none" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M10 14l2-2m0 0l2-2m-2 2l-2-2m2 2l2 2m7-2a9 9 0 11-18 0 9 9 0 0118 0z" /></svg>
                <span>{move || message.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}

/// 输入框下方的字段错误
#[component]
pub fn FieldError(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    move || {
        error.get().map(|e| {
            view! {
                <label class="label">
                    <span class="label-text-alt text-error">{e}</span>
                </label>
            }
        })
    }
}

/// 右上角的临时通知：(消息内容, 是否出错)，3 秒后自动消失
#[component]
pub fn Toast(notice: RwSignal<Option<(String, bool)>>) -> impl IntoView {
    Effect::new(move |_| {
        if notice.with(Option::is_some) {
            set_timeout(
                move || {
                    notice.try_set(None);
                },
                std::time::Duration::from_secs(3),
            );
        }
    });

    view! {
        <Show when=move || notice.with(Option::is_some)>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    let is_err = notice.with(|n| n.as_ref().is_some_and(|(_, err)| *err));
                    if is_err { "alert alert-error shadow-lg" } else { "alert alert-success shadow-lg" }
                }>
                    <span>{move || notice.get().map(|(m, _)| m).unwrap_or_default()}</span>
                </div>
            </div>
        </Show>
    }
}

/// 居中的加载动画
#[component]
pub fn Spinner() -> impl IntoView {
    view! {
        <div class="flex justify-center py-12">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}
