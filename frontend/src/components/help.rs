//! 帮助中心：可搜索的常见问题 + 联系方式

use crate::components::icons::{HelpCircle, Mail, MessageCircle, Phone, Search};
use leptos::prelude::*;
use reliefclaim_shared::help::{SUPPORT_CHANNELS, SupportChannel, search_faqs};

fn channel_icon(index: usize) -> AnyView {
    match index {
        0 => view! { <Mail attr:class="h-10 w-10 text-primary" /> }.into_any(),
        1 => view! { <Phone attr:class="h-10 w-10 text-primary" /> }.into_any(),
        _ => view! { <MessageCircle attr:class="h-10 w-10 text-primary" /> }.into_any(),
    }
}

#[component]
fn ChannelCard(index: usize, channel: SupportChannel) -> impl IntoView {
    let action = match channel.href {
        Some(href) => view! {
            <a href=href class="btn btn-outline btn-primary w-full">{channel.action}</a>
        }
        .into_any(),
        None => view! {
            <button class="btn btn-outline w-full" disabled=true>{channel.action} " (coming soon)"</button>
        }
        .into_any(),
    };

    view! {
        <div class="card bg-base-200 h-full">
            <div class="card-body items-center text-center">
                {channel_icon(index)}
                <h4 class="card-title text-base">{channel.title}</h4>
                <p class="text-sm text-base-content/70">{channel.description}</p>
                {action}
            </div>
        </div>
    }
}

#[component]
pub fn HelpPage() -> impl IntoView {
    let query = RwSignal::new(String::new());
    let results = Memo::new(move |_| query.with(|q| search_faqs(q)));

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body space-y-4">
                <h3 class="card-title gap-2">
                    <HelpCircle attr:class="h-5 w-5 text-primary" /> "Help & Support"
                </h3>
                <label class="input input-bordered flex items-center gap-2">
                    <Search attr:class="h-4 w-4 opacity-60" />
                    <input type="search" class="grow" placeholder="Search FAQs..."
                        prop:value=move || query.get()
                        on:input=move |ev| query.set(event_target_value(&ev))
                    />
                </label>

                <h4 class="font-bold">"Frequently Asked Questions"</h4>
                <div class="space-y-2">
                    {move || {
                        results
                            .get()
                            .into_iter()
                            .map(|faq| view! {
                                <div class="collapse collapse-arrow bg-base-200">
                                    <input type="radio" name="faq" />
                                    <div class="collapse-title font-medium">{faq.question}</div>
                                    <div class="collapse-content text-sm"><p>{faq.answer}</p></div>
                                </div>
                            })
                            .collect_view()
                    }}
                </div>
                <Show when=move || results.with(Vec::is_empty)>
                    <p class="text-center py-4 text-base-content/50">
                        "No FAQs match your search. Try different keywords or contact support."
                    </p>
                </Show>
            </div>
        </div>

        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title">"Contact Support"</h3>
                <div class="grid md:grid-cols-3 gap-4">
                    {SUPPORT_CHANNELS
                        .into_iter()
                        .enumerate()
                        .map(|(index, channel)| view! { <ChannelCard index=index channel=channel /> })
                        .collect_view()}
                </div>
            </div>
        </div>
    }
}
