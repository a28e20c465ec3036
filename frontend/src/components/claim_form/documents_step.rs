//! 第三步：上传附件并确认

use leptos::prelude::*;
use reliefclaim_shared::claim_form::{Attachment, MAX_ATTACHMENT_BYTES};
use reliefclaim_shared::dashboard::format_money;
use web_sys::HtmlInputElement;

use super::form_state::ClaimFormState;
use crate::components::icons::{Trash2, Upload};
use crate::web::BrowserFile;

const ACCEPT: &str = ".pdf,.jpg,.jpeg,.png,.gif,.doc,.docx";

fn human_size(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.0} KB", (bytes as f64 / 1024.0).ceil())
    }
}

#[component]
pub fn DocumentsStep(state: ClaimFormState) -> impl IntoView {
    let on_change = move |ev: web_sys::Event| {
        let input: HtmlInputElement = event_target(&ev);
        let files = BrowserFile::from_input(&input);
        state.update(|w| {
            w.add_files(files);
        });
        // 清空选择，允许重复选择同一个文件
        input.set_value("");
    };

    let attachments = move || {
        state.with(|w| {
            w.draft()
                .attachments
                .iter()
                .map(|f| (f.file_name(), f.size()))
                .collect::<Vec<_>>()
        })
    };
    let rejections = move || {
        state.with(|w| {
            w.file_errors()
                .iter()
                .map(|(name, messages)| (name.to_string(), messages.join(" ")))
                .collect::<Vec<_>>()
        })
    };

    let summary = move || {
        state.with(|w| {
            let d = w.draft();
            (
                d.disaster_type.map(|t| t.label()).unwrap_or_default(),
                d.property_type.map(|t| t.label()).unwrap_or_default(),
                d.estimated_loss_value().map(format_money).unwrap_or_default(),
            )
        })
    };

    view! {
        <div class="form-control">
            <label for="documents" class="label">
                <span class="label-text">"Supporting documents (optional)"</span>
                <span class="label-text-alt">
                    {format!("PDF, images or Word, up to {}", human_size(MAX_ATTACHMENT_BYTES))}
                </span>
            </label>
            <label class="btn btn-outline gap-2 w-fit">
                <Upload attr:class="h-4 w-4" /> "Add files"
                <input id="documents" type="file" multiple accept=ACCEPT class="hidden" on:change=on_change />
            </label>
        </div>

        <ul class="space-y-1">
            {move || {
                rejections()
                    .into_iter()
                    .map(|(name, message)| {
                        view! {
                            <li class="text-error text-sm">
                                <span class="font-mono">{name}</span> ": " {message}
                            </li>
                        }
                    })
                    .collect_view()
            }}
        </ul>

        <ul class="menu bg-base-200 rounded-box">
            <Show when=move || state.with(|w| w.draft().attachments.is_empty())>
                <li class="text-base-content/50 p-2">"No documents attached."</li>
            </Show>
            {move || {
                attachments()
                    .into_iter()
                    .enumerate()
                    .map(|(index, (name, size))| {
                        view! {
                            <li>
                                <div class="flex justify-between">
                                    <span class="font-mono text-sm">{name}</span>
                                    <span class="flex items-center gap-2">
                                        <span class="text-xs opacity-60">{human_size(size)}</span>
                                        <button type="button" class="btn btn-ghost btn-xs text-error"
                                            on:click=move |_| state.update(|w| {
                                                w.remove_attachment(index);
                                            })
                                        >
                                            <Trash2 attr:class="h-4 w-4" />
                                        </button>
                                    </span>
                                </div>
                            </li>
                        }
                    })
                    .collect_view()
            }}
        </ul>

        <div class="bg-base-200 rounded-lg p-4 text-sm space-y-1">
            <h4 class="font-bold">"Review"</h4>
            {move || {
                let (disaster, property, loss) = summary();
                view! {
                    <p>"Disaster: " {disaster}</p>
                    <p>"Property: " {property}</p>
                    <p>"Estimated loss: " {loss}</p>
                }
            }}
        </div>
    }
}
