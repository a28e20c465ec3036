//! 表单状态管理模块
//!
//! 向导状态机本身在共享层（[`ClaimWizard`]），这里只把它放进一个信号：
//! - 读取时按需投影出步骤、字段值和错误
//! - 写入时调用状态机的方法，让校验规则只有一份

use leptos::prelude::*;
use leptos::task::spawn_local;
use reliefclaim_shared::claim_form::{ClaimStep, ClaimWizard, SubmissionStatus};

use crate::auth::AuthContext;
use crate::web::BrowserFile;

/// 表单状态结构体
///
/// 浏览器文件句柄不是 `Send`，所以使用本地存储的信号。
#[derive(Clone, Copy)]
pub struct ClaimFormState {
    wizard: RwSignal<ClaimWizard<BrowserFile>, LocalStorage>,
}

impl ClaimFormState {
    pub fn new() -> Self {
        Self {
            wizard: RwSignal::new_local(ClaimWizard::new()),
        }
    }

    pub fn step(&self) -> ClaimStep {
        self.wizard.with(|w| w.step())
    }

    pub fn with<R>(&self, f: impl FnOnce(&ClaimWizard<BrowserFile>) -> R) -> R {
        self.wizard.with(f)
    }

    pub fn update(&self, f: impl FnOnce(&mut ClaimWizard<BrowserFile>)) {
        self.wizard.update(f);
    }

    /// 字段错误（第一条）
    pub fn error(&self, field: &'static str) -> Signal<Option<String>> {
        let wizard = self.wizard;
        Signal::derive(move || wizard.with(|w| w.errors().first(field)))
    }

    pub fn is_submitting(&self) -> bool {
        self.wizard.with(|w| w.is_submitting())
    }

    pub fn status(&self) -> SubmissionStatus {
        self.wizard.with(|w| w.status().clone())
    }

    /// 校验后发送，响应回来时应用到状态机
    ///
    /// 页面已卸载时 `try_update` 直接丢弃结果。
    pub fn submit(&self, auth: AuthContext) {
        let Some(submission) = self.wizard.try_update(|w| w.prepare_submission()).flatten() else {
            return;
        };
        let wizard = self.wizard;
        let api = auth.api();
        spawn_local(async move {
            let result = api.submit_claim(submission).await;
            if let Err(e) = &result {
                auth.report(e);
            }
            wizard.try_update(|w| w.apply_result(result));
        });
    }
}

impl Default for ClaimFormState {
    fn default() -> Self {
        Self::new()
    }
}
