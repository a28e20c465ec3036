//! 理赔提交向导
//!
//! 三步线性状态机：`BasicInfo -> Details -> Documents`。
//! - 只有当前步骤的必填字段都非空时才能前进，不能跳步
//! - 后退总是允许
//! - 附件在加入列表前按类型白名单和大小上限逐个检查
//! - 提交成功后清空草稿并回到第一步，同时保留后端给出的预测结果

use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult, FieldErrors};
use crate::gateway::ClaimsApi;
use crate::models::{DisasterType, PropertyType, SubmittedClaim};
use crate::transport::{FormPart, HttpClient};

/// 单个附件大小上限 (5 MiB)
pub const MAX_ATTACHMENT_BYTES: u64 = 5 * 1024 * 1024;

pub const ALLOWED_CONTENT_TYPES: [&str; 6] = [
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/gif",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

pub const FIELD_DISASTER_TYPE: &str = "disaster_type";
pub const FIELD_PROPERTY_TYPE: &str = "property_type";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_ESTIMATED_LOSS: &str = "estimated_loss";
pub const FIELD_DOCUMENTS: &str = "documents";

/// 附件元数据，由平台文件类型实现
pub trait Attachment: Clone {
    fn file_name(&self) -> String;
    fn content_type(&self) -> String;
    fn size(&self) -> u64;
}

// =========================================================
// 步骤
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClaimStep {
    #[default]
    BasicInfo,
    Details,
    Documents,
}

impl ClaimStep {
    pub const ALL: [ClaimStep; 3] = [ClaimStep::BasicInfo, ClaimStep::Details, ClaimStep::Documents];

    /// 从 1 开始的序号
    pub fn number(&self) -> usize {
        match self {
            ClaimStep::BasicInfo => 1,
            ClaimStep::Details => 2,
            ClaimStep::Documents => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ClaimStep::BasicInfo => "Basic Info",
            ClaimStep::Details => "Details",
            ClaimStep::Documents => "Documents",
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            ClaimStep::BasicInfo => Some(ClaimStep::Details),
            ClaimStep::Details => Some(ClaimStep::Documents),
            ClaimStep::Documents => None,
        }
    }

    fn prev(self) -> Option<Self> {
        match self {
            ClaimStep::BasicInfo => None,
            ClaimStep::Details => Some(ClaimStep::BasicInfo),
            ClaimStep::Documents => Some(ClaimStep::Details),
        }
    }

    /// 字段所在的步骤
    fn of_field(field: &str) -> Option<Self> {
        match field {
            FIELD_DISASTER_TYPE | FIELD_PROPERTY_TYPE => Some(ClaimStep::BasicInfo),
            FIELD_DESCRIPTION | FIELD_ESTIMATED_LOSS => Some(ClaimStep::Details),
            FIELD_DOCUMENTS => Some(ClaimStep::Documents),
            _ => None,
        }
    }
}

// =========================================================
// 草稿
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ClaimDraft<F> {
    pub disaster_type: Option<DisasterType>,
    pub property_type: Option<PropertyType>,
    pub description: String,
    /// 原始输入，提交时再解析为数字
    pub estimated_loss: String,
    pub attachments: Vec<F>,
}

impl<F> Default for ClaimDraft<F> {
    fn default() -> Self {
        Self {
            disaster_type: None,
            property_type: None,
            description: String::new(),
            estimated_loss: String::new(),
            attachments: Vec::new(),
        }
    }
}

impl<F> ClaimDraft<F> {
    pub fn is_empty(&self) -> bool {
        self.disaster_type.is_none()
            && self.property_type.is_none()
            && self.description.is_empty()
            && self.estimated_loss.is_empty()
            && self.attachments.is_empty()
    }

    /// 解析后的损失金额，必须为正数
    pub fn estimated_loss_value(&self) -> Option<f64> {
        self.estimated_loss
            .trim()
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v > 0.0)
    }

    /// 指定步骤的必填字段校验
    pub fn step_errors(&self, step: ClaimStep) -> FieldErrors {
        let mut errors = FieldErrors::new();
        match step {
            ClaimStep::BasicInfo => {
                if self.disaster_type.is_none() {
                    errors.add(FIELD_DISASTER_TYPE, "Please select a disaster type.");
                }
                if self.property_type.is_none() {
                    errors.add(FIELD_PROPERTY_TYPE, "Please select a property type.");
                }
            }
            ClaimStep::Details => {
                if self.description.trim().is_empty() {
                    errors.add(FIELD_DESCRIPTION, "Please describe the damage.");
                }
                if self.estimated_loss.trim().is_empty() {
                    errors.add(FIELD_ESTIMATED_LOSS, "Please enter the estimated loss.");
                } else if self.estimated_loss_value().is_none() {
                    errors.add(FIELD_ESTIMATED_LOSS, "Estimated loss must be a positive number.");
                }
            }
            // 附件是可选的
            ClaimStep::Documents => {}
        }
        errors
    }
}

// =========================================================
// 附件检查
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IntakeError {
    #[error("File type not allowed. Upload PDF, JPEG, PNG, GIF or Word documents.")]
    UnsupportedType,
    #[error("File is larger than 5 MB.")]
    TooLarge,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRejection {
    pub file_name: String,
    pub reason: IntakeError,
}

pub fn check_attachment<F: Attachment>(file: &F) -> Result<(), IntakeError> {
    let content_type = file.content_type();
    if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(IntakeError::UnsupportedType);
    }
    if file.size() > MAX_ATTACHMENT_BYTES {
        return Err(IntakeError::TooLarge);
    }
    Ok(())
}

// =========================================================
// 提交
// =========================================================

/// 校验通过的提交内容
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimSubmission<F> {
    pub disaster_type: DisasterType,
    pub property_type: PropertyType,
    pub description: String,
    pub estimated_loss: f64,
    pub documents: Vec<F>,
}

impl<F> ClaimSubmission<F> {
    /// multipart 字段顺序：文本字段在前，每个附件一个 `documents` 字段
    pub fn into_parts(self) -> Vec<FormPart<F>> {
        let mut parts = vec![
            FormPart::text(FIELD_DISASTER_TYPE, self.disaster_type.as_str()),
            FormPart::text(FIELD_PROPERTY_TYPE, self.property_type.as_str()),
            FormPart::text(FIELD_DESCRIPTION, self.description),
            FormPart::text(FIELD_ESTIMATED_LOSS, format!("{:.2}", self.estimated_loss)),
        ];
        parts.extend(self.documents.into_iter().map(|file| FormPart::File {
            name: FIELD_DOCUMENTS.to_string(),
            file,
        }));
        parts
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded(SubmittedClaim),
    Failed(String),
}

// =========================================================
// 向导状态机
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ClaimWizard<F> {
    step: ClaimStep,
    draft: ClaimDraft<F>,
    errors: FieldErrors,
    /// 文件名 -> 拒收原因
    file_errors: FieldErrors,
    status: SubmissionStatus,
}

impl<F> Default for ClaimWizard<F> {
    fn default() -> Self {
        Self {
            step: ClaimStep::default(),
            draft: ClaimDraft::default(),
            errors: FieldErrors::new(),
            file_errors: FieldErrors::new(),
            status: SubmissionStatus::Idle,
        }
    }
}

impl<F: Attachment> ClaimWizard<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> ClaimStep {
        self.step
    }

    pub fn draft(&self) -> &ClaimDraft<F> {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn file_errors(&self) -> &FieldErrors {
        &self.file_errors
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmissionStatus::Submitting
    }

    // --- 字段编辑：修改时清除该字段的旧错误 ---

    pub fn set_disaster_type(&mut self, value: Option<DisasterType>) {
        self.draft.disaster_type = value;
        self.errors.remove(FIELD_DISASTER_TYPE);
    }

    pub fn set_property_type(&mut self, value: Option<PropertyType>) {
        self.draft.property_type = value;
        self.errors.remove(FIELD_PROPERTY_TYPE);
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.draft.description = value.into();
        self.errors.remove(FIELD_DESCRIPTION);
    }

    pub fn set_estimated_loss(&mut self, value: impl Into<String>) {
        self.draft.estimated_loss = value.into();
        self.errors.remove(FIELD_ESTIMATED_LOSS);
    }

    // --- 步骤切换 ---

    /// 前进一步；当前步骤必填字段缺失时拒绝，步骤不变
    pub fn advance(&mut self) -> bool {
        let errors = self.draft.step_errors(self.step);
        if !errors.is_empty() {
            debug!(step = self.step.number(), missing = errors.len(), "advance rejected");
            self.errors = errors;
            return false;
        }
        match self.step.next() {
            Some(next) => {
                self.errors.clear();
                self.step = next;
                debug!(step = next.number(), "advanced");
                true
            }
            None => false,
        }
    }

    /// 后退一步，第一步时无操作
    pub fn back(&mut self) -> bool {
        match self.step.prev() {
            Some(prev) => {
                self.step = prev;
                self.errors.clear();
                true
            }
            None => false,
        }
    }

    /// 跳转到已经经过的步骤（不允许向前跳）
    pub fn go_to(&mut self, step: ClaimStep) -> bool {
        if step.number() > self.step.number() {
            return false;
        }
        self.step = step;
        true
    }

    // --- 附件 ---

    /// 逐个检查候选附件：通过的追加到列表，拒收的记录到文件错误中
    pub fn add_files(&mut self, files: impl IntoIterator<Item = F>) -> Vec<FileRejection> {
        self.file_errors.clear();
        let mut rejected = Vec::new();
        for file in files {
            match check_attachment(&file) {
                Ok(()) => self.draft.attachments.push(file),
                Err(reason) => {
                    let file_name = file.file_name();
                    warn!(%file_name, %reason, "attachment rejected");
                    self.file_errors.add(file_name.clone(), reason.to_string());
                    rejected.push(FileRejection { file_name, reason });
                }
            }
        }
        rejected
    }

    pub fn remove_attachment(&mut self, index: usize) -> Option<F> {
        (index < self.draft.attachments.len()).then(|| self.draft.attachments.remove(index))
    }

    // --- 提交 ---

    /// 校验全部步骤并进入提交中状态
    ///
    /// 校验失败时跳回第一个有错误的步骤；已在提交中时返回 `None`。
    pub fn prepare_submission(&mut self) -> Option<ClaimSubmission<F>> {
        if self.is_submitting() {
            return None;
        }
        for step in ClaimStep::ALL {
            let errors = self.draft.step_errors(step);
            if !errors.is_empty() {
                self.errors = errors;
                self.step = step;
                return None;
            }
        }

        let (Some(disaster_type), Some(property_type), Some(estimated_loss)) = (
            self.draft.disaster_type,
            self.draft.property_type,
            self.draft.estimated_loss_value(),
        ) else {
            return None;
        };

        self.errors.clear();
        self.status = SubmissionStatus::Submitting;
        Some(ClaimSubmission {
            disaster_type,
            property_type,
            description: self.draft.description.trim().to_string(),
            estimated_loss,
            documents: self.draft.attachments.clone(),
        })
    }

    /// 处理后端响应
    pub fn apply_result(&mut self, result: ApiResult<SubmittedClaim>) {
        match result {
            Ok(outcome) => {
                info!(
                    predicted_approval = ?outcome.predicted_approval,
                    predicted_limit = ?outcome.predicted_limit,
                    "claim submitted"
                );
                self.draft = ClaimDraft::default();
                self.step = ClaimStep::BasicInfo;
                self.errors.clear();
                self.file_errors.clear();
                self.status = SubmissionStatus::Succeeded(outcome);
            }
            Err(ApiError::Validation(errors)) => {
                // 回到出错字段所在的最早一步
                if let Some(step) = errors
                    .iter()
                    .filter_map(|(field, _)| ClaimStep::of_field(field))
                    .min_by_key(ClaimStep::number)
                {
                    self.step = step;
                }
                let message = ApiError::Validation(errors.clone()).user_message();
                self.errors = errors;
                self.status = SubmissionStatus::Failed(message);
            }
            Err(e) => {
                warn!(error = %e, "claim submission failed");
                self.status = SubmissionStatus::Failed(
                    "Failed to submit claim. Please try again.".to_string(),
                );
            }
        }
    }

    /// 关闭上一次提交的结果提示
    pub fn dismiss_status(&mut self) {
        if !self.is_submitting() {
            self.status = SubmissionStatus::Idle;
        }
    }

    /// 校验、发送并处理结果
    pub async fn submit<C>(&mut self, api: &ClaimsApi<C>) -> &SubmissionStatus
    where
        C: HttpClient<File = F>,
    {
        if let Some(submission) = self.prepare_submission() {
            let result = api.submit_claim(submission).await;
            self.apply_result(result);
        }
        &self.status
    }
}

#[cfg(test)]
mod tests;
