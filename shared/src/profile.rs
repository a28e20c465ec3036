//! 用户资料编辑
//!
//! 本地校验（电话、按国家区分的邮编、城市名长度）在提交前执行，
//! 后端返回的字段错误覆盖合并到本地错误之上。

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::error::{ApiError, ApiResult, FieldErrors};
use crate::models::Profile;
use crate::protocol::UpdateProfile;

pub const MIN_CITY_LEN: usize = 2;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9\s\-()]{6,19}$").expect("valid phone regex"));

static US_POSTAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid postal regex"));
static CA_POSTAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]\d[A-Za-z][ -]?\d[A-Za-z]\d$").expect("valid postal regex")
});
static UK_POSTAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{1,2}\d[A-Za-z\d]?\s?\d[A-Za-z]{2}$").expect("valid postal regex")
});
static IN_POSTAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}$").expect("valid postal regex"));
static GENERIC_POSTAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\s\-]{3,10}$").expect("valid postal regex"));

/// 根据国家选择邮编格式
fn postal_pattern(country: &str) -> &'static Regex {
    match country.trim().to_ascii_lowercase().as_str() {
        "united states" | "united states of america" | "usa" | "us" => &*US_POSTAL_RE,
        "canada" | "ca" => &*CA_POSTAL_RE,
        "united kingdom" | "uk" | "gb" | "great britain" => &*UK_POSTAL_RE,
        "india" | "in" => &*IN_POSTAL_RE,
        _ => &*GENERIC_POSTAL_RE,
    }
}

// =========================================================
// 草稿与部分更新
// =========================================================

/// PATCH 请求体：只序列化有变化的字段
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// 可编辑字段（邮箱只读，不在其中）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDraft {
    pub username: String,
    pub phone_number: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub emergency_contact: String,
}

impl From<&Profile> for ProfileDraft {
    fn from(p: &Profile) -> Self {
        Self {
            username: p.username.clone(),
            phone_number: p.phone_number.clone(),
            street_address: p.street_address.clone(),
            city: p.city.clone(),
            state: p.state.clone(),
            country: p.country.clone(),
            postal_code: p.postal_code.clone(),
            emergency_contact: p.emergency_contact.clone(),
        }
    }
}

fn changed(new: &str, old: &str) -> Option<String> {
    let new = new.trim();
    (new != old.trim()).then(|| new.to_string())
}

impl ProfileDraft {
    /// 客户端校验，空字段不校验格式
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.username.trim().is_empty() {
            errors.add("username", "Username is required.");
        }

        let phone = self.phone_number.trim();
        if !phone.is_empty() && !PHONE_RE.is_match(phone) {
            errors.add("phone_number", "Enter a valid phone number, e.g. +15551234567.");
        }

        let postal = self.postal_code.trim();
        if !postal.is_empty() && !postal_pattern(&self.country).is_match(postal) {
            errors.add("postal_code", "Invalid postal code for the selected country.");
        }

        let city = self.city.trim();
        if !city.is_empty() && city.chars().count() < MIN_CITY_LEN {
            errors.add(
                "city",
                format!("City name must be at least {MIN_CITY_LEN} characters."),
            );
        }

        errors
    }

    /// 与原始记录比较，得到部分更新
    pub fn changes(&self, original: &Profile) -> ProfileUpdate {
        ProfileUpdate {
            username: changed(&self.username, &original.username),
            phone_number: changed(&self.phone_number, &original.phone_number),
            street_address: changed(&self.street_address, &original.street_address),
            city: changed(&self.city, &original.city),
            state: changed(&self.state, &original.state),
            country: changed(&self.country, &original.country),
            postal_code: changed(&self.postal_code, &original.postal_code),
            emergency_contact: changed(&self.emergency_contact, &original.emergency_contact),
        }
    }
}

// =========================================================
// 编辑器状态
// =========================================================

/// 提交结果
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved,
    NoChanges,
    Invalid,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileEditor {
    original: Profile,
    pub draft: ProfileDraft,
    pub errors: FieldErrors,
}

impl ProfileEditor {
    pub fn new(profile: Profile) -> Self {
        Self {
            draft: ProfileDraft::from(&profile),
            original: profile,
            errors: FieldErrors::new(),
        }
    }

    pub fn profile(&self) -> &Profile {
        &self.original
    }

    pub fn is_dirty(&self) -> bool {
        !self.draft.changes(&self.original).is_empty()
    }

    /// 丢弃本地修改
    pub fn reset(&mut self) {
        self.draft = ProfileDraft::from(&self.original);
        self.errors.clear();
    }

    /// 本地校验通过后构造 PATCH 请求；无变化时返回 `Ok(None)`
    pub fn prepare_update(&mut self) -> Result<Option<UpdateProfile>, SaveOutcome> {
        self.errors = self.draft.validate();
        if !self.errors.is_empty() {
            debug!(fields = self.errors.len(), "profile rejected by local validation");
            return Err(SaveOutcome::Invalid);
        }
        let changes = self.draft.changes(&self.original);
        if changes.is_empty() {
            return Ok(None);
        }
        Ok(Some(UpdateProfile {
            id: self.original.id,
            changes,
        }))
    }

    pub fn apply_result(&mut self, result: ApiResult<Profile>) -> SaveOutcome {
        match result {
            Ok(profile) => {
                self.draft = ProfileDraft::from(&profile);
                self.original = profile;
                self.errors.clear();
                SaveOutcome::Saved
            }
            Err(ApiError::Validation(server)) => {
                self.errors.merge(server);
                SaveOutcome::Invalid
            }
            Err(e) => SaveOutcome::Failed(e.user_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            id: 9,
            username: "maria".into(),
            email: "maria@example.com".into(),
            country: "United States".into(),
            postal_code: "30301".into(),
            city: "Atlanta".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_us_postal_code() {
        let mut draft = ProfileDraft::from(&profile());
        draft.postal_code = "1234".into();
        assert!(draft.validate().contains("postal_code"));

        draft.postal_code = "12345".into();
        assert!(draft.validate().is_empty());

        draft.postal_code = "12345-6789".into();
        assert!(draft.validate().is_empty());
    }

    #[test]
    fn test_postal_code_depends_on_country() {
        let mut draft = ProfileDraft::from(&profile());
        draft.country = "Canada".into();
        draft.postal_code = "K1A 0B1".into();
        assert!(draft.validate().is_empty());

        draft.country = "India".into();
        assert!(draft.validate().contains("postal_code"));
        draft.postal_code = "560001".into();
        assert!(draft.validate().is_empty());
    }

    #[test]
    fn test_phone_and_city() {
        let mut draft = ProfileDraft::from(&profile());
        draft.phone_number = "call me".into();
        draft.city = "A".into();
        let errors = draft.validate();
        assert!(errors.contains("phone_number"));
        assert!(errors.contains("city"));

        draft.phone_number = "+1 (555) 123-4567".into();
        draft.city = "Macon".into();
        assert!(draft.validate().is_empty());
    }

    #[test]
    fn test_changes_only_include_edited_fields() {
        let original = profile();
        let mut draft = ProfileDraft::from(&original);
        assert!(draft.changes(&original).is_empty());

        draft.city = " Savannah ".into();
        let update = draft.changes(&original);
        assert_eq!(update.city.as_deref(), Some("Savannah"));
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({ "city": "Savannah" })
        );
    }

    #[test]
    fn test_server_errors_merge_over_local() {
        let mut editor = ProfileEditor::new(profile());
        editor.draft.city = "A".into();
        assert_eq!(editor.prepare_update(), Err(SaveOutcome::Invalid));
        assert!(editor.errors.contains("city"));

        editor.draft.city = "Gotham".into();
        editor.draft.phone_number = "+15551234567".into();
        let request = editor.prepare_update().unwrap().unwrap();
        assert_eq!(request.id, 9);

        let mut server = FieldErrors::new();
        server.add("phone_number", "Phone number already in use.");
        let outcome = editor.apply_result(Err(ApiError::Validation(server)));
        assert_eq!(outcome, SaveOutcome::Invalid);
        assert_eq!(
            editor.errors.first("phone_number").as_deref(),
            Some("Phone number already in use.")
        );
    }

    #[test]
    fn test_saved_profile_becomes_baseline() {
        let mut editor = ProfileEditor::new(profile());
        editor.draft.state = "GA".into();
        assert!(editor.is_dirty());

        let mut saved = profile();
        saved.state = "GA".into();
        assert_eq!(editor.apply_result(Ok(saved)), SaveOutcome::Saved);
        assert!(!editor.is_dirty());
        assert_eq!(editor.prepare_update(), Ok(None));
    }
}
