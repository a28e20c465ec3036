//! 错误类型模块
//!
//! 所有跨越 API 边界的失败都归一为 [`ApiError`]，视图层只需要把它转成提示信息。

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// 通用（非字段）错误使用的键
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

const DETAIL_KEY: &str = "detail";

// =========================================================
// 字段级错误
// =========================================================

/// 字段 -> 错误消息列表
///
/// 后端返回的 400 响应体形态不固定（字符串、数组、嵌套对象），
/// 在这里统一归一化，视图层拿到的永远是扁平的有序映射。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 JSON 响应体构建
    pub fn from_json(value: &Value) -> Self {
        let mut errors = Self::new();
        match value {
            Value::Object(map) => {
                for (field, messages) in map {
                    errors.collect(field, messages);
                }
            }
            other => errors.collect(NON_FIELD_ERRORS, other),
        }
        errors
    }

    fn collect(&mut self, field: &str, value: &Value) {
        match value {
            Value::Null => {}
            Value::String(s) => self.add(field, s.clone()),
            Value::Array(items) => {
                for item in items {
                    self.collect(field, item);
                }
            }
            Value::Object(nested) => {
                for (sub, messages) in nested {
                    self.collect(&format!("{field}.{sub}"), messages);
                }
            }
            other => self.add(field, other.to_string()),
        }
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// 用 `other` 中的字段覆盖当前同名字段，其余字段保留
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.insert(field, messages);
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// 字段的第一条错误消息（表单下方只显示一条）
    pub fn first(&self, field: &str) -> Option<String> {
        self.0.get(field).and_then(|m| m.first()).cloned()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn remove(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 不属于任何表单字段的消息
    pub fn general(&self) -> Vec<&str> {
        [NON_FIELD_ERRORS, DETAIL_KEY]
            .iter()
            .filter_map(|key| self.0.get(*key))
            .flatten()
            .map(String::as_str)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

// =========================================================
// 核心错误类型
// =========================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// 网络不可达或请求无法发出
    #[error("network error: {0}")]
    Network(String),
    /// 401 或者缺少会话令牌
    #[error("unauthorized")]
    Unauthorized,
    /// 400 且带有字段错误映射
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),
    #[error("resource not found")]
    NotFound,
    #[error("server responded with {status}: {message}")]
    Status { status: u16, message: String },
    /// 响应体无法解析为预期结构
    #[error("unexpected response: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// 根据状态码和响应体对失败响应进行分类
    pub fn from_response(status: u16, body: &str) -> Self {
        let json = serde_json::from_str::<Value>(body).ok();
        match status {
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound,
            400 => match json {
                Some(value @ (Value::Object(_) | Value::Array(_))) => {
                    ApiError::Validation(FieldErrors::from_json(&value))
                }
                _ => ApiError::Status {
                    status,
                    message: body.trim().to_string(),
                },
            },
            _ => {
                let message = json
                    .as_ref()
                    .and_then(|v| v.get(DETAIL_KEY))
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| body.trim().to_string());
                ApiError::Status { status, message }
            }
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// 面向用户的提示文案
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => {
                "Unable to reach the server. Please check your connection and try again.".into()
            }
            ApiError::Unauthorized => {
                "Invalid credentials or expired session. Please log in again.".into()
            }
            ApiError::Validation(errors) => match errors.general().first() {
                Some(message) => (*message).to_string(),
                None => "Please correct the highlighted fields.".into(),
            },
            ApiError::NotFound => "The requested resource was not found.".into(),
            ApiError::Status { status, .. } => {
                format!("Something went wrong ({status}). Please try again.")
            }
            ApiError::Decode(_) => "Received an unexpected response from the server.".into(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_errors_normalize_shapes() {
        let errors = FieldErrors::from_json(&json!({
            "estimated_loss": ["Must be positive."],
            "description": "This field is required.",
            "address": { "city": ["Too short."] },
        }));

        assert_eq!(errors.first("estimated_loss").as_deref(), Some("Must be positive."));
        assert_eq!(errors.first("description").as_deref(), Some("This field is required."));
        assert_eq!(errors.first("address.city").as_deref(), Some("Too short."));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_bare_list_becomes_general_error() {
        let errors = FieldErrors::from_json(&json!(["Claim window closed."]));
        assert_eq!(errors.general(), vec!["Claim window closed."]);
    }

    #[test]
    fn test_merge_overrides_same_field() {
        let mut local = FieldErrors::new();
        local.add("city", "City name is too short.");
        local.add("phone_number", "Invalid phone number.");

        let mut server = FieldErrors::new();
        server.add("city", "Unknown city.");
        local.merge(server);

        assert_eq!(local.get("city"), Some(&["Unknown city.".to_string()][..]));
        assert!(local.contains("phone_number"));
    }

    #[test]
    fn test_classify_responses() {
        assert_eq!(ApiError::from_response(401, ""), ApiError::Unauthorized);
        assert_eq!(ApiError::from_response(404, "{}"), ApiError::NotFound);

        let err = ApiError::from_response(400, r#"{"disaster_type":["Invalid choice."]}"#);
        assert_eq!(
            err.field_errors().and_then(|e| e.first("disaster_type")).as_deref(),
            Some("Invalid choice.")
        );

        let err = ApiError::from_response(500, r#"{"detail":"boom"}"#);
        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                message: "boom".into()
            }
        );

        // 400 但不是 JSON，退化为普通状态错误
        let err = ApiError::from_response(400, "Bad Request");
        assert!(matches!(err, ApiError::Status { status: 400, .. }));
    }

    #[test]
    fn test_user_message_prefers_general_error() {
        let err = ApiError::from_response(
            400,
            r#"{"non_field_errors":["Unable to log in with provided credentials."]}"#,
        );
        assert_eq!(err.user_message(), "Unable to log in with provided credentials.");

        let err = ApiError::from_response(400, r#"{"email":["Enter a valid email."]}"#);
        assert_eq!(err.user_message(), "Please correct the highlighted fields.");
    }
}
