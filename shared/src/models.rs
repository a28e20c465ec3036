//! 领域模型 (Domain Models)
//!
//! 这里的类型只读取后端数据，响应体的形态差异在反序列化时统一归一化。

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::value::SeqAccessDeserializer;
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

// =========================================================
// 枚举: 灾害 / 房产 / 理赔状态
// =========================================================

/// 后端未知的取值归入 `Other`，单条记录不会拖垮整个列表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisasterType {
    Wildfire,
    Flood,
    Earthquake,
    Hurricane,
    Tornado,
    #[serde(other)]
    Other,
}

impl DisasterType {
    pub const ALL: [DisasterType; 6] = [
        DisasterType::Wildfire,
        DisasterType::Flood,
        DisasterType::Earthquake,
        DisasterType::Hurricane,
        DisasterType::Tornado,
        DisasterType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisasterType::Wildfire => "wildfire",
            DisasterType::Flood => "flood",
            DisasterType::Earthquake => "earthquake",
            DisasterType::Hurricane => "hurricane",
            DisasterType::Tornado => "tornado",
            DisasterType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisasterType::Wildfire => "Wildfire",
            DisasterType::Flood => "Flood",
            DisasterType::Earthquake => "Earthquake",
            DisasterType::Hurricane => "Hurricane",
            DisasterType::Tornado => "Tornado",
            DisasterType::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    Automobile,
    House,
    Business,
    #[serde(other)]
    Other,
}

impl PropertyType {
    pub const ALL: [PropertyType; 4] = [
        PropertyType::Automobile,
        PropertyType::House,
        PropertyType::Business,
        PropertyType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Automobile => "automobile",
            PropertyType::House => "house",
            PropertyType::Business => "business",
            PropertyType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::Automobile => "Automobile",
            PropertyType::House => "House",
            PropertyType::Business => "Business",
            PropertyType::Other => "Other",
        }
    }
}

/// 选项解析失败
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown option: {0}")]
pub struct UnknownOption(pub String);

impl FromStr for DisasterType {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownOption(s.to_string()))
    }
}

impl FromStr for PropertyType {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownOption(s.to_string()))
    }
}

impl fmt::Display for DisasterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Pending,
    UnderReview,
    Approved,
    Rejected,
    Settled,
}

impl ClaimStatus {
    /// 仍在处理中
    pub fn is_open(&self) -> bool {
        matches!(self, ClaimStatus::Pending | ClaimStatus::UnderReview)
    }

    /// 已批准（包括已结算）
    pub fn is_approved(&self) -> bool {
        matches!(self, ClaimStatus::Approved | ClaimStatus::Settled)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "Pending",
            ClaimStatus::UnderReview => "Under Review",
            ClaimStatus::Approved => "Approved",
            ClaimStatus::Rejected => "Rejected",
            ClaimStatus::Settled => "Settled",
        }
    }
}

// =========================================================
// 理赔
// =========================================================

/// 批准预测：布尔标记，或 0..=1 的十进制分数（常以字符串 `"0.85"` 下发）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Prediction {
    Flag(bool),
    Score(f64),
}

impl Prediction {
    /// 分数达到一半即视为可能批准
    pub fn is_likely(&self) -> bool {
        match self {
            Prediction::Flag(flag) => *flag,
            Prediction::Score(score) => *score >= 0.5,
        }
    }

    /// 以百分比表示的分数
    pub fn percent(&self) -> Option<f64> {
        match self {
            Prediction::Flag(_) => None,
            Prediction::Score(score) => Some((score * 100.0).round()),
        }
    }
}

impl<'de> Deserialize<'de> for Prediction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Score(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(flag) => Ok(Prediction::Flag(flag)),
            Raw::Score(score) => Ok(Prediction::Score(score)),
            Raw::Text(text) => text
                .trim()
                .parse::<f64>()
                .map(Prediction::Score)
                .map_err(|_| de::Error::custom(format!("invalid prediction: {text}"))),
        }
    }
}

/// 已持久化的理赔记录（只读）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: u64,
    pub disaster_type: DisasterType,
    pub property_type: PropertyType,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "de_money")]
    pub estimated_loss: f64,
    pub status: ClaimStatus,
    #[serde(default)]
    pub predicted_approval: Option<Prediction>,
    #[serde(default, deserialize_with = "de_opt_money")]
    pub predicted_limit: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// 提交理赔后后端返回的预测结果
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubmittedClaim {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub status: Option<ClaimStatus>,
    #[serde(default)]
    pub predicted_approval: Option<Prediction>,
    #[serde(default, deserialize_with = "de_opt_money")]
    pub predicted_limit: Option<f64>,
}

// =========================================================
// 用户资料
// =========================================================

/// 用户资料（归一化后）
///
/// 后端可能返回扁平的 `username`/`email`，也可能嵌套在 `user` 对象中。
/// 后端以 `user` 作为资料主键，所以 `id` 可能只出现在 `user.id`。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawProfile")]
pub struct Profile {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub emergency_contact: String,
    pub profile_picture_url: Option<String>,
}

#[derive(Deserialize)]
struct RawUser {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct RawProfile {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    user: Option<RawUser>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default, alias = "address")]
    street_address: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    postal_code: Option<String>,
    #[serde(default)]
    emergency_contact: Option<String>,
    #[serde(default, alias = "profile_picture")]
    profile_picture_url: Option<String>,
}

impl TryFrom<RawProfile> for Profile {
    type Error = String;

    fn try_from(raw: RawProfile) -> Result<Self, Self::Error> {
        let (nested_id, nested_name, nested_email) = match raw.user {
            Some(user) => (user.id, user.username, user.email),
            None => (None, None, None),
        };
        let id = raw
            .id
            .or(nested_id)
            .ok_or_else(|| "profile record has neither `id` nor `user.id`".to_string())?;
        Ok(Self {
            id,
            username: raw.username.or(nested_name).unwrap_or_default(),
            email: raw.email.or(nested_email).unwrap_or_default(),
            phone_number: raw.phone_number.unwrap_or_default(),
            street_address: raw.street_address.unwrap_or_default(),
            city: raw.city.unwrap_or_default(),
            state: raw.state.unwrap_or_default(),
            country: raw.country.unwrap_or_default(),
            postal_code: raw.postal_code.unwrap_or_default(),
            emergency_contact: raw.emergency_contact.unwrap_or_default(),
            profile_picture_url: raw.profile_picture_url.filter(|u| !u.is_empty()),
        })
    }
}

// =========================================================
// 只读信息流
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisasterUpdate {
    pub id: u64,
    pub title: String,
    #[serde(default, alias = "content")]
    pub description: String,
    #[serde(default)]
    pub disaster_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "de_severity")]
    pub severity: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// 严重程度：文本，或 1..=3 的等级
fn de_severity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Level(u8),
        Text(String),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Level(1) => "Low".to_string(),
        Raw::Level(2) => "Medium".to_string(),
        Raw::Level(3) => "High".to_string(),
        Raw::Level(level) => format!("Level {level}"),
        Raw::Text(text) => text,
    }))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "link")]
    pub url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    pub message: String,
    #[serde(default, alias = "is_read")]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// =========================================================
// 响应包装
// =========================================================

/// 列表响应：裸数组或分页对象
///
/// 手写反序列化：按形态直接分派，元素的解析错误原样向上传递。
#[derive(Debug)]
pub enum ListResponse<T> {
    Plain(Vec<T>),
    Paginated { results: Vec<T> },
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ListResponse<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ListVisitor(PhantomData))
    }
}

struct ListVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for ListVisitor<T> {
    type Value = ListResponse<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array or an object with `results`")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
        Vec::<T>::deserialize(SeqAccessDeserializer::new(seq)).map(ListResponse::Plain)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut results = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == "results" {
                results = Some(map.next_value::<Vec<T>>()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        results
            .map(|results| ListResponse::Paginated { results })
            .ok_or_else(|| de::Error::missing_field("results"))
    }
}

impl<T> ListResponse<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListResponse::Plain(items) | ListResponse::Paginated { results: items } => items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnreadCount {
    #[serde(alias = "count")]
    pub unread_count: u64,
}

// =========================================================
// 金额字段: 数字或十进制字符串
// =========================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum Money {
    Number(f64),
    Text(String),
}

impl Money {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            Money::Number(n) => Ok(n),
            Money::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid amount: {s}"))),
        }
    }
}

fn de_money<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Money::deserialize(deserializer)?.into_f64()
}

fn de_opt_money<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Option::<Money>::deserialize(deserializer)?
        .map(Money::into_f64::<D::Error>)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_claim_accepts_decimal_strings() {
        let claim: Claim = serde_json::from_value(json!({
            "id": 7,
            "disaster_type": "flood",
            "property_type": "house",
            "description": "Basement flooded",
            "estimated_loss": "12500.50",
            "status": "under_review",
            "predicted_approval": true,
            "predicted_limit": 10000,
            "created_at": "2024-05-01T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(claim.estimated_loss, 12500.5);
        assert_eq!(claim.predicted_limit, Some(10000.0));
        assert_eq!(claim.predicted_approval, Some(Prediction::Flag(true)));
        assert_eq!(claim.status, ClaimStatus::UnderReview);
        assert!(claim.created_at.is_some());
    }

    #[test]
    fn test_claim_with_null_prediction() {
        let claim: Claim = serde_json::from_value(json!({
            "id": 1,
            "disaster_type": "wildfire",
            "property_type": "business",
            "estimated_loss": 900,
            "status": "pending",
            "predicted_limit": null
        }))
        .unwrap();

        assert_eq!(claim.predicted_limit, None);
        assert_eq!(claim.predicted_approval, None);
        assert!(claim.description.is_empty());
    }

    #[test]
    fn test_prediction_shapes() {
        let parse = |v| serde_json::from_value::<Prediction>(v);
        assert_eq!(parse(json!("0.85")).unwrap(), Prediction::Score(0.85));
        assert_eq!(parse(json!(0.3)).unwrap(), Prediction::Score(0.3));
        assert_eq!(parse(json!(false)).unwrap(), Prediction::Flag(false));
        assert!(parse(json!("soon")).is_err());

        assert!(Prediction::Score(0.5).is_likely());
        assert!(!Prediction::Score(0.49).is_likely());
        assert_eq!(Prediction::Score(0.854).percent(), Some(85.0));
        assert_eq!(Prediction::Flag(true).percent(), None);
    }

    #[test]
    fn test_unknown_choices_fall_back_to_other() {
        let claim: Claim = serde_json::from_value(json!({
            "id": 2,
            "disaster_type": "volcano",
            "property_type": "boat",
            "estimated_loss": "10.00",
            "status": "pending"
        }))
        .unwrap();

        assert_eq!(claim.disaster_type, DisasterType::Other);
        assert_eq!(claim.property_type, PropertyType::Other);
    }

    #[test]
    fn test_profile_id_from_user() {
        let profile: Profile = serde_json::from_value(json!({
            "user": { "id": 2, "username": "maria", "email": "m@x.com" },
            "phone_number": null,
            "address": "12 Shore Rd",
            "emergency_contact": null,
            "profile_picture": null
        }))
        .unwrap();

        assert_eq!(profile.id, 2);
        assert_eq!(profile.street_address, "12 Shore Rd");
        assert_eq!(profile.profile_picture_url, None);

        let missing = serde_json::from_value::<Profile>(json!({ "user": { "username": "x" } }));
        assert!(missing.unwrap_err().to_string().contains("user.id"));
    }

    #[test]
    fn test_disaster_update_severity_levels() {
        let update: DisasterUpdate = serde_json::from_value(json!({
            "id": 1,
            "disaster_type": "wildfire",
            "title": "Evacuation order",
            "description": "North county",
            "location": "Sonoma",
            "severity": 3,
            "source": "CAL FIRE",
            "url": null,
            "created_at": "2024-08-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(update.severity.as_deref(), Some("High"));
        assert_eq!(update.source.as_deref(), Some("CAL FIRE"));
    }

    #[test]
    fn test_profile_nested_user() {
        let profile: Profile = serde_json::from_value(json!({
            "id": 3,
            "user": { "username": "maria", "email": "maria@example.com" },
            "phone_number": "+15551234567",
            "city": null,
            "country": "United States",
            "profile_picture": ""
        }))
        .unwrap();

        assert_eq!(profile.username, "maria");
        assert_eq!(profile.email, "maria@example.com");
        assert_eq!(profile.city, "");
        assert_eq!(profile.profile_picture_url, None);
    }

    #[test]
    fn test_profile_flat_fields_win() {
        let profile: Profile = serde_json::from_value(json!({
            "id": 3,
            "username": "flat",
            "email": "flat@example.com",
            "user": { "username": "nested" },
            "profile_picture_url": "https://cdn.example.com/p.png"
        }))
        .unwrap();

        assert_eq!(profile.username, "flat");
        assert_eq!(
            profile.profile_picture_url.as_deref(),
            Some("https://cdn.example.com/p.png")
        );
    }

    #[test]
    fn test_list_response_shapes() {
        let plain: ListResponse<Resource> =
            serde_json::from_value(json!([{ "id": 1, "title": "Shelters" }])).unwrap();
        assert_eq!(plain.into_vec().len(), 1);

        let paged: ListResponse<Resource> = serde_json::from_value(json!({
            "count": 2,
            "next": null,
            "results": [{ "id": 1, "title": "A" }, { "id": 2, "title": "B", "link": "https://x" }]
        }))
        .unwrap();
        let items = paged.into_vec();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].url.as_deref(), Some("https://x"));
    }

    #[test]
    fn test_list_response_keeps_element_error() {
        let err = serde_json::from_value::<ListResponse<Resource>>(json!([{ "id": "x", "title": "A" }]))
            .unwrap_err();
        assert!(err.to_string().contains("invalid type"), "{err}");

        let err = serde_json::from_value::<ListResponse<Resource>>(json!({ "count": 0 })).unwrap_err();
        assert!(err.to_string().contains("results"), "{err}");
    }

    #[test]
    fn test_option_parsing() {
        assert_eq!("hurricane".parse::<DisasterType>(), Ok(DisasterType::Hurricane));
        assert_eq!("automobile".parse::<PropertyType>(), Ok(PropertyType::Automobile));
        assert!("meteor".parse::<DisasterType>().is_err());
    }
}
