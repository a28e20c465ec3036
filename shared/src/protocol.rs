use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::models::{
    Claim, DisasterUpdate, ListResponse, Notification, Profile, Resource, TokenResponse,
    UnreadCount,
};
use crate::profile::ProfileUpdate;
use crate::transport::HttpMethod;

/// Response body that carries no payload (201/204 style endpoints).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Empty;

/// How a response body is turned into the endpoint's response type.
pub trait FromBody: Sized {
    fn from_body(body: &str) -> serde_json::Result<Self>;
}

impl FromBody for Empty {
    fn from_body(_body: &str) -> serde_json::Result<Self> {
        Ok(Empty)
    }
}

impl<T: DeserializeOwned> FromBody for ListResponse<T> {
    fn from_body(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }
}

macro_rules! json_body {
    ($($ty:ty),* $(,)?) => {
        $(impl FromBody for $ty {
            fn from_body(body: &str) -> serde_json::Result<Self> {
                serde_json::from_str(body)
            }
        })*
    };
}

json_body!(TokenResponse, UnreadCount, Profile);

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: FromBody;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the request must carry the bearer token.
    const AUTHENTICATED: bool = true;

    /// The URL path relative to the API base URL.
    fn path(&self) -> String;

    /// JSON body, if any.
    fn body(&self) -> Option<serde_json::Result<String>> {
        None
    }
}

// =========================================================
// Auth
// =========================================================

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = TokenResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/auth/login/".into()
    }

    fn body(&self) -> Option<serde_json::Result<String>> {
        Some(serde_json::to_string(self))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl ApiRequest for RegisterRequest {
    type Response = Empty;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/auth/register/".into()
    }

    fn body(&self) -> Option<serde_json::Result<String>> {
        Some(serde_json::to_string(self))
    }
}

// =========================================================
// Claims
// =========================================================

/// List the current user's claims.
#[derive(Debug, Clone, Copy)]
pub struct ListClaims;

impl ApiRequest for ListClaims {
    type Response = ListResponse<Claim>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        CLAIMS_PATH.into()
    }
}

/// Claims are created through a multipart POST to this path.
pub const CLAIMS_PATH: &str = "/claims/";

// =========================================================
// Profile
// =========================================================

/// The list endpoint returns a single record for the current user.
#[derive(Debug, Clone, Copy)]
pub struct ListProfiles;

impl ApiRequest for ListProfiles {
    type Response = ListResponse<Profile>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/user-profiles/".into()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProfile {
    pub id: u64,
    pub changes: ProfileUpdate,
}

impl ApiRequest for UpdateProfile {
    type Response = Profile;
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/user-profiles/{}/", self.id)
    }

    fn body(&self) -> Option<serde_json::Result<String>> {
        Some(serde_json::to_string(&self.changes))
    }
}

// =========================================================
// Feeds
// =========================================================

#[derive(Debug, Clone, Copy)]
pub struct ListDisasterUpdates;

impl ApiRequest for ListDisasterUpdates {
    type Response = ListResponse<DisasterUpdate>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/disaster-updates/".into()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ListResources;

impl ApiRequest for ListResources {
    type Response = ListResponse<Resource>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/resources/".into()
    }
}

// =========================================================
// Notifications
// =========================================================

#[derive(Debug, Clone, Copy)]
pub struct ListNotifications;

impl ApiRequest for ListNotifications {
    type Response = ListResponse<Notification>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/notifications/".into()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MarkNotificationRead {
    pub id: u64,
}

impl ApiRequest for MarkNotificationRead {
    type Response = Empty;
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/notifications/{}/mark_as_read/", self.id)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MarkAllNotificationsRead;

impl ApiRequest for MarkAllNotificationsRead {
    type Response = Empty;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/notifications/mark_all_as_read/".into()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteNotification {
    pub id: u64,
}

impl ApiRequest for DeleteNotification {
    type Response = Empty;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/notifications/{}/", self.id)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetUnreadCount;

impl ApiRequest for GetUnreadCount {
    type Response = UnreadCount;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/notifications/unread_count/".into()
    }
}
