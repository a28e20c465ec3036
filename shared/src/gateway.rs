//! API 网关
//!
//! 每个后端接口对应一个方法；请求构建、Bearer 认证头、响应分类与
//! 响应体归一化都集中在这里，视图层拿到的是已经整理好的数据。

use tracing::{debug, warn};

use crate::claim_form::ClaimSubmission;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    Claim, DisasterUpdate, ListResponse, Notification, Profile, Resource, SubmittedClaim,
};
use crate::protocol::{
    ApiRequest, CLAIMS_PATH, DeleteNotification, FromBody, GetUnreadCount, ListClaims,
    ListDisasterUpdates, ListNotifications, ListProfiles, ListResources, LoginRequest,
    MarkAllNotificationsRead, MarkNotificationRead, RegisterRequest, UpdateProfile,
};
use crate::transport::{HttpClient, HttpMethod, HttpRequest};

pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// 后端地址配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClaimsApi<C> {
    config: ApiConfig,
    client: C,
    token: Option<String>,
}

impl<C: HttpClient> ClaimsApi<C> {
    pub fn new(config: ApiConfig, client: C) -> Self {
        Self {
            config,
            client,
            token: None,
        }
    }

    /// 携带会话令牌的副本
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn authorize(&self, req: HttpRequest<C::File>) -> ApiResult<HttpRequest<C::File>> {
        match &self.token {
            Some(token) => Ok(req.with_header(HEADER_AUTHORIZATION, &format!("Bearer {token}"))),
            // 没有令牌时直接失败，不发请求
            None => Err(ApiError::Unauthorized),
        }
    }

    async fn dispatch(&self, req: HttpRequest<C::File>) -> ApiResult<String> {
        let method = req.method;
        let url = req.url.clone();
        debug!(method = method.as_str(), %url, "dispatching request");

        let resp = self.client.send(req).await.inspect_err(|e| {
            warn!(method = method.as_str(), %url, error = %e, "request failed");
        })?;

        if !resp.is_success() {
            warn!(method = method.as_str(), %url, status = resp.status, "request rejected");
            return Err(ApiError::from_response(resp.status, &resp.body));
        }
        Ok(resp.body)
    }

    /// 发送类型化请求
    pub async fn send<R: ApiRequest>(&self, request: &R) -> ApiResult<R::Response> {
        let mut req = HttpRequest::new(&self.config.url(&request.path()), R::METHOD)
            .with_header("Accept", "application/json");
        if let Some(body) = request.body() {
            req = req.with_json(body?);
        }
        if R::AUTHENTICATED {
            req = self.authorize(req)?;
        }

        let body = self.dispatch(req).await?;
        R::Response::from_body(&body).map_err(ApiError::from)
    }

    /// 集合接口：404 视为空集合
    async fn list<R, T>(&self, request: &R) -> ApiResult<Vec<T>>
    where
        R: ApiRequest<Response = ListResponse<T>>,
    {
        match self.send(request).await {
            Ok(list) => Ok(list.into_vec()),
            Err(ApiError::NotFound) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    // =========================================================
    // 认证
    // =========================================================

    /// 登录，成功时返回访问令牌
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<String> {
        let token = self.send(credentials).await?;
        if token.access.is_empty() {
            return Err(ApiError::Decode("empty access token".into()));
        }
        Ok(token.access)
    }

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<()> {
        self.send(request).await.map(|_| ())
    }

    // =========================================================
    // 理赔
    // =========================================================

    pub async fn list_claims(&self) -> ApiResult<Vec<Claim>> {
        self.list(&ListClaims).await
    }

    /// 以单个 multipart 请求提交理赔
    pub async fn submit_claim(
        &self,
        submission: ClaimSubmission<C::File>,
    ) -> ApiResult<SubmittedClaim> {
        let req = HttpRequest::new(&self.config.url(CLAIMS_PATH), HttpMethod::Post)
            .with_header("Accept", "application/json")
            .with_multipart(submission.into_parts());
        let req = self.authorize(req)?;

        // 2xx 之后理赔已经创建，响应体无法解析也按成功处理，避免用户重复提交
        let body = self.dispatch(req).await?;
        if body.trim().is_empty() {
            return Ok(SubmittedClaim::default());
        }
        Ok(serde_json::from_str(&body).unwrap_or_else(|e| {
            warn!(error = %e, "claim created but response body was unreadable");
            SubmittedClaim::default()
        }))
    }

    // =========================================================
    // 用户资料
    // =========================================================

    /// 当前用户的资料（列表接口的第一条记录）
    pub async fn current_profile(&self) -> ApiResult<Profile> {
        self.list(&ListProfiles)
            .await?
            .into_iter()
            .next()
            .ok_or(ApiError::NotFound)
    }

    pub async fn update_profile(&self, request: &UpdateProfile) -> ApiResult<Profile> {
        self.send(request).await
    }

    // =========================================================
    // 信息流
    // =========================================================

    pub async fn disaster_updates(&self) -> ApiResult<Vec<DisasterUpdate>> {
        self.list(&ListDisasterUpdates).await
    }

    pub async fn resources(&self) -> ApiResult<Vec<Resource>> {
        self.list(&ListResources).await
    }

    // =========================================================
    // 通知
    // =========================================================

    pub async fn notifications(&self) -> ApiResult<Vec<Notification>> {
        self.list(&ListNotifications).await
    }

    pub async fn mark_notification_read(&self, id: u64) -> ApiResult<()> {
        self.send(&MarkNotificationRead { id }).await.map(|_| ())
    }

    pub async fn mark_all_notifications_read(&self) -> ApiResult<()> {
        self.send(&MarkAllNotificationsRead).await.map(|_| ())
    }

    pub async fn delete_notification(&self, id: u64) -> ApiResult<()> {
        self.send(&DeleteNotification { id }).await.map(|_| ())
    }

    pub async fn unread_count(&self) -> ApiResult<u64> {
        self.send(&GetUnreadCount).await.map(|c| c.unread_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClaimStatus, DisasterType, Prediction, PropertyType};
    use crate::transport::{FormPart, HttpBody, MockFile, MockHttpClient};
    use serde_json::json;

    const BASE: &str = "https://api.example.com/api";

    fn api(token: Option<&str>) -> ClaimsApi<MockHttpClient> {
        ClaimsApi::new(ApiConfig::new(format!("{BASE}/")), MockHttpClient::new())
            .with_token(token.map(str::to_string))
    }

    #[test]
    fn test_config_trims_trailing_slash() {
        let config = ApiConfig::new("http://localhost:8000/api///");
        assert_eq!(config.url("/claims/"), "http://localhost:8000/api/claims/");
        assert_eq!(config.url("claims/"), "http://localhost:8000/api/claims/");
    }

    #[tokio::test]
    async fn test_login_returns_access_token() {
        let api = api(None);
        api.client().mock_response(
            HttpMethod::Post,
            &format!("{BASE}/auth/login/"),
            200,
            json!({ "access": "tok-123", "refresh": "r-1" }),
        );

        let token = api
            .login(&LoginRequest {
                username: "maria".into(),
                password: "secret-pass".into(),
            })
            .await
            .unwrap();
        assert_eq!(token, "tok-123");

        let req = api.client().last_request().unwrap();
        assert_eq!(req.header(HEADER_AUTHORIZATION), None);
        match req.body {
            HttpBody::Json(body) => {
                let sent: serde_json::Value = serde_json::from_str(&body).unwrap();
                assert_eq!(sent, json!({ "username": "maria", "password": "secret-pass" }));
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_login_with_bad_credentials() {
        let api = api(None);
        api.client().mock_response(
            HttpMethod::Post,
            &format!("{BASE}/auth/login/"),
            401,
            json!({ "detail": "No active account found with the given credentials" }),
        );

        let err = api
            .login(&LoginRequest {
                username: "maria".into(),
                password: "wrong".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Unauthorized);
    }

    #[tokio::test]
    async fn test_authorized_requests_carry_bearer_token() {
        let api = api(Some("tok-123"));
        api.client().mock_response(
            HttpMethod::Get,
            &format!("{BASE}/claims/"),
            200,
            json!([{
                "id": 1,
                "disaster_type": "flood",
                "property_type": "house",
                "estimated_loss": "100.00",
                "status": "pending"
            }]),
        );

        let claims = api.list_claims().await.unwrap();
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].status, ClaimStatus::Pending);

        let req = api.client().last_request().unwrap();
        assert_eq!(req.header("authorization"), Some("Bearer tok-123"));
    }

    #[tokio::test]
    async fn test_lists_backend_claim_records() {
        let api = api(Some("tok"));
        api.client().mock_response(
            HttpMethod::Get,
            &format!("{BASE}/claims/"),
            200,
            json!([
                {
                    "id": 9,
                    "user": 2,
                    "claim_number": "CLM-2024-4821",
                    "disaster_type": "wildfire",
                    "property_type": "house",
                    "description": "Garage burned",
                    "estimated_loss": "42000.00",
                    "status": "under_review",
                    "predicted_approval": "0.85",
                    "predicted_limit": "35000.00",
                    "documents": null,
                    "insurance_policy_number": null,
                    "created_at": "2024-08-01T10:00:00Z",
                    "updated_at": "2024-08-02T10:00:00Z"
                },
                {
                    "id": 10,
                    "disaster_type": "landslide",
                    "property_type": "automobile",
                    "description": "Car buried",
                    "estimated_loss": "8000.00",
                    "status": "pending",
                    "predicted_approval": null,
                    "predicted_limit": null
                }
            ]),
        );

        let claims = api.list_claims().await.unwrap();
        assert_eq!(claims.len(), 2);
        assert_eq!(claims[0].disaster_type, DisasterType::Wildfire);
        assert_eq!(claims[0].property_type, PropertyType::House);
        assert_eq!(claims[0].predicted_approval, Some(Prediction::Score(0.85)));
        assert_eq!(claims[1].disaster_type, DisasterType::Other);
        assert_eq!(claims[1].predicted_approval, None);
    }

    #[tokio::test]
    async fn test_bad_record_reports_its_own_error() {
        let api = api(Some("tok"));
        api.client().mock_response(
            HttpMethod::Get,
            &format!("{BASE}/claims/"),
            200,
            json!({ "results": [{ "id": 1, "disaster_type": "flood", "property_type": "house",
                                  "estimated_loss": "12,5", "status": "pending" }] }),
        );

        match api.list_claims().await {
            Err(ApiError::Decode(message)) => assert!(message.contains("invalid amount"), "{message}"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_token_fails_without_network() {
        let api = api(None);
        assert_eq!(api.list_claims().await, Err(ApiError::Unauthorized));
        assert_eq!(api.client().request_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_collection_is_empty() {
        let api = api(Some("tok"));
        // 未注册的 URL 由 mock 返回 404
        assert_eq!(api.resources().await, Ok(Vec::new()));
        assert_eq!(api.disaster_updates().await, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn test_network_failure_is_reported() {
        let api = api(Some("tok"));
        api.client().go_offline();
        assert!(matches!(api.notifications().await, Err(ApiError::Network(_))));
    }

    #[tokio::test]
    async fn test_current_profile_takes_first_record() {
        let api = api(Some("tok"));
        api.client().mock_response(
            HttpMethod::Get,
            &format!("{BASE}/user-profiles/"),
            200,
            json!({ "results": [{ "id": 4, "user": { "username": "maria", "email": "m@example.com" } }] }),
        );

        let profile = api.current_profile().await.unwrap();
        assert_eq!(profile.id, 4);
        assert_eq!(profile.email, "m@example.com");
    }

    #[tokio::test]
    async fn test_current_profile_keyed_by_user() {
        let api = api(Some("tok"));
        api.client().mock_response(
            HttpMethod::Get,
            &format!("{BASE}/user-profiles/"),
            200,
            json!([{
                "user": { "id": 2, "username": "maria", "email": "m@x.com" },
                "phone_number": null,
                "address": "12 Shore Rd",
                "emergency_contact": null,
                "profile_picture": null
            }]),
        );

        let profile = api.current_profile().await.unwrap();
        assert_eq!(profile.id, 2);
        assert_eq!(profile.username, "maria");
        assert_eq!(profile.street_address, "12 Shore Rd");
        assert_eq!(profile.phone_number, "");
    }

    #[tokio::test]
    async fn test_notification_actions_hit_expected_paths() {
        let api = api(Some("tok"));
        let client = api.client();
        client.mock_response(
            HttpMethod::Patch,
            &format!("{BASE}/notifications/5/mark_as_read/"),
            200,
            json!({ "status": "ok" }),
        );
        client.mock_response(
            HttpMethod::Post,
            &format!("{BASE}/notifications/mark_all_as_read/"),
            200,
            json!({}),
        );
        client.mock_response(
            HttpMethod::Delete,
            &format!("{BASE}/notifications/5/"),
            204,
            json!(null),
        );
        client.mock_response(
            HttpMethod::Get,
            &format!("{BASE}/notifications/unread_count/"),
            200,
            json!({ "unread_count": 3 }),
        );

        api.mark_notification_read(5).await.unwrap();
        api.mark_all_notifications_read().await.unwrap();
        api.delete_notification(5).await.unwrap();
        assert_eq!(api.unread_count().await, Ok(3));
        assert_eq!(client.request_count(), 4);
    }

    #[tokio::test]
    async fn test_submit_claim_sends_multipart() {
        let api = api(Some("tok"));
        api.client().mock_response(
            HttpMethod::Post,
            &format!("{BASE}/claims/"),
            201,
            json!({ "id": 11, "status": "pending", "predicted_approval": true, "predicted_limit": "7500.00" }),
        );

        let submission = ClaimSubmission {
            disaster_type: DisasterType::Hurricane,
            property_type: PropertyType::House,
            description: "Roof torn off".into(),
            estimated_loss: 9000.0,
            documents: vec![MockFile::new("roof.jpg", "image/jpeg", 2048)],
        };
        let result = api.submit_claim(submission).await.unwrap();
        assert_eq!(result.predicted_approval, Some(Prediction::Flag(true)));
        assert_eq!(result.predicted_limit, Some(7500.0));

        let req = api.client().last_request().unwrap();
        assert_eq!(req.header(HEADER_AUTHORIZATION), Some("Bearer tok"));
        let HttpBody::Multipart(parts) = req.body else {
            panic!("expected multipart body");
        };
        let names: Vec<&str> = parts.iter().map(FormPart::name).collect();
        assert_eq!(
            names,
            vec!["disaster_type", "property_type", "description", "estimated_loss", "documents"]
        );
    }
}
