//! HTTP 抽象层
//!
//! 网关只依赖 [`HttpClient`] trait，浏览器端用 fetch 实现，测试中用
//! `MockHttpClient` 替代，从而解耦具体的 HTTP 实现。

use serde::de::DeserializeOwned;

use crate::error::{ApiError, ApiResult};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

// =========================================================
// 请求 / 响应模型
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// multipart 表单中的一个字段
#[derive(Debug, Clone)]
pub enum FormPart<F> {
    Text { name: String, value: String },
    File { name: String, file: F },
}

impl<F> FormPart<F> {
    pub fn text(name: &str, value: impl Into<String>) -> Self {
        FormPart::Text {
            name: name.to_string(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            FormPart::Text { name, .. } | FormPart::File { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone)]
pub enum HttpBody<F> {
    Empty,
    Json(String),
    Multipart(Vec<FormPart<F>>),
}

#[derive(Debug, Clone)]
pub struct HttpRequest<F> {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: HttpBody<F>,
}

impl<F> HttpRequest<F> {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: Vec::new(),
            body: HttpBody::Empty,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_json(mut self, body: String) -> Self {
        self.body = HttpBody::Json(body);
        self.with_header("Content-Type", "application/json")
    }

    /// multipart 请求不设置 Content-Type，由浏览器生成 boundary
    pub fn with_multipart(mut self, parts: Vec<FormPart<F>>) -> Self {
        self.body = HttpBody::Multipart(parts);
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_str(&self.body).map_err(ApiError::from)
    }
}

/// HTTP 客户端接口
///
/// `File` 是 multipart 上传时附件的平台类型（浏览器中为 `web_sys::File`）。
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    type File: Clone;

    /// 发送请求；只有请求无法完成时才返回 `Err(ApiError::Network)`，
    /// 非 2xx 响应由调用方分类。
    async fn send(&self, req: HttpRequest<Self::File>) -> ApiResult<HttpResponse>;
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

/// 测试用附件
#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub struct MockFile {
    pub name: String,
    pub content_type: String,
    pub size: u64,
}

#[cfg(test)]
impl MockFile {
    pub fn new(name: &str, content_type: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            content_type: content_type.to_string(),
            size,
        }
    }
}

#[cfg(test)]
impl crate::claim_form::Attachment for MockFile {
    fn file_name(&self) -> String {
        self.name.clone()
    }

    fn content_type(&self) -> String {
        self.content_type.clone()
    }

    fn size(&self) -> u64 {
        self.size
    }
}

#[cfg(test)]
pub struct MockHttpClient {
    // (Method URL) -> (Status, Response Body)
    responses: RefCell<HashMap<String, (u16, String)>>,
    offline: std::cell::Cell<bool>,
    pub requests: RefCell<Vec<HttpRequest<MockFile>>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            offline: std::cell::Cell::new(false),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.responses.borrow_mut().insert(
            format!("{} {}", method.as_str(), url),
            (status, body.to_string()),
        );
    }

    /// 模拟网络不可达
    pub fn go_offline(&self) {
        self.offline.set(true);
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest<MockFile>> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    type File = MockFile;

    async fn send(&self, req: HttpRequest<MockFile>) -> ApiResult<HttpResponse> {
        let key = format!("{} {}", req.method.as_str(), req.url);
        self.requests.borrow_mut().push(req);

        if self.offline.get() {
            return Err(ApiError::Network("connection refused".into()));
        }

        let responses = self.responses.borrow();
        match responses.get(&key) {
            Some((status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            None => Ok(HttpResponse {
                status: 404,
                body: r#"{"detail":"Not found."}"#.to_string(),
            }),
        }
    }
}
