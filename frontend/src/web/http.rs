//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现共享层的 [`HttpClient`]，
//! multipart 请求通过 `FormData` 发送，由浏览器生成 boundary。

use async_trait::async_trait;
use reliefclaim_shared::claim_form::Attachment;
use reliefclaim_shared::transport::{FormPart, HttpBody, HttpClient, HttpRequest, HttpResponse};
use reliefclaim_shared::{ApiError, ApiResult};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Headers, HtmlInputElement, Request, RequestInit, Response};

/// 浏览器文件句柄
#[derive(Debug, Clone, PartialEq)]
pub struct BrowserFile(web_sys::File);

impl BrowserFile {
    /// 读取 `<input type="file">` 当前选中的全部文件
    pub fn from_input(input: &HtmlInputElement) -> Vec<Self> {
        let Some(list) = input.files() else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .map(BrowserFile)
            .collect()
    }
}

impl Attachment for BrowserFile {
    fn file_name(&self) -> String {
        self.0.name()
    }

    fn content_type(&self) -> String {
        self.0.type_()
    }

    fn size(&self) -> u64 {
        self.0.size() as u64
    }
}

fn js_error(context: &str, e: JsValue) -> ApiError {
    ApiError::Network(format!("{context}: {e:?}"))
}

fn form_data(parts: Vec<FormPart<BrowserFile>>) -> Result<FormData, ApiError> {
    let form = FormData::new().map_err(|e| js_error("创建 FormData 失败", e))?;
    for part in parts {
        match part {
            FormPart::Text { name, value } => form.append_with_str(&name, &value),
            FormPart::File { name, file } => {
                form.append_with_blob_and_filename(&name, &file.0, &file.0.name())
            }
        }
        .map_err(|e| js_error("写入 FormData 失败", e))?;
    }
    Ok(form)
}

/// 基于 fetch 的客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

#[async_trait(?Send)]
impl HttpClient for FetchClient {
    type File = BrowserFile;

    async fn send(&self, req: HttpRequest<BrowserFile>) -> ApiResult<HttpResponse> {
        let headers = Headers::new().map_err(|e| js_error("创建 Headers 失败", e))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| js_error("设置 Header 失败", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());

        match req.body {
            HttpBody::Empty => {}
            HttpBody::Json(body) => opts.set_body(&JsValue::from_str(&body)),
            HttpBody::Multipart(parts) => opts.set_body(&form_data(parts)?.into()),
        }

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| js_error("请求构建失败", e))?;

        let window =
            web_sys::window().ok_or_else(|| ApiError::Network("无法获取 window 对象".into()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| js_error("网络错误", e))?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| js_error("Response 类型转换失败", e))?;

        let promise = response
            .text()
            .map_err(|e| js_error("读取响应失败", e))?;
        let body = JsFuture::from(promise)
            .await
            .map_err(|e| js_error("读取响应失败", e))?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse {
            status: response.status(),
            body,
        })
    }
}
