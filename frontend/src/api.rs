use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;
use reliefclaim_shared::{ApiResult, ClaimsApi};

use crate::auth::AuthContext;
use crate::web::FetchClient;

pub type Api = ClaimsApi<FetchClient>;

/// 异步加载的数据
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Loadable::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// 发起请求并把结果写入 `target`
///
/// 视图卸载后信号已被释放，迟到的响应通过 `try_set` 丢弃。
pub fn load_into<T, F, Fut>(auth: AuthContext, target: RwSignal<Loadable<T>>, request: F)
where
    T: Send + Sync + 'static,
    F: FnOnce(Api) -> Fut,
    Fut: Future<Output = ApiResult<T>> + 'static,
{
    let pending = request(auth.api());
    spawn_local(async move {
        let next = match pending.await {
            Ok(value) => Loadable::Ready(value),
            Err(e) => Loadable::Failed(auth.report(&e)),
        };
        target.try_set(next);
    });
}
