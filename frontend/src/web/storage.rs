//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 实现会话层的 [`TokenStorage`]。

use reliefclaim_shared::TokenStorage;

/// 浏览器 localStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl TokenStorage for BrowserStorage {
    /// 键不存在或存储不可用（例如隐私模式）时返回 `None`
    fn load(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn store(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn remove(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}
