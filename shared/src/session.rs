//! 会话存储
//!
//! 会话只由一个不透明的访问令牌表示：登录时写入，注销时清除，
//! 启动时从持久化存储恢复。令牌在使用它的请求失败之前一直视为有效。

use tracing::info;

/// 持久化键值存储（浏览器中为 localStorage）
pub trait TokenStorage {
    fn load(&self, key: &str) -> Option<String>;
    /// 返回是否写入成功
    fn store(&self, key: &str, value: &str) -> bool;
    fn remove(&self, key: &str) -> bool;
}

type Listener = Box<dyn Fn(Option<&str>) + Send + Sync>;

/// 进程内唯一的会话存储，通过上下文注入而不是全局单例
pub struct SessionStore<S> {
    storage: S,
    key: String,
    token: Option<String>,
    listeners: Vec<Listener>,
}

impl<S: TokenStorage> SessionStore<S> {
    /// 打开存储并恢复上次保存的令牌
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let token = storage.load(&key).filter(|t| !t.is_empty());
        info!(restored = token.is_some(), "session store opened");
        Self {
            storage,
            key,
            token,
            listeners: Vec::new(),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// 保存令牌：先写持久化存储，再更新内存状态并通知订阅者
    pub fn save(&mut self, token: impl Into<String>) {
        let token = token.into();
        if !self.storage.store(&self.key, &token) {
            // 持久化失败时会话仍在内存中有效，只是刷新后丢失
            tracing::warn!("failed to persist session token");
        }
        self.token = Some(token);
        info!("session saved");
        self.notify();
    }

    pub fn clear(&mut self) {
        self.storage.remove(&self.key);
        self.token = None;
        info!("session cleared");
        self.notify();
    }

    /// 订阅会话变化；回调在每次 save/clear 后收到新的令牌状态
    pub fn subscribe(&mut self, listener: impl Fn(Option<&str>) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&self) {
        let token = self.token.as_deref();
        for listener in &self.listeners {
            listener(token);
        }
    }
}

// =========================================================
// 测试工具: 内存存储
// =========================================================
