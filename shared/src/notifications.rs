//! 通知列表状态
//!
//! 服务器是唯一的数据来源：每次轮询整体替换列表，
//! 本地的已读/删除操作只在对应请求成功后应用。

use crate::models::Notification;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotificationFeed {
    items: Vec<Notification>,
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// 用最新的服务器列表替换，按时间倒序
    pub fn replace(&mut self, mut items: Vec<Notification>) {
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        self.items = items;
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 返回状态是否发生变化
    pub fn mark_read(&mut self, id: u64) -> bool {
        match self.items.iter_mut().find(|n| n.id == id) {
            Some(n) if !n.read => {
                n.read = true;
                true
            }
            _ => false,
        }
    }

    /// 返回被标记的条数
    pub fn mark_all_read(&mut self) -> usize {
        self.items
            .iter_mut()
            .filter(|n| !n.read)
            .map(|n| n.read = true)
            .count()
    }

    pub fn remove(&mut self, id: u64) -> Option<Notification> {
        let pos = self.items.iter().position(|n| n.id == id)?;
        Some(self.items.remove(pos))
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn note(id: u64, read: bool, hour: u32) -> Notification {
        Notification {
            id,
            title: None,
            message: format!("message {id}"),
            read,
            created_at: Some(Utc.with_ymd_and_hms(2024, 8, 1, hour, 0, 0).unwrap()),
        }
    }

    fn feed() -> NotificationFeed {
        let mut feed = NotificationFeed::new();
        feed.replace(vec![note(1, false, 8), note(2, true, 10), note(3, false, 9)]);
        feed
    }

    #[test]
    fn test_replace_orders_newest_first() {
        let ids: Vec<_> = feed().items().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_mark_read_updates_count() {
        let mut feed = feed();
        assert_eq!(feed.unread_count(), 2);
        assert!(feed.mark_read(3));
        assert!(!feed.mark_read(3));
        assert!(!feed.mark_read(99));
        assert_eq!(feed.unread_count(), 1);
    }

    #[test]
    fn test_mark_all_read() {
        let mut feed = feed();
        assert_eq!(feed.mark_all_read(), 2);
        assert_eq!(feed.unread_count(), 0);
        assert_eq!(feed.mark_all_read(), 0);
    }

    #[test]
    fn test_remove() {
        let mut feed = feed();
        assert_eq!(feed.remove(1).map(|n| n.id), Some(1));
        assert_eq!(feed.remove(1), None);
        assert_eq!(feed.items().len(), 2);
        assert_eq!(feed.unread_count(), 1);
    }

    #[test]
    fn test_poll_replaces_local_state() {
        let mut feed = feed();
        feed.mark_all_read();
        feed.replace(vec![note(4, false, 11)]);
        assert_eq!(feed.unread_count(), 1);
        assert_eq!(feed.items()[0].id, 4);
    }
}
