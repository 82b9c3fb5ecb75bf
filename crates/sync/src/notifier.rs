use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// Operator feedback for user-initiated actions.
pub trait Notifier: Send + Sync {
    /// Overlay that disappears on its own after `duration`.
    fn show_transient(&self, message: &str, duration: Duration);

    /// Notice the operator has to acknowledge.
    fn show_blocking(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Transient,
    Blocking,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub id: u64,
    pub kind: NoticeKind,
    pub message: String,
    #[serde(skip)]
    expires_at: Option<Instant>,
}

/// Notifier backed by an in-memory list, read by the web console.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    notices: Arc<Mutex<Vec<Notice>>>,
    next_id: Arc<AtomicU64>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, kind: NoticeKind, message: &str, expires_at: Option<Instant>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(Notice {
                id,
                kind,
                message: message.to_owned(),
                expires_at,
            });
        }
    }

    /// Notices still on screen, oldest first. Expired transient notices are dropped.
    pub fn active(&self) -> Vec<Notice> {
        let now = Instant::now();
        let Ok(mut notices) = self.notices.lock() else {
            return Vec::new();
        };
        notices.retain(|n| n.expires_at.is_none_or(|at| at > now));
        notices.clone()
    }

    pub fn dismiss_blocking(&self) -> usize {
        let Ok(mut notices) = self.notices.lock() else {
            return 0;
        };
        let before = notices.len();
        notices.retain(|n| n.kind != NoticeKind::Blocking);
        before - notices.len()
    }
}

impl Notifier for NoticeBoard {
    fn show_transient(&self, message: &str, duration: Duration) {
        self.push(
            NoticeKind::Transient,
            message,
            Some(Instant::now() + duration),
        );
    }

    fn show_blocking(&self, message: &str) {
        self.push(NoticeKind::Blocking, message, None);
    }
}
