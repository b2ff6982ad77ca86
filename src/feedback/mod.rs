use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One transient, non-blocking user notification.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// Surface the workflows push notifications onto. A UI shell renders these
/// as toasts; tests read them back through [`NoticeLog`].
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);

    fn success(&self, message: &str) {
        self.notify(NoticeKind::Success, message);
    }

    fn error(&self, message: &str) {
        self.notify(NoticeKind::Error, message);
    }
}

const DEFAULT_CAPACITY: usize = 16;

/// Bounded log of notices; the oldest entries are dropped once the cap is
/// reached, matching how a toast viewport retires stale entries.
#[derive(Clone)]
pub struct NoticeLog {
    capacity: usize,
    entries: Arc<RwLock<VecDeque<Notice>>>,
}

impl Default for NoticeLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Arc::new(RwLock::new(VecDeque::new())),
        }
    }

    pub fn entries(&self) -> Vec<Notice> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<Notice> {
        let entries = match self.entries.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.back().cloned()
    }

    pub fn clear(&self) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.clear();
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, kind: NoticeKind, message: &str) {
        let mut entries = match self.entries.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.push_back(Notice {
            kind,
            message: message.to_string(),
        });
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }
}
