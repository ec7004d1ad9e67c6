//! In-process queue of user-facing notices

use crate::application::ports::Notifier;
use crate::shared::types::{Notification, NotificationKind};
use std::collections::VecDeque;
use std::sync::Mutex;

const MAX_PENDING: usize = 100;

/// Bounded FIFO the dashboard drains. The oldest notice is dropped once full.
#[derive(Default)]
pub struct NotificationQueue {
    pending: Mutex<VecDeque<Notification>>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every pending notice, oldest first
    pub fn drain(&self) -> Vec<Notification> {
        match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.lock().map(|pending| pending.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Error => log::warn!("Notice: {}", notification.message),
            _ => log::info!("Notice: {}", notification.message),
        }

        let mut pending = match self.pending.lock() {
            Ok(pending) => pending,
            Err(poisoned) => poisoned.into_inner(),
        };
        if pending.len() == MAX_PENDING {
            pending.pop_front();
        }
        pending.push_back(notification);
    }
}
