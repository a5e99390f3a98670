//! Completion sweeper: delayed removal of terminal queue entries.

use crate::application::queue::{self, QueueInner};
use crate::foundation::{ItemId, StatusId};
use log::trace;
use std::sync::{Mutex, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Abort-on-drop guard around a background task.
///
/// Holding these in the owning struct means dropping it cancels every
/// outstanding timer and watcher instead of leaking them.
pub(crate) struct TaskGuard(JoinHandle<()>);

impl TaskGuard {
    pub(crate) fn new(handle: JoinHandle<()>) -> Self {
        Self(handle)
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Schedules the `completed` overwrite for a terminal queue item.
///
/// Fire-and-forget from the item's perspective: the item cannot cancel its
/// own sweep, only the store dropping cancels it.
pub(crate) fn schedule_item_completion(inner: Weak<Mutex<QueueInner>>, id: ItemId, delay: Duration) -> TaskGuard {
    TaskGuard::new(tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        trace!("sweeping terminal queue item id={}", id);
        if let Some(inner) = inner.upgrade() {
            queue::complete_item(&inner, id);
        }
    }))
}

/// Schedules removal of an ambient status notification.
pub(crate) fn schedule_status_removal(inner: Weak<Mutex<QueueInner>>, id: StatusId, delay: Duration) -> TaskGuard {
    TaskGuard::new(tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        trace!("sweeping action status id={}", id);
        if let Some(inner) = inner.upgrade() {
            queue::remove_status_entry(&inner, id);
        }
    }))
}
