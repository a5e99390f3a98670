//! The transaction queue store: the single source of truth for pending,
//! in-flight, and recently completed chain operations.

use crate::application::sweeper::{self, TaskGuard};
use crate::domain::{
    merge_status, statuses_from_events, ActionStatus, ChainRegistry, ExecutionResult, ExtrinsicRequest, ItemCallbacks, ItemKind,
    QueueItem, RpcDescriptor, RpcRequest, StatusEntry, TxStatus,
};
use crate::foundation::{AccountId, ItemId, QueueError, Result, StatusId};
use crate::infrastructure::config::QueueConfig;
use log::{debug, info};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::sync::Notify;

pub(crate) struct QueueInner {
    txqueue: Vec<QueueItem>,
    stqueue: Vec<StatusEntry>,
    next_item_id: u64,
    next_status_id: u64,
    timers: Vec<TaskGuard>,
}

impl QueueInner {
    fn new() -> Self {
        Self { txqueue: Vec::new(), stqueue: Vec::new(), next_item_id: 1, next_status_id: 1, timers: Vec::new() }
    }
}

/// Process-wide ordered collection of queued operations plus the parallel
/// collection of ambient status notifications.
///
/// An explicit handle constructed once and threaded by reference to the
/// dispatcher and to consumers; consumers read snapshots and enqueue, the
/// dispatcher mutates status through `set_status`, never directly.
pub struct TransactionQueue {
    inner: Arc<Mutex<QueueInner>>,
    registry: Arc<dyn ChainRegistry>,
    remove_timeout: Duration,
    notify: Notify,
}

impl TransactionQueue {
    pub fn new(config: &QueueConfig, registry: Arc<dyn ChainRegistry>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(QueueInner::new())),
            registry,
            remove_timeout: config.remove_timeout(),
            notify: Notify::new(),
        }
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, QueueInner>> {
        self.inner.lock().map_err(|_| QueueError::QueueLockPoisoned { operation: "queue".to_string() })
    }

    /// Appends a signable extrinsic, defaulting its submission descriptor to
    /// `author.submitAndWatchExtrinsic` when none is supplied.
    pub fn enqueue_extrinsic(&self, request: ExtrinsicRequest) -> Result<ItemHandle> {
        let action = self
            .registry
            .call_meta(request.call.call_index)
            .map(|meta| meta.action())
            .unwrap_or_else(|| request.call.call_index.to_string());
        let rpc = request.rpc.unwrap_or_else(RpcDescriptor::submit_and_watch);
        let kind = ItemKind::Extrinsic { call: request.call, nonce: request.nonce, rpc };
        self.enqueue(kind, request.sign_address, request.callbacks, &action)
    }

    /// Appends a raw RPC call; never signed.
    pub fn enqueue_rpc(&self, request: RpcRequest) -> Result<ItemHandle> {
        let action = request.rpc.to_string();
        let kind = ItemKind::Rpc { rpc: request.rpc, values: request.values };
        self.enqueue(kind, None, request.callbacks, &action)
    }

    fn enqueue(&self, kind: ItemKind, sign_address: Option<AccountId>, callbacks: ItemCallbacks, action: &str) -> Result<ItemHandle> {
        let id;
        {
            let mut inner = self.lock_inner()?;
            id = ItemId::new(inner.next_item_id);
            inner.next_item_id += 1;
            info!(
                "queue item enqueued id={} kind={} action={} sign_address={}",
                id,
                kind.name(),
                action,
                sign_address.as_ref().map(|address| address.as_str()).unwrap_or("-")
            );
            inner.txqueue.push(QueueItem { id, kind, sign_address, status: TxStatus::Queued, error: None, result: None, callbacks });
        }
        self.notify.notify_one();
        Ok(ItemHandle { inner: Arc::downgrade(&self.inner), id })
    }

    /// Overwrites an item's status, captures result/error, publishes any
    /// chain events embedded in the result, and schedules the sweeper on
    /// terminal transitions.
    ///
    /// Total: unknown ids and already-completed items are ignored. Within an
    /// item, calls apply in receipt order, last write wins.
    pub fn set_status(&self, id: ItemId, status: TxStatus, result: Option<ExecutionResult>, error: Option<QueueError>) -> Result<()> {
        let mut inner = self.lock_inner()?;
        let Some(item) = inner.txqueue.iter_mut().find(|item| item.id == id) else {
            debug!("status update for unknown queue item ignored id={} status={}", id, status);
            return Ok(());
        };
        if item.status == TxStatus::Completed {
            debug!("status update for completed queue item ignored id={} status={}", id, status);
            return Ok(());
        }

        let previous = item.status;
        item.status = status;
        let mut actions = Vec::new();
        if let Some(result) = result {
            if let ExecutionResult::Receipt(receipt) = &result {
                actions = statuses_from_events(&receipt.events, self.registry.as_ref());
            }
            item.result = Some(result);
        }
        if let Some(error) = error {
            // Captured once, never cleared.
            if item.error.is_none() {
                item.error = Some(error);
            }
        }
        info!("queue status changed id={} from={} to={}", id, previous, status);

        if status.is_terminal() {
            let guard = sweeper::schedule_item_completion(Arc::downgrade(&self.inner), id, self.remove_timeout);
            inner.timers.retain(|timer| !timer.is_finished());
            inner.timers.push(guard);
        }
        if !actions.is_empty() {
            self.publish_locked(&mut inner, actions);
        }
        Ok(())
    }

    /// Merges and appends ambient status notifications, each scheduled for
    /// removal after the grace period.
    pub fn publish(&self, statuses: Vec<ActionStatus>) -> Result<Vec<StatusHandle>> {
        let mut inner = self.lock_inner()?;
        let ids = self.publish_locked(&mut inner, statuses);
        Ok(ids.into_iter().map(|id| StatusHandle { inner: Arc::downgrade(&self.inner), id }).collect())
    }

    fn publish_locked(&self, inner: &mut QueueInner, statuses: Vec<ActionStatus>) -> Vec<StatusId> {
        let mut ids = Vec::new();
        for status in merge_status(&statuses) {
            let id = StatusId::new(inner.next_status_id);
            inner.next_status_id += 1;
            debug!("action status published id={} kind={} action={}", id, status.kind, status.action);
            inner.stqueue.push(StatusEntry::new(id, status));
            inner.timers.push(sweeper::schedule_status_removal(Arc::downgrade(&self.inner), id, self.remove_timeout));
            ids.push(id);
        }
        ids
    }

    /// Ordered snapshot of the transaction queue.
    pub fn items(&self) -> Vec<QueueItem> {
        self.inner.lock().map(|inner| inner.txqueue.clone()).unwrap_or_default()
    }

    /// Ordered snapshot of the live ambient notifications.
    pub fn statuses(&self) -> Vec<StatusEntry> {
        self.inner
            .lock()
            .map(|inner| inner.stqueue.iter().filter(|entry| !entry.is_completed).cloned().collect())
            .unwrap_or_default()
    }

    pub fn item(&self, id: ItemId) -> Option<QueueItem> {
        self.inner.lock().ok().and_then(|inner| inner.txqueue.iter().find(|item| item.id == id).cloned())
    }

    /// First item in queue order allowed to claim the single signing slot.
    pub fn next_eligible(&self) -> Option<QueueItem> {
        self.inner.lock().ok().and_then(|inner| inner.txqueue.iter().find(|item| item.status.is_eligible()).cloned())
    }

    /// Resolves when new work has been enqueued since the last wait.
    pub async fn notified(&self) {
        self.notify.notified().await;
    }

    /// Marks the item `completed` in place; not a cascading delete.
    pub fn complete(&self, id: ItemId) {
        complete_item(&self.inner, id);
    }
}

/// Capability bound to one queue item, handed back from enqueue.
#[derive(Clone, Debug)]
pub struct ItemHandle {
    inner: Weak<Mutex<QueueInner>>,
    id: ItemId,
}

impl ItemHandle {
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Marks the item `completed` in place, regardless of current state.
    pub fn complete(&self) {
        if let Some(inner) = self.inner.upgrade() {
            complete_item(&inner, self.id);
        }
    }
}

/// Capability to drop an ambient notification before its timer fires.
#[derive(Clone, Debug)]
pub struct StatusHandle {
    inner: Weak<Mutex<QueueInner>>,
    id: StatusId,
}

impl StatusHandle {
    pub fn id(&self) -> StatusId {
        self.id
    }

    pub fn remove(&self) {
        if let Some(inner) = self.inner.upgrade() {
            remove_status_entry(&inner, self.id);
        }
    }
}

pub(crate) fn complete_item(inner: &Mutex<QueueInner>, id: ItemId) {
    let Ok(mut inner) = inner.lock() else {
        return;
    };
    if let Some(item) = inner.txqueue.iter_mut().find(|item| item.id == id) {
        if item.status != TxStatus::Completed {
            debug!("queue item completed id={} last_status={}", id, item.status);
            item.status = TxStatus::Completed;
        }
    }
}

pub(crate) fn remove_status_entry(inner: &Mutex<QueueInner>, id: StatusId) {
    let Ok(mut inner) = inner.lock() else {
        return;
    };
    if let Some(entry) = inner.stqueue.iter_mut().find(|entry| entry.id == id) {
        entry.is_completed = true;
    }
    inner.stqueue.retain(|entry| !entry.is_completed);
}
