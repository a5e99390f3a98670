//! The dispatcher (signer runner): drives queued operations through signing,
//! submission, and subscription to completion, one item at a time.

use crate::application::queue::TransactionQueue;
use crate::application::sweeper::TaskGuard;
use crate::domain::{ExecutionResult, ExtrinsicCall, ItemKind, QueueItem, RpcDescriptor, TxReceipt, TxStatus};
use crate::foundation::{ItemId, QueueError, Result};
use crate::infrastructure::chain::{ChainClient, SignedPayload, TxSubscription};
use crate::infrastructure::signer::{SignerPayload, SignerProvider};
use log::{debug, info, trace, warn};
use std::sync::Arc;
use tokio::sync::watch;

/// Tracks which one-shot callbacks have fired for an item, across the
/// inline phase and the background watcher.
#[derive(Clone, Copy, Default)]
struct WatchOutcome {
    success_reported: bool,
    failure_reported: bool,
}

/// Watches the queue, selects the single next eligible operation, and runs
/// it through its lifecycle, reporting every transition back through the
/// store's status setter.
pub struct Dispatcher {
    queue: Arc<TransactionQueue>,
    chain: Arc<dyn ChainClient>,
    signers: Arc<dyn SignerProvider>,
    watchers: Vec<TaskGuard>,
}

impl Dispatcher {
    pub fn new(queue: Arc<TransactionQueue>, chain: Arc<dyn ChainClient>, signers: Arc<dyn SignerProvider>) -> Self {
        Self { queue, chain, signers, watchers: Vec::new() }
    }

    /// Runs until the shutdown channel flips to `true` or its sender drops.
    ///
    /// Exactly one item is executed at a time; items queued behind it wait
    /// untouched until the current one reaches a terminal state or hands off
    /// its subscription (left the signing/sending phase).
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!("dispatcher started");
        loop {
            while let Some(item) = self.queue.next_eligible() {
                self.execute(item).await;
                self.watchers.retain(|watcher| !watcher.is_finished());
            }
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = self.queue.notified() => {}
            }
        }
        info!("dispatcher stopped");
        Ok(())
    }

    async fn execute(&mut self, item: QueueItem) {
        debug!("executing queue item id={} kind={}", item.id, item.kind.name());
        match item.kind.clone() {
            ItemKind::Extrinsic { call, nonce, rpc } => self.execute_extrinsic(item, call, nonce, rpc).await,
            ItemKind::Rpc { rpc, values } => self.execute_rpc(item, rpc, values).await,
        }
    }

    async fn execute_rpc(&self, item: QueueItem, rpc: RpcDescriptor, values: Vec<serde_json::Value>) {
        let id = item.id;
        self.set_status(id, TxStatus::Sending, None, None);
        debug!("rpc call dispatched id={} method={} value_count={}", id, rpc, values.len());
        match self.chain.rpc_call(&rpc, &values).await {
            Ok(value) => {
                let result = ExecutionResult::Value(value);
                self.set_status(id, TxStatus::Sent, Some(result.clone()), None);
                info!("rpc call resolved id={} method={}", id, rpc);
                if let Some(on_success) = &item.callbacks.on_success {
                    on_success(&result);
                }
            }
            Err(err) => fail_item(self.queue.as_ref(), &item, err),
        }
    }

    async fn execute_extrinsic(&mut self, item: QueueItem, call: ExtrinsicCall, nonce: Option<u64>, rpc: RpcDescriptor) {
        let id = item.id;
        let signature = match &item.sign_address {
            Some(address) => {
                let signer = match self.signers.signer_for(address).await {
                    Ok(signer) => signer,
                    Err(err) => return fail_item(self.queue.as_ref(), &item, err),
                };
                self.set_status(id, TxStatus::Signing, None, None);
                if let Some(on_start) = &item.callbacks.on_start {
                    on_start();
                }
                debug!("awaiting signature id={} address={}", id, address);
                let payload = SignerPayload { address: address.clone(), call: call.clone(), nonce };
                match signer.sign(&payload).await {
                    Ok(signature) => Some(signature),
                    Err(err) => return fail_item(self.queue.as_ref(), &item, err),
                }
            }
            None => {
                if let Some(on_start) = &item.callbacks.on_start {
                    on_start();
                }
                None
            }
        };

        self.set_status(id, TxStatus::Sending, None, None);
        let payload = SignedPayload { call, sign_address: item.sign_address.clone(), nonce, signature };
        let subscription = match self.chain.submit_and_watch(&rpc, payload).await {
            Ok(subscription) => subscription,
            Err(err) => return fail_item(self.queue.as_ref(), &item, err),
        };

        // Drive the subscription inline until the item has left the
        // exclusive signing/sending phase, then hand the remainder to a
        // background watcher so the next queued item can start.
        if let Some((subscription, outcome)) =
            drive_subscription(self.queue.as_ref(), &item, subscription, WatchOutcome::default(), true).await
        {
            let guard = spawn_watcher(self.queue.clone(), item, subscription, outcome);
            self.watchers.push(guard);
        }
    }

    fn set_status(&self, id: ItemId, status: TxStatus, result: Option<ExecutionResult>, error: Option<QueueError>) {
        if let Err(err) = self.queue.set_status(id, status, result, error) {
            warn!("status update failed id={} status={} error={}", id, status, err);
        }
    }
}

/// Applies updates until the stream ends, the item reaches a terminal
/// status, or — when `until_handoff` is set — the item has left the
/// signing/sending phase, in which case the live subscription is returned
/// for a background watcher to finish.
async fn drive_subscription(
    queue: &TransactionQueue,
    item: &QueueItem,
    mut subscription: TxSubscription,
    mut outcome: WatchOutcome,
    until_handoff: bool,
) -> Option<(TxSubscription, WatchOutcome)> {
    loop {
        match subscription.next().await {
            None => {
                warn!("subscription ended without terminal status id={}", item.id);
                if let Err(err) = queue.set_status(item.id, TxStatus::Incomplete, None, None) {
                    warn!("status update failed id={} error={}", item.id, err);
                }
                return None;
            }
            Some(Err(err)) => {
                fail_item(queue, item, err);
                return None;
            }
            Some(Ok(receipt)) => {
                let holds_slot = matches!(receipt.status, TxStatus::Signing | TxStatus::Sending);
                if apply_update(queue, item, &receipt, &mut outcome) {
                    trace!("subscription finished id={} status={}", item.id, receipt.status);
                    return None;
                }
                if until_handoff && !holds_slot {
                    return Some((subscription, outcome));
                }
            }
        }
    }
}

fn spawn_watcher(queue: Arc<TransactionQueue>, item: QueueItem, subscription: TxSubscription, outcome: WatchOutcome) -> TaskGuard {
    TaskGuard::new(tokio::spawn(async move {
        drive_subscription(queue.as_ref(), &item, subscription, outcome, false).await;
    }))
}

/// Applies one subscription update: store the reported chain state, fire
/// `on_update`, and fire `on_success`/`on_failure` exactly once when the
/// receipt carries the extrinsic outcome event. Returns whether the status
/// is terminal.
fn apply_update(queue: &TransactionQueue, item: &QueueItem, receipt: &TxReceipt, outcome: &mut WatchOutcome) -> bool {
    let result = ExecutionResult::Receipt(receipt.clone());
    if let Err(err) = queue.set_status(item.id, receipt.status, Some(result.clone()), None) {
        warn!("status update failed id={} status={} error={}", item.id, receipt.status, err);
    }
    if let Some(on_update) = &item.callbacks.on_update {
        on_update(receipt);
    }
    if receipt.found_failure() {
        if !outcome.failure_reported {
            outcome.failure_reported = true;
            info!("on-chain dispatch failure id={} status={}", item.id, receipt.status);
            if let Some(on_failure) = &item.callbacks.on_failure {
                on_failure(Some(&result));
            }
        }
    } else if receipt.found_success() && !outcome.success_reported {
        outcome.success_reported = true;
        if let Some(on_success) = &item.callbacks.on_success {
            on_success(&result);
        }
    }
    receipt.status.is_terminal()
}

/// Converts a failure into `error` status plus the failure callback; no
/// retry, nothing propagates out of the dispatcher.
fn fail_item(queue: &TransactionQueue, item: &QueueItem, err: QueueError) {
    warn!("queue item failed id={} error={}", item.id, err);
    if let Err(set_err) = queue.set_status(item.id, TxStatus::Error, None, Some(err)) {
        warn!("status update failed id={} error={}", item.id, set_err);
    }
    if let Some(on_failure) = &item.callbacks.on_failure {
        on_failure(None);
    }
}
