//! End-to-end pipeline scenarios over the mock chain and mock signers.

use crate::fixtures::{log_index, test_queue, transfer_call, transition_log, wait_until, CallbackProbe, ALICE, BOB};
use std::sync::Arc;
use std::time::Duration;
use subtx_core::application::{Dispatcher, TransactionQueue};
use subtx_core::domain::{ActionLabel, ChainEvent, DispatchError, ExtrinsicRequest, RpcDescriptor, RpcRequest, TxReceipt, TxStatus};
use subtx_core::foundation::{ItemId, QueueError};
use subtx_core::infrastructure::chain::{ChainClient, MockChain};
use subtx_core::infrastructure::signer::{MockSigners, SignerProvider};
use tokio::sync::watch;

const WAIT: Duration = Duration::from_secs(5);

struct Harness {
    queue: Arc<TransactionQueue>,
    chain: Arc<MockChain>,
    signers: Arc<MockSigners>,
    // Keeps the dispatcher's shutdown channel open for the test's lifetime.
    _shutdown: watch::Sender<bool>,
}

fn spawn_pipeline(chain: MockChain, signers: MockSigners) -> Harness {
    let queue = test_queue();
    let chain = Arc::new(chain);
    let signers = Arc::new(signers);
    let (shutdown, shutdown_rx) = watch::channel(false);
    let dispatcher = Dispatcher::new(queue.clone(), chain.clone() as Arc<dyn ChainClient>, signers.clone() as Arc<dyn SignerProvider>);
    tokio::spawn(dispatcher.run(shutdown_rx));
    Harness { queue, chain, signers, _shutdown: shutdown }
}

async fn wait_for_status(queue: &Arc<TransactionQueue>, id: ItemId, status: TxStatus) {
    let queue = queue.clone();
    let reached = wait_until(WAIT, move || queue.item(id).map(|item| item.status == status).unwrap_or(false)).await;
    assert!(reached, "item {id} never reached {status}");
}

fn happy_script() -> Vec<subtx_core::Result<TxReceipt>> {
    vec![
        Ok(TxReceipt::status_only(TxStatus::Broadcast)),
        Ok(TxReceipt::in_block("0xb10c", vec![ChainEvent::new("balances", "Transfer"), ChainEvent::success()])),
        Ok(TxReceipt::status_only(TxStatus::Finalized)),
    ]
}

#[tokio::test]
async fn signed_extrinsic_runs_to_finalization() {
    let chain = MockChain::new().with_step_delay(Duration::from_millis(40));
    chain.script_submission(happy_script());
    let signers = MockSigners::new().with_sign_delay(Duration::from_millis(50));
    signers.approve(ALICE);

    let harness = spawn_pipeline(chain, signers);
    let probe = CallbackProbe::new();
    let id = harness
        .queue
        .enqueue_extrinsic(ExtrinsicRequest::new(transfer_call()).signed_by(ALICE).with_callbacks(probe.callbacks()))
        .expect("enqueue")
        .id();

    // The item walks the full happy path in order.
    wait_for_status(&harness.queue, id, TxStatus::Signing).await;
    wait_for_status(&harness.queue, id, TxStatus::Sending).await;
    wait_for_status(&harness.queue, id, TxStatus::Finalized).await;

    assert_eq!(probe.starts(), 1);
    assert_eq!(probe.updates(), vec![TxStatus::Broadcast, TxStatus::InBlock, TxStatus::Finalized]);
    assert_eq!(probe.successes(), 1);
    assert_eq!(probe.failures(), 0);

    let submitted = harness.chain.submitted();
    assert_eq!(submitted.len(), 1);
    assert!(submitted[0].signature.is_some(), "payload must carry the wallet signature");
    assert_eq!(harness.signers.sign_requests(&ALICE.into()), 1);

    // The in-block events surfaced as one aggregate, success leading.
    let statuses = harness.queue.statuses();
    let aggregate = statuses
        .iter()
        .find_map(|entry| match &entry.action {
            ActionLabel::Grouped(actions) => Some(actions.clone()),
            ActionLabel::Single(_) => None,
        })
        .expect("aggregate entry");
    assert_eq!(aggregate[0], "system.ExtrinsicSuccess");
}

#[tokio::test]
async fn rejected_signature_fails_the_item() {
    let chain = MockChain::new();
    let signers = MockSigners::new();
    signers.reject(ALICE);

    let harness = spawn_pipeline(chain, signers);
    let probe = CallbackProbe::new();
    let id = harness
        .queue
        .enqueue_extrinsic(ExtrinsicRequest::new(transfer_call()).signed_by(ALICE).with_callbacks(probe.callbacks()))
        .expect("enqueue")
        .id();

    wait_for_status(&harness.queue, id, TxStatus::Error).await;

    assert_eq!(probe.failures(), 1);
    assert_eq!(probe.successes(), 0);
    let item = harness.queue.item(id).expect("item");
    assert!(matches!(item.error, Some(QueueError::SignatureRejected { .. })));
    assert!(harness.chain.submitted().is_empty(), "rejected payload must never be submitted");
}

#[tokio::test]
async fn missing_signer_fails_without_signing_phase() {
    let harness = spawn_pipeline(MockChain::new(), MockSigners::new());
    let probe = CallbackProbe::new();
    let id = harness
        .queue
        .enqueue_extrinsic(ExtrinsicRequest::new(transfer_call()).signed_by(BOB).with_callbacks(probe.callbacks()))
        .expect("enqueue")
        .id();

    wait_for_status(&harness.queue, id, TxStatus::Error).await;

    assert_eq!(probe.starts(), 0, "signing never began");
    assert_eq!(probe.failures(), 1);
    let item = harness.queue.item(id).expect("item");
    assert!(matches!(item.error, Some(QueueError::SignerUnavailable { .. })));
}

#[tokio::test]
async fn raw_rpc_call_resolves_to_sent() {
    let chain = MockChain::new().with_step_delay(Duration::from_millis(40));
    let rpc = RpcDescriptor::new("chain", "getBlockHash");
    chain.script_rpc(&rpc, Ok(serde_json::json!("0xdeadbeef")));

    let harness = spawn_pipeline(chain, MockSigners::new());
    let probe = CallbackProbe::new();
    let id = harness
        .queue
        .enqueue_rpc(RpcRequest::new(rpc.clone(), vec![serde_json::json!(42)]).with_callbacks(probe.callbacks()))
        .expect("enqueue")
        .id();

    wait_for_status(&harness.queue, id, TxStatus::Sending).await;
    wait_for_status(&harness.queue, id, TxStatus::Sent).await;

    assert_eq!(probe.successes(), 1);
    assert_eq!(probe.failures(), 0);
    assert_eq!(probe.last_value(), Some(serde_json::json!("0xdeadbeef")));

    let calls = harness.chain.rpc_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, rpc);
    assert_eq!(calls[0].1, vec![serde_json::json!(42)]);
}

#[tokio::test]
async fn unscripted_rpc_call_fails_the_item() {
    let harness = spawn_pipeline(MockChain::new(), MockSigners::new());
    let probe = CallbackProbe::new();
    let id = harness
        .queue
        .enqueue_rpc(RpcRequest::new(RpcDescriptor::new("chain", "getHeader"), vec![]).with_callbacks(probe.callbacks()))
        .expect("enqueue")
        .id();

    wait_for_status(&harness.queue, id, TxStatus::Error).await;
    assert_eq!(probe.failures(), 1);
    let item = harness.queue.item(id).expect("item");
    assert!(matches!(item.error, Some(QueueError::RpcFailed { .. })));
}

#[tokio::test]
async fn second_extrinsic_signs_only_after_first_leaves_the_slot() {
    let chain = MockChain::new().with_step_delay(Duration::from_millis(40));
    chain.script_submission(happy_script());
    chain.script_submission(happy_script());
    let signers = MockSigners::new().with_sign_delay(Duration::from_millis(40));
    signers.approve(ALICE);

    let harness = spawn_pipeline(chain, signers);
    let log = transition_log();
    let first_probe = CallbackProbe::new();
    let second_probe = CallbackProbe::new();

    let first = harness
        .queue
        .enqueue_extrinsic(ExtrinsicRequest::new(transfer_call()).signed_by(ALICE).with_callbacks(first_probe.labeled("tx1", &log)))
        .expect("enqueue")
        .id();
    let second = harness
        .queue
        .enqueue_extrinsic(ExtrinsicRequest::new(transfer_call()).signed_by(ALICE).with_callbacks(second_probe.labeled("tx2", &log)))
        .expect("enqueue")
        .id();

    wait_for_status(&harness.queue, first, TxStatus::Finalized).await;
    wait_for_status(&harness.queue, second, TxStatus::Finalized).await;

    // The second item must not have started signing before the first left
    // the signing/sending phase (its broadcast update).
    let first_broadcast = log_index(&log, "tx1", "broadcast").expect("tx1 broadcast");
    let second_start = log_index(&log, "tx2", "start").expect("tx2 start");
    assert!(
        second_start > first_broadcast,
        "second item started signing at {second_start}, before first broadcast at {first_broadcast}"
    );

    assert_eq!(first_probe.successes(), 1);
    assert_eq!(second_probe.successes(), 1);
    assert_eq!(harness.signers.sign_requests(&ALICE.into()), 2);
}

#[tokio::test]
async fn onchain_dispatch_failure_still_finalizes_but_reports_failure() {
    let chain = MockChain::new().with_step_delay(Duration::from_millis(40));
    chain.script_submission(vec![
        Ok(TxReceipt::status_only(TxStatus::Broadcast)),
        Ok(TxReceipt::in_block("0xb10c", vec![ChainEvent::failed(DispatchError { module: 4, error: 2 })])),
        Ok(TxReceipt::status_only(TxStatus::Finalized)),
    ]);
    let signers = MockSigners::new();
    signers.approve(ALICE);

    let harness = spawn_pipeline(chain, signers);
    let probe = CallbackProbe::new();
    let id = harness
        .queue
        .enqueue_extrinsic(ExtrinsicRequest::new(transfer_call()).signed_by(ALICE).with_callbacks(probe.callbacks()))
        .expect("enqueue")
        .id();

    wait_for_status(&harness.queue, id, TxStatus::Finalized).await;

    assert_eq!(probe.failures(), 1, "on-chain dispatch failure reported exactly once");
    assert_eq!(probe.successes(), 0);

    let statuses = harness.queue.statuses();
    let decoded = statuses
        .iter()
        .find(|entry| entry.message.as_deref().map(|message| message.contains("InsufficientBalance")).unwrap_or(false))
        .expect("decoded dispatch failure notification");
    assert_eq!(decoded.action.to_string(), "system.ExtrinsicFailed");
}

#[tokio::test]
async fn subscription_error_moves_item_to_error() {
    let chain = MockChain::new().with_step_delay(Duration::from_millis(20));
    chain.script_submission(vec![
        Ok(TxReceipt::status_only(TxStatus::Broadcast)),
        Err(QueueError::subscription_lost("websocket closed")),
    ]);
    let signers = MockSigners::new();
    signers.approve(ALICE);

    let harness = spawn_pipeline(chain, signers);
    let probe = CallbackProbe::new();
    let id = harness
        .queue
        .enqueue_extrinsic(ExtrinsicRequest::new(transfer_call()).signed_by(ALICE).with_callbacks(probe.callbacks()))
        .expect("enqueue")
        .id();

    wait_for_status(&harness.queue, id, TxStatus::Error).await;

    assert_eq!(probe.failures(), 1);
    let item = harness.queue.item(id).expect("item");
    assert!(matches!(item.error, Some(QueueError::SubscriptionLost { .. })));
}

#[tokio::test]
async fn unsigned_extrinsic_skips_the_signing_phase() {
    let chain = MockChain::new().with_step_delay(Duration::from_millis(20));
    chain.script_submission(happy_script());

    let harness = spawn_pipeline(chain, MockSigners::new());
    let probe = CallbackProbe::new();
    let id = harness
        .queue
        .enqueue_extrinsic(ExtrinsicRequest::new(transfer_call()).with_callbacks(probe.callbacks()))
        .expect("enqueue")
        .id();

    wait_for_status(&harness.queue, id, TxStatus::Finalized).await;

    assert_eq!(probe.starts(), 1);
    assert_eq!(probe.successes(), 1);
    let submitted = harness.chain.submitted();
    assert_eq!(submitted.len(), 1);
    assert!(submitted[0].signature.is_none(), "unsigned submission carries no signature");
}
