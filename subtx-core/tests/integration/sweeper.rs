//! Sweeper timing under a paused clock: terminal entries settle for exactly
//! the grace period, then are swept.

use crate::fixtures::{test_queue, test_queue_with_timeout, transfer_call, ALICE};
use std::time::Duration;
use subtx_core::domain::{ActionKind, ActionStatus, ExtrinsicRequest, TxStatus};

async fn settle() {
    // Lets freshly spawned timer tasks register their sleeps before the
    // clock is advanced.
    for _ in 0..3 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn terminal_item_completes_after_exactly_the_grace_delay() {
    let queue = test_queue();
    let id = queue.enqueue_extrinsic(ExtrinsicRequest::new(transfer_call()).signed_by(ALICE)).expect("enqueue").id();

    queue.set_status(id, TxStatus::Finalized, None, None).expect("set_status");
    settle().await;

    tokio::time::advance(Duration::from_millis(7_499)).await;
    settle().await;
    assert_eq!(queue.item(id).expect("item").status, TxStatus::Finalized, "not swept before the grace delay");

    tokio::time::advance(Duration::from_millis(2)).await;
    settle().await;
    assert_eq!(queue.item(id).expect("item").status, TxStatus::Completed, "swept once the grace delay elapsed");
}

#[tokio::test(start_paused = true)]
async fn completed_overwrite_preserves_the_record() {
    let queue = test_queue_with_timeout(100);
    let id = queue.enqueue_extrinsic(ExtrinsicRequest::new(transfer_call()).signed_by(ALICE)).expect("enqueue").id();

    queue.set_status(id, TxStatus::Dropped, None, None).expect("set_status");
    settle().await;
    tokio::time::advance(Duration::from_millis(150)).await;
    settle().await;

    // The sweep overwrites status in place; the record stays readable.
    let items = queue.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].status, TxStatus::Completed);
}

#[tokio::test(start_paused = true)]
async fn non_terminal_status_is_never_swept() {
    let queue = test_queue_with_timeout(100);
    let id = queue.enqueue_extrinsic(ExtrinsicRequest::new(transfer_call()).signed_by(ALICE)).expect("enqueue").id();

    queue.set_status(id, TxStatus::InBlock, None, None).expect("set_status");
    settle().await;
    tokio::time::advance(Duration::from_secs(60)).await;
    settle().await;

    assert_eq!(queue.item(id).expect("item").status, TxStatus::InBlock);
}

#[tokio::test(start_paused = true)]
async fn status_entries_vanish_after_the_grace_delay() {
    let queue = test_queue();
    queue.publish(vec![ActionStatus::new("balances.transfer", ActionKind::Queued)]).expect("publish");
    settle().await;
    assert_eq!(queue.statuses().len(), 1);

    tokio::time::advance(Duration::from_millis(7_499)).await;
    settle().await;
    assert_eq!(queue.statuses().len(), 1, "not removed before the grace delay");

    tokio::time::advance(Duration::from_millis(2)).await;
    settle().await;
    assert!(queue.statuses().is_empty(), "removed once the grace delay elapsed");
}

#[tokio::test(start_paused = true)]
async fn early_completion_wins_over_the_timer() {
    let queue = test_queue_with_timeout(100);
    let handle = queue.enqueue_extrinsic(ExtrinsicRequest::new(transfer_call()).signed_by(ALICE)).expect("enqueue");
    let id = handle.id();

    queue.set_status(id, TxStatus::Finalized, None, None).expect("set_status");
    settle().await;

    handle.complete();
    assert_eq!(queue.item(id).expect("item").status, TxStatus::Completed);

    // The timer firing later is a no-op on an already-completed item.
    tokio::time::advance(Duration::from_millis(150)).await;
    settle().await;
    assert_eq!(queue.item(id).expect("item").status, TxStatus::Completed);
}
