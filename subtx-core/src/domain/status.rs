use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a queued operation.
///
/// Covers both the locally-assigned phases (`Queued`, `Signing`, `Sending`)
/// and every state the chain subscription can report after submission.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Future,
    Ready,
    Queued,
    Qr,
    Signing,
    Broadcast,
    Sending,
    Sent,
    InBlock,
    Finalized,
    FinalityTimeout,
    Usurped,
    Dropped,
    Invalid,
    Cancelled,
    Error,
    Incomplete,
    Retracted,
    Blocked,
    Completed,
}

/// States after which no further transition is driven by the dispatcher.
///
/// A status missing from this set would leak its queue entry forever, so the
/// table carries every terminal state the chain client can emit plus the
/// locally-assigned ones.
const TERMINAL_STATUS: &[TxStatus] = &[
    TxStatus::Sent,
    TxStatus::Finalized,
    TxStatus::FinalityTimeout,
    TxStatus::Usurped,
    TxStatus::Dropped,
    TxStatus::Invalid,
    TxStatus::Cancelled,
    TxStatus::Error,
    TxStatus::Completed,
];

/// States in which an item may occupy (or claim) the single signing slot.
///
/// Deliberately not keyed by signer address: two items for two different
/// wallets still serialize, matching the one-signature-at-a-time constraint
/// imposed by wallet extensions.
const AVAILABLE_STATUS: &[TxStatus] = &[TxStatus::Queued, TxStatus::Qr, TxStatus::Signing];

impl TxStatus {
    pub fn is_terminal(&self) -> bool {
        TERMINAL_STATUS.contains(self)
    }

    pub fn is_eligible(&self) -> bool {
        AVAILABLE_STATUS.contains(self)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            TxStatus::Future => "future",
            TxStatus::Ready => "ready",
            TxStatus::Queued => "queued",
            TxStatus::Qr => "qr",
            TxStatus::Signing => "signing",
            TxStatus::Broadcast => "broadcast",
            TxStatus::Sending => "sending",
            TxStatus::Sent => "sent",
            TxStatus::InBlock => "inblock",
            TxStatus::Finalized => "finalized",
            TxStatus::FinalityTimeout => "finalitytimeout",
            TxStatus::Usurped => "usurped",
            TxStatus::Dropped => "dropped",
            TxStatus::Invalid => "invalid",
            TxStatus::Cancelled => "cancelled",
            TxStatus::Error => "error",
            TxStatus::Incomplete => "incomplete",
            TxStatus::Retracted => "retracted",
            TxStatus::Blocked => "blocked",
            TxStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
