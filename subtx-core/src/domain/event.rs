use crate::domain::status::TxStatus;
use crate::foundation::{EXTRINSIC_FAILED_METHOD, EXTRINSIC_SUCCESS_METHOD, SYSTEM_SECTION};
use serde::{Deserialize, Serialize};
use std::fmt;

/// On-chain dispatch failure reference, resolved to human text through the
/// error registry.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub struct DispatchError {
    pub module: u8,
    pub error: u8,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module {} error {}", self.module, self.error)
    }
}

/// One event emitted by the chain while executing a block.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub struct ChainEvent {
    pub section: String,
    pub method: String,
    pub dispatch_error: Option<DispatchError>,
}

impl ChainEvent {
    pub fn new(section: impl Into<String>, method: impl Into<String>) -> Self {
        Self { section: section.into(), method: method.into(), dispatch_error: None }
    }

    pub fn success() -> Self {
        Self::new(SYSTEM_SECTION, EXTRINSIC_SUCCESS_METHOD)
    }

    pub fn failed(dispatch_error: DispatchError) -> Self {
        Self { section: SYSTEM_SECTION.to_string(), method: EXTRINSIC_FAILED_METHOD.to_string(), dispatch_error: Some(dispatch_error) }
    }

    /// `section.method`, the display identity of the event.
    pub fn action(&self) -> String {
        format!("{}.{}", self.section, self.method)
    }

    pub fn is_success(&self) -> bool {
        self.section == SYSTEM_SECTION && self.method == EXTRINSIC_SUCCESS_METHOD
    }

    pub fn is_failure(&self) -> bool {
        self.section == SYSTEM_SECTION && self.method == EXTRINSIC_FAILED_METHOD
    }
}

/// One update from a chain submission subscription.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TxReceipt {
    pub status: TxStatus,
    pub block_hash: Option<String>,
    pub events: Vec<ChainEvent>,
}

impl TxReceipt {
    pub fn status_only(status: TxStatus) -> Self {
        Self { status, block_hash: None, events: Vec::new() }
    }

    pub fn in_block(block_hash: impl Into<String>, events: Vec<ChainEvent>) -> Self {
        Self { status: TxStatus::InBlock, block_hash: Some(block_hash.into()), events }
    }

    pub fn found_success(&self) -> bool {
        self.events.iter().any(ChainEvent::is_success)
    }

    pub fn found_failure(&self) -> bool {
        self.events.iter().any(ChainEvent::is_failure)
    }
}
