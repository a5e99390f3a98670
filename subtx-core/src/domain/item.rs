use crate::domain::event::TxReceipt;
use crate::domain::status::TxStatus;
use crate::foundation::{AccountId, CallIndex, ItemId, QueueError, SUBMIT_RPC_METHOD, SUBMIT_RPC_SECTION};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub type StartCallback = Arc<dyn Fn() + Send + Sync>;
pub type UpdateCallback = Arc<dyn Fn(&TxReceipt) + Send + Sync>;
pub type ResultCallback = Arc<dyn Fn(&ExecutionResult) + Send + Sync>;
pub type FailureCallback = Arc<dyn Fn(Option<&ExecutionResult>) + Send + Sync>;

/// A signable runtime call: the two-byte call index followed by its
/// SCALE-encoded arguments, opaque to this crate.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct ExtrinsicCall {
    pub call_index: CallIndex,
    pub data: Vec<u8>,
}

impl ExtrinsicCall {
    pub fn new(call_index: CallIndex, data: Vec<u8>) -> Self {
        Self { call_index, data }
    }
}

impl fmt::Display for ExtrinsicCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 0x{}", self.call_index, hex::encode(&self.data))
    }
}

/// Named remote procedure, `section.method`.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub struct RpcDescriptor {
    pub section: String,
    pub method: String,
}

impl RpcDescriptor {
    pub fn new(section: impl Into<String>, method: impl Into<String>) -> Self {
        Self { section: section.into(), method: method.into() }
    }

    /// The standard submission descriptor used when an extrinsic is enqueued
    /// without an explicit one.
    pub fn submit_and_watch() -> Self {
        Self::new(SUBMIT_RPC_SECTION, SUBMIT_RPC_METHOD)
    }
}

impl fmt::Display for RpcDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section, self.method)
    }
}

/// The two shapes of queued work.
#[derive(Clone, Debug)]
pub enum ItemKind {
    Extrinsic { call: ExtrinsicCall, nonce: Option<u64>, rpc: RpcDescriptor },
    Rpc { rpc: RpcDescriptor, values: Vec<serde_json::Value> },
}

impl ItemKind {
    pub const fn name(&self) -> &'static str {
        match self {
            ItemKind::Extrinsic { .. } => "extrinsic",
            ItemKind::Rpc { .. } => "rpc",
        }
    }
}

/// Last-known execution result of a queue item.
#[derive(Clone, Debug)]
pub enum ExecutionResult {
    /// Subscription payload from a watched submission.
    Receipt(TxReceipt),
    /// Resolved value of a one-shot RPC call.
    Value(serde_json::Value),
}

impl ExecutionResult {
    pub fn as_receipt(&self) -> Option<&TxReceipt> {
        match self {
            ExecutionResult::Receipt(receipt) => Some(receipt),
            ExecutionResult::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&serde_json::Value> {
        match self {
            ExecutionResult::Receipt(_) => None,
            ExecutionResult::Value(value) => Some(value),
        }
    }
}

/// Lifecycle callbacks attached to a queue item.
///
/// `on_update` may fire many times; the others at most once per item.
#[derive(Clone, Default)]
pub struct ItemCallbacks {
    pub on_start: Option<StartCallback>,
    pub on_update: Option<UpdateCallback>,
    pub on_success: Option<ResultCallback>,
    pub on_failure: Option<FailureCallback>,
}

impl fmt::Debug for ItemCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemCallbacks")
            .field("on_start", &self.on_start.is_some())
            .field("on_update", &self.on_update.is_some())
            .field("on_success", &self.on_success.is_some())
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}

/// One unit of work tracked through its lifecycle by the queue store.
#[derive(Clone, Debug)]
pub struct QueueItem {
    pub id: ItemId,
    pub kind: ItemKind,
    pub sign_address: Option<AccountId>,
    pub status: TxStatus,
    pub error: Option<QueueError>,
    pub result: Option<ExecutionResult>,
    pub callbacks: ItemCallbacks,
}

/// Caller-supplied partial record for enqueueing an extrinsic.
#[derive(Clone, Debug, Default)]
pub struct ExtrinsicRequest {
    pub call: ExtrinsicCall,
    pub sign_address: Option<AccountId>,
    pub nonce: Option<u64>,
    pub rpc: Option<RpcDescriptor>,
    pub callbacks: ItemCallbacks,
}

impl ExtrinsicRequest {
    pub fn new(call: ExtrinsicCall) -> Self {
        Self { call, ..Self::default() }
    }

    pub fn signed_by(mut self, address: impl Into<AccountId>) -> Self {
        self.sign_address = Some(address.into());
        self
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn with_callbacks(mut self, callbacks: ItemCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }
}

/// Caller-supplied partial record for enqueueing a raw RPC call.
#[derive(Clone, Debug)]
pub struct RpcRequest {
    pub rpc: RpcDescriptor,
    pub values: Vec<serde_json::Value>,
    pub callbacks: ItemCallbacks,
}

impl RpcRequest {
    pub fn new(rpc: RpcDescriptor, values: Vec<serde_json::Value>) -> Self {
        Self { rpc, values, callbacks: ItemCallbacks::default() }
    }

    pub fn with_callbacks(mut self, callbacks: ItemCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }
}
