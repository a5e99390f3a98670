//! Domain layer: pure data model and logic, no I/O.

pub mod action;
pub mod event;
pub mod item;
pub mod merge;
pub mod registry;
pub mod status;

pub use action::{ActionKind, ActionLabel, ActionStatus, StatusEntry};
pub use event::{ChainEvent, DispatchError, TxReceipt};
pub use item::{
    ExecutionResult, ExtrinsicCall, ExtrinsicRequest, FailureCallback, ItemCallbacks, ItemKind, QueueItem, ResultCallback,
    RpcDescriptor, RpcRequest, StartCallback, UpdateCallback,
};
pub use merge::{merge_status, statuses_from_events};
pub use registry::{CallMeta, ChainRegistry, ErrorMeta};
pub use status::TxStatus;
