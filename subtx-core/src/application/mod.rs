//! Application layer: orchestration across domain logic and collaborator I/O.

pub mod dispatcher;
pub mod queue;
pub(crate) mod sweeper;

pub use dispatcher::Dispatcher;
pub use queue::{ItemHandle, StatusHandle, TransactionQueue};
