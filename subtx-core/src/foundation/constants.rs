//! System-wide constants for the Subtx transaction queue.

/// Grace period before a terminal queue item is overwritten to `completed`
/// and before an ambient status notification is dropped, in milliseconds.
///
/// Consumers get a brief "settled" window to read the final state before
/// the entry disappears from snapshots.
pub const REMOVE_TIMEOUT_MS: u64 = 7_500;

/// RPC section used when an extrinsic is enqueued without an explicit
/// submission descriptor.
pub const SUBMIT_RPC_SECTION: &str = "author";

/// RPC method used when an extrinsic is enqueued without an explicit
/// submission descriptor.
pub const SUBMIT_RPC_METHOD: &str = "submitAndWatchExtrinsic";

/// Sentinel message marking a chain event as low-priority noise.
///
/// Entries carrying this message are folded into one aggregate notification
/// per merge pass instead of appearing individually.
pub const EVENT_MESSAGE: &str = "extrinsic event";

/// Chain module that emits the extrinsic outcome events.
pub const SYSTEM_SECTION: &str = "system";

/// Event method reporting successful extrinsic execution.
pub const EXTRINSIC_SUCCESS_METHOD: &str = "ExtrinsicSuccess";

/// Event method reporting an on-chain dispatch failure.
pub const EXTRINSIC_FAILED_METHOD: &str = "ExtrinsicFailed";

/// Modules whose events are dropped from the notification surface.
///
/// Governance-adjacent bookkeeping emits events on nearly every block;
/// surfacing them would drown the notifications a wallet user cares about.
pub const EXCLUDED_SECTIONS: &[&str] = &["democracy", "phragmenElection", "imOnline"];

/// Environment variable prefix for configuration overrides.
///
/// Example: `SUBTX_QUEUE__REMOVE_TIMEOUT_MS` -> `queue.remove_timeout_ms`
pub const ENV_PREFIX: &str = "SUBTX_";
