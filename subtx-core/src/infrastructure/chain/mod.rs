use crate::domain::{ExtrinsicCall, RpcDescriptor, TxReceipt};
use crate::foundation::{AccountId, QueueError};
use crate::infrastructure::signer::Signature;
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;

pub mod mock;
pub mod registry;

pub use mock::MockChain;
pub use registry::StaticRegistry;

pub type Result<T> = std::result::Result<T, QueueError>;

/// An extrinsic ready for submission: the call plus the signature produced
/// by the holder's wallet, or neither for an unsigned submission.
#[derive(Clone, Debug)]
pub struct SignedPayload {
    pub call: ExtrinsicCall,
    pub sign_address: Option<AccountId>,
    pub nonce: Option<u64>,
    pub signature: Option<Signature>,
}

/// Stream of inclusion-status updates for one submitted extrinsic, open
/// until finalization or terminal failure.
pub struct TxSubscription {
    inner: BoxStream<'static, Result<TxReceipt>>,
}

impl TxSubscription {
    pub fn new(inner: BoxStream<'static, Result<TxReceipt>>) -> Self {
        Self { inner }
    }

    pub async fn next(&mut self) -> Option<Result<TxReceipt>> {
        self.inner.next().await
    }
}

/// Handle onto the connected chain node.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Submits a payload through the given descriptor and subscribes to its
    /// inclusion-status updates.
    async fn submit_and_watch(&self, rpc: &RpcDescriptor, payload: SignedPayload) -> Result<TxSubscription>;

    /// Invokes a named remote procedure with positional arguments.
    async fn rpc_call(&self, rpc: &RpcDescriptor, values: &[serde_json::Value]) -> Result<serde_json::Value>;
}
