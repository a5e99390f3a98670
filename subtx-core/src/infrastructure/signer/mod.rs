use crate::domain::ExtrinsicCall;
use crate::foundation::{AccountId, QueueError};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

pub mod mock;

pub use mock::{MockSigner, MockSigners};

pub type Result<T> = std::result::Result<T, QueueError>;

/// Signature bytes produced by a wallet for one payload.
#[derive(Clone, Eq, PartialEq)]
pub struct Signature(pub Vec<u8>);

impl Signature {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature(0x{})", hex::encode(&self.0))
    }
}

/// The payload a wallet is asked to sign.
#[derive(Clone, Debug)]
pub struct SignerPayload {
    pub address: AccountId,
    pub call: ExtrinsicCall,
    pub nonce: Option<u64>,
}

/// A connected wallet capable of signing for one address.
///
/// `sign` suspends until the holder approves or rejects; wall-clock time is
/// unbounded and user-paced.
#[async_trait]
pub trait PayloadSigner: Send + Sync {
    async fn sign(&self, payload: &SignerPayload) -> Result<Signature>;
}

/// Resolves the wallet signer bound to an account address.
#[async_trait]
pub trait SignerProvider: Send + Sync {
    /// Yields a signer for the address, or `QueueError::SignerUnavailable`
    /// when no compatible wallet extension is connected for it.
    async fn signer_for(&self, address: &AccountId) -> Result<Arc<dyn PayloadSigner>>;
}
