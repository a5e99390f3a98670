use super::{PayloadSigner, Result, Signature, SignerPayload, SignerProvider};
use crate::foundation::{AccountId, QueueError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum SignerBehavior {
    Approve,
    Reject,
}

/// Wallet signer double with a fixed approve/reject decision per address.
pub struct MockSigner {
    address: AccountId,
    behavior: SignerBehavior,
    sign_delay: Duration,
    requests: AtomicU64,
}

impl MockSigner {
    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PayloadSigner for MockSigner {
    async fn sign(&self, _payload: &SignerPayload) -> Result<Signature> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        tokio::time::sleep(self.sign_delay).await;
        match self.behavior {
            SignerBehavior::Approve => Ok(Signature(vec![0xda; 64])),
            SignerBehavior::Reject => Err(QueueError::signature_rejected(self.address.as_str())),
        }
    }
}

/// Signer provider double: addresses registered as approving or rejecting,
/// anything else reported as having no connected extension.
pub struct MockSigners {
    signers: Mutex<HashMap<AccountId, Arc<MockSigner>>>,
    sign_delay: Duration,
}

impl MockSigners {
    pub fn new() -> Self {
        Self { signers: Mutex::new(HashMap::new()), sign_delay: Duration::from_millis(10) }
    }

    pub fn with_sign_delay(mut self, sign_delay: Duration) -> Self {
        self.sign_delay = sign_delay;
        self
    }

    pub fn approve(&self, address: impl Into<AccountId>) {
        self.register(address.into(), SignerBehavior::Approve);
    }

    pub fn reject(&self, address: impl Into<AccountId>) {
        self.register(address.into(), SignerBehavior::Reject);
    }

    /// Number of signature requests seen for the address.
    pub fn sign_requests(&self, address: &AccountId) -> u64 {
        self.signers.lock().ok().and_then(|signers| signers.get(address).map(|signer| signer.requests())).unwrap_or(0)
    }

    fn register(&self, address: AccountId, behavior: SignerBehavior) {
        let signer = Arc::new(MockSigner { address: address.clone(), behavior, sign_delay: self.sign_delay, requests: AtomicU64::new(0) });
        if let Ok(mut signers) = self.signers.lock() {
            signers.insert(address, signer);
        }
    }
}

impl Default for MockSigners {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignerProvider for MockSigners {
    async fn signer_for(&self, address: &AccountId) -> Result<Arc<dyn PayloadSigner>> {
        let signer = self
            .signers
            .lock()
            .map_err(|_| QueueError::Message("mock signer lock poisoned".to_string()))?
            .get(address)
            .cloned();
        match signer {
            Some(signer) => Ok(signer),
            None => Err(QueueError::signer_unavailable(address.as_str())),
        }
    }
}
