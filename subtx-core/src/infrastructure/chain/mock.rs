use super::{ChainClient, Result, SignedPayload, TxSubscription};
use crate::domain::{RpcDescriptor, TxReceipt};
use crate::foundation::QueueError;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// In-process chain client driven by scripted update sequences.
///
/// Each `submit_and_watch` consumes the next queued script and replays it as
/// the subscription stream, one update per step delay, so tests can observe
/// intermediate statuses and interleave other queue activity.
pub struct MockChain {
    scripts: Mutex<VecDeque<Vec<Result<TxReceipt>>>>,
    rpc_results: Mutex<HashMap<String, Result<serde_json::Value>>>,
    submitted: Mutex<Vec<SignedPayload>>,
    rpc_calls: Mutex<Vec<(RpcDescriptor, Vec<serde_json::Value>)>>,
    step_delay: Duration,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(VecDeque::new()),
            rpc_results: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
            rpc_calls: Mutex::new(Vec::new()),
            step_delay: Duration::from_millis(10),
        }
    }

    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    /// Queues the update sequence replayed by the next submission.
    pub fn script_submission(&self, updates: Vec<Result<TxReceipt>>) {
        if let Ok(mut scripts) = self.scripts.lock() {
            scripts.push_back(updates);
        }
    }

    /// Sets the result returned for a named remote procedure.
    pub fn script_rpc(&self, rpc: &RpcDescriptor, result: Result<serde_json::Value>) {
        if let Ok(mut results) = self.rpc_results.lock() {
            results.insert(rpc.to_string(), result);
        }
    }

    pub fn submitted(&self) -> Vec<SignedPayload> {
        self.submitted.lock().map(|payloads| payloads.clone()).unwrap_or_default()
    }

    pub fn rpc_calls(&self) -> Vec<(RpcDescriptor, Vec<serde_json::Value>)> {
        self.rpc_calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

impl Default for MockChain {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn submit_and_watch(&self, _rpc: &RpcDescriptor, payload: SignedPayload) -> Result<TxSubscription> {
        if let Ok(mut submitted) = self.submitted.lock() {
            submitted.push(payload);
        }
        let updates = self
            .scripts
            .lock()
            .map_err(|_| QueueError::Message("mock chain script lock poisoned".to_string()))?
            .pop_front()
            .ok_or_else(|| QueueError::submit_failed("no scripted updates for submission"))?;

        let step_delay = self.step_delay;
        let stream = async_stream::stream! {
            for update in updates {
                tokio::time::sleep(step_delay).await;
                yield update;
            }
        };
        Ok(TxSubscription::new(Box::pin(stream)))
    }

    async fn rpc_call(&self, rpc: &RpcDescriptor, values: &[serde_json::Value]) -> Result<serde_json::Value> {
        if let Ok(mut calls) = self.rpc_calls.lock() {
            calls.push((rpc.clone(), values.to_vec()));
        }
        tokio::time::sleep(self.step_delay).await;
        self.rpc_results
            .lock()
            .map_err(|_| QueueError::Message("mock chain rpc lock poisoned".to_string()))?
            .get(&rpc.to_string())
            .cloned()
            .unwrap_or_else(|| Err(QueueError::rpc_failed(rpc.to_string(), "no scripted result")))
    }
}
