use crate::domain::{CallMeta, ChainRegistry, DispatchError, ErrorMeta};
use crate::foundation::CallIndex;
use std::collections::HashMap;

/// Table-backed registry, populated once from decoded chain metadata.
#[derive(Clone, Debug, Default)]
pub struct StaticRegistry {
    calls: HashMap<CallIndex, CallMeta>,
    errors: HashMap<(u8, u8), ErrorMeta>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_call(mut self, call_index: CallIndex, section: &str, method: &str, args: &[&str]) -> Self {
        let meta = CallMeta {
            section: section.to_string(),
            method: method.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        };
        self.calls.insert(call_index, meta);
        self
    }

    pub fn with_error(mut self, module: u8, error: u8, section: &str, name: &str, detail: &str) -> Self {
        let meta = ErrorMeta { section: section.to_string(), name: name.to_string(), detail: detail.to_string() };
        self.errors.insert((module, error), meta);
        self
    }
}

impl ChainRegistry for StaticRegistry {
    fn call_meta(&self, call_index: CallIndex) -> Option<CallMeta> {
        self.calls.get(&call_index).cloned()
    }

    fn error_meta(&self, dispatch_error: DispatchError) -> Option<ErrorMeta> {
        self.errors.get(&(dispatch_error.module, dispatch_error.error)).cloned()
    }
}
