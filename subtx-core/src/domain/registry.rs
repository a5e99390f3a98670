use crate::domain::event::DispatchError;
use crate::foundation::CallIndex;

/// Display metadata for a runtime call, resolved from its call index.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CallMeta {
    pub section: String,
    pub method: String,
    pub args: Vec<String>,
}

impl CallMeta {
    /// `section.method`, the display identity of the call.
    pub fn action(&self) -> String {
        format!("{}.{}", self.section, self.method)
    }
}

/// Display metadata for an on-chain dispatch error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ErrorMeta {
    pub section: String,
    pub name: String,
    pub detail: String,
}

/// Typed lookup table over the chain's metadata, populated when the chain
/// client loads metadata and injected wherever raw indices must become
/// human-readable names.
pub trait ChainRegistry: Send + Sync {
    fn call_meta(&self, call_index: CallIndex) -> Option<CallMeta>;
    fn error_meta(&self, dispatch_error: DispatchError) -> Option<ErrorMeta>;
}
