use crate::foundation::StatusId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome tag of an ambient notification.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Error,
    Event,
    EventWarn,
    Queued,
    Received,
    Success,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Error => "error",
            ActionKind::Event => "event",
            ActionKind::EventWarn => "eventWarn",
            ActionKind::Queued => "queued",
            ActionKind::Received => "received",
            ActionKind::Success => "success",
        };
        f.write_str(name)
    }
}

/// Originating action name(s) of a notification.
///
/// A raw entry names a single `section.method`; the merger's aggregate entry
/// carries the whole group it folded.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ActionLabel {
    Single(String),
    Grouped(Vec<String>),
}

impl ActionLabel {
    pub fn single(action: impl Into<String>) -> Self {
        ActionLabel::Single(action.into())
    }

    pub fn as_single(&self) -> Option<&str> {
        match self {
            ActionLabel::Single(action) => Some(action),
            ActionLabel::Grouped(_) => None,
        }
    }
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionLabel::Single(action) => f.write_str(action),
            ActionLabel::Grouped(actions) => f.write_str(&actions.join(", ")),
        }
    }
}

/// A human-presentable notification derived from chain activity, before it
/// is assigned an id and stored.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub struct ActionStatus {
    pub action: ActionLabel,
    pub kind: ActionKind,
    pub message: Option<String>,
}

impl ActionStatus {
    pub fn new(action: impl Into<String>, kind: ActionKind) -> Self {
        Self { action: ActionLabel::single(action), kind, message: None }
    }

    pub fn with_message(action: impl Into<String>, kind: ActionKind, message: impl Into<String>) -> Self {
        Self { action: ActionLabel::single(action), kind, message: Some(message.into()) }
    }

    pub fn event(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_message(action, ActionKind::Event, message)
    }

    pub fn error(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_message(action, ActionKind::Error, message)
    }
}

/// A published notification held by the queue store until its removal timer
/// fires or its handle is used.
#[derive(Clone, Debug)]
pub struct StatusEntry {
    pub id: StatusId,
    pub action: ActionLabel,
    pub kind: ActionKind,
    pub message: Option<String>,
    pub is_completed: bool,
}

impl StatusEntry {
    pub fn new(id: StatusId, status: ActionStatus) -> Self {
        Self { id, action: status.action, kind: status.kind, message: status.message, is_completed: false }
    }
}
