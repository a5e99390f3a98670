//! Collapses raw chain-emitted action events into a deduplicated,
//! human-presentable notification list.

use crate::domain::action::{ActionKind, ActionLabel, ActionStatus};
use crate::domain::event::ChainEvent;
use crate::domain::registry::ChainRegistry;
use crate::foundation::{EVENT_MESSAGE, EXCLUDED_SECTIONS, EXTRINSIC_SUCCESS_METHOD, SYSTEM_SECTION};

/// Converts a receipt's chain events into pre-merge action statuses.
///
/// A dispatch failure becomes its own `error` entry carrying the
/// registry-decoded message; every other event becomes low-priority noise
/// tagged with the sentinel message so `merge_status` can fold it.
pub fn statuses_from_events(events: &[ChainEvent], registry: &dyn ChainRegistry) -> Vec<ActionStatus> {
    events
        .iter()
        .map(|event| {
            if event.is_failure() {
                ActionStatus::error(event.action(), decode_failure(event, registry))
            } else {
                ActionStatus::event(event.action(), EVENT_MESSAGE)
            }
        })
        .collect()
}

fn decode_failure(event: &ChainEvent, registry: &dyn ChainRegistry) -> String {
    match event.dispatch_error {
        Some(dispatch_error) => match registry.error_meta(dispatch_error) {
            Some(meta) => format!("{}.{}: {}", meta.section, meta.name, meta.detail),
            None => format!("dispatch failed: {dispatch_error}"),
        },
        None => "dispatch failed: unknown error".to_string(),
    }
}

/// Merges a raw list of action statuses into the list actually presented.
///
/// Repeats of the same `(action, kind)` collapse to one entry suffixed with
/// an occurrence count; entries tagged with the sentinel message accumulate
/// into a single aggregate placed last, `system.ExtrinsicSuccess` leading.
/// Error entries are never grouped or aggregated.
pub fn merge_status(raw: &[ActionStatus]) -> Vec<ActionStatus> {
    let mut counted: Vec<(ActionStatus, usize)> = Vec::new();
    for status in raw {
        if is_excluded(status) {
            continue;
        }
        if status.kind == ActionKind::Error {
            counted.push((status.clone(), 1));
            continue;
        }
        if let Some((_, count)) = counted
            .iter_mut()
            .find(|(existing, _)| existing.kind != ActionKind::Error && existing.kind == status.kind && existing.action == status.action)
        {
            *count += 1;
            continue;
        }
        counted.push((status.clone(), 1));
    }

    let success_action = format!("{SYSTEM_SECTION}.{EXTRINSIC_SUCCESS_METHOD}");
    let mut merged = Vec::new();
    let mut aggregated: Vec<String> = Vec::new();
    for (status, count) in counted {
        let action = match (&status.action, count) {
            (ActionLabel::Single(name), n) if n > 1 => ActionLabel::single(format!("{name} (x{n})")),
            (action, _) => action.clone(),
        };
        if status.kind != ActionKind::Error && status.message.as_deref() == Some(EVENT_MESSAGE) {
            if let ActionLabel::Single(name) = &action {
                if name.starts_with(&success_action) {
                    aggregated.insert(0, name.clone());
                } else {
                    aggregated.push(name.clone());
                }
                continue;
            }
        }
        merged.push(ActionStatus { action, kind: status.kind, message: status.message });
    }

    if !aggregated.is_empty() {
        merged.push(ActionStatus { action: ActionLabel::Grouped(aggregated), kind: ActionKind::Event, message: None });
    }
    merged
}

fn is_excluded(status: &ActionStatus) -> bool {
    match status.action.as_single() {
        Some(action) => {
            let section = action.split('.').next().unwrap_or(action);
            EXCLUDED_SECTIONS.contains(&section)
        }
        None => false,
    }
}
