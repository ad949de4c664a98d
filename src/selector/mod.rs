//! Front-ends that collect the records to exclude.
//!
//! Every front-end implements [`Selector`] and hands back a
//! [`SelectionResult`]. The pipeline never knows which one ran.

pub mod acquire;
pub mod checklist;
pub mod menu;
pub mod scripted;

pub use acquire::{clean_path_input, PathSource, PromptPathSource};
pub use checklist::{ChecklistSelector, ChecklistState, KeyOutcome};
pub use menu::{parse_selection, TextMenuSelector};
pub use scripted::ScriptedSelector;

use crate::config::{SelectorConfig, SelectorKind};
use crate::error::Result;
use crate::records::{IdentifierSet, Record, RecordCollection};
use serde_json::Value;
use std::io::IsTerminal;

const MAX_VALUE_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionResult {
    /// The operator aborted; nothing may be written.
    Cancelled,
    /// Identifiers to exclude, possibly none.
    Chosen(IdentifierSet),
}

pub trait Selector {
    fn select(&mut self, collection: &RecordCollection) -> Result<SelectionResult>;
}

/// Terminal capability, detected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Keyboard input and a terminal to draw on.
    Interactive,
    /// Input is piped or redirected.
    LineOriented,
}

impl Platform {
    pub fn detect() -> Self {
        if std::io::stdin().is_terminal() && console::Term::stderr().is_term() {
            Platform::Interactive
        } else {
            Platform::LineOriented
        }
    }

    /// Picks the concrete front-end for `kind`. A checklist needs an
    /// interactive terminal and falls back to the text menu without one.
    pub fn resolve(self, kind: SelectorKind) -> SelectorKind {
        match (kind, self) {
            (SelectorKind::Menu, _) => SelectorKind::Menu,
            (_, Platform::Interactive) => SelectorKind::Checklist,
            (_, Platform::LineOriented) => SelectorKind::Menu,
        }
    }
}

/// One-line descriptions of records for selection lists.
#[derive(Debug, Clone)]
pub struct RecordSummary {
    fields: Vec<String>,
    max_fields: usize,
}

impl RecordSummary {
    pub fn new(config: &SelectorConfig) -> Self {
        Self {
            fields: config.summary_fields.clone(),
            max_fields: config.max_summary_fields,
        }
    }

    /// `ID <id> | field: value | ...`. With no configured fields, the first
    /// scalar fields of the record are shown.
    pub fn describe(&self, collection: &RecordCollection, record: &Record) -> String {
        let id_field = collection.id_field();
        let id = collection
            .record_id(record)
            .map(|id| id.to_string())
            .unwrap_or_else(|| "<none>".to_string());

        let mut parts = vec![format!("ID {}", id)];

        let Some(object) = record.as_object() else {
            return parts.join(" | ");
        };

        if self.fields.is_empty() {
            parts.extend(
                object
                    .iter()
                    .filter(|(key, value)| key.as_str() != id_field && is_scalar(value))
                    .take(self.max_fields)
                    .map(|(key, value)| format!("{}: {}", key, display_value(value))),
            );
        } else {
            parts.extend(self.fields.iter().filter_map(|field| {
                object
                    .get(field)
                    .map(|value| format!("{}: {}", field, display_value(value)))
            }));
        }

        parts.join(" | ")
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_) | Value::Null)
}

fn display_value(value: &Value) -> String {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    if text.chars().count() > MAX_VALUE_WIDTH {
        let truncated: String = text.chars().take(MAX_VALUE_WIDTH - 1).collect();
        format!("{}…", truncated)
    } else {
        text
    }
}
