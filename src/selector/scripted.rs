use super::{parse_selection, SelectionResult, Selector};
use crate::error::Result;
use crate::records::RecordCollection;

/// Answers the selection from a pre-supplied menu answer (`--select`).
pub struct ScriptedSelector {
    answer: String,
}

impl ScriptedSelector {
    pub fn new<S: Into<String>>(answer: S) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}

impl Selector for ScriptedSelector {
    fn select(&mut self, collection: &RecordCollection) -> Result<SelectionResult> {
        log::debug!("event=scripted_selection answer={:?}", self.answer);
        Ok(parse_selection(&self.answer, collection))
    }
}
