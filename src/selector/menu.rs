use super::{RecordSummary, SelectionResult, Selector};
use crate::error::Result;
use crate::records::{IdentifierSet, RecordCollection};
use std::io::{BufRead, Write};

const CANCEL_WORDS: &[&str] = &["q", "quit", "cancel"];

/// Numbered list answered with a line of comma-separated indices.
pub struct TextMenuSelector<R, W> {
    input: R,
    output: W,
    summary: RecordSummary,
}

impl<R: BufRead, W: Write> TextMenuSelector<R, W> {
    pub fn new(input: R, output: W, summary: RecordSummary) -> Self {
        Self {
            input,
            output,
            summary,
        }
    }

    fn print_menu(&mut self, collection: &RecordCollection) -> Result<()> {
        writeln!(self.output)?;
        writeln!(
            self.output,
            "{} record(s) loaded. Choose the records to EXCLUDE:",
            collection.len()
        )?;
        writeln!(self.output)?;

        for (index, record) in collection.iter().enumerate() {
            writeln!(
                self.output,
                "  [{}] {}",
                index,
                self.summary.describe(collection, record)
            )?;
        }

        writeln!(self.output)?;
        write!(
            self.output,
            "Indices to exclude (comma-separated, blank for none, q to cancel): "
        )?;
        self.output.flush()?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> Selector for TextMenuSelector<R, W> {
    fn select(&mut self, collection: &RecordCollection) -> Result<SelectionResult> {
        self.print_menu(collection)?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            // Input closed before an answer arrived
            writeln!(self.output)?;
            log::debug!("event=menu_eof");
            return Ok(SelectionResult::Cancelled);
        }

        let result = parse_selection(&line, collection);
        log::debug!("event=menu_answer answer={:?}", line.trim());
        Ok(result)
    }
}

/// Turns a menu answer into a selection.
///
/// Any cancel word (`q`, `quit`, `cancel`, any case) cancels. Other tokens are
/// zero-based indices into `collection`; out-of-range and non-numeric tokens
/// are dropped without complaint.
pub fn parse_selection(answer: &str, collection: &RecordCollection) -> SelectionResult {
    let tokens: Vec<&str> = answer
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect();

    if tokens
        .iter()
        .any(|token| CANCEL_WORDS.contains(&token.to_lowercase().as_str()))
    {
        return SelectionResult::Cancelled;
    }

    let indices = tokens.iter().filter_map(|token| token.parse::<usize>().ok());
    SelectionResult::Chosen(IdentifierSet::from_indices(collection, indices))
}
