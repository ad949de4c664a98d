use super::{RecordSummary, SelectionResult, Selector};
use crate::error::Result;
use crate::records::{IdentifierSet, RecordCollection};
use console::{style, Key, Term};
use std::io;

const HELP_LINE: &str = "↑/↓ move · space toggle · a all · enter confirm · esc cancel";

/// Ctrl+C during `read_key` surfaces as an interrupted read rather than a
/// key, so it is folded back into `Key::CtrlC`.
pub fn interpret_read(read: io::Result<Key>) -> io::Result<Key> {
    match read {
        Err(err) if err.kind() == io::ErrorKind::Interrupted => Ok(Key::CtrlC),
        other => other,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Confirm,
    Cancel,
}

/// Cursor, scroll window and check marks of a checklist. Rows are indices
/// into the record collection.
#[derive(Debug, Clone)]
pub struct ChecklistState {
    checked: Vec<bool>,
    cursor: usize,
    offset: usize,
    page_size: usize,
}

impl ChecklistState {
    pub fn new(rows: usize, page_size: usize) -> Self {
        Self {
            checked: vec![false; rows],
            cursor: 0,
            offset: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_checked(&self, row: usize) -> bool {
        self.checked.get(row).copied().unwrap_or(false)
    }

    pub fn checked_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.checked
            .iter()
            .enumerate()
            .filter_map(|(row, &checked)| checked.then_some(row))
    }

    pub fn checked_count(&self) -> usize {
        self.checked.iter().filter(|&&checked| checked).count()
    }

    /// Rows currently inside the scroll window.
    pub fn visible_rows(&self) -> std::ops::Range<usize> {
        let end = (self.offset + self.page_size).min(self.checked.len());
        self.offset..end
    }

    pub fn handle_key(&mut self, key: &Key) -> KeyOutcome {
        let rows = self.checked.len();

        match key {
            Key::Enter => return KeyOutcome::Confirm,
            Key::Escape | Key::CtrlC | Key::Char('q') | Key::Char('Q') => {
                return KeyOutcome::Cancel
            }
            _ if rows == 0 => {}
            Key::ArrowUp | Key::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            Key::ArrowDown | Key::Char('j') => self.cursor = (self.cursor + 1).min(rows - 1),
            Key::PageUp => self.cursor = self.cursor.saturating_sub(self.page_size),
            Key::PageDown => self.cursor = (self.cursor + self.page_size).min(rows - 1),
            Key::Home => self.cursor = 0,
            Key::End => self.cursor = rows - 1,
            Key::Char(' ') => self.checked[self.cursor] = !self.checked[self.cursor],
            Key::Char('a') | Key::Char('A') => {
                let all = self.checked.iter().all(|&checked| checked);
                self.checked.iter_mut().for_each(|checked| *checked = !all);
            }
            _ => {}
        }

        self.scroll_to_cursor();
        KeyOutcome::Continue
    }

    fn scroll_to_cursor(&mut self) {
        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + self.page_size {
            self.offset = self.cursor + 1 - self.page_size;
        }
    }
}

/// Keyboard-driven checkbox list drawn on the terminal.
pub struct ChecklistSelector {
    term: Term,
    summary: RecordSummary,
    page_size: usize,
}

impl ChecklistSelector {
    pub fn new(term: Term, summary: RecordSummary, page_size: usize) -> Self {
        Self {
            term,
            summary,
            page_size,
        }
    }

    fn render(&self, collection: &RecordCollection, state: &ChecklistState) -> Result<usize> {
        let width = self.term.size().1 as usize;
        let mut lines = Vec::new();

        lines.push(format!(
            "{} {}",
            style("Select records to EXCLUDE").bold(),
            style(HELP_LINE).dim()
        ));

        for row in state.visible_rows() {
            let Some(record) = collection.get(row) else {
                continue;
            };
            let marker = if state.is_checked(row) { "[x]" } else { "[ ]" };
            let text = format!(
                "{} {} {}",
                if row == state.cursor() { ">" } else { " " },
                marker,
                self.summary.describe(collection, record)
            );

            if row == state.cursor() {
                lines.push(style(text).cyan().to_string());
            } else {
                lines.push(text);
            }
        }

        let window = state.visible_rows();
        lines.push(
            style(format!(
                "{} of {} selected · showing {}-{}",
                state.checked_count(),
                collection.len(),
                window.start + 1,
                window.end
            ))
            .dim()
            .to_string(),
        );

        // Wrapped lines would break clear_last_lines
        for line in &lines {
            self.term
                .write_line(&console::truncate_str(line, width.max(8), "…"))?;
        }
        Ok(lines.len())
    }

    fn run(&self, collection: &RecordCollection) -> Result<SelectionResult> {
        let mut state = ChecklistState::new(collection.len(), self.page_size);
        let mut drawn = self.render(collection, &state)?;

        loop {
            let key = interpret_read(self.term.read_key())?;
            let outcome = state.handle_key(&key);

            self.term.clear_last_lines(drawn)?;

            match outcome {
                KeyOutcome::Continue => drawn = self.render(collection, &state)?,
                KeyOutcome::Cancel => return Ok(SelectionResult::Cancelled),
                KeyOutcome::Confirm => {
                    let ids = IdentifierSet::from_indices(collection, state.checked_rows());
                    return Ok(SelectionResult::Chosen(ids));
                }
            }
        }
    }
}

impl Selector for ChecklistSelector {
    fn select(&mut self, collection: &RecordCollection) -> Result<SelectionResult> {
        self.term.hide_cursor()?;
        let result = self.run(collection);
        self.term.show_cursor()?;

        if let Ok(ref selection) = result {
            log::debug!(
                "event=checklist_closed cancelled={}",
                matches!(selection, SelectionResult::Cancelled)
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(state: &mut ChecklistState, keys: &[Key]) -> KeyOutcome {
        let mut outcome = KeyOutcome::Continue;
        for key in keys {
            outcome = state.handle_key(key);
        }
        outcome
    }

    #[test]
    fn test_toggle_and_confirm() {
        let mut state = ChecklistState::new(3, 10);
        let outcome = press(
            &mut state,
            &[Key::ArrowDown, Key::Char(' '), Key::ArrowDown, Key::Char(' '), Key::Enter],
        );

        assert_eq!(outcome, KeyOutcome::Confirm);
        assert_eq!(state.checked_rows().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_toggle_twice_unchecks() {
        let mut state = ChecklistState::new(2, 10);
        press(&mut state, &[Key::Char(' '), Key::Char(' ')]);
        assert_eq!(state.checked_count(), 0);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let mut state = ChecklistState::new(3, 10);
        press(&mut state, &[Key::ArrowUp, Key::ArrowUp]);
        assert_eq!(state.cursor(), 0);

        press(&mut state, &[Key::End, Key::ArrowDown, Key::Char('j')]);
        assert_eq!(state.cursor(), 2);

        press(&mut state, &[Key::Home]);
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_toggle_all() {
        let mut state = ChecklistState::new(4, 10);
        press(&mut state, &[Key::Char(' '), Key::Char('a')]);
        assert_eq!(state.checked_count(), 4);

        press(&mut state, &[Key::Char('a')]);
        assert_eq!(state.checked_count(), 0);
    }

    #[test]
    fn test_cancel_keys() {
        for key in [Key::Escape, Key::Char('q'), Key::CtrlC] {
            let mut state = ChecklistState::new(2, 10);
            state.handle_key(&Key::Char(' '));
            assert_eq!(state.handle_key(&key), KeyOutcome::Cancel);
        }
    }

    #[test]
    fn test_interrupted_read_cancels() {
        let key = interpret_read(Err(io::Error::from(io::ErrorKind::Interrupted))).unwrap();
        assert_eq!(key, Key::CtrlC);

        let mut state = ChecklistState::new(2, 10);
        assert_eq!(state.handle_key(&key), KeyOutcome::Cancel);
    }

    #[test]
    fn test_other_read_errors_propagate() {
        let read = interpret_read(Err(io::Error::from(io::ErrorKind::UnexpectedEof)));
        assert_eq!(read.unwrap_err().kind(), io::ErrorKind::UnexpectedEof);

        assert_eq!(interpret_read(Ok(Key::Enter)).unwrap(), Key::Enter);
    }

    #[test]
    fn test_window_follows_cursor() {
        let mut state = ChecklistState::new(20, 5);
        assert_eq!(state.visible_rows(), 0..5);

        press(&mut state, &vec![Key::ArrowDown; 6]);
        assert_eq!(state.cursor(), 6);
        assert_eq!(state.visible_rows(), 2..7);

        press(&mut state, &[Key::PageDown, Key::PageDown, Key::PageDown]);
        assert_eq!(state.cursor(), 19);
        assert_eq!(state.visible_rows(), 15..20);

        press(&mut state, &[Key::Home]);
        assert_eq!(state.visible_rows(), 0..5);
    }

    #[test]
    fn test_empty_list_only_confirms_or_cancels() {
        let mut state = ChecklistState::new(0, 5);
        assert_eq!(state.handle_key(&Key::Char(' ')), KeyOutcome::Continue);
        assert_eq!(state.handle_key(&Key::ArrowDown), KeyOutcome::Continue);
        assert_eq!(state.handle_key(&Key::Enter), KeyOutcome::Confirm);
        assert_eq!(state.checked_count(), 0);
    }
}
