use crate::error::Result;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Supplies the input path when none was given on the command line.
pub trait PathSource {
    /// `None` means the operator gave up.
    fn acquire(&mut self) -> Result<Option<PathBuf>>;
}

/// Asks for a path on the terminal.
pub struct PromptPathSource<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptPathSource<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> PathSource for PromptPathSource<R, W> {
    fn acquire(&mut self) -> Result<Option<PathBuf>> {
        write!(
            self.output,
            "Path to the valuation export (drag the file here, blank to cancel): "
        )?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }

        Ok(clean_path_input(&line).map(PathBuf::from))
    }
}

/// Normalizes a typed or dropped path: trims whitespace, strips one pair of
/// surrounding quotes and undoes backslash-escaped spaces.
pub fn clean_path_input(raw: &str) -> Option<String> {
    let trimmed = raw.trim();

    let unquoted = ['"', '\'']
        .iter()
        .find_map(|&quote| {
            trimmed
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        })
        .unwrap_or(trimmed);

    let cleaned = if cfg!(windows) {
        unquoted.to_string()
    } else {
        unquoted.replace("\\ ", " ")
    };

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
