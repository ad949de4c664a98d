pub mod cli;
pub mod config;
pub mod error;
pub mod exporter;
pub mod logging;
pub mod records;
pub mod selector;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, InputConfig, OutputConfig, SelectorConfig, SelectorKind};
pub use error::{Result, UserFriendlyError, ValSplitError};

// Core functionality re-exports
pub use exporter::{ExportReport, ExportedFile, Exporter, OutputPaths};
pub use records::{partition, IdentifierSet, Partition, Record, RecordCollection, RecordId, RecordStore};
pub use selector::{
    ChecklistSelector, PathSource, Platform, PromptPathSource, RecordSummary, ScriptedSelector,
    SelectionResult, Selector, TextMenuSelector,
};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Outcome of one load → select → partition → export run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub source: PathBuf,
    pub total_records: usize,
    /// Excluded identifiers in input order.
    pub excluded_ids: Vec<String>,
    /// `None` when nothing was selected and therefore nothing was written.
    pub export: Option<ExportReport>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DryRunReport {
    pub source: PathBuf,
    pub id_field: String,
    pub total_records: usize,
    pub records_without_id: usize,
    pub outputs: OutputPaths,
}

/// Main library interface for ValSplit functionality
pub struct ValSplit {
    config: Config,
    output_formatter: OutputFormatter,
    shutdown: GracefulShutdown,
}

impl ValSplit {
    /// Create a new ValSplit instance with Ctrl+C handling installed
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self::with_shutdown(config, output_mode, verbose, quiet, GracefulShutdown::default())
    }

    pub fn with_shutdown(
        config: Config,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
        shutdown: GracefulShutdown,
    ) -> Self {
        Self {
            config,
            output_formatter: OutputFormatter::new(output_mode, verbose, quiet),
            shutdown,
        }
    }

    /// Create ValSplit instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            crate::cli::OutputFormat::Human => OutputMode::Human,
            crate::cli::OutputFormat::Json => OutputMode::Json,
            crate::cli::OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    pub fn record_store(&self) -> RecordStore {
        RecordStore::new(self.config.input.id_field.clone())
    }

    pub fn exporter(&self) -> Exporter {
        Exporter::new(&self.config.output)
    }

    /// Builds the front-end for this run. A scripted answer wins over any
    /// interactive front-end.
    pub fn build_selector(&self, platform: Platform, scripted: Option<&str>) -> Box<dyn Selector> {
        if let Some(answer) = scripted {
            return Box::new(ScriptedSelector::new(answer));
        }

        let summary = RecordSummary::new(&self.config.selector);
        let kind = platform.resolve(self.config.selector.kind);

        if self.config.selector.kind == SelectorKind::Checklist && kind != SelectorKind::Checklist {
            self.output_formatter
                .warning("Checklist needs an interactive terminal; using the text menu instead");
        }
        log::debug!("event=selector_chosen kind={:?} platform={:?}", kind, platform);

        match kind {
            SelectorKind::Checklist => Box::new(ChecklistSelector::new(
                console::Term::stderr(),
                summary,
                self.config.selector.page_size,
            )),
            _ => Box::new(TextMenuSelector::new(
                std::io::stdin().lock(),
                std::io::stderr(),
                summary,
            )),
        }
    }

    /// Runs the whole pipeline on `input`.
    ///
    /// Nothing is written when loading fails, when the selection is cancelled
    /// or when it is empty.
    pub fn split(&self, input: &Path, selector: &mut dyn Selector) -> Result<RunReport> {
        self.shutdown.check_shutdown()?;

        self.output_formatter.start_operation("Loading records");
        let collection = self.record_store().load(input)?;
        self.output_formatter.info(&format!(
            "Loaded {} record(s) from {}",
            collection.len(),
            input.display()
        ));

        let selection = selector.select(&collection)?;
        self.shutdown.check_shutdown()?;

        let identifiers = match selection {
            SelectionResult::Cancelled => {
                log::info!("event=selection_cancelled");
                return Err(ValSplitError::Cancelled);
            }
            SelectionResult::Chosen(identifiers) => identifiers,
        };
        log::info!("event=selection_made excluded_ids={}", identifiers.len());

        if identifiers.is_empty() {
            return Ok(RunReport {
                source: input.to_path_buf(),
                total_records: collection.len(),
                excluded_ids: Vec::new(),
                export: None,
                completed_at: Utc::now(),
            });
        }

        let partition = partition(&collection, &identifiers);
        let excluded_ids = ordered_ids(&collection, partition.excluded());

        self.output_formatter.start_operation("Writing output files");
        let export = self
            .shutdown
            .while_writing(|| self.exporter().export(&partition, input))?;

        Ok(RunReport {
            source: input.to_path_buf(),
            total_records: collection.len(),
            excluded_ids,
            export: Some(export),
            completed_at: Utc::now(),
        })
    }

    /// Loads and validates `input`, reporting what a real run would write.
    pub fn dry_run(&self, input: &Path) -> Result<DryRunReport> {
        let collection = self.record_store().load(input)?;

        Ok(DryRunReport {
            source: input.to_path_buf(),
            id_field: collection.id_field().to_string(),
            total_records: collection.len(),
            records_without_id: collection.missing_id_count(),
            outputs: self.exporter().output_paths(input),
        })
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Check if shutdown has been requested
    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    /// Request graceful shutdown
    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &ValSplitError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Resolves the input path from the command line or, failing that, from
/// `source`. Giving up at the prompt counts as cancellation.
pub fn resolve_input(argument: Option<PathBuf>, source: &mut dyn PathSource) -> Result<PathBuf> {
    let path = match argument {
        Some(path) => path,
        None => source.acquire()?.ok_or(ValSplitError::Cancelled)?,
    };

    if !path.is_file() {
        return Err(ValSplitError::FileNotFound { path });
    }
    Ok(path)
}

fn ordered_ids(collection: &RecordCollection, records: &[Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter_map(|record| collection.record_id(record))
        .filter(|id| seen.insert(id.clone()))
        .map(|id| id.to_string())
        .collect()
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
