use crate::config::{CliOverrides, Config, SelectorKind};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "valsplit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Split a valuation export into included and excluded records")]
#[command(
    long_about = "ValSplit loads a JSON export of property valuations, lets you pick the \
                  records to exclude, and writes two files next to the input: \
                  <name>_PropertiesIncluded.json and <name>_PropertiesExcluded.json."
)]
#[command(after_help = "EXAMPLES:\n  \
    valsplit march.json\n  \
    valsplit march.json --selector menu\n  \
    valsplit march.json --select 0,4,7 --output-format json\n  \
    valsplit march.json --id-field PropertyKey --output-dir ./split\n  \
    valsplit --generate-config")]
pub struct Cli {
    /// JSON export to split (prompted for when omitted)
    pub input: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Identifier field of each record
    #[arg(long, help = "Record identifier field (default: Valuation_ID)")]
    pub id_field: Option<String>,

    /// How records are chosen
    #[arg(long, value_enum)]
    pub selector: Option<SelectorKind>,

    /// Answer the selection up front instead of interactively
    #[arg(
        long,
        value_name = "INDICES",
        help = "Comma-separated zero-based indices to exclude, or q to cancel"
    )]
    pub select: Option<String>,

    /// Directory for the output files
    #[arg(short, long, help = "Write outputs here instead of next to the input")]
    pub output_dir: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Write outputs on a single line
    #[arg(long, help = "Write compact JSON instead of pretty-printed")]
    pub compact: bool,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "Validate the input and show the output paths without writing")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_id_field(self.id_field.clone())
            .with_selector(self.selector)
            .with_output_dir(self.output_dir.clone())
            .with_pretty(if self.compact { Some(false) } else { None })
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
