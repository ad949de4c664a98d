pub mod output_manager;

pub use output_manager::{ExportReport, ExportedFile, Exporter, OutputPaths};
