use crate::config::OutputConfig;
use crate::error::{Result, ValSplitError};
use crate::records::{Partition, Record};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where the two halves of a partition are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPaths {
    pub included: PathBuf,
    pub excluded: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub records: usize,
    pub bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportReport {
    pub included: ExportedFile,
    pub excluded: ExportedFile,
}

pub struct Exporter {
    included_suffix: String,
    excluded_suffix: String,
    directory: Option<PathBuf>,
    pretty: bool,
}

impl Exporter {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            included_suffix: config.included_suffix.clone(),
            excluded_suffix: config.excluded_suffix.clone(),
            directory: config.directory.clone(),
            pretty: config.pretty,
        }
    }

    /// Output paths for `source`: `<dir>/<stem><suffix>.json`, where `<dir>`
    /// is the source's directory unless one was configured.
    pub fn output_paths(&self, source: &Path) -> OutputPaths {
        let directory = match self.directory {
            Some(ref directory) => directory.clone(),
            None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
        };

        let base = source
            .file_stem()
            .unwrap_or_else(|| OsStr::new("records"))
            .to_string_lossy();

        OutputPaths {
            included: directory.join(format!("{}{}.json", base, self.included_suffix)),
            excluded: directory.join(format!("{}{}.json", base, self.excluded_suffix)),
        }
    }

    /// Writes both halves of `partition` next to `source`.
    ///
    /// The included file is written first. If the excluded write then fails,
    /// the included file is left on disk and the error names the excluded path.
    pub fn export(&self, partition: &Partition, source: &Path) -> Result<ExportReport> {
        let paths = self.output_paths(source);

        let included = self.write_records(&paths.included, partition.included())?;
        log::info!(
            "event=output_written kind=included path={} records={}",
            included.path.display(),
            included.records
        );

        let excluded = self.write_records(&paths.excluded, partition.excluded())?;
        log::info!(
            "event=output_written kind=excluded path={} records={}",
            excluded.path.display(),
            excluded.records
        );

        Ok(ExportReport { included, excluded })
    }

    fn write_records(&self, path: &Path, records: &[Record]) -> Result<ExportedFile> {
        let export_error = |source: std::io::Error| ValSplitError::Export {
            path: path.to_path_buf(),
            source,
        };

        // Always an array, even for zero or one record
        let mut buffer = if self.pretty {
            serde_json::to_vec_pretty(records)
        } else {
            serde_json::to_vec(records)
        }
        .map_err(|e| export_error(e.into()))?;
        buffer.push(b'\n');

        let mut file = fs::File::create(path).map_err(export_error)?;
        file.write_all(&buffer).map_err(export_error)?;
        file.flush().map_err(export_error)?;

        Ok(ExportedFile {
            path: path.to_path_buf(),
            records: records.len(),
            bytes: buffer.len() as u64,
        })
    }
}
