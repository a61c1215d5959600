//! Export modules for the CSV correlation table and JSON

pub mod json;
pub mod table;

pub use json::{write_json, ExportCounts};
pub use table::{write_csv, write_csv_to, CSV_COLUMNS};

use crate::error::{CorrelatorError, Result};
use crate::types::CorrelationRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// A fully written temp file waiting to be renamed over its target
///
/// Dropping an uncommitted `StagedFile` removes the temp file.
#[derive(Debug)]
pub(crate) struct StagedFile {
    temp_path: PathBuf,
    output_path: PathBuf,
    committed: bool,
}

impl StagedFile {
    /// Rename the temp file over the target
    pub(crate) fn commit(mut self) -> Result<PathBuf> {
        std::fs::rename(&self.temp_path, &self.output_path).map_err(|e| {
            CorrelatorError::OutputError {
                path: self.output_path.clone(),
                reason: format!("Failed to finalize file: {}", e),
            }
        })?;
        self.committed = true;
        Ok(self.output_path.clone())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(&self.temp_path);
        }
    }
}

/// Write to a temp file next to `output_path` without touching the target
///
/// The temp file lives in the same directory so the later rename stays on one
/// filesystem. On failure the temp file is removed.
pub(crate) fn stage<F>(output_path: &Path, temp_extension: &str, write: F) -> Result<StagedFile>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    let temp_path = output_path.with_extension(temp_extension);

    let file = File::create(&temp_path).map_err(|e| CorrelatorError::output_error(output_path, e))?;
    let staged = StagedFile {
        temp_path,
        output_path: output_path.to_path_buf(),
        committed: false,
    };

    let mut writer = BufWriter::new(file);
    write(&mut writer)?;
    writer
        .flush()
        .map_err(|e| CorrelatorError::output_error(output_path, e))?;

    Ok(staged)
}

/// Write the CSV table and, when requested, the JSON document
///
/// Every file is fully written to a temp file before any target is replaced,
/// so a failure in either format leaves no new output behind.
pub fn write_outputs(
    records: &[CorrelationRecord],
    counts: ExportCounts,
    csv_path: &Path,
    json_path: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let mut staged = vec![table::stage_csv(records, csv_path)?];
    if let Some(json_path) = json_path {
        staged.push(json::stage_json(records, counts, json_path)?);
    }

    let mut written = Vec::with_capacity(staged.len());
    for file in staged {
        match file.commit() {
            Ok(path) => written.push(path),
            Err(e) => {
                for path in &written {
                    let _ = std::fs::remove_file(path);
                }
                return Err(e);
            }
        }
    }

    for path in &written {
        info!("Wrote {} records to {}", records.len(), path.display());
    }

    Ok(written)
}
