//! Writing reports to disk
//!
//! Every window's report goes to `<output_dir>/<window_key>.json`. The
//! directory is created once, owner-only on Unix, and may already exist.
//!
//! # Examples
//!
//! ```no_run
//! use campstat::output::ReportWriter;
//! use campstat::report::{ChangeSet, Report};
//!
//! # fn example() -> campstat::Result<()> {
//! let writer = ReportWriter::create("output")?;
//! let report = Report::assemble(&[], ChangeSet::default());
//! writer.write("week", &report)?;
//! # Ok(())
//! # }
//! ```

use crate::report::Report;
use campstat_core::error::{CampstatError, Result};
use std::fs::{DirBuilder, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Permissions of the output directory
#[cfg(unix)]
const OUTPUT_DIR_MODE: u32 = 0o700;

/// Writes reports as JSON files into one directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    /// Create the output directory if needed and return a writer for it
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();

        let mut builder = DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(OUTPUT_DIR_MODE);
        }
        builder.create(&dir)?;

        info!("Folder to store results: {}", dir.display());
        Ok(Self { dir })
    }

    /// Get the output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the report file for a window key
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Write one report, returning the file path if something was written
    ///
    /// A report that serializes to an empty JSON object is skipped with a
    /// warning. Reports always carry their four top-level keys, so this
    /// only logs and never fails.
    pub fn write(&self, key: &str, report: &Report) -> Result<Option<PathBuf>> {
        let json = report.to_json()?;
        if json.as_object().is_none_or(|object| object.is_empty()) {
            warn!("No results for {}", key);
            return Ok(None);
        }

        let path = self.path_for(key);
        Self::write_json(&path, report).map_err(|e| CampstatError::ReportWrite {
            path: path.clone(),
            error: e.to_string(),
        })?;

        info!(
            "Wrote {} ({} series)",
            path.display(),
            report.series_count()
        );
        Ok(Some(path))
    }

    fn write_json(path: &Path, report: &Report) -> std::io::Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut file, report)?;
        file.flush()
    }
}
