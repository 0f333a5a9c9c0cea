//! CSV Dataset Store
//!
//! Reads the checkpoint when it exists, otherwise the pristine input.
//! Writes always go to the checkpoint path through a temporary file in the
//! same directory that is renamed into place; an existing checkpoint keeps
//! its permission bits.

use std::fs::{self, File, Permissions};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::dataset::Dataset;
use super::DatasetStore;
use crate::models::LoadSource;
use crate::utils::error::AppResult;

/// `DatasetStore` over delimited files with a header row.
#[derive(Debug, Clone)]
pub struct CsvDatasetStore {
    input_path: PathBuf,
    checkpoint_path: PathBuf,
}

impl CsvDatasetStore {
    pub fn new(input_path: impl Into<PathBuf>, checkpoint_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            checkpoint_path: checkpoint_path.into(),
        }
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn checkpoint_path(&self) -> &Path {
        &self.checkpoint_path
    }
}

impl DatasetStore for CsvDatasetStore {
    fn load(&self) -> AppResult<(Dataset, LoadSource)> {
        if self.checkpoint_path.exists() {
            debug!(path = %self.checkpoint_path.display(), "reading checkpoint");
            Ok((read_csv(&self.checkpoint_path)?, LoadSource::Checkpoint))
        } else {
            debug!(path = %self.input_path.display(), "reading input");
            Ok((read_csv(&self.input_path)?, LoadSource::Input))
        }
    }

    fn persist(&mut self, dataset: &Dataset) -> AppResult<()> {
        write_csv(&self.checkpoint_path, dataset)
    }
}

/// Read a whole CSV file into a `Dataset`. Short rows are padded with empty
/// cells; rows longer than the header are an error.
pub fn read_csv(path: &Path) -> AppResult<Dataset> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        if row.len() < headers.len() {
            row.resize(headers.len(), String::new());
        }
        rows.push(row);
    }

    Dataset::new(headers, rows)
}

/// Write a `Dataset` to `path`, replacing any existing file atomically.
pub fn write_csv(path: &Path, dataset: &Dataset) -> AppResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let existing = existing_permissions(path)?;
    let mut tmp = temp_file_in(dir)?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        writer.write_record(dataset.headers())?;
        for row in dataset.rows() {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    if let Some(perms) = existing {
        fs::set_permissions(tmp.path(), perms)?;
    }
    tmp.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), rows = dataset.len(), "dataset written");
    Ok(())
}

fn existing_permissions(path: &Path) -> AppResult<Option<Permissions>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta.permissions())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Temp files default to 0600; a fresh checkpoint should get the usual
/// umask-filtered 0666 instead.
#[cfg(unix)]
fn temp_file_in(dir: &Path) -> AppResult<NamedTempFile> {
    use std::os::unix::fs::PermissionsExt;

    Ok(tempfile::Builder::new()
        .permissions(Permissions::from_mode(0o666))
        .tempfile_in(dir)?)
}

#[cfg(not(unix))]
fn temp_file_in(dir: &Path) -> AppResult<NamedTempFile> {
    Ok(NamedTempFile::new_in(dir)?)
}
