//! Flat record file holding the full roster history.
//!
//! The file is a CSV table with the fixed header
//! `avatar,name,steamid,is_friend,bfd,removed_time,remark`. It is read in full
//! before any mutation and rewritten in full (temp file + rename) afterwards.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::models::RosterEntry;
use crate::util::local_now;
use crate::{Error, Result};

/// Column order of the record file.
pub const RECORD_HEADER: [&str; 7] = [
    "avatar",
    "name",
    "steamid",
    "is_friend",
    "bfd",
    "removed_time",
    "remark",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads and writes the roster record file.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record, never failing.
    ///
    /// A missing file yields an empty roster. A malformed file is logged,
    /// moved aside so a later save cannot overwrite it, and also yields an
    /// empty roster. Other read failures are only logged; the file stays put.
    pub fn load(&self) -> Vec<RosterEntry> {
        match self.read() {
            Ok(Some(entries)) => entries,
            Ok(None) => Vec::new(),
            Err(error @ Error::Csv(_)) => {
                tracing::warn!(
                    "Record file {} is malformed: {error}",
                    self.path.display()
                );
                self.quarantine();
                Vec::new()
            }
            Err(error) => {
                tracing::warn!(
                    "Record file {} could not be read: {error}",
                    self.path.display()
                );
                Vec::new()
            }
        }
    }

    /// Strict read: `Ok(None)` when the file does not exist.
    pub fn read(&self) -> Result<Option<Vec<RosterEntry>>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };
        parse_records(&bytes).map(Some)
    }

    /// Overwrite the record with `entries`.
    ///
    /// An empty slice is ignored so a failed or empty fetch never wipes the
    /// history. Returns whether the file was written.
    pub fn save(&self, entries: &[RosterEntry]) -> Result<bool> {
        if entries.is_empty() {
            tracing::debug!("Skipping save of empty roster to {}", self.path.display());
            return Ok(false);
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let rendered = render_records(entries)?;
        let temp_path = self.temp_path();
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&rendered)?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.path)?;

        tracing::debug!(
            "Saved {} roster entries to {}",
            entries.len(),
            self.path.display()
        );
        Ok(true)
    }

    /// Delete the record file; a missing file is not an error.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn quarantine(&self) {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(format!(".corrupt-{}", local_now().format("%Y%m%d%H%M%S")));
        let target = self.path.with_file_name(name);

        match fs::rename(&self.path, &target) {
            Ok(()) => tracing::warn!("Moved unreadable record file to {}", target.display()),
            Err(error) => tracing::warn!(
                "Failed to move unreadable record file {} aside: {error}",
                self.path.display()
            ),
        }
    }
}

fn parse_records(bytes: &[u8]) -> Result<Vec<RosterEntry>> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let mut entries = Vec::new();
    for record in reader.deserialize::<RosterEntry>() {
        entries.push(record?);
    }
    Ok(entries)
}

fn render_records(entries: &[RosterEntry]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(RECORD_HEADER)?;
    for entry in entries {
        writer.serialize(entry)?;
    }
    writer
        .into_inner()
        .map_err(|error| error.into_error().into())
}
