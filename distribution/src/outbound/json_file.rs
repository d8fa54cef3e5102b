//! Exposure store kept as a JSON array in a single file.
//!
//! The file lives at a configured UTF-8 path. A missing file is an empty
//! store. Saves rewrite the whole file atomically with the new batch
//! appended, and are serialised within the process.

use std::collections::HashMap;
use std::io;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use synthetic_exposures::{ExposureRecord, RegionCode};
use thiserror::Error;

use super::atomic_io::write_atomic;
use crate::domain::ports::{ExposureQuery, ExposureQueryError, ExposureStore, ExposureStoreError};

/// Errors raised while reading or writing the JSON store file.
#[derive(Debug, Error)]
pub enum JsonFileStoreError {
    /// The configured path does not name a file.
    #[error("store path {path} must name a file")]
    InvalidPath {
        /// Configured store path.
        path: Utf8PathBuf,
    },
    /// The store file or its directory could not be accessed.
    #[error("failed to access store at {path}: {source}")]
    Io {
        /// Configured store path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The store file does not hold a JSON array of records.
    #[error("store at {path} is not valid exposure JSON: {source}")]
    Malformed {
        /// Configured store path.
        path: Utf8PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// The records could not be encoded.
    #[error("failed to encode exposures for {path}: {source}")]
    Encode {
        /// Configured store path.
        path: Utf8PathBuf,
        /// Underlying encode error.
        #[source]
        source: serde_json::Error,
    },
}

impl From<JsonFileStoreError> for ExposureQueryError {
    fn from(error: JsonFileStoreError) -> Self {
        match error {
            JsonFileStoreError::InvalidPath { .. } | JsonFileStoreError::Io { .. } => {
                Self::connection(error.to_string())
            }
            JsonFileStoreError::Malformed { .. } | JsonFileStoreError::Encode { .. } => {
                Self::query(error.to_string())
            }
        }
    }
}

impl From<JsonFileStoreError> for ExposureStoreError {
    fn from(error: JsonFileStoreError) -> Self {
        match error {
            JsonFileStoreError::InvalidPath { .. } => Self::connection(error.to_string()),
            JsonFileStoreError::Io { .. }
            | JsonFileStoreError::Malformed { .. }
            | JsonFileStoreError::Encode { .. } => Self::write(error.to_string()),
        }
    }
}

/// File-backed adapter implementing both exposure ports.
#[derive(Debug)]
pub struct JsonFileExposureRepository {
    path: Utf8PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileExposureRepository {
    /// Create an adapter for the store file at `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Read every stored record.
    ///
    /// # Errors
    ///
    /// Returns [`JsonFileStoreError`] if the file exists but cannot be read
    /// or decoded.
    pub fn load_all(&self) -> Result<Vec<ExposureRecord>, JsonFileStoreError> {
        let (dir, file_name) = self.open_parent()?;
        let payload = match dir.read(file_name) {
            Ok(payload) => payload,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_error(source)),
        };
        serde_json::from_slice(&payload).map_err(|source| JsonFileStoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn append(&self, records: Vec<ExposureRecord>) -> Result<(), JsonFileStoreError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut stored = self.load_all()?;
        stored.extend(records);
        let payload =
            serde_json::to_vec_pretty(&stored).map_err(|source| JsonFileStoreError::Encode {
                path: self.path.clone(),
                source,
            })?;
        let (dir, file_name) = self.open_parent()?;
        write_atomic(&dir, file_name, &payload).map_err(|source| self.io_error(source))
    }

    fn open_parent(&self) -> Result<(Dir, &str), JsonFileStoreError> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| JsonFileStoreError::InvalidPath {
                path: self.path.clone(),
            })?;
        let parent = self
            .path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|source| self.io_error(source))?;
        Ok((dir, file_name))
    }

    fn io_error(&self, source: io::Error) -> JsonFileStoreError {
        JsonFileStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl ExposureQuery for JsonFileExposureRepository {
    async fn fetch_existing(
        &self,
        regions: &[RegionCode],
    ) -> Result<HashMap<RegionCode, Vec<ExposureRecord>>, ExposureQueryError> {
        let stored = self.load_all()?;
        Ok(regions
            .iter()
            .map(|&region| {
                let visible = stored
                    .iter()
                    .filter(|record| record.is_visible_in(region))
                    .cloned()
                    .collect();
                (region, visible)
            })
            .collect())
    }
}

#[async_trait]
impl ExposureStore for JsonFileExposureRepository {
    async fn save(&self, records: Vec<ExposureRecord>) -> Result<(), ExposureStoreError> {
        if records.is_empty() {
            return Ok(());
        }
        self.append(records)?;
        Ok(())
    }
}
