// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Key-value persistence for records that outlive a single run.
//!
//! Values are stored as pretty-printed JSON. A missing key is reported as
//! `None`; every other failure is an [`Error::Storage`] and is never mistaken
//! for absence.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf}
};

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::error::{Error, storage_error};

/// Capability to read and write records by key.
pub trait Storage {
    /// Returns the raw JSON stored under `key`, or `None` when absent.
    fn read_raw(&self, key: &str) -> Result<Option<String>, Error>;

    /// Replaces the value stored under `key`.
    fn write_raw(&self, key: &str, contents: &str) -> Result<(), Error>;

    /// Reports whether `key` holds a value.
    fn exists(&self, key: &str) -> Result<bool, Error>;

    /// Reads and decodes the record stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialize`] when the stored JSON does not match `T`.
    fn read<T>(&self, key: &str) -> Result<Option<T>, Error>
    where
        Self: Sized,
        T: DeserializeOwned
    {
        self.read_raw(key)?
            .map(|raw| serde_json::from_str(&raw).map_err(Error::from))
            .transpose()
    }

    /// Encodes and stores `value` under `key`.
    fn write<T>(&self, key: &str, value: &T) -> Result<(), Error>
    where
        Self: Sized,
        T: Serialize
    {
        let mut contents = serde_json::to_string_pretty(value)?;
        contents.push('\n');
        self.write_raw(key, &contents)
    }
}

/// Stores each key as `<directory>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    directory: PathBuf
}

impl FileStorage {
    /// Creates a store rooted at `directory`. The directory is created on the
    /// first write.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into()
        }
    }

    /// Root directory of the store.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, Error> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|character| character.is_ascii_alphanumeric() || matches!(character, '-' | '_'));
        if !valid {
            return Err(storage_error(
                key,
                io::Error::new(io::ErrorKind::InvalidInput, "keys may only contain [A-Za-z0-9_-]")
            ));
        }
        Ok(self.directory.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn read_raw(&self, key: &str) -> Result<Option<String>, Error> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                debug!(key, "no stored record");
                Ok(None)
            }
            Err(source) => Err(storage_error(key, source))
        }
    }

    fn write_raw(&self, key: &str, contents: &str) -> Result<(), Error> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.directory).map_err(|source| storage_error(key, source))?;

        // Written beside the target so the rename stays on one filesystem.
        let staging = path.with_extension("json.tmp");
        let file = File::create(&staging).map_err(|source| storage_error(key, source))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(contents.as_bytes())
            .map_err(|source| storage_error(key, source))?;
        writer.flush().map_err(|source| storage_error(key, source))?;
        drop(writer);

        fs::rename(&staging, &path).map_err(|source| storage_error(key, source))?;
        debug!(key, path = %path.display(), "stored record");
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, Error> {
        let path = self.path_for(key)?;
        path.try_exists().map_err(|source| storage_error(key, source))
    }
}
