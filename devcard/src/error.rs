#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the devcard crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! Variants follow the failure taxonomy of the rendering pipeline:
//! configuration problems are detected before any work starts, transport and
//! feed problems abort a single badge, and storage problems abort the badge
//! that needed the stored value. Rendering itself has no error path.

use std::path::{Path, PathBuf};

/// Unified error type returned by the pipeline, its collaborators and the
/// CLI.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Missing or invalid identifier, credential or configuration value.
    #[error("invalid configuration: {message}")]
    Configuration {
        /// Human readable message describing the problem.
        message: String
    },
    /// Wraps I/O errors that occur while reading the configuration file.
    #[error("failed to read configuration from {path:?}: {source}")]
    Io {
        /// Location of the configuration file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors of the configuration file.
    #[error("failed to parse configuration: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Wraps JSON encoding or decoding errors of persisted records.
    #[error("failed to serialize record: {source}")]
    Serialize {
        /// Underlying serde_json error.
        source: serde_json::Error
    },
    /// The metrics provider could not be reached or rejected the request.
    #[error("metrics transport error: {message}")]
    Transport {
        /// Human readable message describing the transport failure.
        message: String
    },
    /// The metrics provider answered with a page that lacks required fields.
    #[error("malformed metrics feed: {message}")]
    MalformedFeed {
        /// Human readable message describing the missing data.
        message: String
    },
    /// A stored record exists but could not be read or written.
    #[error("storage failure for key '{key}': {source}")]
    Storage {
        /// Key of the record being accessed.
        key:    String,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    },
    /// Wraps I/O errors that occur while writing SVG artifacts.
    #[error("failed to write artifact at {path:?}: {source}")]
    ArtifactIo {
        /// Location of the artifact being produced.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    }
}

impl Error {
    /// Constructs a configuration error from the provided message.
    pub fn configuration<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Configuration {
            message: message.into()
        }
    }

    /// Constructs a transport error from the provided message.
    pub fn transport<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Transport {
            message: message.into()
        }
    }

    /// Constructs a malformed feed error from the provided message.
    pub fn malformed_feed<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::MalformedFeed {
            message: message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation
    /// and is what the CLI prints before exiting with a non-zero status.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

impl From<masterror::AppError> for Error {
    fn from(error: masterror::AppError) -> Self {
        let message = match error.message.as_deref() {
            Some(message) if !message.is_empty() => message.to_owned(),
            _ => error.to_string()
        };
        Self::Transport {
            message
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::ArtifactIo`] variant capturing the failing path and
/// source.
pub fn artifact_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::ArtifactIo {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Storage`] variant capturing the failing key and
/// source.
pub fn storage_error(key: &str, source: std::io::Error) -> Error {
    Error::Storage {
        key: key.to_owned(),
        source
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn configuration_constructor_populates_message() {
        let error = Error::configuration("GitHub token is required");
        match error {
            Error::Configuration {
                ref message
            } => {
                assert_eq!(message, "GitHub token is required");
            }
            other => panic!("expected configuration error, got {other:?}")
        }
    }

    #[test]
    fn to_display_string_matches_display() {
        let error = Error::transport("connection reset");
        assert_eq!(error.to_string(), error.to_display_string());
        assert_eq!(error.to_string(), "metrics transport error: connection reset");
    }

    #[test]
    fn storage_error_helper_wraps_key_and_source() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = super::storage_error("visitor-data", io_error);

        match error {
            Error::Storage {
                ref key,
                ref source
            } => {
                assert_eq!(key, "visitor-data");
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected storage error, got {other:?}")
        }
    }

    #[test]
    fn artifact_io_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("/tmp/stats-card.svg");
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = super::artifact_io_error(path, io_error);

        match error {
            Error::ArtifactIo {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected artifact io error, got {other:?}")
        }
    }

    #[test]
    fn serde_yaml_conversion_maps_to_parse_variant() {
        let error = serde_yaml::from_str::<usize>("not-a-number").unwrap_err();
        let mapped: Error = error.into();
        assert!(matches!(mapped, Error::Parse { .. }));
    }

    #[test]
    fn serde_json_conversion_maps_to_serialize_variant() {
        let invalid = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let mapped: Error = invalid.into();
        assert!(matches!(mapped, Error::Serialize { .. }));
    }

    #[test]
    fn app_error_conversion_maps_to_transport_variant() {
        let mapped: Error = masterror::AppError::service("rate limited").into();
        match mapped {
            Error::Transport {
                message
            } => assert!(message.contains("rate limited")),
            other => panic!("expected transport error, got {other:?}")
        }
    }

    #[test]
    fn app_error_message_reaches_display() {
        let mapped: Error =
            masterror::AppError::service("GraphQL request failed: 502 Bad Gateway").into();
        assert_eq!(
            mapped.to_display_string(),
            "metrics transport error: GraphQL request failed: 502 Bad Gateway"
        );
    }

    #[test]
    fn app_error_without_message_falls_back_to_kind() {
        let mapped: Error = masterror::AppError::bare(masterror::AppErrorKind::Service).into();
        match mapped {
            Error::Transport {
                message
            } => assert!(!message.is_empty()),
            other => panic!("expected transport error, got {other:?}")
        }
    }
}
