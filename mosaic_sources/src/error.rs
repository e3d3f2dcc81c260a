// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::path::PathBuf;

/// Failure while reading a data source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The filesystem refused an operation on `path`.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// A table row could not be understood.
    #[error("line {line}: {message}")]
    Parse {
        /// One-based line number of the offending row.
        line: usize,
        /// What was wrong with it.
        message: String,
    },
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
