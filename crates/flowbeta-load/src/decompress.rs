//! Opening plain and gzip-compressed source files.

use chrono::NaiveDate;
use flate2::read::GzDecoder;
use flowbeta_types::FlowError;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ParseError;

/// Errors that can occur while loading a daily source.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The source file for a date does not exist.
    #[error("Source file not found: {}", .0.display())]
    Missing(PathBuf),

    /// No in-memory data was registered for a date.
    #[error("No data registered for {0}")]
    NoData(NaiveDate),

    /// The file exists but could not be read.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file content is malformed.
    #[error("{}: {source}", path.display())]
    Parse {
        /// The file being parsed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: ParseError,
    },
}

impl From<LoadError> for FlowError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Missing(_) | LoadError::NoData(_) => {
                Self::Io(std::io::Error::new(ErrorKind::NotFound, err.to_string()))
            }
            LoadError::Io { source, .. } => Self::Io(source),
            LoadError::Parse { .. } => Self::Parse(err.to_string()),
        }
    }
}

/// Opens a source file for buffered reading.
///
/// Files ending in `.gz` are transparently decompressed.
///
/// # Errors
///
/// Returns [`LoadError::Missing`] if the file does not exist and
/// [`LoadError::Io`] for any other open failure.
pub fn open_source(path: &Path) -> Result<Box<dyn BufRead>, LoadError> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            LoadError::Missing(path.to_path_buf())
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let is_gzip = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));

    if is_gzip {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Opens `path` and hands the reader to `parse`, attaching the path to
/// parse errors.
pub(crate) fn load_file<T>(
    path: &Path,
    parse: impl FnOnce(Box<dyn BufRead>) -> Result<Vec<T>, ParseError>,
) -> Result<Vec<T>, LoadError> {
    parse(open_source(path)?).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
