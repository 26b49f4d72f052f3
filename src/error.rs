//! Crate-level error type and `Result` alias.
//! Wraps I/O, GDAL, XML and TIFF errors, and adds the semantic variants the
//! pipeline reports: invalid input, missing prerequisites, unsupported
//! configurations and external tool failures.
use std::path::PathBuf;

use thiserror::Error;

use crate::core::identity::IdentityError;
use crate::io::annotation::AnnotationError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GDAL error: {0}")]
    Gdal(#[from] gdal::errors::GdalError),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot find {what}: {}", path.display())]
    NotFound { what: &'static str, path: PathBuf },

    #[error("Not implemented for this input: {0}")]
    Unsupported(String),

    #[error("External tool `{program}` failed (exit code {code:?}): {detail}")]
    ExternalTool {
        program: String,
        code: Option<i32>,
        detail: String,
    },

    #[error("External tool did not produce expected output: {}", path.display())]
    MissingOutput { path: PathBuf },
}

/// Coarse classification of [`Error`], used by callers deciding whether a
/// failure is worth retrying or reporting differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    UnsupportedConfiguration,
    ExternalToolFailure,
    Io,
}

impl Error {
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Error::InvalidInput(msg.into())
    }

    pub fn not_found<P: Into<PathBuf>>(what: &'static str, path: P) -> Self {
        Error::NotFound {
            what,
            path: path.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Unsupported(_) => ErrorKind::UnsupportedConfiguration,
            Error::ExternalTool { .. } | Error::MissingOutput { .. } => {
                ErrorKind::ExternalToolFailure
            }
            Error::Io(_) | Error::Gdal(_) | Error::Xml(_) | Error::Tiff(_) => ErrorKind::Io,
        }
    }
}

impl From<IdentityError> for Error {
    fn from(e: IdentityError) -> Self {
        Error::InvalidInput(e.to_string())
    }
}

impl From<AnnotationError> for Error {
    fn from(e: AnnotationError) -> Self {
        match e {
            AnnotationError::Io(e) => Error::Io(e),
            AnnotationError::Xml(e) => Error::Xml(e),
            AnnotationError::NoMatch { folder, .. } => Error::NotFound {
                what: "annotation file",
                path: folder,
            },
            other => Error::InvalidInput(other.to_string()),
        }
    }
}
