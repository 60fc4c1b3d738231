use std::io;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("File {0:?} does not exist")]
    FileNotFound(PathBuf),
    #[error("Unsupported plink file {path:?}: {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },
    #[error("Invalid format in {what}: {reason}")]
    InvalidFormat { what: String, reason: String },
    #[error("Row {line} of {path:?} has {found} genotype columns, expected {expected}")]
    TruncatedRow {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Error reading file {path:?}")]
    IOFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unable to parse genome location {0:?}")]
    InvalidLocation(String),
    #[error("Genotype payload of {path:?} has {found} bytes, expected {expected}")]
    BedSizeMismatch {
        path: PathBuf,
        expected: usize,
        found: usize,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            return Error::FileNotFound(path.into());
        }
        Error::IOFailure {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_variant_name(name: &str, convention: &str) -> Self {
        Error::InvalidFormat {
            what: format!("variant name {:?}", name),
            reason: format!("does not adhere to required convention ({})", convention),
        }
    }
}
