use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// RigError – everything that can go wrong between an XML log and a record
// ---------------------------------------------------------------------------

/// Error taxonomy shared by the extractor and the dataset accessors.
///
/// During extraction, `MissingSourceFile` / `UnparsableSource` skip the whole
/// session and `SchemaMismatch` / `MissingCalibration` skip one modality's
/// record; nothing escapes the driver loop. Accessors propagate everything to
/// the caller.
#[derive(Debug, Error)]
pub enum RigError {
    #[error("no sensors.xml for session at {0}")]
    MissingSourceFile(PathBuf),

    #[error("failed to parse {path}: {source}")]
    UnparsableSource {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("unknown trial key: {0}")]
    UnknownKey(String),

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("no calibration file at {0}")]
    MissingCalibration(PathBuf),

    #[error("field '{field}': '{value}' is not a number")]
    BadNumber { field: String, value: String },

    #[error("container error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = RigError> = std::result::Result<T, E>;
