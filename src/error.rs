use std::path::PathBuf;

use thiserror::Error;

/// Error type for conversion operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input path does not exist or is not a regular file
    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// Directory that should hold the output does not exist
    #[error("Output directory does not exist: {}", .0.display())]
    OutputDirMissing(PathBuf),

    /// I/O error when reading the markdown input
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O error when writing the docx output
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error assembling the docx archive
    #[error("Failed to build docx archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Result type alias for conversion operations
pub type Result<T> = std::result::Result<T, Error>;
