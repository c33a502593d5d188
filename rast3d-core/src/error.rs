/// Error types shared by the loader, configuration and render pipeline
use std::path::PathBuf;

/// Everything that can go wrong before a frame is rendered
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The mesh file could not be opened
    #[error("could not open mesh file '{}'", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading failed after the file was opened
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A face record that does not describe a valid triangle
    #[error("malformed face on line {line}: {reason}")]
    MalformedFace { line: usize, reason: String },

    /// A `v` or `vn` record without three numbers
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// Configuration could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
