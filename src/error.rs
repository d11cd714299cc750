use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IconError {
    #[error("encoding failed: {0}")]
    Encoding(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("icon size must be between 1 and {max}, got {size}")]
    InvalidSize { size: u32, max: u32 },

    #[error("invalid color: {0}")]
    InvalidColor(String),
}

impl IconError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        IconError::Io {
            path: path.into(),
            source,
        }
    }
}
