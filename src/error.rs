use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Unable to read input file {}: {source}", .path.display())]
    InputSource {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Speech synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("{program} not found or not executable ({source}); install it and add it to PATH")]
    ToolMissing {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Conversion failed: {0}")]
    ConversionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
