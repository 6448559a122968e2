use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("input is empty")]
    EmptyInput,

    #[error("invalid numeric timestamp: {raw}")]
    InvalidNumericTimestamp { raw: String },

    #[error("unrecognized time format: {raw}")]
    UnrecognizedTimeFormat { raw: String },

    #[error("invalid timezone: {name}")]
    InvalidTimezone { name: String },

    #[error("invalid shift expression: {raw}")]
    InvalidShift { raw: String },

    #[error("instant out of range: {context}")]
    InstantOutOfRange { context: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
