use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by the upload/history/report pipeline.
///
/// Each variant maps to one HTTP status class at the API edge: `Validation`
/// and `EmptyInput` are caller mistakes (400), `NotFound` is a missing
/// record (404), `Internal` is everything unexpected (500).
#[derive(Debug, ThisError)]
pub enum Error {
    /// The input does not satisfy the upload contract (missing columns,
    /// missing file part, wrong file extension).
    #[error("{0}")]
    Validation(String),

    /// No record matches the requested id, or the store is empty.
    #[error("{0}")]
    NotFound(String),

    /// The input parsed cleanly but contains zero data rows, so no average
    /// is defined.
    #[error("CSV file contains no data rows")]
    EmptyInput,

    /// Unexpected failure while parsing input or rendering a report.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}
