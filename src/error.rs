use thiserror::Error;

/// The uploaded file could not be decoded as tabular data. Surfaced as a
/// rejection at the upload boundary; the previous snapshot stays in place.
#[derive(Debug, Error)]
pub enum WorkbookError {
    #[error("failed to read workbook: {0}")]
    Decode(String),
    #[error("workbook has no sheets")]
    NoSheet,
}

/// The text-generation collaborator failed. Isolated to the insight text
/// surface; never touches the snapshot store.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("model returned empty content")]
    EmptyContent,
}
