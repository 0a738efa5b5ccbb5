use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("Invalid page range: {0}")]
    InvalidRange(String),

    #[error("Invalid page number: {0}")]
    InvalidPageNumber(String),

    #[error("Rotation must be 90, 180, or 270 degrees (got {0})")]
    InvalidRotation(i64),

    #[error("PDF operation failed: {0}")]
    Operation(String),
}
