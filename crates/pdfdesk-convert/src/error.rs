use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("no input files provided")]
    NoInput,

    #[error("failed to read input document: {0}")]
    Decode(String),

    #[error("failed to build output document: {0}")]
    Encode(String),

    #[error("rendering failed: {0}")]
    Render(String),
}
