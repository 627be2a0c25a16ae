use thiserror::Error;

#[derive(Debug, Error)]
pub enum Png2SvgError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Pixel source error: {0}")]
    Source(String),
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Encoding error: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, Png2SvgError>;
