use thiserror::Error;

#[derive(Error, Debug)]
pub enum StitchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dimension error: {0}")]
    Dimension(String),

    #[error("FFT error: {0}")]
    Fft(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, StitchError>;
