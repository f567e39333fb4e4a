use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShowMeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid page size: {0} (expected 5, 10, 25 or 50)")]
    InvalidPageSize(u32),

    #[error("Invalid page: {0} (pages start at 1)")]
    InvalidPage(u32),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ShowMeError>;
