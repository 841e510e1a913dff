use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarkdownError {
    #[error("Failed to package document: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MarkdownError>;
