use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatusError {
    #[error("status socket I/O error: {0}")]
    Io(#[from] std::io::Error),
}
