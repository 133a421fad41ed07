use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitstreamError {
    #[error("short read: requested {requested} bits but only {remaining} remain")]
    ShortRead { requested: u32, remaining: usize },
    #[error("separate() width must be in 1..=32, got {0}")]
    InvalidWidth(u32),
}
