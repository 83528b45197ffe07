use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlicerError {
    #[error("filter rule must be a positive integer, got {0}")]
    InvalidRule(i64),

    #[error("upstream feed unavailable: {0}")]
    Upstream(String),

    #[error("malformed upstream feed: {0}")]
    Malformed(String),
}
