use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("feed host must not be empty")]
    EmptyHost,

    #[error("could not reach host: {0}")]
    Unreachable(String),

    #[error("host returned HTTP status {0}")]
    BadStatus(u16),

    #[error("host is not an XML feed (content-type: {0})")]
    NotXml(String),

    #[error("no stored feed with id: {0}")]
    NotFound(String),

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}
