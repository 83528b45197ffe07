mod client;
mod error;
mod rule;
mod slice;

pub use client::SlicerClient;
pub use error::SlicerError;
pub use rule::Rule;
pub use slice::slice_feed;

/// Media type of the sliced feed response.
pub const FEED_CONTENT_TYPE: &str = "text/xml";

pub type Result<T> = std::result::Result<T, SlicerError>;
