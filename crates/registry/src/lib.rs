mod error;
mod id;
mod models;
mod normalize;
mod probe;
mod registry;
mod sqlite;
mod store;

pub use error::RegistryError;
pub use id::{feed_id, ID_LENGTH};
pub use models::FeedRecord;
pub use normalize::normalize_host;
pub use probe::{HttpProbe, SourceProbe};
pub use registry::{Registration, Registry};
pub use sqlite::SqliteFeedStore;
pub use store::{FeedStore, InsertOutcome, MemoryFeedStore};

pub type Result<T> = std::result::Result<T, RegistryError>;
