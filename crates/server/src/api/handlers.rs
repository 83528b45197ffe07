mod feeds;

// Re-export all handlers
pub use feeds::{create_feed, dump_feeds, get_feed, CreateFeedRequest, CreateFeedResponse};

// Re-export utoipa path structs for OpenAPI routing
#[doc(hidden)]
pub use feeds::{__path_create_feed, __path_dump_feeds, __path_get_feed};
