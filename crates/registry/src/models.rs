use serde::{Deserialize, Serialize};
use slicer::Rule;

/// Persisted association between a feed id and its upstream source.
///
/// Records are immutable once created; re-registering the same pair
/// resolves to the existing record instead of writing a second one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRecord {
    /// Short opaque key, stable for the lifetime of the record.
    pub id: String,
    /// Normalized absolute URL of the upstream feed.
    pub host: String,
    /// Item selection rule applied when serving this feed.
    pub rule: Rule,
}
