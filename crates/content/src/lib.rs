//! Portal content (opportunities, events, resources, market intel, offers,
//! updates) and the classification every feed applies to it.

pub mod feed;
pub mod item;

pub use feed::{ClassifiedItem, ContentFeed, ContentFilter, Facets, classify};
pub use item::{ContentDraft, ContentItem, ContentKind, ContentPatch};
