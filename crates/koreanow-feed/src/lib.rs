//! Feed Document persistence for the korea-now news feed.
//!
//! The feed is a single JSON file. Runs read it, merge fresh items in front of
//! the surviving old ones, and rewrite it whole. There is no locking: one
//! writer at a time is assumed.

pub mod error;
pub mod merge;
pub mod store;

pub use error::FeedError;
pub use merge::{finalize_items, merge_items};
pub use store::FeedStore;
