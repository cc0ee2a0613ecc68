/// Picture-of-the-day feed access
///
/// This module handles:
/// - Parsing feed records and the space-image filter (record.rs)
/// - Talking to the feed endpoint (client.rs)
/// - Searching backward through past days (locator.rs)

pub mod client;
pub mod locator;
pub mod record;

pub use client::{FeedClient, FeedError, DEFAULT_FEED_URL};
pub use locator::{locate, LocateOutcome, SearchCursor};
pub use record::FeedRecord;
