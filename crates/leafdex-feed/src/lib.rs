//! Live listing feed client.
//!
//! Fetches the remote listing collection as a JSON array and normalizes it
//! into domain [`Listing`](leafdex_core::Listing)s tagged as live-source
//! data. The previous live snapshot is replaced wholesale on every
//! successful fetch; failure handling lives in the engine's refresh cycle.

pub mod client;
pub mod error;
pub mod types;

pub use client::ListingFeed;
pub use error::FeedError;
pub use types::{RawId, RawListing};
