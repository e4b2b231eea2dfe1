//! Feed adapters.
//!
//! Each NASA endpoint gets one adapter that knows how to build its URL and
//! how to turn the response into the normalized records in [`records`].  All
//! adapters share a single [`JsonClient`], which is the only thing that
//! touches the network.
//!
//! ## For contributors: adding a feed
//!
//! 1. Add the record type to `records.rs`.
//! 2. Create `src/source/<feed>.rs` with a struct holding an
//!    `Arc<dyn JsonClient>` and whatever URL/key it needs.
//! 3. Give it a pure `parse`/`summarize` function so tests can feed it
//!    canned JSON, and an `async fn` that fetches and calls it.
//! 4. Re-export it below and wire it into [`crate::fetch::Feeds`].

pub mod apod;
pub mod client;
mod error;
pub mod images;
pub mod neo;
mod records;

pub use apod::ApodSource;
pub use client::{HttpJsonClient, JsonClient};
pub use error::FetchError;
pub use images::ImageSearch;
pub use neo::NeoFeed;
pub use records::{ApodRecord, CloseApproach, GalleryItem, MediaKind, NeoRecord, NeoSummary};
