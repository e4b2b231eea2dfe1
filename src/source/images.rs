//! NASA Image and Video Library search adapter.
//!
//! The archive returns a `collection.items[]` array where each entry carries
//! its preview link in `links[0].href` and its metadata in `data[0]`.  Only
//! entries with a usable preview link make it into the gallery.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Url;
use serde_json::Value;
use tracing::info;

use super::{FetchError, GalleryItem, JsonClient};

/// Query used before the user has searched for anything.
pub const DEFAULT_QUERY: &str = "space";

/// Upper bound on the size of one result set.
pub const MAX_RESULTS: usize = 50;

pub struct ImageSearch {
    client: Arc<dyn JsonClient>,
    base: Url,
}

impl ImageSearch {
    pub fn new(client: Arc<dyn JsonClient>, base: Url) -> Self {
        Self { client, base }
    }

    pub fn name(&self) -> &str {
        "Image library"
    }

    /// `{base}/search?q=QUERY&media_type=image`.  This endpoint takes no key.
    pub fn url(&self, query: &str) -> Result<Url, FetchError> {
        let mut url = self
            .base
            .join("search")
            .map_err(|e| FetchError::parse(format!("bad image search url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("media_type", "image");
        Ok(url)
    }

    pub async fn search(&self, query: &str) -> Result<Vec<GalleryItem>, FetchError> {
        let json = self.client.fetch_json(&self.url(query)?).await?;
        let items = Self::parse(&json)?;
        info!(query, count = items.len(), "image search finished");
        Ok(items)
    }

    /// Normalize a search response.  An empty result is not an error.
    pub fn parse(json: &Value) -> Result<Vec<GalleryItem>, FetchError> {
        let raw_items = json
            .pointer("/collection/items")
            .and_then(Value::as_array)
            .ok_or_else(|| FetchError::parse("image search: missing collection.items"))?;

        Ok(raw_items
            .iter()
            .filter_map(to_gallery_item)
            .take(MAX_RESULTS)
            .collect())
    }
}

/// `None` for entries that cannot be rendered: no first link, an empty link
/// address, or no metadata block.
fn to_gallery_item(item: &Value) -> Option<GalleryItem> {
    let href = item
        .pointer("/links/0/href")
        .and_then(Value::as_str)
        .filter(|h| !h.is_empty())?;
    let data = item.pointer("/data/0")?;

    let text = |key: &str| data.get(key).and_then(Value::as_str).map(str::to_string);

    Some(GalleryItem {
        title: text("title").unwrap_or_else(|| "(untitled)".into()),
        description: text("description"),
        created: data
            .get("date_created")
            .and_then(Value::as_str)
            .and_then(parse_created),
        thumbnail_url: href.to_string(),
        center: text("center").unwrap_or_else(|| "NASA".into()),
    })
}

/// The archive mostly uses RFC 3339 but older entries carry a bare date.
fn parse_created(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s.get(..10)?, "%Y-%m-%d")
                .ok()?
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc())
        })
}
