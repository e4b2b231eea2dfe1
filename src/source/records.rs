//! Normalized, view-ready records produced by the feed adapters.
//!
//! Each adapter converts its endpoint's native JSON into one of these types
//! so that the controller and the UI never look at raw responses.

use chrono::{DateTime, NaiveDate, Utc};

/// How the picture of the day is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// Astronomy Picture of the Day.
#[derive(Debug, Clone, PartialEq)]
pub struct ApodRecord {
    pub title: String,
    pub date: NaiveDate,
    pub explanation: String,
    pub media_kind: MediaKind,
    pub media_url: String,
    /// `None` for public-domain entries.
    pub copyright: Option<String>,
}

/// One image from the NASA Image and Video Library search.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryItem {
    pub title: String,
    pub description: Option<String>,
    /// `None` when the archive entry has no usable `date_created`.
    pub created: Option<DateTime<Utc>>,
    /// Never empty; entries without a link are dropped during normalization.
    pub thumbnail_url: String,
    /// Originating NASA center, `"NASA"` when the archive omits it.
    pub center: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloseApproach {
    pub date: NaiveDate,
    pub velocity_kmh: f64,
    pub miss_distance_km: f64,
}

/// A near-earth object passing on the queried day.
#[derive(Debug, Clone, PartialEq)]
pub struct NeoRecord {
    pub id: String,
    pub name: String,
    pub is_hazardous: bool,
    pub diameter_m_min: f64,
    pub diameter_m_max: f64,
    pub close_approach: CloseApproach,
    pub jpl_url: String,
}

/// The NEO feed for one day: aggregate counts over every object in the
/// response, plus the first few records for display.
#[derive(Debug, Clone, PartialEq)]
pub struct NeoSummary {
    pub date: NaiveDate,
    pub total_count: usize,
    pub hazardous_count: usize,
    pub records: Vec<NeoRecord>,
}
