//! NeoWs feed adapter.
//!
//! The feed groups objects by approach date under `near_earth_objects`.  The
//! adapter flattens that mapping in document order, counts every object, and
//! keeps the first [`MAX_RECORDS`] well-formed ones for display.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{CloseApproach, FetchError, JsonClient, NeoRecord, NeoSummary};

pub const MAX_RECORDS: usize = 10;

pub struct NeoFeed {
    client: Arc<dyn JsonClient>,
    api_base: Url,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct RawNeo {
    id: String,
    name: String,
    is_potentially_hazardous_asteroid: bool,
    estimated_diameter: RawDiameter,
    close_approach_data: Vec<RawApproach>,
    nasa_jpl_url: String,
}

#[derive(Debug, Deserialize)]
struct RawDiameter {
    meters: RawRange,
}

#[derive(Debug, Deserialize)]
struct RawRange {
    estimated_diameter_min: f64,
    estimated_diameter_max: f64,
}

#[derive(Debug, Deserialize)]
struct RawApproach {
    close_approach_date: String,
    relative_velocity: RawVelocity,
    miss_distance: RawMissDistance,
}

// Both numeric fields arrive as strings.
#[derive(Debug, Deserialize)]
struct RawVelocity {
    kilometers_per_hour: String,
}

#[derive(Debug, Deserialize)]
struct RawMissDistance {
    kilometers: String,
}

impl NeoFeed {
    pub fn new(client: Arc<dyn JsonClient>, api_base: Url, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_base,
            api_key: api_key.into(),
        }
    }

    pub fn name(&self) -> &str {
        "NEO feed"
    }

    /// Single-day window: `start_date == end_date == date`.
    pub fn url(&self, date: NaiveDate) -> Result<Url, FetchError> {
        let day = date.format("%Y-%m-%d").to_string();
        let mut url = self
            .api_base
            .join("neo/rest/v1/feed")
            .map_err(|e| FetchError::parse(format!("bad NEO url: {e}")))?;
        url.query_pairs_mut()
            .append_pair("start_date", &day)
            .append_pair("end_date", &day)
            .append_pair("api_key", &self.api_key);
        Ok(url)
    }

    pub async fn fetch_for_today(&self) -> Result<NeoSummary, FetchError> {
        self.fetch_for(feed_date(Utc::now())).await
    }

    pub async fn fetch_for(&self, date: NaiveDate) -> Result<NeoSummary, FetchError> {
        let json = self.client.fetch_json(&self.url(date)?).await?;
        let summary = Self::summarize(&json, date)?;
        info!(
            total = summary.total_count,
            hazardous = summary.hazardous_count,
            shown = summary.records.len(),
            "NEO feed loaded"
        );
        Ok(summary)
    }

    /// Flatten, count and truncate a feed response.
    ///
    /// Counts cover every object in the mapping.  A record whose fields do not
    /// parse is left out of `records` but still counted.
    pub fn summarize(json: &Value, date: NaiveDate) -> Result<NeoSummary, FetchError> {
        let groups = json
            .get("near_earth_objects")
            .and_then(Value::as_object)
            .ok_or_else(|| FetchError::parse("NEO feed: missing near_earth_objects"))?;

        let all: Vec<&Value> = groups
            .values()
            .filter_map(Value::as_array)
            .flatten()
            .collect();

        let total_count = all.len();
        let hazardous_count = all
            .iter()
            .filter(|neo| {
                neo.get("is_potentially_hazardous_asteroid")
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
            })
            .count();

        if let Some(reported) = json.get("element_count").and_then(Value::as_u64) {
            if reported as usize != total_count {
                debug!(reported, total_count, "element_count disagrees with flattened feed");
            }
        }

        let records = all
            .into_iter()
            .filter_map(|raw| match to_record(raw) {
                Ok(rec) => Some(rec),
                Err(e) => {
                    warn!(id = ?raw.get("id"), error = %e, "skipping malformed NEO record");
                    None
                }
            })
            .take(MAX_RECORDS)
            .collect();

        Ok(NeoSummary {
            date,
            total_count,
            hazardous_count,
            records,
        })
    }
}

/// The NeoWs feed is keyed by UTC calendar date, whatever the local zone.
pub fn feed_date(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

fn to_record(raw: &Value) -> Result<NeoRecord, FetchError> {
    let neo = RawNeo::deserialize(raw)?;
    let approach = neo
        .close_approach_data
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::parse("no close approach data"))?;

    let number = |s: &str, what: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|e| FetchError::parse(format!("{what} {s:?}: {e}")))
    };

    Ok(NeoRecord {
        id: neo.id,
        name: neo.name,
        is_hazardous: neo.is_potentially_hazardous_asteroid,
        diameter_m_min: neo.estimated_diameter.meters.estimated_diameter_min,
        diameter_m_max: neo.estimated_diameter.meters.estimated_diameter_max,
        close_approach: CloseApproach {
            date: NaiveDate::parse_from_str(&approach.close_approach_date, "%Y-%m-%d").map_err(
                |e| FetchError::parse(format!("approach date {:?}: {e}", approach.close_approach_date)),
            )?,
            velocity_kmh: number(approach.relative_velocity.kilometers_per_hour.as_str(), "velocity")?,
            miss_distance_km: number(approach.miss_distance.kilometers.as_str(), "miss distance")?,
        },
        jpl_url: neo.nasa_jpl_url,
    })
}
