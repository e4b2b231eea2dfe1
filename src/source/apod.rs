//! Astronomy Picture of the Day adapter.

use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::{ApodRecord, FetchError, JsonClient, MediaKind};

/// Fetches today's picture of the day from `{api_base}/planetary/apod`.
pub struct ApodSource {
    client: Arc<dyn JsonClient>,
    api_base: Url,
    api_key: String,
}

/// The subset of the APOD response the dashboard shows.
#[derive(Debug, Deserialize)]
struct RawApod {
    title: String,
    date: String,
    explanation: String,
    media_type: String,
    url: String,
    #[serde(default)]
    copyright: Option<String>,
}

impl ApodSource {
    pub fn new(client: Arc<dyn JsonClient>, api_base: Url, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_base,
            api_key: api_key.into(),
        }
    }

    pub fn name(&self) -> &str {
        "APOD"
    }

    /// The server picks the date; no `date` parameter is sent.
    pub fn url(&self) -> Result<Url, FetchError> {
        let mut url = self
            .api_base
            .join("planetary/apod")
            .map_err(|e| FetchError::parse(format!("bad APOD url: {e}")))?;
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        Ok(url)
    }

    pub async fn fetch_today(&self) -> Result<ApodRecord, FetchError> {
        let json = self.client.fetch_json(&self.url()?).await?;
        let record = Self::parse(json)?;
        info!(title = %record.title, date = %record.date, "picture of the day loaded");
        Ok(record)
    }

    /// Convert an APOD response body into an [`ApodRecord`].
    ///
    /// Pure, so tests can exercise the mapping without a client.
    pub fn parse(json: Value) -> Result<ApodRecord, FetchError> {
        let raw: RawApod = serde_json::from_value(json)?;

        let date = NaiveDate::parse_from_str(&raw.date, "%Y-%m-%d")
            .map_err(|e| FetchError::parse(format!("APOD date {:?}: {e}", raw.date)))?;

        let media_kind = match raw.media_type.as_str() {
            "image" => MediaKind::Image,
            "video" => MediaKind::Video,
            other => return Err(FetchError::parse(format!("APOD media_type {other:?}"))),
        };

        // The feed tends to wrap the credit in newlines.
        let copyright = raw
            .copyright
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(ApodRecord {
            title: raw.title,
            date,
            explanation: raw.explanation,
            media_kind,
            media_url: raw.url,
            copyright,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::client::stub::StubClient;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "title": "The Horsehead Nebula",
            "date": "2024-03-02",
            "explanation": "A dark cloud of dust.",
            "media_type": "image",
            "url": "https://apod.nasa.gov/apod/image/horsehead.jpg",
            "copyright": "\nJane Astronomer\n",
            "service_version": "v1"
        })
    }

    fn source(client: StubClient) -> ApodSource {
        ApodSource::new(
            Arc::new(client),
            Url::parse("https://api.nasa.gov/").unwrap(),
            "DEMO_KEY",
        )
    }

    #[test]
    fn parse_maps_all_fields() {
        let rec = ApodSource::parse(sample()).unwrap();
        assert_eq!(rec.title, "The Horsehead Nebula");
        assert_eq!(rec.date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert_eq!(rec.media_kind, MediaKind::Image);
        assert_eq!(rec.media_url, "https://apod.nasa.gov/apod/image/horsehead.jpg");
        assert_eq!(rec.copyright.as_deref(), Some("Jane Astronomer"));
    }

    #[test]
    fn missing_copyright_is_none() {
        let mut body = sample();
        body.as_object_mut().unwrap().remove("copyright");
        assert!(ApodSource::parse(body).unwrap().copyright.is_none());
    }

    #[test]
    fn video_media_type() {
        let mut body = sample();
        body["media_type"] = json!("video");
        assert_eq!(ApodSource::parse(body).unwrap().media_kind, MediaKind::Video);
    }

    #[test]
    fn unknown_media_type_is_parse_error() {
        let mut body = sample();
        body["media_type"] = json!("other");
        assert!(matches!(ApodSource::parse(body), Err(FetchError::Parse(_))));
    }

    #[test]
    fn missing_field_is_parse_error() {
        let mut body = sample();
        body.as_object_mut().unwrap().remove("title");
        assert!(matches!(ApodSource::parse(body), Err(FetchError::Parse(_))));
    }

    #[test]
    fn url_carries_key_and_no_date() {
        let src = source(StubClient::new());
        let url = src.url().unwrap();
        assert_eq!(url.path(), "/planetary/apod");
        assert!(url.query_pairs().any(|(k, v)| k == "api_key" && v == "DEMO_KEY"));
        assert!(!url.query_pairs().any(|(k, _)| k == "date"));
    }

    #[tokio::test]
    async fn fetch_today_reports_transport_failure() {
        let src = source(StubClient::new().with_status("/planetary/apod", 500));
        let err = src.fetch_today().await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn fetch_today_parses_response() {
        let src = source(StubClient::new().with_json("/planetary/apod", sample()));
        let rec = src.fetch_today().await.unwrap();
        assert_eq!(rec.title, "The Horsehead Nebula");
    }
}
