//! The "fetch JSON from a URL" capability every adapter is built on.
//!
//! Adapters only know how to build a URL and how to read the JSON that comes
//! back; the actual transport sits behind [`JsonClient`] so tests can swap in
//! canned documents.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use super::FetchError;

#[async_trait]
pub trait JsonClient: Send + Sync {
    /// Issue one GET request and parse the body as JSON.  No retries.
    async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError>;
}

/// [`JsonClient`] backed by a shared [`reqwest::Client`].
pub struct HttpJsonClient {
    client: Client,
}

impl HttpJsonClient {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("skywatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl JsonClient for HttpJsonClient {
    async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError> {
        debug!(url = %redact_key(url), "GET");
        let resp = self.client.get(url.clone()).send().await?;

        if !resp.status().is_success() {
            return Err(FetchError::Status {
                url: redact_key(url),
                status: resp.status().as_u16(),
            });
        }

        // Read the body first so a malformed document is reported as a
        // parse error rather than a transport error.
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Render `url` without its `api_key` value, for error messages and logs.
pub fn redact_key(url: &Url) -> String {
    let mut shown = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "api_key" { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        return shown.to_string();
    }
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.to_string()
}

/// Canned-response client for adapter and controller tests.
#[cfg(test)]
pub mod stub {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    enum Canned {
        Json(Value),
        Status(u16),
    }

    /// Serves a fixed document (or HTTP status) per URL path and records
    /// every URL it was asked for.
    #[derive(Default)]
    pub struct StubClient {
        routes: HashMap<String, Canned>,
        calls: Mutex<Vec<Url>>,
    }

    impl StubClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_json(mut self, path: &str, body: Value) -> Self {
            self.routes.insert(path.to_string(), Canned::Json(body));
            self
        }

        pub fn with_status(mut self, path: &str, status: u16) -> Self {
            self.routes.insert(path.to_string(), Canned::Status(status));
            self
        }

        pub fn calls(&self) -> Vec<Url> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl JsonClient for StubClient {
        async fn fetch_json(&self, url: &Url) -> Result<Value, FetchError> {
            self.calls.lock().unwrap().push(url.clone());
            match self.routes.get(url.path()) {
                Some(Canned::Json(v)) => Ok(v.clone()),
                Some(Canned::Status(s)) => Err(FetchError::Status {
                    url: url.to_string(),
                    status: *s,
                }),
                None => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }
}
