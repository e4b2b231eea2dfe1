//! Background fetching.
//!
//! Network work runs on a tokio runtime; results are sent to the UI thread
//! over an [`mpsc`] channel and applied to [`crate::app::App`] there, so the
//! application state is only ever touched by one thread.
//!
//! Adapter errors stop here: they are logged and handed on as `None` (or as
//! an `Err` for searches, so the gallery can tell a failure from an empty
//! result).  Nothing in this module panics or aborts on a failed feed.

use std::future::Future;
use std::sync::mpsc;
use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::source::{
    ApodRecord, ApodSource, FetchError, GalleryItem, ImageSearch, JsonClient, NeoFeed, NeoSummary,
};

/// Outcome of the startup load.  Each slot settled independently.
#[derive(Debug, Default)]
pub struct InitialLoad {
    pub apod: Option<ApodRecord>,
    pub gallery: Option<Vec<GalleryItem>>,
    pub neo: Option<NeoSummary>,
}

/// Messages sent from fetch tasks to the UI thread.
#[derive(Debug)]
pub enum FetchMsg {
    /// All three feeds have settled.
    Initial(InitialLoad),
    /// A user search finished.  `token` identifies which submission it answers.
    Search {
        token: u64,
        result: Result<Vec<GalleryItem>, FetchError>,
    },
}

/// The three adapters, sharing one client.
pub struct Feeds {
    pub apod: ApodSource,
    pub images: ImageSearch,
    pub neo: NeoFeed,
}

impl Feeds {
    pub fn new(client: Arc<dyn JsonClient>, config: &AppConfig) -> Self {
        Self {
            apod: ApodSource::new(
                client.clone(),
                config.nasa_api_url.clone(),
                &config.nasa_api_key,
            ),
            images: ImageSearch::new(client.clone(), config.nasa_images_url.clone()),
            neo: NeoFeed::new(client, config.nasa_api_url.clone(), &config.nasa_api_key),
        }
    }

    /// Fetch all three feeds concurrently and wait for every one to settle.
    ///
    /// A failing feed only empties its own slot.
    pub async fn load_all(&self, query: &str) -> InitialLoad {
        let (apod, gallery, neo) = tokio::join!(
            settle(self.apod.name(), self.apod.fetch_today()),
            settle(self.images.name(), self.images.search(query)),
            settle(self.neo.name(), self.neo.fetch_for_today()),
        );
        info!(
            apod = apod.is_some(),
            gallery = gallery.is_some(),
            neo = neo.is_some(),
            "initial load settled"
        );
        InitialLoad { apod, gallery, neo }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<GalleryItem>, FetchError> {
        self.images
            .search(query)
            .await
            .inspect_err(|e| error!(query, error = %e, "image search failed"))
    }
}

/// Turn a feed result into an optional slot, logging the failure.
async fn settle<T>(feed: &str, fut: impl Future<Output = Result<T, FetchError>>) -> Option<T> {
    match fut.await {
        Ok(v) => Some(v),
        Err(e) => {
            error!(feed, transport = e.is_transport(), error = %e, "feed fetch failed");
            None
        }
    }
}

/// Spawn the startup load.  Exactly one [`FetchMsg::Initial`] is sent.
pub fn spawn_initial(handle: &Handle, feeds: Arc<Feeds>, query: String, tx: mpsc::Sender<FetchMsg>) {
    handle.spawn(async move {
        let load = feeds.load_all(&query).await;
        // The receiver is gone only if the UI has already exited.
        let _ = tx.send(FetchMsg::Initial(load));
    });
}

/// Spawn one image search tagged with `token`.
pub fn spawn_search(
    handle: &Handle,
    feeds: Arc<Feeds>,
    token: u64,
    query: String,
    tx: mpsc::Sender<FetchMsg>,
) {
    handle.spawn(async move {
        let result = feeds.search(&query).await;
        let _ = tx.send(FetchMsg::Search { token, result });
    });
}
