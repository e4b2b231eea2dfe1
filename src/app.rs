use ratatui::widgets::ListState;
use tracing::{debug, info, warn};

use crate::fetch::InitialLoad;
use crate::gallery::GalleryPaginator;
use crate::source::{images::DEFAULT_QUERY, ApodRecord, FetchError, GalleryItem, NeoSummary};

/// The three tabs of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Apod,
    Gallery,
    Neo,
}

impl View {
    pub const ALL: [View; 3] = [View::Apod, View::Gallery, View::Neo];

    pub fn title(self) -> &'static str {
        match self {
            View::Apod => "Picture of the Day",
            View::Gallery => "NASA Gallery",
            View::Neo => "Near Earth Objects",
        }
    }

    pub fn index(self) -> usize {
        match self {
            View::Apod => 0,
            View::Gallery => 1,
            View::Neo => 2,
        }
    }
}

/// Where the gallery's current result set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Startup search still running.  The loading screen covers the gallery
    /// until then, so views never render this state.
    NotAttempted,
    InProgress,
    Done,
    Failed,
}

/// A search the caller must now run; hand the result back to
/// [`App::finish_search`] with the same token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub token: u64,
    pub query: String,
}

/// All dashboard state.  Mutated only on the UI thread.
pub struct App {
    /// `true` until the startup load has settled.
    pub loading: bool,
    pub view: View,
    pub apod: Option<ApodRecord>,
    pub neo: Option<NeoSummary>,
    pub gallery: GalleryPaginator,
    pub search_state: SearchState,
    /// Query behind the gallery's current (or pending) result set.
    pub query: String,
    /// Text typed into the search box.
    pub input: String,
    /// Whether keystrokes go to `input`.
    pub editing: bool,
    /// Token of the most recently submitted search.  The startup search is 0.
    search_token: u64,
    pub gallery_list: ListState,
    pub neo_list: ListState,
    /// Scroll offset of the picture of the day explanation.
    pub apod_scroll: u16,
    /// Running on the shared, rate-limited demo key.
    pub demo_key: bool,
    pub quit: bool,
    /// Last status message.
    pub status: String,
}

impl App {
    pub fn new(demo_key: bool) -> Self {
        Self {
            loading: true,
            view: View::default(),
            apod: None,
            neo: None,
            gallery: GalleryPaginator::new(),
            search_state: SearchState::NotAttempted,
            query: DEFAULT_QUERY.to_string(),
            input: String::new(),
            editing: false,
            search_token: 0,
            gallery_list: ListState::default(),
            neo_list: ListState::default(),
            apod_scroll: 0,
            demo_key,
            quit: false,
            status: "Loading NASA data…".into(),
        }
    }

    /// Install the startup load and leave the loading state.
    ///
    /// Feeds that failed stay empty.  The startup gallery is dropped if a
    /// user search was submitted in the meantime.
    pub fn finish_initial(&mut self, load: InitialLoad) {
        self.apod = load.apod;

        self.neo = load.neo;
        self.neo_list = ListState::default();
        if self.neo.as_ref().is_some_and(|n| !n.records.is_empty()) {
            self.neo_list.select(Some(0));
        }

        if self.search_token == 0 {
            self.apply_search(load.gallery.ok_or(()));
        }

        self.loading = false;
        let failed = [
            self.apod.is_none(),
            self.search_state == SearchState::Failed,
            self.neo.is_none(),
        ]
        .iter()
        .filter(|f| **f)
        .count();
        self.status = match failed {
            0 => "Ready".into(),
            n => format!("Ready ({n} of 3 feeds unavailable)"),
        };
        info!(failed, "dashboard ready");
    }

    // -- views ---------------------------------------------------------------

    pub fn select_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn next_view(&mut self) {
        self.view = View::ALL[(self.view.index() + 1) % View::ALL.len()];
    }

    pub fn previous_view(&mut self) {
        let n = View::ALL.len();
        self.view = View::ALL[(self.view.index() + n - 1) % n];
    }

    // -- search --------------------------------------------------------------

    /// Submit `query`.  Blank queries are ignored and return `None`; the
    /// current result set stays as it is.
    pub fn submit_search(&mut self, query: &str) -> Option<SearchTicket> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        self.search_token += 1;
        self.query = query.to_string();
        self.search_state = SearchState::InProgress;
        self.status = format!("Searching for \"{query}\"…");
        debug!(token = self.search_token, query, "search submitted");

        Some(SearchTicket {
            token: self.search_token,
            query: self.query.clone(),
        })
    }

    /// Submit whatever is in the search box and stop editing.
    pub fn submit_input(&mut self) -> Option<SearchTicket> {
        self.editing = false;
        let input = std::mem::take(&mut self.input);
        self.submit_search(&input)
    }

    /// Apply the result of search `token`.  Returns `false` when a newer
    /// search has been submitted since, in which case nothing changes.
    pub fn finish_search(
        &mut self,
        token: u64,
        result: Result<Vec<GalleryItem>, FetchError>,
    ) -> bool {
        if token != self.search_token {
            debug!(token, latest = self.search_token, "discarding stale search result");
            return false;
        }
        let result = result.map_err(|e| {
            self.status = format!("Search failed: {e}");
        });
        self.apply_search(result);
        true
    }

    fn apply_search(&mut self, result: Result<Vec<GalleryItem>, ()>) {
        match result {
            Ok(items) => {
                self.status = format!("Found {} images for \"{}\"", items.len(), self.query);
                self.gallery.install(items);
                self.search_state = SearchState::Done;
            }
            Err(()) => {
                warn!(query = %self.query, "clearing gallery after failed search");
                self.gallery.clear();
                self.search_state = SearchState::Failed;
            }
        }
        self.gallery_list = ListState::default();
        if !self.gallery.is_empty() {
            self.gallery_list.select(Some(0));
        }
    }

    /// Reveal the next page of the gallery.  Only acts on the gallery view
    /// when more items remain; returns whether anything changed.
    pub fn load_more_gallery(&mut self) -> bool {
        if self.view != View::Gallery || !self.gallery.has_more() {
            return false;
        }
        self.gallery.load_more();
        true
    }

    // -- search box editing --------------------------------------------------

    pub fn start_editing(&mut self) {
        self.view = View::Gallery;
        self.editing = true;
    }

    pub fn cancel_editing(&mut self) {
        self.editing = false;
        self.input.clear();
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    // -- navigation ----------------------------------------------------------

    /// Length of the list shown by the active view, or `None` for the
    /// picture of the day, which scrolls instead.
    fn active_list(&mut self) -> Option<(&mut ListState, usize)> {
        match self.view {
            View::Apod => None,
            View::Gallery => Some((&mut self.gallery_list, self.gallery.visible_count())),
            View::Neo => {
                let len = self.neo.as_ref().map_or(0, |n| n.records.len());
                Some((&mut self.neo_list, len))
            }
        }
    }

    pub fn select_next(&mut self) {
        match self.active_list() {
            None => self.apod_scroll = self.apod_scroll.saturating_add(1),
            Some((_, 0)) => {}
            Some((state, len)) => {
                let i = match state.selected() {
                    Some(i) => (i + 1).min(len - 1),
                    None => 0,
                };
                state.select(Some(i));
            }
        }
    }

    pub fn select_previous(&mut self) {
        match self.active_list() {
            None => self.apod_scroll = self.apod_scroll.saturating_sub(1),
            Some((_, 0)) => {}
            Some((state, _)) => {
                let i = state.selected().map_or(0, |i| i.saturating_sub(1));
                state.select(Some(i));
            }
        }
    }

    pub fn select_first(&mut self) {
        match self.active_list() {
            None => self.apod_scroll = 0,
            Some((_, 0)) => {}
            Some((state, _)) => state.select(Some(0)),
        }
    }

    pub fn select_last(&mut self) {
        match self.active_list() {
            None => {}
            Some((_, 0)) => {}
            Some((state, len)) => state.select(Some(len - 1)),
        }
    }

    /// The gallery item under the cursor, if any.
    pub fn selected_image(&self) -> Option<&GalleryItem> {
        self.gallery_list
            .selected()
            .and_then(|i| self.gallery.visible_items().get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::fetch::tests::{apod_body, feeds, neo_body, search_body};
    use crate::gallery::tests::items;
    use crate::source::client::stub::StubClient;

    fn ready_app() -> App {
        let mut app = App::new(true);
        app.finish_initial(InitialLoad {
            apod: None,
            gallery: Some(items(20)),
            neo: None,
        });
        app
    }

    fn failed() -> FetchError {
        FetchError::Status {
            url: "https://images-api.nasa.gov/search".into(),
            status: 500,
        }
    }

    // -- construction --------------------------------------------------------

    #[test]
    fn new_app_is_loading_on_picture_of_the_day() {
        let app = App::new(false);
        assert!(app.loading);
        assert_eq!(app.view, View::Apod);
        assert_eq!(app.search_state, SearchState::NotAttempted);
        assert_eq!(app.query, "space");
        assert!(!app.demo_key);
    }

    // -- initial load --------------------------------------------------------

    #[test]
    fn finish_initial_leaves_loading_state() {
        let app = ready_app();
        assert!(!app.loading);
        assert_eq!(app.search_state, SearchState::Done);
        assert_eq!(app.gallery.visible_count(), 6);
        assert_eq!(app.gallery_list.selected(), Some(0));
        assert!(app.status.contains("2 of 3"));
    }

    #[test]
    fn failed_startup_search_is_distinguished_from_no_results() {
        let mut app = App::new(true);
        app.finish_initial(InitialLoad::default());
        assert!(!app.loading);
        assert_eq!(app.search_state, SearchState::Failed);

        let mut app = App::new(true);
        app.finish_initial(InitialLoad {
            gallery: Some(Vec::new()),
            ..Default::default()
        });
        assert_eq!(app.search_state, SearchState::Done);
        assert!(app.gallery.is_empty());
    }

    #[test]
    fn user_search_during_load_wins_over_startup_gallery() {
        let mut app = App::new(true);
        let ticket = app.submit_search("mars").unwrap();
        assert!(app.finish_search(ticket.token, Ok(items(2))));

        app.finish_initial(InitialLoad {
            gallery: Some(items(30)),
            ..Default::default()
        });
        assert_eq!(app.gallery.total(), 2);
        assert_eq!(app.query, "mars");
    }

    #[tokio::test]
    async fn ready_even_when_one_feed_fails() {
        let client = Arc::new(
            StubClient::new()
                .with_json("/planetary/apod", apod_body())
                .with_json("/search", search_body(9))
                .with_status("/neo/rest/v1/feed", 502),
        );
        let feeds = feeds(client);

        let mut app = App::new(true);
        app.finish_initial(feeds.load_all(DEFAULT_QUERY).await);

        assert!(!app.loading);
        assert_eq!(app.apod.as_ref().unwrap().title, "Pillars of Creation");
        assert_eq!(app.gallery.total(), 9);
        assert_eq!(app.gallery.visible_count(), 6);
        assert!(app.neo.is_none());
    }

    #[tokio::test]
    async fn neo_selection_starts_on_first_record() {
        let client = Arc::new(StubClient::new().with_json("/neo/rest/v1/feed", neo_body()));
        let mut app = App::new(true);
        app.finish_initial(feeds(client).load_all(DEFAULT_QUERY).await);

        assert_eq!(app.neo.as_ref().unwrap().total_count, 2);
        assert_eq!(app.neo_list.selected(), Some(0));
    }

    // -- views ---------------------------------------------------------------

    #[test]
    fn view_cycling_wraps() {
        let mut app = ready_app();
        app.next_view();
        assert_eq!(app.view, View::Gallery);
        app.next_view();
        app.next_view();
        assert_eq!(app.view, View::Apod);
        app.previous_view();
        assert_eq!(app.view, View::Neo);
        app.select_view(View::Gallery);
        assert_eq!(app.view, View::Gallery);
    }

    // -- search --------------------------------------------------------------

    #[test]
    fn blank_searches_do_nothing() {
        let mut app = ready_app();
        let before = app.gallery.total();

        assert_eq!(app.submit_search(""), None);
        assert_eq!(app.submit_search("   "), None);

        assert_eq!(app.gallery.total(), before);
        assert_eq!(app.search_state, SearchState::Done);
        assert_eq!(app.query, "space");
    }

    #[tokio::test]
    async fn blank_input_makes_no_network_call() {
        let client = Arc::new(StubClient::new().with_json("/search", search_body(3)));
        let feeds = feeds(client.clone());
        let mut app = ready_app();

        app.start_editing();
        app.push_char(' ');
        if let Some(ticket) = app.submit_input() {
            let result = feeds.search(&ticket.query).await;
            app.finish_search(ticket.token, result);
        }

        assert_eq!(client.call_count(), 0);
        assert_eq!(app.gallery.total(), 20);
        assert!(!app.editing);
    }

    #[tokio::test]
    async fn mars_scenario_pages_through_twelve_results() {
        let client = Arc::new(StubClient::new().with_json("/search", search_body(12)));
        let feeds = feeds(client.clone());
        let mut app = ready_app();
        app.select_view(View::Gallery);

        let ticket = app.submit_search("mars").unwrap();
        assert_eq!(app.search_state, SearchState::InProgress);
        let result = feeds.search(&ticket.query).await;
        assert!(app.finish_search(ticket.token, result));

        assert_eq!(app.gallery.visible_items().len(), 6);
        assert!(app.load_more_gallery());
        assert_eq!(app.gallery.visible_items().len(), 12);
        assert!(!app.load_more_gallery());
        assert_eq!(app.gallery.visible_items().len(), 12);

        assert!(client.calls()[0].query_pairs().any(|(k, v)| k == "q" && v == "mars"));
    }

    #[test]
    fn stale_search_result_is_discarded() {
        let mut app = ready_app();
        let a = app.submit_search("apollo").unwrap();
        let b = app.submit_search("gemini").unwrap();
        assert!(b.token > a.token);

        assert!(app.finish_search(b.token, Ok(items(3))));
        assert!(!app.finish_search(a.token, Ok(items(40))));

        assert_eq!(app.gallery.total(), 3);
        assert_eq!(app.query, "gemini");
    }

    #[test]
    fn stale_result_arriving_first_is_also_discarded() {
        let mut app = ready_app();
        let a = app.submit_search("apollo").unwrap();
        let b = app.submit_search("gemini").unwrap();

        assert!(!app.finish_search(a.token, Ok(items(40))));
        assert_eq!(app.search_state, SearchState::InProgress);
        assert!(app.finish_search(b.token, Ok(items(1))));
        assert_eq!(app.gallery.total(), 1);
    }

    #[test]
    fn failed_search_clears_gallery() {
        let mut app = ready_app();
        let t = app.submit_search("nebula").unwrap();
        assert!(app.finish_search(t.token, Err(failed())));

        assert!(app.gallery.is_empty());
        assert_eq!(app.search_state, SearchState::Failed);
        assert!(app.status.starts_with("Search failed"));
        assert!(app.selected_image().is_none());
    }

    #[test]
    fn new_search_resets_window() {
        let mut app = ready_app();
        app.select_view(View::Gallery);
        app.load_more_gallery();
        app.load_more_gallery();
        assert_eq!(app.gallery.visible_count(), 18);

        let t = app.submit_search("saturn").unwrap();
        app.finish_search(t.token, Ok(items(4)));
        assert_eq!(app.gallery.visible_count(), 4);
    }

    #[test]
    fn load_more_only_on_gallery_view() {
        let mut app = ready_app();
        assert_eq!(app.view, View::Apod);
        assert!(!app.load_more_gallery());
        assert_eq!(app.gallery.visible_count(), 6);
    }

    // -- editing -------------------------------------------------------------

    #[test]
    fn editing_builds_and_submits_query() {
        let mut app = ready_app();
        app.start_editing();
        assert_eq!(app.view, View::Gallery);
        for c in "hubblx".chars() {
            app.push_char(c);
        }
        app.pop_char();
        app.push_char('e');

        let ticket = app.submit_input().unwrap();
        assert_eq!(ticket.query, "hubble");
        assert!(app.input.is_empty());
        assert!(!app.editing);
    }

    #[test]
    fn cancel_editing_discards_input() {
        let mut app = ready_app();
        app.start_editing();
        app.push_char('x');
        app.cancel_editing();
        assert!(!app.editing);
        assert!(app.input.is_empty());
    }

    // -- navigation ----------------------------------------------------------

    #[test]
    fn gallery_navigation_clamps_to_visible_window() {
        let mut app = ready_app();
        app.select_view(View::Gallery);

        app.select_last();
        assert_eq!(app.gallery_list.selected(), Some(5));
        app.select_next();
        assert_eq!(app.gallery_list.selected(), Some(5));

        app.load_more_gallery();
        app.select_next();
        assert_eq!(app.gallery_list.selected(), Some(6));
        assert_eq!(app.selected_image().unwrap().title, "Image 6");

        app.select_first();
        app.select_previous();
        assert_eq!(app.gallery_list.selected(), Some(0));
    }

    #[test]
    fn navigation_on_empty_neo_is_noop() {
        let mut app = ready_app();
        app.select_view(View::Neo);
        app.select_next();
        app.select_last();
        assert!(app.neo_list.selected().is_none());
    }

    #[test]
    fn apod_view_scrolls() {
        let mut app = ready_app();
        app.select_next();
        app.select_next();
        assert_eq!(app.apod_scroll, 2);
        app.select_previous();
        assert_eq!(app.apod_scroll, 1);
        app.select_first();
        assert_eq!(app.apod_scroll, 0);
        app.select_previous();
        assert_eq!(app.apod_scroll, 0);
    }
}
