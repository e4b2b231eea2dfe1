//! Client-side pagination over one image search result set.

use crate::source::GalleryItem;

/// Items revealed per page.
pub const PAGE_SIZE: usize = 6;

/// Holds the full result set of the latest search and how much of it is
/// currently shown.
///
/// Invariants: `visible_count <= items.len()` and
/// `visible_count <= page_size`.  The window only grows until a new set is
/// installed.
#[derive(Debug, Clone)]
pub struct GalleryPaginator {
    items: Vec<GalleryItem>,
    page_size: usize,
    visible_count: usize,
}

impl Default for GalleryPaginator {
    fn default() -> Self {
        Self::new()
    }
}

impl GalleryPaginator {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            page_size: PAGE_SIZE,
            visible_count: 0,
        }
    }

    /// Replace the result set and reset the window to the first page.
    pub fn install(&mut self, items: Vec<GalleryItem>) {
        self.items = items;
        self.page_size = PAGE_SIZE;
        self.visible_count = PAGE_SIZE.min(self.items.len());
    }

    pub fn clear(&mut self) {
        self.install(Vec::new());
    }

    /// Reveal the next page.  Does nothing once every item is visible.
    pub fn load_more(&mut self) {
        if !self.has_more() {
            return;
        }
        self.page_size += PAGE_SIZE;
        self.visible_count = self.page_size.min(self.items.len());
    }

    pub fn visible_items(&self) -> &[GalleryItem] {
        &self.items[..self.visible_count]
    }

    pub fn visible_count(&self) -> usize {
        self.visible_count
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn has_more(&self) -> bool {
        self.visible_count < self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
