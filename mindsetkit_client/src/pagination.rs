use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::DEFAULT_PAGE_SIZE;

/// A page "may have more after it" when it came back full.
pub fn is_full_page(len: usize, page_size: usize) -> bool {
    page_size > 0 && len >= page_size
}

/// Results accumulated across zero-based pages.
///
/// Page zero replaces whatever was held; later pages are appended.
#[derive(Debug, Clone)]
pub struct PageList<T> {
    items: Vec<T>,
    page: u32,
    page_size: usize,
    should_paginate: bool,
    no_data: bool,
}

impl<T> Default for PageList<T> {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl<T> PageList<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page: 0,
            page_size,
            should_paginate: false,
            no_data: false,
        }
    }

    /// Back to page zero with nothing loaded; used when the query changes.
    pub fn reset(&mut self) {
        self.items.clear();
        self.page = 0;
        self.should_paginate = false;
        self.no_data = false;
    }

    /// Moves to the next page and returns its index. Pagination stays off
    /// until that page arrives.
    pub fn advance(&mut self) -> u32 {
        self.page += 1;
        self.should_paginate = false;
        self.page
    }

    pub fn receive(&mut self, page: u32, batch: Vec<T>) {
        let page_end = self.page_size;
        self.receive_with_page_end(page, batch, page_end);
    }

    /// Like [`receive`](Self::receive) but with an explicit "full page"
    /// length.
    pub fn receive_with_page_end(&mut self, page: u32, batch: Vec<T>, page_end: usize) {
        self.should_paginate = is_full_page(batch.len(), page_end);
        if page == 0 {
            self.no_data = batch.is_empty();
            self.items = batch;
        } else {
            self.items.extend(batch);
        }
        self.page = page;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut Vec<T> {
        &mut self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn should_paginate(&self) -> bool {
        self.should_paginate
    }

    pub fn can_load_more(&self) -> bool {
        self.should_paginate
    }

    /// The first page came back empty.
    pub fn no_data(&self) -> bool {
        self.no_data
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Stamp identifying one list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Monotonic request counter. Only the most recently issued ticket is
/// current, so a slow response to a superseded query can be discarded.
#[derive(Debug, Clone, Default)]
pub struct RequestGeneration {
    latest: Arc<AtomicU64>,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
