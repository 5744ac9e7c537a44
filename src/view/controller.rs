// src/view/controller.rs
//! Per-screen list state: raw items plus the user's search, filter and sort
//! choices. Every change re-runs filter -> sort synchronously and caches the
//! visible rows.

use std::collections::BTreeMap;
use std::fmt::Display;
use tracing::{info, warn};

use crate::pipeline::{
    compute_stats, filter_entities, group_by_stage, sort_entities, CollectionStats,
    FilterOptions, Listable, SortKey, Stage, StatusFilter,
};

/// Handed out by [`CollectionView::begin_fetch`]; only the newest ticket may
/// deliver results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// What to show when there are no visible rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyState {
    /// The last fetch failed and nothing was loaded before it.
    LoadFailed(String),
    /// Nothing exists yet.
    NoItems,
    /// Items exist but the search or filter hides all of them.
    NoMatches,
}

impl EmptyState {
    pub fn title(&self, noun: &str) -> String {
        match self {
            EmptyState::LoadFailed(_) => format!("Failed to load {}", noun),
            EmptyState::NoItems => format!("No {} yet", noun),
            EmptyState::NoMatches => format!("No {} found", noun),
        }
    }

    pub fn hint(&self) -> Option<&str> {
        match self {
            EmptyState::LoadFailed(message) => Some(message),
            EmptyState::NoItems => None,
            EmptyState::NoMatches => Some("Try adjusting your search or filters"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CollectionView<T> {
    items: Vec<T>,
    options: FilterOptions,
    sort_key: SortKey,
    visible: Vec<T>,
    loading: bool,
    error: Option<String>,
    latest_fetch: u64,
}

impl<T: Listable + Clone> Default for CollectionView<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Listable + Clone> CollectionView<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            options: FilterOptions::default(),
            sort_key: SortKey::default(),
            visible: Vec::new(),
            loading: false,
            error: None,
            latest_fetch: 0,
        }
    }

    pub fn with_items(items: Vec<T>) -> Self {
        let mut view = Self::new();
        view.set_items(items);
        view
    }

    pub fn with_options(mut self, options: FilterOptions, sort_key: SortKey) -> Self {
        self.options = options;
        self.sort_key = sort_key;
        self.refresh();
        self
    }

    // ===== Reads =====

    /// Everything fetched, in backend order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Filtered and sorted rows.
    pub fn visible(&self) -> &[T] {
        &self.visible
    }

    pub fn filter_options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_filtered(&self) -> bool {
        !self.options.is_passthrough()
    }

    /// Summary over every fetched item, independent of search and filter.
    pub fn stats(&self) -> CollectionStats {
        compute_stats(&self.items)
    }

    pub fn visible_stats(&self) -> CollectionStats {
        compute_stats(&self.visible)
    }

    /// Visible rows bucketed into pipeline columns.
    pub fn pipeline(&self) -> BTreeMap<Stage, Vec<T>> {
        group_by_stage(&self.visible)
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.visible.is_empty() {
            return None;
        }
        if let (Some(error), true) = (&self.error, self.items.is_empty()) {
            return Some(EmptyState::LoadFailed(error.clone()));
        }
        if self.items.is_empty() {
            Some(EmptyState::NoItems)
        } else {
            Some(EmptyState::NoMatches)
        }
    }

    // ===== Changes =====

    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.refresh();
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.options.search_query = query.into();
        self.refresh();
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.options.status_filter = filter;
        self.refresh();
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort_key = key;
        self.refresh();
    }

    /// Apply `update` to the first item matching `predicate`.
    pub fn update_item<P, F>(&mut self, predicate: P, update: F) -> bool
    where
        P: Fn(&T) -> bool,
        F: FnOnce(&mut T),
    {
        match self.items.iter_mut().find(|item| predicate(item)) {
            Some(item) => {
                update(item);
                self.refresh();
                true
            }
            None => false,
        }
    }

    // ===== Fetch lifecycle =====

    /// Start a fetch. Any ticket issued earlier becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.latest_fetch += 1;
        self.loading = true;
        FetchTicket(self.latest_fetch)
    }

    /// Deliver a fetch result. Returns `false` (and changes nothing) when a
    /// newer fetch has started since `ticket` was issued.
    pub fn complete_fetch<E: Display>(&mut self, ticket: FetchTicket, result: Result<Vec<T>, E>) -> bool {
        if ticket.0 != self.latest_fetch {
            warn!(
                "Discarding stale fetch #{} (latest is #{})",
                ticket.0, self.latest_fetch
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(items) => {
                info!("Fetch #{} delivered {} items", ticket.0, items.len());
                self.error = None;
                self.set_items(items);
            }
            Err(e) => {
                // keep whatever was on screen
                self.error = Some(e.to_string());
            }
        }
        true
    }

    fn refresh(&mut self) {
        let filtered = filter_entities(&self.items, &self.options);
        self.visible = sort_entities(&filtered, self.sort_key);
    }
}
