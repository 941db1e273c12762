use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::database::models::Secret;
use crate::query::types::{
    FilterState, PaginationMeta, SortKey, SortOrder, TypeFilter, DEFAULT_PER_PAGE,
};

/// Snapshot of everything a secrets listing needs to render.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState {
    pub filters: FilterState,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
    pub secrets: Vec<Secret>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            filters: FilterState::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            total: 0,
            total_pages: 0,
            secrets: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

/// Client-side state store for a secrets listing session.
///
/// All state lives behind one mutex, so every mutator is a single atomic
/// transition. A `watch` channel carries a revision counter; each transition
/// bumps it exactly once, which is what UIs subscribe to.
///
/// Changing search, type or favorite resets the page to 1; changing the sort
/// keeps it.
pub struct SecretsStore {
    state: Mutex<StoreState>,
    revision_tx: watch::Sender<u64>,
}

impl Default for SecretsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretsStore {
    pub fn new() -> Self {
        let (revision_tx, _) = watch::channel(0);
        Self {
            state: Mutex::new(StoreState::default()),
            revision_tx,
        }
    }

    /// Store starting at a non-default page size.
    pub fn with_per_page(per_page: i64) -> Self {
        let store = Self::new();
        {
            let mut state = store.lock();
            state.per_page = per_page.max(1);
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> StoreState {
        self.lock().clone()
    }

    /// Subscribe to state transitions. The value is a revision counter;
    /// consumers re-read `snapshot()` when it changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision_tx.borrow()
    }

    fn transition(&self, mutate: impl FnOnce(&mut StoreState)) {
        {
            let mut state = self.lock();
            mutate(&mut state);
        }
        self.revision_tx.send_modify(|rev| *rev += 1);
    }

    pub fn set_search(&self, search: impl Into<String>) {
        let search = search.into();
        self.transition(|s| {
            s.filters.search = search;
            s.page = 1;
        });
    }

    pub fn set_type_filter(&self, type_filter: TypeFilter) {
        self.transition(|s| {
            s.filters.type_filter = type_filter;
            s.page = 1;
        });
    }

    pub fn set_favorite(&self, favorite: Option<bool>) {
        self.transition(|s| {
            s.filters.favorite = favorite;
            s.page = 1;
        });
    }

    /// Sort changes keep the current page position.
    pub fn set_order_by(&self, order_by: SortKey) {
        self.transition(|s| s.filters.order_by = order_by);
    }

    pub fn set_order(&self, order: SortOrder) {
        self.transition(|s| s.filters.order = order);
    }

    /// Overwrites unconditionally (floored at 1); range clamping against
    /// `total_pages` is the orchestrator's job.
    pub fn set_page(&self, page: i64) {
        self.transition(|s| s.page = page.max(1));
    }

    /// Restore filters and pagination to their defaults in one transition.
    /// The fetched slice is left for the next fetch to replace.
    pub fn reset_filters(&self) {
        self.transition(|s| {
            s.filters = FilterState::default();
            s.page = 1;
            s.per_page = DEFAULT_PER_PAGE;
            s.total = 0;
            s.total_pages = 0;
        });
    }

    pub fn set_loading(&self, loading: bool) {
        self.transition(|s| s.loading = loading);
    }

    /// Replace the data slice with a fetched page.
    pub fn apply_page(&self, secrets: Vec<Secret>, meta: PaginationMeta) {
        self.transition(|s| {
            s.secrets = secrets;
            s.total = meta.total;
            s.total_pages = meta.total_pages;
            s.loading = false;
            s.error = None;
        });
    }

    /// Record a failed fetch. The previous data slice stays visible.
    pub fn apply_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.transition(|s| {
            s.error = Some(message);
            s.loading = false;
        });
    }
}
