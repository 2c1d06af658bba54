//! Observable facet store
//!
//! Wraps one side's [`FilterState`] in a `tokio::sync::watch` channel so that
//! fetchers can react to edits. This is the layer that enforces the paging
//! rule: any edit that changes a facet other than `page` resets `page` to 1
//! before subscribers see the new state.

use rvx_common::{Catalog, Dimension};
use std::sync::Arc;
use tokio::sync::watch;

use crate::filters::{Bound, FilterState, Metric, Polarity, SortOrder};

/// Result of an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditOutcome {
    /// Anything changed (subscribers were notified)
    pub changed: bool,
    /// A non-paging facet changed (page was reset to 1)
    pub facets_changed: bool,
}

/// Owned, observable filter state of one side
pub struct FacetStore {
    tx: watch::Sender<FilterState>,
    catalog: Arc<Catalog>,
}

impl FacetStore {
    pub fn new(catalog: Arc<Catalog>, initial: FilterState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx, catalog }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> FilterState {
        self.tx.borrow().clone()
    }

    /// Current page (1-based)
    pub fn page(&self) -> u32 {
        self.tx.borrow().page
    }

    /// Receive every committed edit
    pub fn subscribe(&self) -> watch::Receiver<FilterState> {
        self.tx.subscribe()
    }

    /// Apply a pure mutation and publish the result
    ///
    /// Subscribers are only notified when the state actually changed.
    pub fn edit<F>(&self, mutate: F) -> EditOutcome
    where
        F: FnOnce(&mut FilterState, &Catalog),
    {
        let catalog = Arc::clone(&self.catalog);
        let mut facets_changed = false;
        let changed = self.tx.send_if_modified(|state| {
            let before = state.clone();
            mutate(state, &catalog);
            if !state.same_facets(&before) {
                facets_changed = true;
                state.page = 1;
            }
            *state != before
        });
        EditOutcome {
            changed,
            facets_changed,
        }
    }

    /// Change paging only; never resets anything
    pub fn set_page(&self, page: u32) -> bool {
        let page = page.max(1);
        self.tx.send_if_modified(|state| {
            if state.page == page {
                false
            } else {
                state.page = page;
                true
            }
        })
    }

    pub fn toggle_genre(&self, genre: &str) -> EditOutcome {
        self.edit(|state, catalog| {
            state.toggle_genre(catalog, genre);
        })
    }

    pub fn toggle_game(&self, game: u32) -> EditOutcome {
        self.edit(|state, _| {
            state.toggle_game(game);
        })
    }

    pub fn toggle_code(&self, dimension: Dimension, code: u16) -> EditOutcome {
        self.edit(|state, _| {
            state.toggle_code(dimension, code);
        })
    }

    pub fn toggle_language(&self, language: &str) -> EditOutcome {
        self.edit(|state, _| {
            state.toggle_language(language);
        })
    }

    pub fn set_search_text(&self, text: &str) -> EditOutcome {
        self.edit(|state, _| state.set_search_text(text))
    }

    pub fn set_polarity(&self, polarity: Polarity) -> EditOutcome {
        self.edit(|state, _| state.set_polarity(polarity))
    }

    pub fn set_sort(&self, sort: SortOrder) -> EditOutcome {
        self.edit(|state, _| state.set_sort(sort))
    }

    pub fn set_date_range(&self, from: Option<&str>, to: Option<&str>) -> EditOutcome {
        self.edit(|state, _| state.set_date_range(from, to))
    }

    pub fn set_range(&self, metric: Metric, bound: Bound, value: Option<i64>) -> EditOutcome {
        self.edit(|state, _| state.set_range(metric, bound, value))
    }

    pub fn set_range_input(&self, metric: Metric, bound: Bound, input: &str) -> EditOutcome {
        self.edit(|state, _| state.set_range_input(metric, bound, input))
    }

    pub fn clear_facets(&self) -> EditOutcome {
        self.edit(|state, _| state.clear_facets())
    }
}
