//! Review list fetch orchestrator
//!
//! A [`ReviewFeed`] owns the result container of one side's reviews list. It
//! is the only writer of its [`FeedView`]; consumers observe it through a
//! `watch` receiver.
//!
//! Requests are tagged with a monotonically increasing generation. A response
//! is committed only if no newer request was issued in the meantime, so a slow
//! earlier response can never overwrite a fresher one.

use chrono::FixedOffset;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::client::ReviewBackend;
use crate::debounce::{AutoReload, Debouncer};
use crate::error::ErrorPayload;
use crate::models::ReviewRow;
use crate::pagination::PageMeta;
use crate::query::{compile_reviews, compile_reviews_in, QueryParams};
use crate::store::FacetStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
}

/// Observable state of a feed
#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedView {
    pub phase: LoadPhase,
    pub rows: Vec<ReviewRow>,
    /// `None` until the first successful load
    pub meta: Option<PageMeta>,
    /// Failure of the latest request; previous rows are kept
    pub error: Option<ErrorPayload>,
    /// Generation of the latest issued request
    pub generation: u64,
}

impl FeedView {
    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }
}

/// Outcome of one [`ReviewFeed::load`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Committed,
    Failed,
    /// A newer request was issued before this one completed
    Stale,
}

/// Reviews list of one side
pub struct ReviewFeed {
    label: String,
    backend: Arc<dyn ReviewBackend>,
    filters: Arc<FacetStore>,
    view: watch::Sender<FeedView>,
    time_zone: Option<FixedOffset>,
}

impl ReviewFeed {
    pub fn new(
        label: impl Into<String>,
        backend: Arc<dyn ReviewBackend>,
        filters: Arc<FacetStore>,
    ) -> Self {
        let (view, _rx) = watch::channel(FeedView::default());
        Self {
            label: label.into(),
            backend,
            filters,
            view,
            time_zone: None,
        }
    }

    /// Interpret date facets in a fixed offset instead of local time
    pub fn with_time_zone(mut self, tz: FixedOffset) -> Self {
        self.time_zone = Some(tz);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn filters(&self) -> &Arc<FacetStore> {
        &self.filters
    }

    /// Copy of the current view
    pub fn view(&self) -> FeedView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedView> {
        self.view.subscribe()
    }

    /// Query for the current filter state
    pub fn compile(&self) -> QueryParams {
        let state = self.filters.snapshot();
        match &self.time_zone {
            Some(tz) => compile_reviews_in(&state, tz),
            None => compile_reviews(&state),
        }
    }

    /// Fetch the current page and replace rows and meta
    pub async fn load(&self) -> LoadOutcome {
        let params = self.compile();

        let mut generation = 0;
        self.view.send_modify(|view| {
            view.generation += 1;
            view.phase = LoadPhase::Loading;
            generation = view.generation;
        });
        debug!(side = %self.label, generation, "Requesting reviews");

        let result = self.backend.fetch_reviews(&params).await;

        let mut outcome = LoadOutcome::Stale;
        self.view.send_if_modified(|view| {
            if view.generation != generation {
                return false;
            }
            view.phase = LoadPhase::Idle;
            match result {
                Ok(page) => {
                    view.rows = page.data;
                    view.meta = Some(page.meta);
                    view.error = None;
                    outcome = LoadOutcome::Committed;
                }
                Err(err) => {
                    warn!(side = %self.label, generation, error = %err, "Reviews request failed");
                    view.error = Some(err.into());
                    outcome = LoadOutcome::Failed;
                }
            }
            true
        });

        match outcome {
            LoadOutcome::Committed => {
                let view = self.view.borrow();
                info!(
                    side = %self.label,
                    generation,
                    rows = view.rows.len(),
                    total = view.meta.map(|m| m.total).unwrap_or(0),
                    "Reviews loaded"
                );
            }
            LoadOutcome::Stale => {
                debug!(side = %self.label, generation, "Discarding stale reviews response");
            }
            LoadOutcome::Failed => {}
        }
        outcome
    }

    /// Advance one page; `None` when already on the last page
    pub async fn next_page(&self) -> Option<LoadOutcome> {
        let meta = self.view.borrow().meta?;
        let page = self.filters.page();
        if page >= meta.total_pages {
            return None;
        }
        self.filters.set_page(page + 1);
        Some(self.load().await)
    }

    /// Go back one page; `None` when already on the first page
    pub async fn prev_page(&self) -> Option<LoadOutcome> {
        let page = self.filters.page();
        if page <= 1 {
            return None;
        }
        self.filters.set_page(page - 1);
        Some(self.load().await)
    }

    /// Reload after `delay` of quiet following any non-paging facet edit
    ///
    /// Paging edits are ignored here: [`ReviewFeed::next_page`] and
    /// [`ReviewFeed::prev_page`] load immediately.
    pub fn spawn_auto_reload(self: &Arc<Self>, delay: Duration) -> AutoReload {
        let mut rx = self.filters.subscribe();
        let mut last = rx.borrow_and_update().clone();
        let feed = Arc::clone(self);
        let debouncer = Debouncer::new(delay);

        let handle = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let current = rx.borrow_and_update().clone();
                let facets_changed = !current.same_facets(&last);
                last = current;
                if !facets_changed {
                    continue;
                }
                debug!(side = %feed.label, "Facets changed, scheduling reload");
                let feed = Arc::clone(&feed);
                debouncer.schedule(move || async move {
                    feed.load().await;
                });
            }
        });
        AutoReload::new(handle)
    }
}
