//! Two-sided comparison controller
//!
//! Each side owns a [`FacetStore`]. A reload issues seven aggregate requests
//! per side, fourteen in total, all in flight concurrently and awaited
//! jointly. Results are committed only when every request succeeded; on any
//! failure the previous snapshots stay in place and the shared error is set.
//!
//! Each side's snapshot is derived from that side's filters alone, so editing
//! one side never changes what the other side displays.

use futures::future::{try_join, try_join_all};
use rvx_common::config::{CodeLevel, ExplorerConfig};
use rvx_common::Dimension;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::client::{AggregateEndpoint, ReviewBackend};
use crate::debounce::{AutoReload, Debouncer};
use crate::error::{ErrorPayload, FetchError};
use crate::feed::{LoadOutcome, LoadPhase};
use crate::heatmap::HeatmapGrid;
use crate::models::{AggregateRow, HeatmapPayload};
use crate::query::{compile_comparison, heatmap_params, top_codes_params, QueryParams};
use crate::store::FacetStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    pub const fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Heatmap rows of one side, per dimension
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Heatmaps {
    pub aesthetics: Vec<AggregateRow>,
    pub features: Vec<AggregateRow>,
    pub pain: Vec<AggregateRow>,
}

impl Heatmaps {
    pub fn rows(&self, dimension: Dimension) -> &[AggregateRow] {
        match dimension {
            Dimension::Aesthetic => &self.aesthetics,
            Dimension::Feature => &self.features,
            Dimension::Pain => &self.pain,
        }
    }

    /// Grid ready for rendering
    pub fn grid(&self, dimension: Dimension) -> HeatmapGrid {
        HeatmapGrid::build(dimension, self.rows(dimension))
    }
}

/// The seven aggregate blocks of one side
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SideSnapshot {
    pub kpis: Value,
    pub sentiments: Value,
    pub timeseries: Value,
    pub top_codes: Value,
    pub heatmaps: Heatmaps,
}

/// Observable state of the comparison
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComparisonView {
    pub phase: LoadPhase,
    /// `None` until the first successful cycle
    pub left: Option<SideSnapshot>,
    pub right: Option<SideSnapshot>,
    /// Failure of the latest cycle
    pub error: Option<ErrorPayload>,
    /// Generation of the latest issued cycle
    pub generation: u64,
}

impl ComparisonView {
    pub fn side(&self, side: Side) -> Option<&SideSnapshot> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }
}

/// Endpoint-specific parameters of the top-codes block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonOptions {
    pub top_codes_level: CodeLevel,
    pub top_codes_limit: u32,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self::from(&ExplorerConfig::default())
    }
}

impl From<&ExplorerConfig> for ComparisonOptions {
    fn from(config: &ExplorerConfig) -> Self {
        Self {
            top_codes_level: config.top_codes_level,
            top_codes_limit: config.top_codes_limit,
        }
    }
}

pub struct ComparisonController {
    backend: Arc<dyn ReviewBackend>,
    left: Arc<FacetStore>,
    right: Arc<FacetStore>,
    options: ComparisonOptions,
    view: watch::Sender<ComparisonView>,
}

impl ComparisonController {
    pub fn new(
        backend: Arc<dyn ReviewBackend>,
        left: Arc<FacetStore>,
        right: Arc<FacetStore>,
        options: ComparisonOptions,
    ) -> Self {
        let (view, _rx) = watch::channel(ComparisonView::default());
        Self {
            backend,
            left,
            right,
            options,
            view,
        }
    }

    pub fn filters(&self, side: Side) -> &Arc<FacetStore> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn view(&self) -> ComparisonView {
        self.view.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ComparisonView> {
        self.view.subscribe()
    }

    /// Fetch all fourteen blocks and commit them together
    pub async fn load(&self) -> LoadOutcome {
        let left_params = compile_comparison(&self.left.snapshot());
        let right_params = compile_comparison(&self.right.snapshot());

        let mut generation = 0;
        self.view.send_modify(|view| {
            view.generation += 1;
            view.phase = LoadPhase::Loading;
            generation = view.generation;
        });
        debug!(generation, "Requesting comparison blocks");

        let result = try_join(
            self.fetch_side(Side::Left, &left_params),
            self.fetch_side(Side::Right, &right_params),
        )
        .await;

        let mut outcome = LoadOutcome::Stale;
        self.view.send_if_modified(|view| {
            if view.generation != generation {
                return false;
            }
            view.phase = LoadPhase::Idle;
            match result {
                Ok((left, right)) => {
                    view.left = Some(left);
                    view.right = Some(right);
                    view.error = None;
                    outcome = LoadOutcome::Committed;
                }
                Err(err) => {
                    warn!(generation, error = %err, "Comparison cycle failed, keeping previous results");
                    view.error = Some(err.into());
                    outcome = LoadOutcome::Failed;
                }
            }
            true
        });

        match outcome {
            LoadOutcome::Committed => info!(generation, "Comparison loaded"),
            LoadOutcome::Stale => debug!(generation, "Discarding stale comparison cycle"),
            LoadOutcome::Failed => {}
        }
        outcome
    }

    async fn fetch_side(&self, side: Side, base: &QueryParams) -> Result<SideSnapshot, FetchError> {
        let top_codes = top_codes_params(
            base,
            self.options.top_codes_level,
            self.options.top_codes_limit,
        );
        let backend = &self.backend;
        debug!(side = %side, "Requesting side blocks");

        let heatmaps = try_join_all(
            Dimension::ALL
                .into_iter()
                .map(|dimension| self.fetch_heatmap(heatmap_params(base, dimension))),
        );

        let (kpis, sentiments, timeseries, top_codes, heatmaps) = tokio::try_join!(
            backend.fetch_aggregate(AggregateEndpoint::Kpis, base),
            backend.fetch_aggregate(AggregateEndpoint::Sentiments, base),
            backend.fetch_aggregate(AggregateEndpoint::Timeseries, base),
            backend.fetch_aggregate(AggregateEndpoint::TopCodes, &top_codes),
            heatmaps,
        )?;

        // Same order as Dimension::ALL
        let mut rows = heatmaps.into_iter();
        let heatmaps = Heatmaps {
            aesthetics: rows.next().unwrap_or_default(),
            features: rows.next().unwrap_or_default(),
            pain: rows.next().unwrap_or_default(),
        };

        Ok(SideSnapshot {
            kpis,
            sentiments,
            timeseries,
            top_codes,
            heatmaps,
        })
    }

    async fn fetch_heatmap(&self, params: QueryParams) -> Result<Vec<AggregateRow>, FetchError> {
        let body = self
            .backend
            .fetch_aggregate(AggregateEndpoint::HeatmapCodes, &params)
            .await?;
        let payload: HeatmapPayload =
            serde_json::from_value(body).map_err(|e| FetchError::Parse(e.to_string()))?;
        Ok(payload.into_rows())
    }

    /// Reload both sides after `delay` of quiet following a non-paging edit
    /// on either side
    pub fn spawn_auto_reload(self: &Arc<Self>, delay: Duration) -> AutoReload {
        let mut left_rx = self.left.subscribe();
        let mut right_rx = self.right.subscribe();
        let mut last_left = left_rx.borrow_and_update().clone();
        let mut last_right = right_rx.borrow_and_update().clone();
        let controller = Arc::clone(self);
        let debouncer = Debouncer::new(delay);

        let handle = tokio::spawn(async move {
            loop {
                let side = tokio::select! {
                    changed = left_rx.changed() => match changed {
                        Ok(()) => Side::Left,
                        Err(_) => break,
                    },
                    changed = right_rx.changed() => match changed {
                        Ok(()) => Side::Right,
                        Err(_) => break,
                    },
                };

                let facets_changed = match side {
                    Side::Left => {
                        let current = left_rx.borrow_and_update().clone();
                        let changed = !current.same_facets(&last_left);
                        last_left = current;
                        changed
                    }
                    Side::Right => {
                        let current = right_rx.borrow_and_update().clone();
                        let changed = !current.same_facets(&last_right);
                        last_right = current;
                        changed
                    }
                };
                if !facets_changed {
                    continue;
                }

                debug!(side = %side, "Facets changed, scheduling comparison reload");
                let controller = Arc::clone(&controller);
                debouncer.schedule(move || async move {
                    controller.load().await;
                });
            }
        });
        AutoReload::new(handle)
    }
}
