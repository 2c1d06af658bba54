//! rvx-explorer library - faceted review filtering engine
//!
//! Owns the per-side filter state, compiles it into backend queries and keeps
//! the fetched results current:
//! - [`store::FacetStore`]: observable filter state with the page-reset rule
//! - [`query`]: filter state → flat query parameters
//! - [`feed::ReviewFeed`]: paginated reviews list with debounced reload
//! - [`compare::ComparisonController`]: two sides, fourteen aggregate blocks
//! - [`heatmap::HeatmapGrid`]: parent/child grid for taxonomy heatmaps
//! - [`highlight`]: quote marking in review text

pub mod client;
pub mod compare;
pub mod debounce;
pub mod error;
pub mod feed;
pub mod filters;
pub mod heatmap;
pub mod highlight;
pub mod models;
pub mod pagination;
pub mod query;
pub mod store;

pub use client::{AggregateEndpoint, HttpBackend, ReviewBackend};
pub use compare::{ComparisonController, ComparisonOptions, ComparisonView, Side, SideSnapshot};
pub use error::{ErrorPayload, FetchError};
pub use feed::{FeedView, LoadOutcome, LoadPhase, ReviewFeed};
pub use filters::{Bound, FilterState, Metric, Polarity, SortOrder};
pub use heatmap::HeatmapGrid;
pub use query::{QueryParams, QueryValue};
pub use store::FacetStore;
