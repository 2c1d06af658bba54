//! # RVX Common Library
//!
//! Shared code for the review explorer crates including:
//! - Error type
//! - Configuration loading
//! - Calendar date / epoch conversion
//! - Taxonomy codebooks (aesthetics, features, pain points)
//! - Genre → game catalog
//! - Net-sentiment color mapping

pub mod catalog;
pub mod color;
pub mod config;
pub mod error;
pub mod taxonomy;
pub mod time;

pub use catalog::Catalog;
pub use color::{net_to_color, Rgb};
pub use error::{Error, Result};
pub use taxonomy::{Dimension, TaxonomyEntry};
