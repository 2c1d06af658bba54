//! Backend response types
//!
//! Everything here is consumed as-is: the core never computes aggregates.

use rvx_common::color::net_to_color_opt;
use rvx_common::Rgb;
use serde::{Deserialize, Deserializer, Serialize};

use crate::highlight::highlight_quotes;
use crate::pagination::PageMeta;

/// One page of the reviews list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewPage {
    pub meta: PageMeta,
    #[serde(default)]
    pub data: Vec<ReviewRow>,
}

/// Single review as returned by `GET /reviews`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRow {
    /// Numeric or string id, normalized to a string
    #[serde(deserialize_with = "string_or_number")]
    pub review_id: String,
    pub app_id: u32,
    #[serde(default)]
    pub app_name: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, alias = "review")]
    pub text: String,
    pub voted_up: bool,
    #[serde(default)]
    pub votes_up: i64,
    #[serde(default)]
    pub votes_funny: i64,
    /// Minutes
    #[serde(default)]
    pub playtime_at_review: Option<i64>,
    /// Minutes
    #[serde(default)]
    pub playtime_forever: Option<i64>,
    /// Epoch seconds
    pub timestamp_created: i64,
    #[serde(default)]
    pub quotes: Vec<Quote>,
}

impl ReviewRow {
    /// Review text as escaped HTML with every quote marked
    pub fn highlighted_text(&self) -> String {
        highlight_quotes(&self.text, &self.quotes)
    }
}

/// Coded excerpt of a review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    #[serde(default)]
    pub codes: Vec<CodeSentiment>,
}

/// Code attached to a quote with its sentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSentiment {
    pub code: u16,
    #[serde(default)]
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    #[default]
    #[serde(other)]
    Missing,
}

/// Per-code sentiment aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRow {
    pub dimension: String,
    pub code: u16,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub positive_count: u64,
    #[serde(default)]
    pub neutral_count: u64,
    #[serde(default)]
    pub negative_count: u64,
    #[serde(default)]
    pub missing_count: u64,
    #[serde(default)]
    pub total: u64,
    /// `(positive - negative) / total`; absent when `total` is zero
    #[serde(default)]
    pub net: Option<f64>,
}

impl AggregateRow {
    /// Heatmap fill for this row (white when `net` is absent)
    pub fn fill(&self) -> Rgb {
        net_to_color_opt(self.net)
    }
}

/// Heatmap aggregate body: `{"rows": [...]}`, or a bare array
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HeatmapPayload {
    Wrapped { rows: Vec<AggregateRow> },
    Bare(Vec<AggregateRow>),
}

impl HeatmapPayload {
    pub fn into_rows(self) -> Vec<AggregateRow> {
        match self {
            HeatmapPayload::Wrapped { rows } | HeatmapPayload::Bare(rows) => rows,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Int(v) => v.to_string(),
        Id::Uint(v) => v.to_string(),
    })
}
