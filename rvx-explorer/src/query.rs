//! Query compiler
//!
//! Pure mapping from [`FilterState`] to the flat key → primitive records the
//! backend expects. Facets at their "no constraint" value are omitted; paging,
//! polarity and sort are always sent because the backend defaults may differ
//! from ours.

use chrono::{Local, TimeZone};
use rvx_common::config::CodeLevel;
use rvx_common::time::{date_input_end_epoch, date_input_start_epoch};
use rvx_common::Dimension;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::filters::{Bound, FilterState, Metric};

/// Single query-string value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    Int(i64),
    Text(String),
}

impl QueryValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::Text(s) => Some(s),
            QueryValue::Int(_) => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            QueryValue::Int(v) => Some(*v),
            QueryValue::Text(_) => None,
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Int(v) => write!(f, "{}", v),
            QueryValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for QueryValue {
    fn from(v: i64) -> Self {
        QueryValue::Int(v)
    }
}

impl From<u32> for QueryValue {
    fn from(v: u32) -> Self {
        QueryValue::Int(i64::from(v))
    }
}

impl From<String> for QueryValue {
    fn from(v: String) -> Self {
        QueryValue::Text(v)
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::Text(v.to_string())
    }
}

/// Flat query-parameter record, serializable as a URL query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct QueryParams(BTreeMap<String, QueryValue>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Compile the paginated reviews query using the local time zone
pub fn compile_reviews(state: &FilterState) -> QueryParams {
    compile_reviews_in(state, &Local)
}

/// Compile the paginated reviews query, interpreting dates in `tz`
pub fn compile_reviews_in<Tz: TimeZone>(state: &FilterState, tz: &Tz) -> QueryParams {
    let mut params = QueryParams::new();

    params.insert("page", state.page.max(1));
    params.insert("page_size", state.page_size.max(1));
    params.insert("recommended", state.polarity.recommended_param());
    params.insert("sort", state.sort.as_str());

    if let Some(q) = state.search_query() {
        params.insert("q", q);
    }

    if !state.selected_games.is_empty() {
        params.insert("app_ids", join_csv(&state.selected_games));
    }

    if !state.languages.is_empty() {
        params.insert("languages", join_csv(&state.languages));
    }

    if let Some(from) = state
        .date_from
        .as_deref()
        .and_then(|input| date_input_start_epoch(input, tz))
    {
        params.insert("date_from", from);
    }
    if let Some(to) = state
        .date_to
        .as_deref()
        .and_then(|input| date_input_end_epoch(input, tz))
    {
        params.insert("date_to", to);
    }

    for metric in Metric::ALL {
        let range = state.ranges.get(metric);
        for bound in [Bound::Min, Bound::Max] {
            if let Some(value) = range.get(bound) {
                params.insert(format!("{}_{}", bound.prefix(), metric.param_stem()), value);
            }
        }
    }

    for dimension in Dimension::ALL {
        let codes = state.selected_codes.get(dimension);
        if !codes.is_empty() {
            params.insert(dimension.codes_param(), join_csv(codes));
        }
    }

    params
}

/// Compile the shared parameters of the comparative aggregate endpoints
///
/// Only games, polarity and languages reach these endpoints.
pub fn compile_comparison(state: &FilterState) -> QueryParams {
    let mut params = QueryParams::new();
    params.insert("polarity", state.polarity.as_str());

    if !state.selected_games.is_empty() {
        params.insert("app_ids", join_csv(&state.selected_games));
    }
    if !state.languages.is_empty() {
        params.insert("languages", join_csv(&state.languages));
    }

    params
}

/// Parameters of the top-codes aggregate
pub fn top_codes_params(base: &QueryParams, level: CodeLevel, limit: u32) -> QueryParams {
    base.clone()
        .with("level", level.as_str())
        .with("limit", limit.max(1))
}

/// Parameters of one heatmap aggregate
pub fn heatmap_params(base: &QueryParams, dimension: Dimension) -> QueryParams {
    base.clone().with("dimension", dimension.as_str())
}

fn join_csv<T: fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::Polarity;
    use chrono::Utc;
    use rvx_common::Catalog;

    #[test]
    fn test_default_state_sends_only_always_present_keys() {
        let params = compile_reviews_in(&FilterState::default(), &Utc);
        let keys: Vec<&str> = params.keys().collect();
        assert_eq!(keys, vec!["page", "page_size", "recommended", "sort"]);
        assert_eq!(params.get("recommended").and_then(QueryValue::as_str), Some("all"));
        assert_eq!(params.get("page").and_then(QueryValue::as_int), Some(1));
    }

    #[test]
    fn test_great_graphics_scenario() {
        let mut state = FilterState::default();
        state.set_search_text("great graphics");
        state.set_polarity(Polarity::Recommended);
        state.set_date_range(Some("2024-01-01"), Some("2024-01-31"));

        let params = compile_reviews_in(&state, &Utc);
        assert_eq!(params.get("q").and_then(QueryValue::as_str), Some("great graphics"));
        assert_eq!(params.get("recommended").and_then(QueryValue::as_str), Some("true"));
        assert_eq!(params.get("date_from").and_then(QueryValue::as_int), Some(1704067200));
        // 2024-01-31T23:59:59.999 floored to the second
        assert_eq!(params.get("date_to").and_then(QueryValue::as_int), Some(1706745599));

        let keys: Vec<&str> = params.keys().collect();
        assert_eq!(
            keys,
            vec!["date_from", "date_to", "page", "page_size", "q", "recommended", "sort"]
        );

        let compare = compile_comparison(&state);
        assert_eq!(compare.get("polarity").and_then(QueryValue::as_str), Some("recommended"));
        assert!(!compare.contains_key("app_ids"));
    }

    #[test]
    fn test_dates_follow_time_zone() {
        let mut state = FilterState::default();
        state.set_date_range(Some("2024-01-01"), None);
        let plus_two = chrono::FixedOffset::east_opt(2 * 3600).unwrap();

        let params = compile_reviews_in(&state, &plus_two);
        assert_eq!(
            params.get("date_from").and_then(QueryValue::as_int),
            Some(1704067200 - 2 * 3600)
        );
        assert!(!params.contains_key("date_to"));
    }

    #[test]
    fn test_blank_search_is_omitted() {
        let mut state = FilterState::default();
        state.set_search_text("   ");
        assert!(!compile_reviews_in(&state, &Utc).contains_key("q"));
    }

    #[test]
    fn test_array_facets_are_csv() {
        let catalog = Catalog::new([("Puzzle", vec![30, 4])]);
        let mut state = FilterState::default();
        state.toggle_genre(&catalog, "Puzzle");
        state.toggle_code(Dimension::Feature, 801);
        state.toggle_code(Dimension::Feature, 21);
        state.toggle_code(Dimension::Aesthetic, 3);

        let params = compile_reviews_in(&state, &Utc);
        assert_eq!(params.get("app_ids").unwrap().to_string(), "4,30");
        assert_eq!(params.get("feature_codes").unwrap().to_string(), "21,801");
        assert_eq!(params.get("aesthetic_codes").unwrap().to_string(), "3");
        assert!(!params.contains_key("pain_codes"));
    }

    #[test]
    fn test_ranges_only_emit_set_bounds() {
        let mut state = FilterState::default();
        state.set_range(Metric::VotesFunny, Bound::Max, Some(0));
        state.set_range(Metric::PlaytimeAtReview, Bound::Min, Some(120));

        let params = compile_reviews_in(&state, &Utc);
        assert_eq!(params.get("max_votes_funny").and_then(QueryValue::as_int), Some(0));
        assert_eq!(params.get("min_playtime_at_review").and_then(QueryValue::as_int), Some(120));
        assert!(!params.contains_key("min_votes_funny"));
        assert!(!params.contains_key("max_playtime_at_review"));
        assert!(!params.contains_key("min_votes_up"));
    }

    #[test]
    fn test_malformed_dates_are_omitted() {
        let mut state = FilterState::default();
        state.set_date_range(Some("2024-13-45"), Some("yesterday"));
        let params = compile_reviews_in(&state, &Utc);
        assert!(!params.contains_key("date_from"));
        assert!(!params.contains_key("date_to"));
    }

    #[test]
    fn test_comparison_params() {
        let mut state = FilterState::default();
        state.set_polarity(Polarity::NotRecommended);
        state.toggle_language("English");
        state.toggle_game(10);
        state.set_search_text("ignored here");

        let params = compile_comparison(&state);
        assert_eq!(params.get("polarity").unwrap().to_string(), "not_recommended");
        assert_eq!(params.get("languages").unwrap().to_string(), "english");
        assert_eq!(params.get("app_ids").unwrap().to_string(), "10");
        assert!(!params.contains_key("q"));

        let heat = heatmap_params(&params, Dimension::Pain);
        assert_eq!(heat.get("dimension").unwrap().to_string(), "pain");
        let top = top_codes_params(&params, CodeLevel::Child, 5);
        assert_eq!(top.get("level").unwrap().to_string(), "child");
        assert_eq!(top.get("limit").and_then(QueryValue::as_int), Some(5));
    }

    #[test]
    fn test_params_serialize_flat() {
        let params = QueryParams::new().with("page", 2u32).with("q", "a b");
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, serde_json::json!({"page": 2, "q": "a b"}));
    }
}
