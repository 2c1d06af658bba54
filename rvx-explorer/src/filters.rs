//! Facet selection state
//!
//! [`FilterState`] is a plain data container holding one side's current
//! selection across every facet. All operations here are synchronous, pure
//! mutations. Resetting `page` after a facet edit is the job of the observing
//! layer ([`crate::store::FacetStore`]), not of this type.

use rvx_common::{Catalog, Dimension};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::pagination::DEFAULT_PAGE_SIZE;

/// Recommendation polarity facet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    #[default]
    Any,
    Recommended,
    NotRecommended,
}

impl Polarity {
    /// Value of the `polarity` parameter on the comparative endpoints
    pub const fn as_str(self) -> &'static str {
        match self {
            Polarity::Any => "any",
            Polarity::Recommended => "recommended",
            Polarity::NotRecommended => "not_recommended",
        }
    }

    /// Value of the `recommended` parameter on the reviews query
    pub const fn recommended_param(self) -> &'static str {
        match self {
            Polarity::Any => "all",
            Polarity::Recommended => "true",
            Polarity::NotRecommended => "false",
        }
    }

    /// Parse from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" | "all" | "" => Some(Polarity::Any),
            "recommended" | "positive" | "true" => Some(Polarity::Recommended),
            "not_recommended" | "not-recommended" | "negative" | "false" => {
                Some(Polarity::NotRecommended)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Review ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" | "new" | "desc" => Some(SortOrder::Newest),
            "oldest" | "old" | "asc" => Some(SortOrder::Oldest),
            _ => None,
        }
    }
}

/// Engagement metric with an optional numeric range
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    VotesUp,
    VotesFunny,
    PlaytimeAtReview,
    PlaytimeForever,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::VotesUp,
        Metric::VotesFunny,
        Metric::PlaytimeAtReview,
        Metric::PlaytimeForever,
    ];

    /// Parameter stem; the query carries `min_<stem>` / `max_<stem>`
    pub const fn param_stem(self) -> &'static str {
        match self {
            Metric::VotesUp => "votes_up",
            Metric::VotesFunny => "votes_funny",
            Metric::PlaytimeAtReview => "playtime_at_review",
            Metric::PlaytimeForever => "playtime_forever",
        }
    }

    /// Parse a parameter stem (`-` accepted for `_`)
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Metric::ALL
            .into_iter()
            .find(|metric| metric.param_stem() == normalized)
    }
}

/// Which end of a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    Min,
    Max,
}

impl Bound {
    pub const fn prefix(self) -> &'static str {
        match self {
            Bound::Min => "min",
            Bound::Max => "max",
        }
    }
}

/// Independently optional min/max bounds (`None` = unbounded)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RangeBounds {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl RangeBounds {
    pub fn get(&self, bound: Bound) -> Option<i64> {
        match bound {
            Bound::Min => self.min,
            Bound::Max => self.max,
        }
    }

    pub fn set(&mut self, bound: Bound, value: Option<i64>) {
        match bound {
            Bound::Min => self.min = value,
            Bound::Max => self.max = value,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Ranges over every engagement metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricRanges {
    pub votes_up: RangeBounds,
    pub votes_funny: RangeBounds,
    pub playtime_at_review: RangeBounds,
    pub playtime_forever: RangeBounds,
}

impl MetricRanges {
    pub fn get(&self, metric: Metric) -> &RangeBounds {
        match metric {
            Metric::VotesUp => &self.votes_up,
            Metric::VotesFunny => &self.votes_funny,
            Metric::PlaytimeAtReview => &self.playtime_at_review,
            Metric::PlaytimeForever => &self.playtime_forever,
        }
    }

    pub fn get_mut(&mut self, metric: Metric) -> &mut RangeBounds {
        match metric {
            Metric::VotesUp => &mut self.votes_up,
            Metric::VotesFunny => &mut self.votes_funny,
            Metric::PlaytimeAtReview => &mut self.playtime_at_review,
            Metric::PlaytimeForever => &mut self.playtime_forever,
        }
    }
}

/// Selected codes, one independent set per taxonomy dimension
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CodeSelection {
    pub aesthetic: BTreeSet<u16>,
    pub feature: BTreeSet<u16>,
    pub pain: BTreeSet<u16>,
}

impl CodeSelection {
    pub fn get(&self, dimension: Dimension) -> &BTreeSet<u16> {
        match dimension {
            Dimension::Aesthetic => &self.aesthetic,
            Dimension::Feature => &self.feature,
            Dimension::Pain => &self.pain,
        }
    }

    pub fn get_mut(&mut self, dimension: Dimension) -> &mut BTreeSet<u16> {
        match dimension {
            Dimension::Aesthetic => &mut self.aesthetic,
            Dimension::Feature => &mut self.feature,
            Dimension::Pain => &mut self.pain,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.aesthetic.is_empty() && self.feature.is_empty() && self.pain.is_empty()
    }
}

/// Complete filter state of one side
///
/// Empty sets and `None` bounds mean "no constraint".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub search_text: String,
    pub polarity: Polarity,
    pub sort: SortOrder,
    /// Raw `YYYY-MM-DD` input; malformed values are ignored when compiling
    pub date_from: Option<String>,
    /// Raw `YYYY-MM-DD` input, inclusive through the end of that day
    pub date_to: Option<String>,
    pub ranges: MetricRanges,
    pub languages: BTreeSet<String>,
    /// Bulk-selector only; `selected_games` is what the backend receives
    pub selected_genres: BTreeSet<String>,
    pub selected_games: BTreeSet<u32>,
    pub selected_codes: CodeSelection,
    pub page_size: u32,
    /// 1-based
    pub page: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            polarity: Polarity::default(),
            sort: SortOrder::default(),
            date_from: None,
            date_to: None,
            ranges: MetricRanges::default(),
            languages: BTreeSet::new(),
            selected_genres: BTreeSet::new(),
            selected_games: BTreeSet::new(),
            selected_codes: CodeSelection::default(),
            page_size: DEFAULT_PAGE_SIZE,
            page: 1,
        }
    }
}

impl FilterState {
    /// Empty state with a custom page size
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            ..Self::default()
        }
    }

    /// Trimmed search text, `None` when empty
    pub fn search_query(&self) -> Option<&str> {
        let trimmed = self.search_text.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Flip `genre` and cascade the flip onto its games
    ///
    /// No-op when the catalog maps no games to `genre`. Returns whether the
    /// genre is selected afterwards.
    pub fn toggle_genre(&mut self, catalog: &Catalog, genre: &str) -> bool {
        self.apply_genre_toggle(catalog, genre)
    }

    /// Genre toggle, step 1: flip the genre itself, then hand its games to
    /// [`FilterState::set_game_membership`]
    ///
    /// Deselecting removes every game of the genre, even when another selected
    /// genre also lists it. Toggling a game never touches the genre set.
    pub fn apply_genre_toggle(&mut self, catalog: &Catalog, genre: &str) -> bool {
        let games = match catalog.games_in(genre) {
            Some(games) if !games.is_empty() => games,
            _ => return self.selected_genres.contains(genre),
        };

        let selected = if self.selected_genres.remove(genre) {
            false
        } else {
            self.selected_genres.insert(genre.to_string());
            true
        };

        self.set_game_membership(games.iter().copied(), selected);
        selected
    }

    /// Genre toggle, step 2: add or remove a batch of games
    pub fn set_game_membership<I>(&mut self, games: I, member: bool)
    where
        I: IntoIterator<Item = u32>,
    {
        for game in games {
            if member {
                self.selected_games.insert(game);
            } else {
                self.selected_games.remove(&game);
            }
        }
    }

    /// Flip one game; returns whether it is selected afterwards
    pub fn toggle_game(&mut self, game: u32) -> bool {
        toggle(&mut self.selected_games, game)
    }

    /// Flip one code within `dimension`; other dimensions are untouched
    pub fn toggle_code(&mut self, dimension: Dimension, code: u16) -> bool {
        toggle(self.selected_codes.get_mut(dimension), code)
    }

    /// Deselect every code of `dimension`
    pub fn clear_codes(&mut self, dimension: Dimension) {
        self.selected_codes.get_mut(dimension).clear();
    }

    /// Flip one review language
    pub fn toggle_language(&mut self, language: &str) -> bool {
        let language = language.trim().to_ascii_lowercase();
        if language.is_empty() {
            return false;
        }
        toggle(&mut self.languages, language)
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn set_polarity(&mut self, polarity: Polarity) {
        self.polarity = polarity;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
    }

    /// Replace both date bounds; blank input clears a bound
    pub fn set_date_range(&mut self, from: Option<&str>, to: Option<&str>) {
        self.date_from = normalize_date_input(from);
        self.date_to = normalize_date_input(to);
    }

    pub fn set_range(&mut self, metric: Metric, bound: Bound, value: Option<i64>) {
        self.ranges.get_mut(metric).set(bound, value);
    }

    /// Set a bound from raw text input; non-numeric text clears the bound
    pub fn set_range_input(&mut self, metric: Metric, bound: Bound, input: &str) {
        self.set_range(metric, bound, parse_bound(input));
    }

    /// Reset every facet, keeping the page size
    pub fn clear_facets(&mut self) {
        *self = Self::with_page_size(self.page_size);
    }

    /// Games offered for picking
    ///
    /// With no genre selected this is the full catalog rather than nothing.
    /// This differs from the query rule where an empty game selection means
    /// "no constraint".
    pub fn visible_games(&self, catalog: &Catalog) -> Vec<u32> {
        if self.selected_genres.is_empty() {
            return catalog.all_games().into_iter().collect();
        }
        let games: BTreeSet<u32> = self
            .selected_genres
            .iter()
            .filter_map(|genre| catalog.games_in(genre))
            .flatten()
            .copied()
            .collect();
        games.into_iter().collect()
    }

    /// Whether any of `genre`'s games is currently selected
    pub fn any_selected_in_genre(&self, catalog: &Catalog, genre: &str) -> bool {
        catalog
            .games_in(genre)
            .map(|games| games.iter().any(|g| self.selected_games.contains(g)))
            .unwrap_or(false)
    }

    /// Equality over every facet except the current page
    pub fn same_facets(&self, other: &FilterState) -> bool {
        let mut a = self.clone();
        a.page = other.page;
        a == *other
    }
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}

fn normalize_date_input(input: Option<&str>) -> Option<String> {
    input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a numeric bound; accepts integral floats such as `"10.0"`
pub fn parse_bound(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new([
            ("Action", vec![1, 2, 3]),
            ("Puzzle", vec![3, 4]),
            ("Empty", vec![]),
        ])
    }

    #[test]
    fn test_toggle_genre_selects_its_games() {
        let catalog = catalog();
        let mut state = FilterState::default();

        assert!(state.toggle_genre(&catalog, "Action"));
        assert!(state.selected_genres.contains("Action"));
        assert_eq!(state.selected_games, BTreeSet::from([1, 2, 3]));
    }

    #[test]
    fn test_toggle_genre_twice_restores_games() {
        let catalog = catalog();
        let mut state = FilterState::default();
        state.toggle_game(9);
        let before = state.selected_games.clone();

        state.toggle_genre(&catalog, "Puzzle");
        assert!(!state.toggle_genre(&catalog, "Puzzle"));

        assert_eq!(state.selected_games, before);
        assert!(state.selected_genres.is_empty());
    }

    #[test]
    fn test_toggle_genre_leaves_unrelated_games() {
        let catalog = catalog();
        let mut state = FilterState::default();
        state.toggle_game(42);

        state.toggle_genre(&catalog, "Puzzle");
        assert_eq!(state.selected_games, BTreeSet::from([3, 4, 42]));
    }

    #[test]
    fn test_deselecting_genre_removes_shared_games() {
        let catalog = catalog();
        let mut state = FilterState::default();
        state.toggle_genre(&catalog, "Action");
        state.toggle_genre(&catalog, "Puzzle");

        state.toggle_genre(&catalog, "Puzzle");
        // Game 3 belongs to both genres but membership is not reference counted
        assert_eq!(state.selected_games, BTreeSet::from([1, 2]));
        assert!(state.selected_genres.contains("Action"));
    }

    #[test]
    fn test_toggle_unmapped_genre_is_noop() {
        let catalog = catalog();
        let mut state = FilterState::default();
        assert!(!state.toggle_genre(&catalog, "Empty"));
        assert!(!state.toggle_genre(&catalog, "Unknown"));
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn test_toggle_game_does_not_touch_genres() {
        let catalog = catalog();
        let mut state = FilterState::default();
        state.toggle_genre(&catalog, "Action");

        state.toggle_game(1);
        state.toggle_game(2);
        state.toggle_game(3);

        assert!(state.selected_games.is_empty());
        assert!(state.selected_genres.contains("Action"));
    }

    #[test]
    fn test_toggle_code_is_per_dimension() {
        let mut state = FilterState::default();
        assert!(state.toggle_code(Dimension::Feature, 21));
        state.toggle_code(Dimension::Pain, 21);
        assert!(!state.toggle_code(Dimension::Pain, 21));

        assert_eq!(state.selected_codes.feature, BTreeSet::from([21]));
        assert!(state.selected_codes.pain.is_empty());
        assert!(state.selected_codes.aesthetic.is_empty());
    }

    #[test]
    fn test_visible_games_defaults_to_full_catalog() {
        let catalog = catalog();
        let state = FilterState::default();
        assert_eq!(state.visible_games(&catalog), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_visible_games_follows_selected_genres() {
        let catalog = catalog();
        let mut state = FilterState::default();
        state.toggle_genre(&catalog, "Puzzle");
        assert_eq!(state.visible_games(&catalog), vec![3, 4]);
    }

    #[test]
    fn test_any_selected_in_genre() {
        let catalog = catalog();
        let mut state = FilterState::default();
        assert!(!state.any_selected_in_genre(&catalog, "Puzzle"));
        state.toggle_game(3);
        assert!(state.any_selected_in_genre(&catalog, "Puzzle"));
        assert!(state.any_selected_in_genre(&catalog, "Action"));
        assert!(!state.any_selected_in_genre(&catalog, "Missing"));
    }

    #[test]
    fn test_set_range_input_degrades_gracefully() {
        let mut state = FilterState::default();
        state.set_range_input(Metric::VotesUp, Bound::Min, "12");
        state.set_range_input(Metric::VotesUp, Bound::Max, "lots");
        state.set_range_input(Metric::PlaytimeForever, Bound::Max, " 90.7 ");

        assert_eq!(state.ranges.votes_up, RangeBounds { min: Some(12), max: None });
        assert_eq!(state.ranges.playtime_forever.max, Some(90));
    }

    #[test]
    fn test_same_facets_ignores_page_only() {
        let mut a = FilterState::default();
        let mut b = a.clone();
        b.page = 7;
        assert!(a.same_facets(&b));

        a.set_polarity(Polarity::Recommended);
        assert!(!a.same_facets(&b));
    }

    #[test]
    fn test_clear_facets_keeps_page_size() {
        let mut state = FilterState::with_page_size(50);
        state.set_search_text("boss");
        state.toggle_language("English");
        state.page = 4;

        state.clear_facets();
        assert_eq!(state, FilterState::with_page_size(50));
    }

    #[test]
    fn test_polarity_parse() {
        assert_eq!(Polarity::parse("Recommended"), Some(Polarity::Recommended));
        assert_eq!(Polarity::parse("not-recommended"), Some(Polarity::NotRecommended));
        assert_eq!(Polarity::parse("all"), Some(Polarity::Any));
        assert_eq!(Polarity::parse("maybe"), None);
    }

    #[test]
    fn test_metric_parse() {
        assert_eq!(Metric::parse("votes-funny"), Some(Metric::VotesFunny));
        assert_eq!(Metric::parse("PLAYTIME_FOREVER"), Some(Metric::PlaytimeForever));
        assert_eq!(Metric::parse("hours"), None);
    }
}
