//! Taxonomy codebooks
//!
//! Three coded dimensions classify every extracted review quote:
//! - **Aesthetics**: flat list of player-experience codes
//! - **Features**: two-level parent/child groups
//! - **Pain points**: two-level parent/child groups
//!
//! Books are hand-maintained data. Group keys are multiples of 10 for
//! two-digit codes and multiples of 100 for three-digit codes, so a
//! child's parent is `floor(code / base) * base`. The tests at the bottom
//! of this module check that every hard-coded entry agrees with that rule.

use serde::{Deserialize, Serialize};
use std::fmt;

mod aesthetics;
mod features;
mod pain;

/// One taxonomy dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Aesthetic,
    Feature,
    Pain,
}

impl Dimension {
    /// All dimensions in display order
    pub const ALL: [Dimension; 3] = [Dimension::Aesthetic, Dimension::Feature, Dimension::Pain];

    /// Identifier used by the backend (`dimension=` parameter)
    pub const fn as_str(self) -> &'static str {
        match self {
            Dimension::Aesthetic => "aesthetics",
            Dimension::Feature => "features",
            Dimension::Pain => "pain",
        }
    }

    /// Query-string key carrying the selected codes of this dimension
    pub const fn codes_param(self) -> &'static str {
        match self {
            Dimension::Aesthetic => "aesthetic_codes",
            Dimension::Feature => "feature_codes",
            Dimension::Pain => "pain_codes",
        }
    }

    /// Whether codes of this dimension are grouped under parent codes
    pub const fn is_hierarchical(self) -> bool {
        !matches!(self, Dimension::Aesthetic)
    }

    /// Static codebook for this dimension
    pub fn codebook(self) -> &'static Codebook {
        match self {
            Dimension::Aesthetic => &aesthetics::CODEBOOK,
            Dimension::Feature => &features::CODEBOOK,
            Dimension::Pain => &pain::CODEBOOK,
        }
    }

    /// Parse backend identifier (accepts singular and plural forms)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aesthetic" | "aesthetics" => Some(Dimension::Aesthetic),
            "feature" | "features" => Some(Dimension::Feature),
            "pain" | "pains" | "pain_points" => Some(Dimension::Pain),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single codebook entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxonomyEntry {
    pub code: u16,
    pub label: &'static str,
    /// Group key for child codes, `None` for group keys and flat codes
    pub parent: Option<u16>,
}

impl TaxonomyEntry {
    pub(crate) const fn top(code: u16, label: &'static str) -> Self {
        Self { code, label, parent: None }
    }

    pub(crate) const fn child(code: u16, parent: u16, label: &'static str) -> Self {
        Self { code, label, parent: Some(parent) }
    }
}

/// Codebook for one dimension, entries sorted by code
#[derive(Debug)]
pub struct Codebook {
    pub dimension: Dimension,
    pub entries: &'static [TaxonomyEntry],
}

impl Codebook {
    /// Look up an entry by code
    pub fn get(&self, code: u16) -> Option<&'static TaxonomyEntry> {
        self.entries
            .binary_search_by_key(&code, |e| e.code)
            .ok()
            .map(|idx| &self.entries[idx])
    }

    /// Display label, falling back to the numeric code for unknown entries
    pub fn label(&self, code: u16) -> String {
        self.get(code)
            .map(|e| e.label.to_string())
            .unwrap_or_else(|| format!("#{}", code))
    }

    /// All codes of the book in ascending order
    pub fn codes(&self) -> impl Iterator<Item = u16> + '_ {
        self.entries.iter().map(|e| e.code)
    }

    /// Group keys of a hierarchical book, ascending (empty for flat books)
    pub fn parents(&self) -> impl Iterator<Item = u16> + '_ {
        let hierarchical = self.dimension.is_hierarchical();
        self.entries
            .iter()
            .filter(move |e| hierarchical && e.parent.is_none())
            .map(|e| e.code)
    }

    /// Child codes of `parent`, ascending
    pub fn children_of(&self, parent: u16) -> impl Iterator<Item = u16> + '_ {
        self.entries
            .iter()
            .filter(move |e| e.parent == Some(parent))
            .map(|e| e.code)
    }

    /// Whether `code` is a group key in this dimension
    ///
    /// Codes missing from the book fall back to the base-unit rule.
    pub fn is_parent(&self, code: u16) -> bool {
        if !self.dimension.is_hierarchical() {
            return false;
        }
        match self.get(code) {
            Some(entry) => entry.parent.is_none(),
            None => derive_group_key(code) == code,
        }
    }

    /// Group key of a child code, `None` for group keys and flat books
    pub fn parent_of(&self, code: u16) -> Option<u16> {
        if !self.dimension.is_hierarchical() {
            return None;
        }
        match self.get(code) {
            Some(entry) => entry.parent,
            None => {
                let key = derive_group_key(code);
                (key != code).then_some(key)
            }
        }
    }
}

/// Base unit of the group containing `code`
pub const fn group_base(code: u16) -> u16 {
    if code >= 100 {
        100
    } else {
        10
    }
}

/// `floor(code / base) * base`
pub const fn derive_group_key(code: u16) -> u16 {
    let base = group_base(code);
    code / base * base
}
