//! Aesthetics codebook (flat)

use super::{Codebook, Dimension, TaxonomyEntry};

const ENTRIES: &[TaxonomyEntry] = &[
    TaxonomyEntry::top(1, "Sensation"),
    TaxonomyEntry::top(2, "Fantasy"),
    TaxonomyEntry::top(3, "Narrative"),
    TaxonomyEntry::top(4, "Challenge"),
    TaxonomyEntry::top(5, "Fellowship"),
    TaxonomyEntry::top(6, "Discovery"),
    TaxonomyEntry::top(7, "Expression"),
    TaxonomyEntry::top(8, "Submission"),
    TaxonomyEntry::top(9, "Competition"),
    TaxonomyEntry::top(10, "Humor"),
];

pub(super) static CODEBOOK: Codebook = Codebook {
    dimension: Dimension::Aesthetic,
    entries: ENTRIES,
};
