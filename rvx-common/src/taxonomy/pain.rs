//! Pain-point codebook (parent/child)

use super::{Codebook, Dimension, TaxonomyEntry};

const ENTRIES: &[TaxonomyEntry] = &[
    TaxonomyEntry::top(10, "Performance"),
    TaxonomyEntry::child(11, 10, "Low frame rate"),
    TaxonomyEntry::child(12, 10, "Stutter"),
    TaxonomyEntry::child(13, 10, "Long loading"),
    TaxonomyEntry::child(14, 10, "High hardware demands"),
    TaxonomyEntry::top(20, "Stability"),
    TaxonomyEntry::child(21, 20, "Crashes"),
    TaxonomyEntry::child(22, 20, "Game-breaking bugs"),
    TaxonomyEntry::child(23, 20, "Save corruption"),
    TaxonomyEntry::child(24, 20, "Server outages"),
    TaxonomyEntry::top(30, "Balance"),
    TaxonomyEntry::child(31, 30, "Too difficult"),
    TaxonomyEntry::child(32, 30, "Too easy"),
    TaxonomyEntry::child(33, 30, "Grind"),
    TaxonomyEntry::child(34, 30, "Pay to win"),
    TaxonomyEntry::child(35, 30, "Overpowered builds"),
    TaxonomyEntry::top(40, "Monetization"),
    TaxonomyEntry::child(41, 40, "Overpriced"),
    TaxonomyEntry::child(42, 40, "Aggressive microtransactions"),
    TaxonomyEntry::child(43, 40, "Cut content sold as DLC"),
    TaxonomyEntry::top(50, "Content"),
    TaxonomyEntry::child(51, 50, "Too short"),
    TaxonomyEntry::child(52, 50, "Repetitive"),
    TaxonomyEntry::child(53, 50, "Unfinished"),
    TaxonomyEntry::child(54, 50, "Weak story"),
    TaxonomyEntry::top(60, "Usability"),
    TaxonomyEntry::child(61, 60, "Clunky controls"),
    TaxonomyEntry::child(62, 60, "Confusing UI"),
    TaxonomyEntry::child(63, 60, "Poor tutorial"),
    TaxonomyEntry::child(64, 60, "Missing options"),
    TaxonomyEntry::child(65, 60, "Bad camera"),
    TaxonomyEntry::top(70, "Community & support"),
    TaxonomyEntry::child(71, 70, "Toxic players"),
    TaxonomyEntry::child(72, 70, "Cheaters"),
    TaxonomyEntry::child(73, 70, "Unresponsive developers"),
    TaxonomyEntry::top(900, "Other"),
    TaxonomyEntry::child(901, 900, "Launcher / DRM"),
    TaxonomyEntry::child(902, 900, "Account requirements"),
    TaxonomyEntry::child(903, 900, "Region locks"),
    TaxonomyEntry::child(904, 900, "Refund issues"),
    TaxonomyEntry::child(905, 900, "Other complaint"),
];

pub(super) static CODEBOOK: Codebook = Codebook {
    dimension: Dimension::Pain,
    entries: ENTRIES,
};
