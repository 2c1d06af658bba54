//! Game features codebook (parent/child)

use super::{Codebook, Dimension, TaxonomyEntry};

const ENTRIES: &[TaxonomyEntry] = &[
    TaxonomyEntry::top(10, "Core gameplay"),
    TaxonomyEntry::child(11, 10, "Combat"),
    TaxonomyEntry::child(12, 10, "Movement & controls"),
    TaxonomyEntry::child(13, 10, "Puzzles"),
    TaxonomyEntry::child(14, 10, "Exploration"),
    TaxonomyEntry::child(15, 10, "Stealth"),
    TaxonomyEntry::child(16, 10, "Building & crafting"),
    TaxonomyEntry::top(20, "Progression"),
    TaxonomyEntry::child(21, 20, "Leveling"),
    TaxonomyEntry::child(22, 20, "Skill trees"),
    TaxonomyEntry::child(23, 20, "Loot & items"),
    TaxonomyEntry::child(24, 20, "Unlocks"),
    TaxonomyEntry::child(25, 20, "Difficulty curve"),
    TaxonomyEntry::top(30, "Content"),
    TaxonomyEntry::child(31, 30, "Story & quests"),
    TaxonomyEntry::child(32, 30, "Characters"),
    TaxonomyEntry::child(33, 30, "World & levels"),
    TaxonomyEntry::child(34, 30, "Replayability"),
    TaxonomyEntry::child(35, 30, "Length"),
    TaxonomyEntry::top(40, "Presentation"),
    TaxonomyEntry::child(41, 40, "Graphics"),
    TaxonomyEntry::child(42, 40, "Art style"),
    TaxonomyEntry::child(43, 40, "Music"),
    TaxonomyEntry::child(44, 40, "Sound design"),
    TaxonomyEntry::child(45, 40, "Voice acting"),
    TaxonomyEntry::top(50, "Social"),
    TaxonomyEntry::child(51, 50, "Co-op"),
    TaxonomyEntry::child(52, 50, "PvP"),
    TaxonomyEntry::child(53, 50, "Matchmaking"),
    TaxonomyEntry::child(54, 50, "Community & mods"),
    TaxonomyEntry::top(60, "Technical"),
    TaxonomyEntry::child(61, 60, "Performance"),
    TaxonomyEntry::child(62, 60, "Stability"),
    TaxonomyEntry::child(63, 60, "Platform support"),
    TaxonomyEntry::child(64, 60, "Netcode"),
    TaxonomyEntry::top(70, "Business model"),
    TaxonomyEntry::child(71, 70, "Price & value"),
    TaxonomyEntry::child(72, 70, "DLC"),
    TaxonomyEntry::child(73, 70, "Microtransactions"),
    TaxonomyEntry::child(74, 70, "Updates & support"),
    TaxonomyEntry::top(800, "Miscellaneous"),
    TaxonomyEntry::child(801, 800, "User interface"),
    TaxonomyEntry::child(802, 800, "Tutorial & onboarding"),
    TaxonomyEntry::child(803, 800, "Accessibility"),
    TaxonomyEntry::child(804, 800, "Localization"),
    TaxonomyEntry::child(805, 800, "Save system"),
    TaxonomyEntry::child(806, 800, "AI behaviour"),
    TaxonomyEntry::child(807, 800, "Physics"),
    TaxonomyEntry::child(808, 800, "Customization"),
    TaxonomyEntry::child(809, 800, "Economy"),
    TaxonomyEntry::child(810, 800, "Achievements"),
    TaxonomyEntry::child(811, 800, "Controller support"),
    TaxonomyEntry::child(812, 800, "Camera"),
    TaxonomyEntry::child(813, 800, "Menus & settings"),
    TaxonomyEntry::child(814, 800, "Map & navigation"),
    TaxonomyEntry::child(815, 800, "Inventory"),
    TaxonomyEntry::child(816, 800, "Day/night & weather"),
    TaxonomyEntry::child(817, 800, "Pets & companions"),
    TaxonomyEntry::child(818, 800, "Photo mode"),
    TaxonomyEntry::child(819, 800, "Other feature"),
];

pub(super) static CODEBOOK: Codebook = Codebook {
    dimension: Dimension::Feature,
    entries: ENTRIES,
};
