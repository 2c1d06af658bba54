//! Genre → game catalog
//!
//! Maps genre names to the game (Steam app) ids that belong to them. The
//! catalog is immutable after construction and shared by both comparison
//! sides without locking.

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::{Error, Result};

/// Immutable genre membership table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    genres: BTreeMap<String, BTreeSet<u32>>,
    names: BTreeMap<u32, String>,
}

/// On-disk catalog layout
///
/// ```toml
/// [genres]
/// Roguelike = [1145360, 646570]
///
/// [games]
/// 1145360 = "Hades"
/// ```
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    genres: BTreeMap<String, Vec<u32>>,
    #[serde(default)]
    games: BTreeMap<String, String>,
}

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    Catalog::new([
        ("Roguelike", vec![1145360, 646570, 588650, 250900]),
        ("Soulslike", vec![1245620, 374320, 814380, 588650]),
        ("Survival", vec![892970, 242760, 264710, 252490, 105600]),
        ("Cozy", vec![413150, 105600, 1055540]),
        ("Shooter", vec![730, 1172470, 1085660]),
    ])
    .with_names([
        (1145360, "Hades"),
        (646570, "Slay the Spire"),
        (588650, "Dead Cells"),
        (250900, "The Binding of Isaac: Rebirth"),
        (1245620, "Elden Ring"),
        (374320, "Dark Souls III"),
        (814380, "Sekiro: Shadows Die Twice"),
        (892970, "Valheim"),
        (242760, "The Forest"),
        (264710, "Subnautica"),
        (252490, "Rust"),
        (105600, "Terraria"),
        (413150, "Stardew Valley"),
        (1055540, "A Short Hike"),
        (730, "Counter-Strike 2"),
        (1172470, "Apex Legends"),
        (1085660, "Destiny 2"),
    ])
});

impl Catalog {
    /// Build a catalog from `(genre, game ids)` pairs
    pub fn new<G, I>(genres: I) -> Self
    where
        G: Into<String>,
        I: IntoIterator<Item = (G, Vec<u32>)>,
    {
        let genres = genres
            .into_iter()
            .map(|(genre, ids)| (genre.into(), ids.into_iter().collect()))
            .collect();
        Self {
            genres,
            names: BTreeMap::new(),
        }
    }

    /// Attach display names to game ids
    pub fn with_names<N, I>(mut self, names: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (u32, N)>,
    {
        self.names
            .extend(names.into_iter().map(|(id, name)| (id, name.into())));
        self
    }

    /// Catalog compiled into the binary
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Parse a catalog from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        let mut names = BTreeMap::new();
        for (id, name) in file.games {
            let id: u32 = id
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("Invalid game id in catalog: {}", id)))?;
            names.insert(id, name);
        }
        Ok(Catalog::new(file.genres).with_names(names))
    }

    /// Load a catalog from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Genre names, ascending
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.genres.keys().map(String::as_str)
    }

    /// Game ids mapped to `genre`
    pub fn games_in(&self, genre: &str) -> Option<&BTreeSet<u32>> {
        self.genres.get(genre)
    }

    /// Union of every genre's games, ascending
    pub fn all_games(&self) -> BTreeSet<u32> {
        self.genres.values().flatten().copied().collect()
    }

    /// Genres listing `game`
    pub fn genres_of(&self, game: u32) -> Vec<&str> {
        self.genres
            .iter()
            .filter(|(_, ids)| ids.contains(&game))
            .map(|(genre, _)| genre.as_str())
            .collect()
    }

    /// Display name of a game, if known
    pub fn game_name(&self, game: u32) -> Option<&str> {
        self.names.get(&game).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_has_genres() {
        let catalog = Catalog::builtin();
        assert!(catalog.genres().count() >= 5);
        assert!(catalog.games_in("Roguelike").unwrap().contains(&1145360));
        assert_eq!(catalog.game_name(413150), Some("Stardew Valley"));
    }

    #[test]
    fn test_all_games_is_sorted_union() {
        let catalog = Catalog::new([("A", vec![3, 1]), ("B", vec![2, 3])]);
        let all: Vec<u32> = catalog.all_games().into_iter().collect();
        assert_eq!(all, vec![1, 2, 3]);
    }

    #[test]
    fn test_genres_of_shared_game() {
        let catalog = Catalog::builtin();
        let genres = catalog.genres_of(588650);
        assert_eq!(genres, vec!["Roguelike", "Soulslike"]);
    }

    #[test]
    fn test_from_toml_str() {
        let catalog = Catalog::from_toml_str(
            r#"
            [genres]
            Racing = [10, 11]

            [games]
            10 = "Fast Cars"
            "#,
        )
        .unwrap();
        assert_eq!(catalog.games_in("Racing").unwrap().len(), 2);
        assert_eq!(catalog.game_name(10), Some("Fast Cars"));
        assert_eq!(catalog.game_name(11), None);
    }

    #[test]
    fn test_from_toml_rejects_bad_game_id() {
        let result = Catalog::from_toml_str("[games]\nabc = \"Nope\"\n");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
