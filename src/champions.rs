use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Bundled catalogue used when no data file is present.
const DEFAULT_CATALOG: &str = include_str!("../data/champions.json");

/// Role a champion can be drafted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Top,
    Jungle,
    Mid,
    Bot,
    Support,
}

/// Class tag describing how a champion plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassTag {
    Marksman,
    Mage,
    Tank,
    Fighter,
    Assassin,
    Enchanter,
}

impl ClassTag {
    /// Whether this class leans toward physical damage.
    pub fn is_physical(&self) -> bool {
        matches!(self, ClassTag::Marksman | ClassTag::Fighter | ClassTag::Assassin)
    }

    /// Whether this class leans toward magic damage.
    pub fn is_magic(&self) -> bool {
        matches!(self, ClassTag::Mage | ClassTag::Enchanter)
    }
}

/// Static reference entry for one champion.
///
/// Immutable for the process lifetime; rates are global meta numbers, not
/// team-specific.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Champion {
    /// Catalogue id (lowercase slug)
    pub id: String,

    /// Display name
    pub name: String,

    /// Roles this champion is eligible for
    pub roles: Vec<Role>,

    /// Class tags
    pub tags: Vec<ClassTag>,

    /// Global win rate in [0, 1]
    pub win_rate: f64,

    /// Global pick rate in [0, 1]
    pub pick_rate: f64,

    /// Global ban rate in [0, 1]
    pub ban_rate: f64,
}

impl Champion {
    pub fn has_tag(&self, tag: ClassTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Flex champions can fill more than one role.
    pub fn is_flex(&self) -> bool {
        self.roles.len() > 1
    }
}

/// Read-only champion lookup table.
#[derive(Debug, Clone)]
pub struct ChampionCatalog {
    champions: HashMap<String, Champion>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    champions: Vec<Champion>,
}

impl ChampionCatalog {
    /// Build a catalogue from a list of champions.
    pub fn new(champions: Vec<Champion>) -> Self {
        Self {
            champions: champions.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    /// Parse a catalogue from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CatalogFile =
            serde_json::from_str(json).context("Failed to parse champion catalogue")?;
        Ok(Self::new(file.champions))
    }

    /// Load from a JSON file, or fall back to the bundled catalogue.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .context("Failed to read champion catalogue file")?;
            let catalog = Self::from_json_str(&content)?;
            info!("Loaded {} champions from {}", catalog.len(), path.display());
            Ok(catalog)
        } else {
            let catalog = Self::from_json_str(DEFAULT_CATALOG)?;
            info!(
                "No champion catalogue at {}, using bundled default ({} champions)",
                path.display(),
                catalog.len()
            );
            Ok(catalog)
        }
    }

    pub fn get(&self, id: &str) -> Option<&Champion> {
        self.champions.get(id)
    }

    pub fn len(&self) -> usize {
        self.champions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.champions.is_empty()
    }

    /// All champions, unordered.
    pub fn all(&self) -> impl Iterator<Item = &Champion> {
        self.champions.values()
    }

    /// Champions whose id is not in `used`.
    pub fn unused<'a>(&'a self, used: &'a [&str]) -> impl Iterator<Item = &'a Champion> {
        self.champions
            .values()
            .filter(move |c| !used.contains(&c.id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_parses() {
        let catalog = ChampionCatalog::from_json_str(DEFAULT_CATALOG).unwrap();
        assert!(catalog.len() >= 40);

        let ahri = catalog.get("ahri").expect("ahri in bundled catalogue");
        assert_eq!(ahri.name, "Ahri");
        assert!(ahri.has_tag(ClassTag::Mage));
        assert!(ahri.win_rate > 0.0 && ahri.win_rate < 1.0);
    }

    #[test]
    fn test_unused_filters_used_ids() {
        let catalog = ChampionCatalog::from_json_str(DEFAULT_CATALOG).unwrap();
        let used = vec!["ahri"];
        assert!(catalog.unused(&used).all(|c| c.id != "ahri"));
        assert_eq!(catalog.unused(&used).count(), catalog.len() - 1);
    }

    #[test]
    fn test_flex_detection() {
        let champ = Champion {
            id: "gragas".into(),
            name: "Gragas".into(),
            roles: vec![Role::Top, Role::Jungle],
            tags: vec![ClassTag::Fighter, ClassTag::Mage],
            win_rate: 0.5,
            pick_rate: 0.1,
            ban_rate: 0.02,
        };
        assert!(champ.is_flex());
    }
}
