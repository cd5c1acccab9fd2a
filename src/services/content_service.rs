use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::content::{Compendium, Feat, Item, Monster, Spell};

const SPELLS_FILE: &str = "spells.json";
const ITEMS_FILE: &str = "items.json";
const FEATS_FILE: &str = "feats.json";
const BESTIARY_FILE: &str = "bestiary.json";

#[derive(Debug, Default, Deserialize)]
struct SpellFile {
    #[serde(default)]
    spell: Vec<Spell>,
}

#[derive(Debug, Default, Deserialize)]
struct ItemFile {
    #[serde(default)]
    item: Vec<Item>,
    #[serde(default, rename = "itemGroup")]
    item_group: Vec<Item>,
}

#[derive(Debug, Default, Deserialize)]
struct FeatFile {
    #[serde(default)]
    feat: Vec<Feat>,
}

#[derive(Debug, Default, Deserialize)]
struct BestiaryFile {
    #[serde(default)]
    monster: Vec<Monster>,
}

fn read_category<T: DeserializeOwned + Default>(dir: &Path, file: &str) -> Result<T, AppError> {
    let path = dir.join(file);
    if !path.exists() {
        return Ok(T::default());
    }
    let bytes = std::fs::read(&path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Loads all four category files from a 5e.tools-shaped data directory.
/// Missing files yield empty categories so a partially populated directory
/// still produces a usable compendium; malformed JSON is an error.
pub fn load_compendium(dir: &Path) -> Result<Compendium, AppError> {
    let spells: SpellFile = read_category(dir, SPELLS_FILE)?;
    let items: ItemFile = read_category(dir, ITEMS_FILE)?;
    let feats: FeatFile = read_category(dir, FEATS_FILE)?;
    let bestiary: BestiaryFile = read_category(dir, BESTIARY_FILE)?;

    let mut all_items = items.item;
    all_items.extend(items.item_group);

    let compendium = Compendium {
        spells: spells.spell,
        items: all_items,
        feats: feats.feat,
        monsters: bestiary.monster,
    };
    tracing::debug!(
        spells = compendium.spells.len(),
        items = compendium.items.len(),
        feats = compendium.feats.len(),
        monsters = compendium.monsters.len(),
        "loaded compendium"
    );
    Ok(compendium)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, file: &str, contents: &str) {
        std::fs::write(dir.join(file), contents).unwrap();
    }

    #[test]
    fn loads_all_categories() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            SPELLS_FILE,
            r#"{"spell":[{"name":"Fireball","level":3,"school":"evocation"}]}"#,
        );
        write(
            dir.path(),
            ITEMS_FILE,
            r#"{"item":[{"name":"Longsword","type":"weapon"}],"itemGroup":[{"name":"Arrows","type":"ammunition"}]}"#,
        );
        write(
            dir.path(),
            FEATS_FILE,
            r#"{"feat":[{"name":"Alert"},{"name":"Grappler","prerequisite":[{"str":13,"level":4,"feat":["Tavern Brawler"]}],"ability":[{"choose":[{"from":["str","dex"],"amount":1}]}]}]}"#,
        );
        write(
            dir.path(),
            BESTIARY_FILE,
            r#"{"monster":[{"name":"Goblin","type":"humanoid","cr":"1/4"}]}"#,
        );

        let compendium = load_compendium(dir.path()).unwrap();
        assert_eq!(compendium.spells.len(), 1);
        assert_eq!(compendium.spells[0].name, "Fireball");
        assert_eq!(compendium.items.len(), 2);
        assert_eq!(compendium.items[1].name, "Arrows");
        assert_eq!(compendium.feats.len(), 2);
        assert_eq!(compendium.feats[1].prerequisite[0].level, Some(4));
        assert_eq!(compendium.feats[1].ability[0].choose[0].amount, Some(1));
        assert_eq!(compendium.monsters.len(), 1);
    }

    #[test]
    fn missing_files_yield_empty_categories() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), FEATS_FILE, r#"{"feat":[{"name":"Alert"}]}"#);

        let compendium = load_compendium(dir.path()).unwrap();
        assert!(compendium.spells.is_empty());
        assert!(compendium.items.is_empty());
        assert_eq!(compendium.feats.len(), 1);
        assert!(compendium.monsters.is_empty());
    }

    #[test]
    fn empty_directory_yields_empty_compendium() {
        let dir = tempfile::tempdir().unwrap();
        let compendium = load_compendium(dir.path()).unwrap();
        assert!(compendium.spells.is_empty());
        assert!(compendium.monsters.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), SPELLS_FILE, "{not json");

        let err = load_compendium(dir.path()).unwrap_err();
        assert!(matches!(err, AppError::Serde(_)));
    }

    #[test]
    fn missing_category_key_yields_empty_vec() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), SPELLS_FILE, r#"{"_meta":{}}"#);

        let compendium = load_compendium(dir.path()).unwrap();
        assert!(compendium.spells.is_empty());
    }
}
