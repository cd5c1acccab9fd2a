use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the four reference-content categories a capture can match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Spell,
    Item,
    Feat,
    Monster,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Spell,
        Category::Item,
        Category::Feat,
        Category::Monster,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Spell => "spell",
            Category::Item => "item",
            Category::Feat => "feat",
            Category::Monster => "monster",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub level: u8,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub entries: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub source: String,
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub entries: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feat {
    pub name: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub prerequisite: Vec<Prerequisite>,
    #[serde(default)]
    pub ability: Vec<AbilityIncrease>,
    #[serde(default)]
    pub entries: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Prerequisite {
    #[serde(default)]
    pub level: Option<u8>,
    #[serde(default)]
    pub feat: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbilityIncrease {
    #[serde(default)]
    pub choose: Vec<AbilityChoice>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbilityChoice {
    #[serde(default)]
    pub from: Vec<String>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub amount: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub name: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub size: Vec<String>,
    #[serde(rename = "type", default)]
    pub monster_type: MonsterType,
    #[serde(default)]
    pub cr: ChallengeRating,
}

/// 5e.tools encodes a creature type as either a plain string or an object
/// with a base type plus tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonsterType {
    Simple(String),
    Tagged {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        tags: Vec<String>,
    },
}

impl Default for MonsterType {
    fn default() -> Self {
        MonsterType::Simple(String::new())
    }
}

impl fmt::Display for MonsterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonsterType::Simple(kind) => f.write_str(kind),
            MonsterType::Tagged { kind, tags } => {
                if tags.is_empty() {
                    f.write_str(kind)
                } else {
                    write!(f, "{kind} ({})", tags.join(", "))
                }
            }
        }
    }
}

/// Challenge rating appears as a fraction string ("1/4") or a bare number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChallengeRating {
    Rating(String),
    Numeric(f64),
}

impl Default for ChallengeRating {
    fn default() -> Self {
        ChallengeRating::Rating(String::new())
    }
}

impl fmt::Display for ChallengeRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChallengeRating::Rating(cr) => f.write_str(cr),
            ChallengeRating::Numeric(cr) => write!(f, "{cr}"),
        }
    }
}

/// A single reference entry, tagged by category. Category-specific logic
/// dispatches over this tag rather than through dynamic field lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "category", content = "data", rename_all = "lowercase")]
pub enum ContentEntry {
    Spell(Spell),
    Item(Item),
    Feat(Feat),
    Monster(Monster),
}

impl ContentEntry {
    pub fn name(&self) -> &str {
        match self {
            ContentEntry::Spell(spell) => &spell.name,
            ContentEntry::Item(item) => &item.name,
            ContentEntry::Feat(feat) => &feat.name,
            ContentEntry::Monster(monster) => &monster.name,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            ContentEntry::Spell(_) => Category::Spell,
            ContentEntry::Item(_) => Category::Item,
            ContentEntry::Feat(_) => Category::Feat,
            ContentEntry::Monster(_) => Category::Monster,
        }
    }

    /// Searchable text for a named field, or `None` when the field does not
    /// apply to this category.
    pub fn field_text(&self, field: &str) -> Option<String> {
        match (self, field) {
            (ContentEntry::Spell(spell), "name") => Some(spell.name.clone()),
            (ContentEntry::Spell(spell), "school") => Some(spell.school.clone()),
            (ContentEntry::Spell(spell), "entries") => joined(&spell.entries),
            (ContentEntry::Item(item), "name") => Some(item.name.clone()),
            (ContentEntry::Item(item), "type") => Some(item.item_type.clone()),
            (ContentEntry::Item(item), "entries") => joined(&item.entries),
            (ContentEntry::Feat(feat), "name") => Some(feat.name.clone()),
            (ContentEntry::Feat(feat), "entries") => joined(&feat.entries),
            (ContentEntry::Monster(monster), "name") => Some(monster.name.clone()),
            (ContentEntry::Monster(monster), "type") => {
                Some(monster.monster_type.to_string())
            }
            _ => None,
        }
    }
}

fn joined(entries: &[String]) -> Option<String> {
    if entries.is_empty() {
        None
    } else {
        Some(entries.join(" "))
    }
}

/// All four category entry sets, as loaded from the content repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Compendium {
    pub spells: Vec<Spell>,
    pub items: Vec<Item>,
    pub feats: Vec<Feat>,
    pub monsters: Vec<Monster>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fireball() -> ContentEntry {
        ContentEntry::Spell(Spell {
            name: "Fireball".to_string(),
            source: "PHB".to_string(),
            level: 3,
            school: "evocation".to_string(),
            entries: vec!["A bright streak flashes from your pointing finger.".to_string()],
        })
    }

    #[test]
    fn field_text_dispatches_per_category() {
        let spell = fireball();
        assert_eq!(spell.field_text("name").as_deref(), Some("Fireball"));
        assert_eq!(spell.field_text("school").as_deref(), Some("evocation"));
        assert!(spell.field_text("entries").unwrap().contains("streak"));
        assert!(spell.field_text("type").is_none());

        let monster = ContentEntry::Monster(Monster {
            name: "Goblin".to_string(),
            source: "MM".to_string(),
            size: vec!["S".to_string()],
            monster_type: MonsterType::Tagged {
                kind: "humanoid".to_string(),
                tags: vec!["goblinoid".to_string()],
            },
            cr: ChallengeRating::Rating("1/4".to_string()),
        });
        assert_eq!(
            monster.field_text("type").as_deref(),
            Some("humanoid (goblinoid)")
        );
        assert!(monster.field_text("entries").is_none());
    }

    #[test]
    fn entry_reports_name_and_category() {
        let spell = fireball();
        assert_eq!(spell.name(), "Fireball");
        assert_eq!(spell.category(), Category::Spell);
    }

    #[test]
    fn monster_type_parses_both_shapes() {
        let simple: Monster = serde_json::from_str(
            r#"{"name":"Owlbear","type":"monstrosity","cr":3}"#,
        )
        .unwrap();
        assert_eq!(simple.monster_type.to_string(), "monstrosity");
        assert_eq!(simple.cr.to_string(), "3");

        let tagged: Monster = serde_json::from_str(
            r#"{"name":"Hobgoblin","type":{"type":"humanoid","tags":["goblinoid"]},"cr":"1/2"}"#,
        )
        .unwrap();
        assert_eq!(tagged.monster_type.to_string(), "humanoid (goblinoid)");
        assert_eq!(tagged.cr.to_string(), "1/2");
    }

    #[test]
    fn category_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Category::Monster).unwrap(),
            "\"monster\""
        );
    }
}
