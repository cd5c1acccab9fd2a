use std::cmp::Ordering;
use std::sync::Arc;

use crate::models::capture::{IndexMatch, RankedMatch};
use crate::models::content::{Category, Compendium, ContentEntry};
use crate::services::index_service::FuzzyIndex;

/// How many matches each category index is asked for.
pub const PER_CATEGORY_LIMIT: usize = 3;

/// Cap on the merged result list.
pub const OVERALL_LIMIT: usize = 5;

/// The four category indices plus the cross-category merge. Queries are
/// dispatched together and joined; categories are merged in the fixed order
/// spell, item, feat, monster so equal similarities rank deterministically.
pub struct ContentLibrary {
    spells: Arc<FuzzyIndex>,
    items: Arc<FuzzyIndex>,
    feats: Arc<FuzzyIndex>,
    monsters: Arc<FuzzyIndex>,
}

impl Default for ContentLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentLibrary {
    pub fn new() -> Self {
        Self {
            spells: Arc::new(FuzzyIndex::for_category(Category::Spell)),
            items: Arc::new(FuzzyIndex::for_category(Category::Item)),
            feats: Arc::new(FuzzyIndex::for_category(Category::Feat)),
            monsters: Arc::new(FuzzyIndex::for_category(Category::Monster)),
        }
    }

    pub fn index(&self, category: Category) -> &Arc<FuzzyIndex> {
        match category {
            Category::Spell => &self.spells,
            Category::Item => &self.items,
            Category::Feat => &self.feats,
            Category::Monster => &self.monsters,
        }
    }

    /// Rebuilds all four indices from a freshly loaded compendium.
    pub fn build(&self, compendium: Compendium) {
        self.spells.build(
            compendium
                .spells
                .into_iter()
                .map(ContentEntry::Spell)
                .collect(),
        );
        self.items.build(
            compendium
                .items
                .into_iter()
                .map(ContentEntry::Item)
                .collect(),
        );
        self.feats.build(
            compendium
                .feats
                .into_iter()
                .map(ContentEntry::Feat)
                .collect(),
        );
        self.monsters.build(
            compendium
                .monsters
                .into_iter()
                .map(ContentEntry::Monster)
                .collect(),
        );
    }

    /// Queries every category with the same text and merges the results into
    /// one list sorted by descending similarity, capped at `overall_limit`.
    pub async fn match_all(
        &self,
        text: &str,
        per_category_limit: usize,
        overall_limit: usize,
    ) -> Vec<RankedMatch> {
        let trimmed = text.trim();
        if trimmed.is_empty() || overall_limit == 0 {
            return Vec::new();
        }

        let (spells, items, feats, monsters) = tokio::join!(
            query_task(self.spells.clone(), trimmed.to_string(), per_category_limit),
            query_task(self.items.clone(), trimmed.to_string(), per_category_limit),
            query_task(self.feats.clone(), trimmed.to_string(), per_category_limit),
            query_task(self.monsters.clone(), trimmed.to_string(), per_category_limit),
        );

        merge_ranked([spells, items, feats, monsters], overall_limit)
    }
}

async fn query_task(index: Arc<FuzzyIndex>, text: String, limit: usize) -> Vec<IndexMatch> {
    let category = index.category();
    match tokio::task::spawn_blocking(move || index.query(&text, limit)).await {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(%category, "index query task failed: {e}");
            Vec::new()
        }
    }
}

fn merge_ranked(batches: [Vec<IndexMatch>; 4], overall_limit: usize) -> Vec<RankedMatch> {
    let mut ranked: Vec<RankedMatch> = batches
        .into_iter()
        .flatten()
        .map(|m| RankedMatch {
            category: m.entry.category(),
            name: m.entry.name().to_string(),
            similarity: (1.0 - m.raw_score).clamp(0.0, 1.0),
            entry: m.entry,
        })
        .collect();

    // stable sort keeps the spell/item/feat/monster query order on ties
    ranked.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(overall_limit);
    ranked
}
