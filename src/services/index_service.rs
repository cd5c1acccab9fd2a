use std::cmp::Ordering;
use std::sync::{Arc, RwLock};

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::models::capture::{FieldMatch, IndexMatch};
use crate::models::content::{Category, ContentEntry};

/// Maximum acceptable normalized distance for a returned match.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Match spans shorter than this are noise from stray OCR artifacts.
const MIN_MATCH_CHARS: usize = 2;

const SPELL_FIELDS: &[&str] = &["name", "entries", "school"];
const ITEM_FIELDS: &[&str] = &["name", "type", "entries"];
const FEAT_FIELDS: &[&str] = &["name", "entries"];
const MONSTER_FIELDS: &[&str] = &["name", "type"];

struct IndexedEntry {
    entry: ContentEntry,
    fields: Vec<(&'static str, String)>,
}

/// Approximate-string-matching index over one content category.
///
/// `build` replaces the backing snapshot with a single pointer swap, so
/// concurrent readers see either the old or the new complete set. Querying
/// before the first `build` returns an empty list.
pub struct FuzzyIndex {
    category: Category,
    fields: &'static [&'static str],
    threshold: f64,
    snapshot: RwLock<Option<Arc<Vec<IndexedEntry>>>>,
}

fn matcher() -> SkimMatcherV2 {
    SkimMatcherV2::default().ignore_case()
}

impl FuzzyIndex {
    pub fn new(category: Category, fields: &'static [&'static str], threshold: f64) -> Self {
        Self {
            category,
            fields,
            threshold,
            snapshot: RwLock::new(None),
        }
    }

    /// Index with the default searchable fields and threshold for a category.
    pub fn for_category(category: Category) -> Self {
        let fields = match category {
            Category::Spell => SPELL_FIELDS,
            Category::Item => ITEM_FIELDS,
            Category::Feat => FEAT_FIELDS,
            Category::Monster => MONSTER_FIELDS,
        };
        Self::new(category, fields, DEFAULT_THRESHOLD)
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Atomically replaces the backing entry set.
    pub fn build(&self, entries: Vec<ContentEntry>) {
        let indexed: Vec<IndexedEntry> = entries
            .into_iter()
            .map(|entry| {
                let fields = self
                    .fields
                    .iter()
                    .filter_map(|field| entry.field_text(field).map(|value| (*field, value)))
                    .collect();
                IndexedEntry { entry, fields }
            })
            .collect();

        tracing::debug!(
            category = %self.category,
            entries = indexed.len(),
            "rebuilt fuzzy index"
        );

        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(Arc::new(indexed));
    }

    /// Returns up to `limit` matches ordered by ascending distance, ties
    /// stable in insertion order. Never errors: an unbuilt index and a
    /// too-short query both yield an empty list.
    pub fn query(&self, text: &str, limit: usize) -> Vec<IndexMatch> {
        let trimmed = text.trim();
        if trimmed.chars().count() < MIN_MATCH_CHARS || limit == 0 {
            return Vec::new();
        }

        let snapshot = {
            let guard = self
                .snapshot
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            guard.clone()
        };
        let Some(snapshot) = snapshot else {
            return Vec::new();
        };

        let matcher = matcher();
        let mut matches = Vec::new();
        for indexed in snapshot.iter() {
            let mut best: Option<f64> = None;
            let mut matched_fields = Vec::new();
            for (field, value) in &indexed.fields {
                let Some(distance) = self.field_distance(&matcher, value, trimmed) else {
                    continue;
                };
                if distance > self.threshold {
                    continue;
                }
                matched_fields.push(FieldMatch {
                    field: (*field).to_string(),
                    value: value.clone(),
                });
                best = Some(best.map_or(distance, |b: f64| b.min(distance)));
            }
            if let Some(raw_score) = best {
                matches.push(IndexMatch {
                    entry: indexed.entry.clone(),
                    raw_score,
                    matched_fields,
                });
            }
        }

        matches.sort_by(|a, b| {
            a.raw_score
                .partial_cmp(&b.raw_score)
                .unwrap_or(Ordering::Equal)
        });
        matches.truncate(limit);
        matches
    }

    /// Distance between the query and one field value. OCR captures often
    /// contain more than the entry name, so when the query is longer than the
    /// field the roles are also tried reversed and the better score wins.
    fn field_distance(&self, matcher: &SkimMatcherV2, value: &str, query: &str) -> Option<f64> {
        let forward = self.directed_distance(matcher, value, query);
        if query.chars().count() <= value.chars().count() {
            return forward;
        }
        let reverse = self.directed_distance(matcher, query, value);
        match (forward, reverse) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn directed_distance(
        &self,
        matcher: &SkimMatcherV2,
        choice: &str,
        pattern: &str,
    ) -> Option<f64> {
        if pattern.chars().count() < MIN_MATCH_CHARS {
            return None;
        }
        let (score, indices) = matcher.fuzzy_indices(choice, pattern)?;
        if indices.len() < MIN_MATCH_CHARS {
            return None;
        }
        let perfect = matcher.fuzzy_match(pattern, pattern)?;
        if perfect <= 0 {
            return None;
        }
        let distance = 1.0 - (score as f64 / perfect as f64);
        Some(distance.clamp(0.0, 1.0))
    }
}
