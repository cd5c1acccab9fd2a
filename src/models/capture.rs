use serde::{Deserialize, Serialize};

use crate::models::content::{Category, ContentEntry};

/// A user-drawn rectangle in page-pixel coordinates marking an OCR capture
/// area. Immutable once handed to the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Regions below this edge length are treated as accidental clicks.
    pub const MIN_DIMENSION: u32 = 10;

    pub fn meets_minimum_size(&self) -> bool {
        self.width >= Self::MIN_DIMENSION && self.height >= Self::MIN_DIMENSION
    }

    pub fn fits_within(&self, source_width: u32, source_height: u32) -> bool {
        self.x
            .checked_add(self.width)
            .is_some_and(|right| right <= source_width)
            && self
                .y
                .checked_add(self.height)
                .is_some_and(|bottom| bottom <= source_height)
    }
}

/// Output of one OCR pass: trimmed text plus a normalized confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedText {
    pub text: String,
    pub confidence: f64,
}

/// A field that contributed to an index match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMatch {
    pub field: String,
    pub value: String,
}

/// Raw output of one fuzzy-index query. `raw_score` is a distance: 0 is a
/// perfect match, larger is worse, at most 1.
#[derive(Debug, Clone, Serialize)]
pub struct IndexMatch {
    pub entry: ContentEntry,
    pub raw_score: f64,
    pub matched_fields: Vec<FieldMatch>,
}

/// A cross-category match with distance converted to similarity.
#[derive(Debug, Clone, Serialize)]
pub struct RankedMatch {
    pub category: Category,
    pub name: String,
    pub similarity: f64,
    pub entry: ContentEntry,
}

/// The externally-visible output of one full capture pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureResult {
    pub recognized: RecognizedText,
    pub matches: Vec<RankedMatch>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimum_size_gate() {
        let ok = Region {
            x: 0,
            y: 0,
            width: 10,
            height: 10,
        };
        assert!(ok.meets_minimum_size());

        let narrow = Region {
            x: 0,
            y: 0,
            width: 9,
            height: 100,
        };
        assert!(!narrow.meets_minimum_size());

        let flat = Region {
            x: 0,
            y: 0,
            width: 100,
            height: 5,
        };
        assert!(!flat.meets_minimum_size());
    }

    #[test]
    fn fits_within_checks_both_axes() {
        let region = Region {
            x: 10,
            y: 10,
            width: 100,
            height: 30,
        };
        assert!(region.fits_within(110, 40));
        assert!(!region.fits_within(109, 40));
        assert!(!region.fits_within(110, 39));
    }

    #[test]
    fn fits_within_survives_coordinate_overflow() {
        let region = Region {
            x: u32::MAX,
            y: 0,
            width: 10,
            height: 10,
        };
        assert!(!region.fits_within(100, 100));
    }
}
