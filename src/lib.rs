pub mod error;
pub mod models;
pub mod services;

pub use error::AppError;
pub use models::annotation::{Annotation, AnnotationOverlay, AnnotationShape};
pub use models::capture::{
    CaptureResult, FieldMatch, IndexMatch, RankedMatch, RecognizedText, Region,
};
pub use models::content::{Category, Compendium, ContentEntry, Feat, Item, Monster, Spell};
pub use services::capture_service::{CaptureInteraction, CaptureState, PendingCapture};
pub use services::content_service::load_compendium;
pub use services::extract_service::extract;
pub use services::index_service::FuzzyIndex;
pub use services::match_service::{ContentLibrary, OVERALL_LIMIT, PER_CATEGORY_LIMIT};
pub use services::ocr_service::{BackendFactory, OcrBackend, OcrEngine};
pub use services::pipeline_service::CapturePipeline;

#[cfg(feature = "tesseract")]
pub use services::ocr_service::TesseractBackend;
