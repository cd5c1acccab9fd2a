use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::RgbaImage;
use tokio::sync::Mutex;

use crate::error::AppError;
use crate::models::annotation::{AnnotationOverlay, AnnotationShape};
use crate::models::capture::{CaptureResult, Region};
use crate::services::capture_service::PendingCapture;
use crate::services::extract_service;
use crate::services::match_service::{ContentLibrary, OVERALL_LIMIT, PER_CATEGORY_LIMIT};
use crate::services::ocr_service::OcrEngine;

const LABEL_OFFSET_X: f64 = 5.0;
const LABEL_OFFSET_Y: f64 = -20.0;

/// Sequences one capture: extract -> recognize -> match. Failures at any
/// stage are contained here; the interaction layer only ever sees "capture
/// produced no result" and a cleaned-up overlay.
pub struct CapturePipeline {
    engine: Mutex<OcrEngine>,
    library: Arc<ContentLibrary>,
    busy: AtomicBool,
}

impl CapturePipeline {
    pub fn new(engine: OcrEngine, library: Arc<ContentLibrary>) -> Self {
        Self {
            engine: Mutex::new(engine),
            library,
            busy: AtomicBool::new(false),
        }
    }

    /// True while a capture's chain is unresolved. The surrounding layer is
    /// expected to disable pointer input while this is set.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn library(&self) -> &Arc<ContentLibrary> {
        &self.library
    }

    /// Runs the full chain for one finalized capture. On success the capture
    /// rectangle gets a text label and the result is returned; on failure the
    /// rectangle is removed and `None` is returned. No retries.
    pub async fn process(
        &self,
        page: &RgbaImage,
        pending: &PendingCapture,
        overlay: &mut AnnotationOverlay,
    ) -> Option<CaptureResult> {
        self.busy.store(true, Ordering::SeqCst);
        let outcome = self.run(page, &pending.region).await;
        let result = match outcome {
            Ok(result) => {
                if let Some((x, y)) = rect_origin(overlay, pending) {
                    overlay.add_label(
                        result.recognized.text.clone(),
                        x + LABEL_OFFSET_X,
                        y + LABEL_OFFSET_Y,
                    );
                }
                Some(result)
            }
            Err(e) => {
                tracing::warn!(error = %e, "capture pipeline failed");
                overlay.remove(pending.annotation_id);
                None
            }
        };
        self.busy.store(false, Ordering::SeqCst);
        result
    }

    /// The fallible chain as a single call, so failure containment lives at
    /// exactly one boundary.
    async fn run(&self, page: &RgbaImage, region: &Region) -> Result<CaptureResult, AppError> {
        let crop = extract_service::extract(page, region)?;

        let recognized = {
            let mut engine = self.engine.lock().await;
            engine.initialize().await?;
            engine.recognize(&crop).await?
        };
        tracing::debug!(
            text = %recognized.text,
            confidence = recognized.confidence,
            "OCR completed"
        );

        let matches = self
            .library
            .match_all(&recognized.text, PER_CATEGORY_LIMIT, OVERALL_LIMIT)
            .await;

        Ok(CaptureResult {
            recognized,
            matches,
        })
    }
}

fn rect_origin(overlay: &AnnotationOverlay, pending: &PendingCapture) -> Option<(f64, f64)> {
    match overlay.get(pending.annotation_id)?.shape {
        AnnotationShape::Rect { x, y, .. } => Some((x, y)),
        AnnotationShape::Label { .. } => None,
    }
}
