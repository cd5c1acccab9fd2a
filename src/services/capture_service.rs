use uuid::Uuid;

use crate::models::annotation::AnnotationOverlay;
use crate::models::capture::Region;

/// Explicit drag state. All interaction state lives here instead of in
/// mutable cells shared between event handlers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaptureState {
    Idle,
    Drawing {
        anchor_x: f64,
        anchor_y: f64,
        annotation: Uuid,
    },
}

/// A finalized, size-validated region together with the overlay rectangle
/// that marks it, ready for the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingCapture {
    pub region: Region,
    pub annotation_id: Uuid,
}

/// Pointer-driven rectangle capture over a rendered page.
///
/// Down anchors a zero-size rectangle, moves resize it (drags in any of the
/// four directions produce a correctly oriented rectangle), up validates the
/// minimum size. Undersized rectangles are discarded as accidental clicks.
#[derive(Debug)]
pub struct CaptureInteraction {
    state: CaptureState,
}

impl Default for CaptureInteraction {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureInteraction {
    pub fn new() -> Self {
        Self {
            state: CaptureState::Idle,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, CaptureState::Drawing { .. })
    }

    pub fn pointer_down(&mut self, overlay: &mut AnnotationOverlay, x: f64, y: f64) {
        if self.is_drawing() {
            return;
        }
        let annotation = overlay.add_rect(x, y, 0.0, 0.0);
        self.state = CaptureState::Drawing {
            anchor_x: x,
            anchor_y: y,
            annotation,
        };
    }

    pub fn pointer_move(&mut self, overlay: &mut AnnotationOverlay, x: f64, y: f64) {
        let CaptureState::Drawing {
            anchor_x,
            anchor_y,
            annotation,
        } = self.state
        else {
            return;
        };
        let (left, top, width, height) = drag_rect(anchor_x, anchor_y, x, y);
        overlay.update_rect(annotation, left, top, width, height);
    }

    /// Finalizes the drag. Returns `None` in `Idle` and for undersized
    /// rectangles; the undersized rectangle is removed from the overlay.
    pub fn pointer_up(
        &mut self,
        overlay: &mut AnnotationOverlay,
        x: f64,
        y: f64,
    ) -> Option<PendingCapture> {
        let CaptureState::Drawing {
            anchor_x,
            anchor_y,
            annotation,
        } = self.state
        else {
            return None;
        };
        self.state = CaptureState::Idle;

        let (left, top, width, height) = drag_rect(anchor_x, anchor_y, x, y);
        overlay.update_rect(annotation, left, top, width, height);

        let region = Region {
            x: left.max(0.0).round() as u32,
            y: top.max(0.0).round() as u32,
            width: width.round() as u32,
            height: height.round() as u32,
        };

        if !region.meets_minimum_size() {
            overlay.remove(annotation);
            return None;
        }

        Some(PendingCapture {
            region,
            annotation_id: annotation,
        })
    }
}

/// Rectangle spanned by the anchor and the current pointer position. The
/// origin per axis is whichever coordinate is smaller, so the size is always
/// non-negative.
fn drag_rect(anchor_x: f64, anchor_y: f64, x: f64, y: f64) -> (f64, f64, f64, f64) {
    (
        anchor_x.min(x),
        anchor_y.min(y),
        (x - anchor_x).abs(),
        (y - anchor_y).abs(),
    )
}
