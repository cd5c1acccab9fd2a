use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnnotationShape {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Label {
        text: String,
        x: f64,
        y: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: Uuid,
    pub shape: AnnotationShape,
}

/// Ordered set of annotations drawn over one rendered page. The capture
/// interaction keeps its live rectangle here; the pipeline attaches result
/// labels and removes rectangles from failed captures.
#[derive(Debug, Default)]
pub struct AnnotationOverlay {
    annotations: Vec<Annotation>,
}

impl AnnotationOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Uuid {
        self.add(AnnotationShape::Rect {
            x,
            y,
            width,
            height,
        })
    }

    pub fn add_label(&mut self, text: String, x: f64, y: f64) -> Uuid {
        self.add(AnnotationShape::Label { text, x, y })
    }

    fn add(&mut self, shape: AnnotationShape) -> Uuid {
        let id = Uuid::new_v4();
        self.annotations.push(Annotation { id, shape });
        id
    }

    pub fn update_rect(&mut self, id: Uuid, x: f64, y: f64, width: f64, height: f64) -> bool {
        match self.annotations.iter_mut().find(|a| a.id == id) {
            Some(annotation) if matches!(annotation.shape, AnnotationShape::Rect { .. }) => {
                annotation.shape = AnnotationShape::Rect {
                    x,
                    y,
                    width,
                    height,
                };
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.annotations.len();
        self.annotations.retain(|a| a.id != id);
        self.annotations.len() != before
    }

    pub fn get(&self, id: Uuid) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}
