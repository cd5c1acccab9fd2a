use std::io::Cursor;

use image::RgbaImage;

use crate::error::AppError;
use crate::models::capture::RecognizedText;

/// A loaded text-recognition backend. Implementations receive a PNG-encoded
/// crop and report text plus a confidence already normalized to [0,1].
pub trait OcrBackend: Send {
    fn recognize(&mut self, png: &[u8]) -> Result<RecognizedText, AppError>;
}

/// Loads a backend instance; called at most once per engine lifetime unless
/// the engine is terminated in between.
pub type BackendFactory = Box<dyn Fn() -> Result<Box<dyn OcrBackend>, AppError> + Send + Sync>;

/// Adapter around a text-recognition backend. The backend is loaded lazily
/// and can be dropped with `terminate`; the next `recognize` loads it again
/// instead of leaving the engine dead.
pub struct OcrEngine {
    factory: BackendFactory,
    backend: Option<Box<dyn OcrBackend>>,
}

impl OcrEngine {
    pub fn new(factory: BackendFactory) -> Self {
        Self {
            factory,
            backend: None,
        }
    }

    /// Engine backed by Tesseract via leptess.
    #[cfg(feature = "tesseract")]
    pub fn tesseract(lang: &str) -> Self {
        Self::new(TesseractBackend::factory(lang))
    }

    pub fn is_initialized(&self) -> bool {
        self.backend.is_some()
    }

    /// Loads the backend if it is not loaded yet. Safe to call repeatedly.
    pub async fn initialize(&mut self) -> Result<(), AppError> {
        if self.backend.is_none() {
            tracing::debug!("loading OCR backend");
            self.backend = Some((self.factory)()?);
        }
        Ok(())
    }

    /// Recognizes text in a cropped page buffer. Initializes lazily, trims
    /// the recognized text and clamps confidence to [0,1].
    pub async fn recognize(&mut self, crop: &RgbaImage) -> Result<RecognizedText, AppError> {
        self.initialize().await?;
        let png = encode_png(crop)?;
        let Some(backend) = self.backend.as_mut() else {
            return Err(AppError::EngineInit("backend unavailable".to_string()));
        };
        let raw = backend.recognize(&png)?;
        Ok(RecognizedText {
            text: raw.text.trim().to_string(),
            confidence: raw.confidence.clamp(0.0, 1.0),
        })
    }

    /// Releases the backend. The engine stays usable: the next call loads a
    /// fresh backend through the factory.
    pub async fn terminate(&mut self) {
        if self.backend.take().is_some() {
            tracing::debug!("released OCR backend");
        }
    }
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, AppError> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(feature = "tesseract")]
pub struct TesseractBackend {
    engine: leptess::LepTess,
}

#[cfg(feature = "tesseract")]
impl TesseractBackend {
    pub fn load(lang: &str) -> Result<Self, AppError> {
        let engine = leptess::LepTess::new(None, lang)
            .map_err(|e| AppError::EngineInit(format!("tesseract load failed: {e}")))?;
        Ok(Self { engine })
    }

    pub fn factory(lang: &str) -> BackendFactory {
        let lang = lang.to_string();
        Box::new(move || Ok(Box::new(Self::load(&lang)?) as Box<dyn OcrBackend>))
    }
}

#[cfg(feature = "tesseract")]
impl OcrBackend for TesseractBackend {
    fn recognize(&mut self, png: &[u8]) -> Result<RecognizedText, AppError> {
        self.engine
            .set_image_from_mem(png)
            .map_err(|e| AppError::Recognition(format!("set_image failed: {e}")))?;
        let text = self
            .engine
            .get_utf8_text()
            .map_err(|e| AppError::Recognition(format!("get_utf8_text failed: {e}")))?;
        let confidence = f64::from(self.engine.mean_text_conf()) / 100.0;
        Ok(RecognizedText { text, confidence })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    /// Backend spy used across service tests: counts factory loads and
    /// recognize calls, returns a fixed result or a fixed error.
    pub struct MockBackend {
        pub result: Result<RecognizedText, String>,
        pub recognize_calls: Arc<AtomicUsize>,
    }

    impl OcrBackend for MockBackend {
        fn recognize(&mut self, _png: &[u8]) -> Result<RecognizedText, AppError> {
            self.recognize_calls.fetch_add(1, Ordering::SeqCst);
            self.result
                .clone()
                .map_err(AppError::Recognition)
        }
    }

    pub struct MockCounters {
        pub loads: Arc<AtomicUsize>,
        pub recognize_calls: Arc<AtomicUsize>,
    }

    pub fn mock_factory(result: Result<RecognizedText, String>) -> (BackendFactory, MockCounters) {
        let loads = Arc::new(AtomicUsize::new(0));
        let recognize_calls = Arc::new(AtomicUsize::new(0));
        let counters = MockCounters {
            loads: loads.clone(),
            recognize_calls: recognize_calls.clone(),
        };
        let factory: BackendFactory = Box::new(move || {
            loads.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(MockBackend {
                result: result.clone(),
                recognize_calls: recognize_calls.clone(),
            }) as Box<dyn OcrBackend>)
        });
        (factory, counters)
    }

    pub fn failing_init_factory(loads: Arc<AtomicUsize>) -> BackendFactory {
        Box::new(move || {
            loads.fetch_add(1, Ordering::SeqCst);
            Err(AppError::EngineInit("missing language model".to_string()))
        })
    }
}
