use std::path::Path;

use async_trait::async_trait;
use scanhook_types::CaptureRegion;

use crate::crop::crop_region;
use crate::error::{OcrError, Result};

/// Turns a region of an image file into text
#[async_trait(?Send)]
pub trait Recognizer {
    async fn recognize(&self, image: &Path, region: CaptureRegion) -> Result<String>;
}

enum Backend {
    #[cfg(windows)]
    Windows(crate::winrt::WinRtOcr),
    #[cfg(feature = "tesseract")]
    Tesseract(crate::tesseract::TesseractOcr),
    #[allow(dead_code)]
    Unavailable { reason: String },
}

/// OCR engine configured once per run with the license credential
pub struct OcrEngine {
    backend: Backend,
}

impl OcrEngine {
    /// Create an engine for `language`, or the backend default when `None`
    pub fn new(license: &str, language: Option<&str>) -> Result<Self> {
        if license.trim().is_empty() {
            return Err(OcrError::InvalidLicense);
        }

        let backend = Self::create_backend(language)?;
        Ok(Self { backend })
    }

    #[cfg(windows)]
    fn create_backend(language: Option<&str>) -> Result<Backend> {
        let language = language.unwrap_or(crate::winrt::DEFAULT_LANGUAGE);
        tracing::debug!("Initializing Windows OCR ({})", language);
        crate::winrt::WinRtOcr::new(language).map(Backend::Windows)
    }

    #[cfg(all(not(windows), feature = "tesseract"))]
    fn create_backend(language: Option<&str>) -> Result<Backend> {
        let language = language.unwrap_or(crate::tesseract::DEFAULT_LANGUAGE);
        tracing::debug!("Initializing Tesseract ({})", language);
        crate::tesseract::TesseractOcr::new(language).map(Backend::Tesseract)
    }

    #[cfg(all(not(windows), not(feature = "tesseract")))]
    fn create_backend(_language: Option<&str>) -> Result<Backend> {
        Ok(Backend::Unavailable {
            reason: "built without an OCR backend for this platform (enable the `tesseract` feature)"
                .to_string(),
        })
    }

    /// Name of the active backend, for diagnostics
    pub fn backend_name(&self) -> &'static str {
        match &self.backend {
            #[cfg(windows)]
            Backend::Windows(_) => "windows",
            #[cfg(feature = "tesseract")]
            Backend::Tesseract(_) => "tesseract",
            Backend::Unavailable { .. } => "unavailable",
        }
    }
}

#[async_trait(?Send)]
impl Recognizer for OcrEngine {
    async fn recognize(&self, image: &Path, region: CaptureRegion) -> Result<String> {
        if let Backend::Unavailable { reason } = &self.backend {
            return Err(OcrError::Unavailable(reason.clone()));
        }

        let png = crop_region(image, region)?;
        tracing::debug!(
            "Recognizing {} ({}, {} bytes) with {}",
            image.display(),
            region,
            png.len(),
            self.backend_name()
        );

        match &self.backend {
            #[cfg(windows)]
            Backend::Windows(engine) => engine.recognize(&png).await,
            #[cfg(feature = "tesseract")]
            Backend::Tesseract(engine) => engine.recognize(&png),
            Backend::Unavailable { reason } => Err(OcrError::Unavailable(reason.clone())),
        }
    }
}
