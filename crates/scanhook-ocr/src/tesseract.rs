use std::sync::Mutex;

use leptess::LepTess;

use crate::error::{OcrError, Result};

pub const DEFAULT_LANGUAGE: &str = "eng";

/// Tesseract backend through `leptess`
pub struct TesseractOcr {
    tesseract: Mutex<LepTess>,
}

impl TesseractOcr {
    pub fn new(languages: &str) -> Result<Self> {
        let tesseract = LepTess::new(None, languages)
            .map_err(|e| OcrError::EngineInit(format!("Tesseract not available: {e}")))?;
        Ok(Self {
            tesseract: Mutex::new(tesseract),
        })
    }

    pub fn recognize(&self, png: &[u8]) -> Result<String> {
        let mut tesseract = self
            .tesseract
            .lock()
            .map_err(|_| OcrError::Processing("Tesseract handle poisoned".to_string()))?;

        tesseract
            .set_image_from_mem(png)
            .map_err(|e| OcrError::Processing(format!("failed to set image: {e}")))?;
        let text = tesseract
            .get_utf8_text()
            .map_err(|e| OcrError::Processing(format!("failed to extract text: {e}")))?;

        Ok(text.trim_end().to_string())
    }
}
