use windows::{
    Globalization::Language,
    Graphics::Imaging::BitmapDecoder,
    Media::Ocr::OcrEngine as WinOcrEngine,
    Storage::Streams::{DataWriter, InMemoryRandomAccessStream},
    core::HSTRING,
};

use crate::error::{OcrError, Result};

pub const DEFAULT_LANGUAGE: &str = "en-US";

/// `Windows.Media.Ocr` backend
pub struct WinRtOcr {
    engine: WinOcrEngine,
}

impl WinRtOcr {
    pub fn new(language_tag: &str) -> Result<Self> {
        let language = Language::CreateLanguage(&HSTRING::from(language_tag)).map_err(|e| {
            OcrError::EngineInit(format!("invalid language tag '{}': {}", language_tag, e))
        })?;

        let engine = WinOcrEngine::TryCreateFromLanguage(&language).map_err(|e| {
            OcrError::EngineInit(format!(
                "no OCR support installed for '{}': {}",
                language_tag, e
            ))
        })?;

        Ok(Self { engine })
    }

    /// Recognize text in PNG-encoded bytes
    pub async fn recognize(&self, png: &[u8]) -> Result<String> {
        let stream = InMemoryRandomAccessStream::new()?;
        let writer = DataWriter::CreateDataWriter(&stream)?;
        writer.WriteBytes(png)?;
        writer.StoreAsync()?.get()?;
        writer.FlushAsync()?.get()?;
        stream.Seek(0)?;

        let bitmap = BitmapDecoder::CreateAsync(&stream)?
            .get()?
            .GetSoftwareBitmapAsync()?
            .get()?;

        let result = self
            .engine
            .RecognizeAsync(&bitmap)?
            .get()
            .map_err(|e| OcrError::Processing(format!("recognition failed: {}", e)))?;

        Ok(result.Text()?.to_string())
    }
}
