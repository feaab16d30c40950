use std::io;
use std::path::PathBuf;

use scanhook_types::CaptureRegion;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("no PNG files found in {}", dir.display())]
    NotFound { dir: PathBuf },

    #[error("invalid filename format: {name} ({reason})")]
    InvalidName { name: String, reason: String },

    #[error("failed to scan {}: {source}", dir.display())]
    Scan {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("invalid license key")]
    InvalidLicense,

    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    #[error("failed to initialize OCR engine: {0}")]
    EngineInit(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("crop region {region} is outside the {width}x{height} image")]
    RegionOutOfBounds {
        region: CaptureRegion,
        width: u32,
        height: u32,
    },

    #[error("crop region {0} is empty")]
    EmptyRegion(CaptureRegion),

    #[error("OCR processing error: {0}")]
    Processing(String),

    #[cfg(windows)]
    #[error("windows API error: {0}")]
    Windows(#[from] windows::core::Error),
}

pub type Result<T> = std::result::Result<T, OcrError>;
