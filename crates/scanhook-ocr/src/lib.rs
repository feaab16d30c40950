mod capture;
mod crop;
mod engine;
mod error;
#[cfg(feature = "tesseract")]
mod tesseract;
#[cfg(windows)]
mod winrt;

pub use capture::{Capture, find_newest_capture, parse_capture_name, select_capture};
pub use crop::{crop_image, crop_region};
pub use engine::{OcrEngine, Recognizer};
pub use error::{CaptureError, OcrError};
