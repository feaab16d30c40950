use std::fmt;

use serde::{Deserialize, Serialize};

/// Trigger name the automation tool listens for.
pub const TRIGGER_NAME: &str = "SAMMI OCR";

/// Rectangle of a captured image to submit for recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the region lies entirely inside an image of the given size
    pub fn fits_within(&self, image_width: u32, image_height: u32) -> bool {
        let right = u64::from(self.x) + u64::from(self.width);
        let bottom = u64::from(self.y) + u64::from(self.height);
        right <= u64::from(image_width) && bottom <= u64::from(image_height)
    }
}

impl fmt::Display for CaptureRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width, self.height, self.x, self.y
        )
    }
}

/// JSON body posted to the webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub trigger: String,
    pub value: String,
}

impl WebhookPayload {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            trigger: TRIGGER_NAME.to_string(),
            value: value.into(),
        }
    }
}
