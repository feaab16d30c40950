pub mod types;

pub use types::{CaptureRegion, TRIGGER_NAME, WebhookPayload};
