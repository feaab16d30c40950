use std::path::PathBuf;
use std::time::Duration;

use scanhook_config::{Settings, Workspace};
use scanhook_notify::WebhookClient;
use scanhook_ocr::{OcrEngine, OcrError, Recognizer, select_capture};

use crate::archive::archive_capture;
use crate::error::RunError;
use crate::lock::RunLock;

/// What a successful run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Where the capture ended up under `scanned/`
    pub archived: PathBuf,
    pub text: String,
    /// Whether the webhook accepted the event
    pub delivered: bool,
}

/// Build the real OCR engine from the loaded settings
pub fn default_engine(settings: &Settings) -> Result<Box<dyn Recognizer>, OcrError> {
    let engine = OcrEngine::new(&settings.license_key, settings.language.as_deref())?;
    Ok(Box::new(engine))
}

/// Process the newest capture in `workspace` once.
///
/// Fatal errors are logged before they are returned. A failed webhook is
/// logged and reported through [`RunOutcome::delivered`].
pub async fn run<F>(workspace: &Workspace, build_engine: F) -> Result<RunOutcome, RunError>
where
    F: FnOnce(&Settings) -> Result<Box<dyn Recognizer>, OcrError>,
{
    let result = execute(workspace, build_engine).await;
    if let Err(e) = &result {
        tracing::error!("{}", e);
    }
    result
}

async fn execute<F>(workspace: &Workspace, build_engine: F) -> Result<RunOutcome, RunError>
where
    F: FnOnce(&Settings) -> Result<Box<dyn Recognizer>, OcrError>,
{
    let settings = Settings::load(&workspace.settings_path())?;
    let lock = RunLock::acquire(workspace)?;
    tracing::debug!("Holding lock {}", lock.path().display());

    let capture = select_capture(workspace.root())?;
    tracing::debug!(
        "Processing {} at {}",
        capture.file_name().to_string_lossy(),
        capture.region
    );

    let engine = build_engine(&settings)?;
    let text = engine.recognize(&capture.path, capture.region).await?;
    tracing::info!("Text recognized: {}", text);

    let archived = archive_capture(workspace, &capture.path)?;

    let delivered = notify(&settings, &text).await;

    Ok(RunOutcome {
        archived,
        text,
        delivered,
    })
}

async fn notify(settings: &Settings, text: &str) -> bool {
    let client = match WebhookClient::new(
        &settings.endpoint_authority(),
        settings.auth_token.clone(),
        Duration::from_secs(settings.timeout_secs),
    ) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Webhook delivery failed: {}", e);
            return false;
        }
    };

    match client.send(text).await {
        Ok(()) => {
            tracing::debug!("Delivered {} chars to {}", text.len(), client.url());
            true
        }
        Err(e) => {
            tracing::error!("Webhook delivery failed: {}", e);
            false
        }
    }
}
