use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub use self::workspace::Workspace;

pub mod workspace;

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> String {
    "9450".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("settings file not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read settings file {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no license found in {}", path.display())]
    LicenseMissing { path: PathBuf },
}

/// Settings read from `settings.ini`
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    /// Webhook host
    pub endpoint_host: String,
    /// Webhook port, kept verbatim
    pub endpoint_port: String,
    /// Raw `Authorization` header value
    #[serde(skip_serializing)]
    pub auth_token: Option<String>,
    /// OCR engine license credential
    #[serde(skip_serializing)]
    pub license_key: String,
    /// OCR language tag, backend default when unset
    pub language: Option<String>,
    /// Webhook request timeout
    pub timeout_secs: u64,
    /// Keys without a dedicated field
    pub extra: BTreeMap<String, String>,
}

impl Settings {
    /// Load settings from an INI-like file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::Missing {
                    path: path.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(ConfigError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Self::parse(&contents).ok_or_else(|| ConfigError::LicenseMissing {
            path: path.to_path_buf(),
        })
    }

    /// Parse settings text. Returns `None` when no license key is present.
    pub fn parse(contents: &str) -> Option<Self> {
        let mut entries = parse_entries(contents);

        let license_key = entries.remove("license")?;

        let timeout_secs = match entries.remove("timeout") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    tracing::warn!(
                        "Invalid timeout '{}', using {}s",
                        raw,
                        default_timeout_secs()
                    );
                    default_timeout_secs()
                }
            },
            None => default_timeout_secs(),
        };

        Some(Self {
            endpoint_host: entries.remove("ip").unwrap_or_else(default_host),
            endpoint_port: entries.remove("port").unwrap_or_else(default_port),
            auth_token: entries.remove("pw").filter(|pw| !pw.is_empty()),
            license_key,
            language: entries.remove("language").filter(|lang| !lang.is_empty()),
            timeout_secs,
            extra: entries,
        })
    }

    /// `host:port` of the webhook receiver
    pub fn endpoint_authority(&self) -> String {
        format!("{}:{}", self.endpoint_host, self.endpoint_port)
    }
}

/// Collect `key=value` pairs, skipping section headers and comments
fn parse_entries(contents: &str) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        // `key=` counts as absent; `key=""` is an explicit empty value
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        let value = value.trim_matches('"');
        entries.insert(key.to_string(), value.to_string());
    }

    entries
}
