use std::{env, path::Path, path::PathBuf, time::Duration};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    /// Where the rendered document goes; stdout when unset.
    pub output_path: Option<PathBuf>,
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup("HABIT_API_URL")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let output_path = lookup("HABIT_OUTPUT_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        let request_timeout = lookup("HABIT_HTTP_TIMEOUT_SECS").and_then(|value| {
            match value.trim().parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(err) => {
                    warn!("ignoring HABIT_HTTP_TIMEOUT_SECS={value}: {err}");
                    None
                }
            }
        });

        Self {
            api_url,
            output_path,
            request_timeout,
        }
    }
}

/// Writes the rendered document to `path`, creating parent directories, or to
/// stdout when no path is configured.
pub async fn write_document(path: Option<&Path>, document: &str) -> Result<(), std::io::Error> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent).await?;
            }
            fs::write(path, document).await
        }
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(document.as_bytes()).await?;
            stdout.flush().await
        }
    }
}
