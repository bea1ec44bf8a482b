//! Submission endpoint configuration.
#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors produced while loading submission configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("config file not found")]
    NotFound {
        /// Path that was expected to hold the configuration.
        path: PathBuf,
    },
    /// The configuration URL is not usable.
    #[error("config source invalid")]
    InvalidSource {
        /// Offending source text.
        source_text: String,
        /// Static reason the source was rejected.
        reason: &'static str,
    },
    /// The configuration could not be fetched over HTTP.
    #[error("config fetch failure")]
    Fetch {
        /// URL that was fetched.
        url: String,
        /// Underlying transport error.
        source: reqwest::Error,
    },
    /// The configuration body is not valid JSON for the expected shape.
    #[error("config parse failure")]
    Parse {
        /// Where the body came from.
        origin: String,
        /// Underlying parser error.
        source: serde_json::Error,
    },
    /// IO failure while reading the configuration file.
    #[error("config io failure")]
    Io {
        /// Path involved in the failure.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Endpoint names the pipeline publishes and transfers against.
///
/// The wire keys mirror the course's hosted configuration document, so
/// a file handed out for the managed backend loads unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitConfig {
    /// Deployment region label.
    #[serde(rename = "REGION")]
    pub region: String,
    /// Bucket holding submission archives.
    #[serde(rename = "BUCKET")]
    pub bucket: String,
    /// Channel carrying task envelopes.
    #[serde(rename = "TQUEUE")]
    pub task_queue: String,
    /// Channel carrying registration envelopes.
    #[serde(rename = "RQUEUE")]
    pub reg_queue: String,
}

impl SubmitConfig {
    /// Load configuration from a local JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when the file is absent and
    /// [`ConfigError::Parse`] when the body is malformed.
    pub fn load_file(path: &Path) -> ConfigResult<Self> {
        if !path.is_file() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let body = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&body).map_err(|source| ConfigError::Parse {
            origin: path.display().to_string(),
            source,
        })?;
        debug!(path = %path.display(), "loaded config from file");
        Ok(config)
    }

    /// Load configuration from an HTTP(S) URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSource`] for a URL without an
    /// http scheme or host, [`ConfigError::Fetch`] on transport
    /// failure, and [`ConfigError::Parse`] when the body is malformed.
    pub async fn load_url(raw: &str) -> ConfigResult<Self> {
        let url = validate_url(raw)?;
        let response = reqwest::get(url.clone())
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|source| ConfigError::Fetch {
                url: url.clone(),
                source,
            })?;
        let body = response.text().await.map_err(|source| ConfigError::Fetch {
            url: url.clone(),
            source,
        })?;
        let config = serde_json::from_str(&body).map_err(|source| ConfigError::Parse {
            origin: url.clone(),
            source,
        })?;
        debug!(url, "loaded config from url");
        Ok(config)
    }
}

fn validate_url(raw: &str) -> ConfigResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidSource {
            source_text: raw.to_string(),
            reason: "url is empty",
        });
    }
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| ConfigError::InvalidSource {
            source_text: raw.to_string(),
            reason: "url must use an http scheme",
        })?;
    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() {
        return Err(ConfigError::InvalidSource {
            source_text: raw.to_string(),
            reason: "url has no host",
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::error::Error;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "REGION": "eu-west-1",
        "BUCKET": "course-submissions",
        "TQUEUE": "tasks",
        "RQUEUE": "registrations"
    }"#;

    #[test]
    fn load_file_maps_wire_keys() -> Result<(), Box<dyn Error>> {
        let temp = TempDir::new()?;
        let path = temp.path().join("config.aws");
        std::fs::write(&path, SAMPLE)?;

        let config = SubmitConfig::load_file(&path)?;
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.bucket, "course-submissions");
        assert_eq!(config.task_queue, "tasks");
        assert_eq!(config.reg_queue, "registrations");
        Ok(())
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = SubmitConfig::load_file(Path::new("/nonexistent/config.aws"))
            .expect_err("missing file should fail");
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn malformed_file_is_a_parse_error() -> Result<(), Box<dyn Error>> {
        let temp = TempDir::new()?;
        let path = temp.path().join("config.aws");
        std::fs::write(&path, "{not json")?;
        let err = SubmitConfig::load_file(&path).expect_err("bad json should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn load_url_fetches_and_parses() -> Result<(), Box<dyn Error>> {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/config.aws");
                then.status(200).body(SAMPLE);
            })
            .await;

        let config = SubmitConfig::load_url(&server.url("/config.aws")).await?;
        assert_eq!(config.bucket, "course-submissions");
        mock.assert_async().await;
        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_a_parse_error() -> Result<(), Box<dyn Error>> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/config.aws");
                then.status(200).body("oops");
            })
            .await;

        let err = SubmitConfig::load_url(&server.url("/config.aws"))
            .await
            .expect_err("bad body should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn http_failure_is_a_fetch_error() -> Result<(), Box<dyn Error>> {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/config.aws");
                then.status(500);
            })
            .await;

        let err = SubmitConfig::load_url(&server.url("/config.aws"))
            .await
            .expect_err("server error should fail");
        assert!(matches!(err, ConfigError::Fetch { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn non_http_sources_are_rejected() {
        let err = SubmitConfig::load_url("ftp://example.edu/config.aws")
            .await
            .expect_err("ftp should be rejected");
        assert!(matches!(err, ConfigError::InvalidSource { .. }));

        let err = SubmitConfig::load_url("https:///config.aws")
            .await
            .expect_err("hostless url should be rejected");
        assert!(matches!(err, ConfigError::InvalidSource { .. }));
    }
}
