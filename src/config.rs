//! Runtime configuration: where the backend API and the bundled data
//! snapshot live.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use url::Url;

/// Environment variable overriding the backend API base URL.
pub const ENV_API_BASE: &str = "AASAAN_API_URL";
/// Environment variable overriding the bundled snapshot URL.
pub const ENV_DATA_URL: &str = "AASAAN_DATA_URL";

pub const DEFAULT_API_BASE: &str = "/api";
pub const DEFAULT_DATA_URL: &str = "/data/places.json";

/// Resolved endpoints the client talks to.
///
/// Both values may be site-relative (the deployment serves API and static
/// data from the same origin) or absolute URLs.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    /// Base URL of the backend API, stored without a trailing slash.
    pub api_base: String,
    /// URL of the static place snapshot used when the backend is down.
    pub data_url: String,
}

/// Optional config-file counterpart of [`ApiConfig`].
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FileConfig {
    pub api_base: Option<String>,
    pub data_url: Option<String>,
}

impl FileConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: FileConfig = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            data_url: DEFAULT_DATA_URL.to_string(),
        }
    }
}

impl ApiConfig {
    /// Resolve the effective configuration from explicit flags, the
    /// environment, and an optional config file.
    ///
    /// Precedence per value: flag > environment > file > built-in default.
    pub fn resolve(
        flag_api_base: Option<String>,
        flag_data_url: Option<String>,
        config_path: Option<&Path>,
    ) -> Result<Self> {
        let file = match config_path {
            Some(path) => FileConfig::load_from_file(path)?,
            None => FileConfig::default(),
        };

        let api_base = pick(
            flag_api_base,
            std::env::var(ENV_API_BASE).ok(),
            file.api_base,
            DEFAULT_API_BASE,
        );
        let data_url = pick(
            flag_data_url,
            std::env::var(ENV_DATA_URL).ok(),
            file.data_url,
            DEFAULT_DATA_URL,
        );

        let config = Self {
            api_base: normalize(&api_base),
            data_url: normalize(&data_url),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject absolute URLs that do not parse; site-relative paths pass.
    fn validate(&self) -> Result<()> {
        for value in [&self.api_base, &self.data_url] {
            if !value.starts_with('/') {
                Url::parse(value).with_context(|| format!("Invalid URL in config: {value}"))?;
            }
        }
        Ok(())
    }

    /// Place listing endpoint with the requested page size.
    pub fn places_url(&self, page_size: usize) -> String {
        format!("{}/places?page_size={}", self.api_base, page_size)
    }

    /// Contribution submission endpoint.
    pub fn contributions_url(&self) -> String {
        format!("{}/contributions", self.api_base)
    }

    /// Service health endpoint.
    pub fn health_url(&self) -> String {
        format!("{}/health", self.api_base)
    }

    /// Static export links for the open-data downloads (JSON, GeoJSON, CSV),
    /// derived from the snapshot URL. The files themselves are published by
    /// the data pipeline, not by this client.
    pub fn export_links(&self) -> ExportLinks {
        let stem = self
            .data_url
            .strip_suffix(".json")
            .unwrap_or(&self.data_url);
        ExportLinks {
            json: format!("{stem}.json"),
            geojson: format!("{stem}.geojson"),
            csv: format!("{stem}.csv"),
        }
    }
}

/// Download links for the published place snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportLinks {
    pub json: String,
    pub geojson: String,
    pub csv: String,
}

fn pick(
    flag: Option<String>,
    env: Option<String>,
    file: Option<String>,
    default: &str,
) -> String {
    flag.or(env)
        .or(file)
        .unwrap_or_else(|| default.to_string())
}

fn normalize(value: &str) -> String {
    let trimmed = value.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}
