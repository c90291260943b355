//! Configuration for the terminal client.
//!
//! Settings come from a TOML file in the platform config directory and can be
//! overridden from the command line.
//!
//! - Linux: `~/.config/ecoleta/config.toml`
//! - macOS: `~/Library/Application Support/ecoleta/config.toml`
//! - Windows: `%APPDATA%\ecoleta\config.toml`

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use ecoleta_core::model::GeoPoint;
use serde::{Deserialize, Serialize};

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ApiConfig {
    /// Root URL of the Ecoleta backend.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: ecoleta_provider_api::DEFAULT_BASE_URL.to_owned(),
        }
    }
}

/// Geography service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct GeographyConfig {
    /// Root URL of the localities API.
    pub base_url: String,
}

impl Default for GeographyConfig {
    fn default() -> Self {
        Self {
            base_url: ecoleta_provider_ibge::DEFAULT_BASE_URL.to_owned(),
        }
    }
}

fn default_lookup_url() -> String {
    ecoleta_provider_geoip::DEFAULT_LOOKUP_URL.to_owned()
}

/// Where the initial map position comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub(crate) enum LocationConfig {
    /// Look up the public IP address.
    Ip {
        /// Lookup endpoint.
        #[serde(default = "default_lookup_url")]
        url: String,
    },
    /// Use a fixed point.
    Fixed {
        /// Latitude in degrees.
        latitude: f64,
        /// Longitude in degrees.
        longitude: f64,
    },
    /// Do not resolve a position.
    Off,
}

impl Default for LocationConfig {
    fn default() -> Self {
        LocationConfig::Ip {
            url: default_lookup_url(),
        }
    }
}

impl LocationConfig {
    pub(crate) fn fixed_point(&self) -> Option<GeoPoint> {
        match self {
            LocationConfig::Fixed {
                latitude,
                longitude,
            } => Some(GeoPoint::new(*latitude, *longitude)),
            _ => None,
        }
    }
}

/// Map display settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct MapConfig {
    /// Initial zoom level, 0 shows the whole world.
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self { zoom: 4 }
    }
}

/// Outbound HTTP settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            user_agent: format!("ecoleta/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    pub(crate) fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub api: ApiConfig,
    pub geography: GeographyConfig,
    pub location: LocationConfig,
    pub map: MapConfig,
    pub http: HttpConfig,
}

impl Config {
    /// Gets the platform-specific config directory path.
    pub(crate) fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("ecoleta"))
    }

    /// Gets the full path to the default config file.
    pub(crate) fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration.
    ///
    /// An explicit `path` must exist. Without one, a missing default file yields the
    /// default configuration.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = Self::config_file_path()?;
                if !default_path.exists() {
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        Self::parse(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))
    }

    pub(crate) fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(point) = self.location.fixed_point() {
            anyhow::ensure!(
                (-90.0..=90.0).contains(&point.latitude)
                    && (-180.0..=180.0).contains(&point.longitude),
                "Fixed location {point} is outside valid coordinates"
            );
        }
        anyhow::ensure!(self.http.timeout_secs > 0, "HTTP timeout must be positive");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse("").expect("empty config parses");
        assert_eq!(config, Config::default());
        assert_eq!(config.api.base_url, "http://localhost:3333");
        assert!(matches!(config.location, LocationConfig::Ip { .. }));
    }

    #[test]
    fn sections_override_defaults() {
        let config = Config::parse(
            r#"
            [api]
            base_url = "https://api.ecoleta.example"

            [location]
            provider = "fixed"
            latitude = -23.5
            longitude = -46.6

            [map]
            zoom = 12

            [http]
            timeout_secs = 5
            "#,
        )
        .expect("config parses");

        assert_eq!(config.api.base_url, "https://api.ecoleta.example");
        assert_eq!(
            config.location.fixed_point(),
            Some(GeoPoint::new(-23.5, -46.6))
        );
        assert_eq!(config.map.zoom, 12);
        assert_eq!(config.http.timeout(), Duration::from_secs(5));
        assert_eq!(config.geography, GeographyConfig::default());
    }

    #[test]
    fn location_can_be_disabled() {
        let config = Config::parse("[location]\nprovider = \"off\"\n").expect("config parses");
        assert_eq!(config.location, LocationConfig::Off);
    }

    #[test]
    fn out_of_range_fixed_location_is_rejected() {
        let err = Config::parse("[location]\nprovider = \"fixed\"\nlatitude = 123.0\nlongitude = 0.0\n")
            .expect_err("latitude above 90 must fail");
        assert!(err.to_string().contains("outside valid coordinates"));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[map]\nzoom = 7\n").expect("write config");

        let config = Config::load(Some(&path)).expect("config loads");
        assert_eq!(config.map.zoom, 7);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("absent.toml");

        let err = Config::load(Some(&path)).expect_err("missing file must fail");
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[map\nzoom = ").expect("write config");

        let err = Config::load(Some(&path)).expect_err("malformed file must fail");
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
