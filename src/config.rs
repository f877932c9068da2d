use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::core::HomeRegion;
use crate::models::Coordinate;
use crate::sync::SyncOptions;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub admin: AdminSettings,
    #[serde(default)]
    pub sync: SyncSettings,
    #[serde(default)]
    pub region: RegionSettings,
    #[serde(default)]
    pub geolocation: GeolocationSettings,
    #[serde(default)]
    pub directory: DirectorySettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// The pharmacy API this service fronts
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSettings {
    #[serde(default = "default_upstream_url")]
    pub base_url: String,
    #[serde(default)]
    pub admin_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            base_url: default_upstream_url(),
            admin_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_upstream_url() -> String { "http://localhost:5000/api".to_string() }
fn default_timeout_secs() -> u64 { 30 }

/// Key callers must present in `x-admin-key` to use the admin routes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminSettings {
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SyncSettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_item_delay_ms")]
    pub item_delay_ms: u64,
    #[serde(default = "default_start_delay_ms")]
    pub start_delay_ms: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            item_delay_ms: default_item_delay_ms(),
            start_delay_ms: default_start_delay_ms(),
        }
    }
}

impl SyncSettings {
    pub fn options(&self) -> SyncOptions {
        SyncOptions {
            max_retries: self.max_retries,
            start_delay: Duration::from_millis(self.start_delay_ms),
            item_delay: Duration::from_millis(self.item_delay_ms),
        }
    }
}

fn default_max_retries() -> u32 { crate::sync::DEFAULT_MAX_RETRIES }
fn default_item_delay_ms() -> u64 { 1000 }
fn default_start_delay_ms() -> u64 { 500 }

/// Home region bounding box and center, Montenegro unless overridden
#[derive(Debug, Clone, Deserialize)]
pub struct RegionSettings {
    #[serde(default = "default_north")]
    pub north: f64,
    #[serde(default = "default_south")]
    pub south: f64,
    #[serde(default = "default_east")]
    pub east: f64,
    #[serde(default = "default_west")]
    pub west: f64,
    #[serde(default = "default_center_latitude")]
    pub center_latitude: f64,
    #[serde(default = "default_center_longitude")]
    pub center_longitude: f64,
}

impl Default for RegionSettings {
    fn default() -> Self {
        Self {
            north: default_north(),
            south: default_south(),
            east: default_east(),
            west: default_west(),
            center_latitude: default_center_latitude(),
            center_longitude: default_center_longitude(),
        }
    }
}

impl RegionSettings {
    pub fn home_region(&self) -> HomeRegion {
        HomeRegion {
            north: self.north,
            south: self.south,
            east: self.east,
            west: self.west,
            center: Coordinate::new(self.center_latitude, self.center_longitude),
        }
    }
}

fn default_north() -> f64 { HomeRegion::MONTENEGRO.north }
fn default_south() -> f64 { HomeRegion::MONTENEGRO.south }
fn default_east() -> f64 { HomeRegion::MONTENEGRO.east }
fn default_west() -> f64 { HomeRegion::MONTENEGRO.west }
fn default_center_latitude() -> f64 { HomeRegion::MONTENEGRO.center.latitude }
fn default_center_longitude() -> f64 { HomeRegion::MONTENEGRO.center.longitude }

/// Where to put users whose device cannot be located
#[derive(Debug, Clone, Deserialize)]
pub struct GeolocationSettings {
    #[serde(default = "default_origin_latitude")]
    pub default_latitude: f64,
    #[serde(default = "default_origin_longitude")]
    pub default_longitude: f64,
}

impl Default for GeolocationSettings {
    fn default() -> Self {
        Self {
            default_latitude: default_origin_latitude(),
            default_longitude: default_origin_longitude(),
        }
    }
}

impl GeolocationSettings {
    pub fn default_origin(&self) -> Coordinate {
        Coordinate::new(self.default_latitude, self.default_longitude)
    }
}

fn default_origin_latitude() -> f64 { crate::core::geolocation::DEFAULT_ORIGIN.latitude }
fn default_origin_longitude() -> f64 { crate::core::geolocation::DEFAULT_ORIGIN.longitude }

#[derive(Debug, Clone, Deserialize)]
pub struct DirectorySettings {
    #[serde(default = "default_directory_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_directory_ttl_secs(),
        }
    }
}

fn default_directory_ttl_secs() -> u64 { 3600 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingSettings {
    /// Apply the `LOG_LEVEL` and `LOG_FORMAT` environment variables on top
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(std::env::var("LOG_LEVEL").ok(), std::env::var("LOG_FORMAT").ok())
    }

    pub fn with_overrides(mut self, level: Option<String>, format: Option<String>) -> Self {
        if let Some(level) = level.filter(|l| !l.trim().is_empty()) {
            self.level = level;
        }
        if let Some(format) = format.filter(|f| !f.trim().is_empty()) {
            self.format = format;
        }
        self
    }

    /// Human-readable output; anything else logs JSON
    pub fn is_pretty(&self) -> bool {
        self.format.eq_ignore_ascii_case("pretty")
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Environment variables (prefixed with APOTEKA_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            // development overrides
            .add_source(File::with_name("config/local").required(false))
            // e.g., APOTEKA__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("APOTEKA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("APOTEKA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the short-form overrides the front end deployment already exports
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let api_url = env::var("APOTEKA_API_URL").ok();
    let admin_key = env::var("APOTEKA_ADMIN_KEY").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(url) = api_url {
        builder = builder.set_override("upstream.base_url", url)?;
    }
    // one key guards both our admin routes and the upstream's
    if let Some(key) = admin_key {
        builder = builder
            .set_override("upstream.admin_key", key.clone())?
            .set_override("admin.api_key", key)?;
    }

    builder.build()
}
