//! Configuration management for the hotel finder
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::HotelFinderError;
use crate::presentation::DirectionsProvider;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variables consulted for the Google key when the config has none
const GOOGLE_KEY_ENV_VARS: [&str; 2] = ["GOOGLE_PLACES_API_KEY", "GOOGLE_MAPS_API_KEY"];

const ROUTING_KEY_ENV_VAR: &str = "LOCATIONIQ_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HotelFinderConfig {
    /// Google Geocoding / Places settings
    pub google: GoogleConfig,
    /// Driving directions service settings
    pub routing: RoutingConfig,
    /// Outbound HTTP settings
    pub http: HttpConfig,
    /// Search and aggregation settings
    pub search: SearchConfig,
    /// Geocoding fallback settings
    pub fallback: FallbackConfig,
    /// Display settings
    pub presentation: PresentationConfig,
    /// Web server settings
    pub server: ServerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Google Maps Platform settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    /// API key; without it the remote strategies are unavailable
    pub api_key: Option<String>,
    /// Geocoding endpoint
    pub geocoding_url: String,
    /// Places API base URL (nearbysearch, details and photo live below it)
    pub places_url: String,
    /// Optional ISO 3166-1 country restriction for forward geocoding
    pub region: Option<String>,
}

/// LocationIQ directions; without a key directions use straight-line distance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub api_key: Option<String>,
    /// Driving directions endpoint, coordinates are appended to it
    pub directions_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    pub user_agent: String,
}

/// Which hotel source to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregatorMode {
    /// Places service with synthetic fallback
    Remote,
    /// Synthetic data only (demo mode)
    Synthetic,
}

impl std::fmt::Display for AggregatorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregatorMode::Remote => write!(f, "remote"),
            AggregatorMode::Synthetic => write!(f, "synthetic"),
        }
    }
}

/// Search and aggregation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub mode: AggregatorMode,
    /// Radius used when a request gives none
    pub default_radius_meters: u32,
    /// Upper bound applied to requested radii
    pub max_radius_meters: u32,
    /// Maximum number of places enriched with details
    pub max_candidates: usize,
    /// Places category to search for
    pub category: String,
    /// Number of synthetic hotels generated
    pub roster_size: usize,
    /// Fixed seed for synthetic data and geocoding jitter
    pub random_seed: Option<u64>,
}

/// Where unknown locations land when every lookup fails
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub default_latitude: f64,
    pub default_longitude: f64,
    /// Maximum jitter applied to each axis, in degrees
    pub jitter_degrees: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    pub directions_provider: DirectionsProvider,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory with the widget's built assets, served as fallback
    pub static_dir: Option<PathBuf>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty, compact or full)
    pub format: String,
}

// Default value functions
fn default_geocoding_url() -> String {
    "https://maps.googleapis.com/maps/api/geocode/json".to_string()
}

fn default_places_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

fn default_directions_url() -> String {
    "https://eu1.locationiq.com/v1/directions/driving".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_user_agent() -> String {
    format!("HotelFinder/{}", crate::VERSION)
}

fn default_radius() -> u32 {
    5000
}

fn default_max_radius() -> u32 {
    50_000
}

fn default_max_candidates() -> usize {
    20
}

fn default_category() -> String {
    "lodging".to_string()
}

fn default_roster_size() -> usize {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "full".to_string()
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            geocoding_url: default_geocoding_url(),
            places_url: default_places_url(),
            region: None,
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            directions_url: default_directions_url(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: AggregatorMode::Remote,
            default_radius_meters: default_radius(),
            max_radius_meters: default_max_radius(),
            max_candidates: default_max_candidates(),
            category: default_category(),
            roster_size: default_roster_size(),
            random_seed: None,
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        // New York City
        Self {
            default_latitude: 40.7128,
            default_longitude: -74.0060,
            jitter_degrees: 0.1,
        }
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            directions_provider: DirectionsProvider::GoogleMaps,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl HotelFinderConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. HOTELFINDER_SEARCH__MODE=synthetic
        builder = builder.add_source(
            Environment::with_prefix("HOTELFINDER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: HotelFinderConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        if config.google.api_key.is_none() {
            config.google.api_key = GOOGLE_KEY_ENV_VARS
                .iter()
                .find_map(|name| std::env::var(name).ok())
                .filter(|key| !key.trim().is_empty());
        }
        if config.routing.api_key.is_none() {
            config.routing.api_key = std::env::var(ROUTING_KEY_ENV_VAR)
                .ok()
                .filter(|key| !key.trim().is_empty());
        }

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hotelfinder").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.google.geocoding_url.is_empty() {
            self.google.geocoding_url = default_geocoding_url();
        }
        if self.google.places_url.is_empty() {
            self.google.places_url = default_places_url();
        }
        if self.routing.directions_url.is_empty() {
            self.routing.directions_url = default_directions_url();
        }
        if self.http.timeout_seconds == 0 {
            self.http.timeout_seconds = default_timeout();
        }
        if self.http.user_agent.is_empty() {
            self.http.user_agent = default_user_agent();
        }
        if self.search.default_radius_meters == 0 {
            self.search.default_radius_meters = default_radius();
        }
        if self.search.max_radius_meters == 0 {
            self.search.max_radius_meters = default_max_radius();
        }
        if self.search.max_candidates == 0 {
            self.search.max_candidates = default_max_candidates();
        }
        if self.search.category.is_empty() {
            self.search.category = default_category();
        }
        if self.search.roster_size == 0 {
            self.search.roster_size = default_roster_size();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// The configured Google key, if it is usable
    #[must_use]
    pub fn google_api_key(&self) -> Option<&str> {
        self.google
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// The configured routing key, if it is usable
    #[must_use]
    pub fn routing_api_key(&self) -> Option<&str> {
        self.routing
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        // A missing key only disables the remote strategies
        if let Some(api_key) = &self.google.api_key {
            if api_key.trim().is_empty() {
                return Err(HotelFinderError::config(
                    "Google API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }

            if api_key.len() < 8 {
                return Err(HotelFinderError::config(
                    "Google API key appears to be invalid (too short). Please check your API key.",
                )
                .into());
            }

            if api_key.len() > 100 {
                return Err(HotelFinderError::config(
                    "Google API key appears to be invalid (too long). Please check your API key.",
                )
                .into());
            }
        }

        if let Some(api_key) = &self.routing.api_key {
            if api_key.trim().is_empty() {
                return Err(HotelFinderError::config(
                    "Routing API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.http.timeout_seconds > 60 {
            return Err(HotelFinderError::config("HTTP timeout cannot exceed 60 seconds").into());
        }

        if self.search.max_radius_meters > 50_000 {
            return Err(HotelFinderError::config(
                "Maximum search radius cannot exceed 50000 meters",
            )
            .into());
        }

        if self.search.default_radius_meters > self.search.max_radius_meters {
            return Err(HotelFinderError::config(
                "Default search radius cannot exceed the maximum search radius",
            )
            .into());
        }

        if self.search.max_candidates > 20 {
            return Err(HotelFinderError::config("Maximum candidates cannot exceed 20").into());
        }

        let roster_limit = crate::hotels::synthetic::ROSTER_TEMPLATES;
        if self.search.roster_size > roster_limit {
            return Err(HotelFinderError::config(format!(
                "Synthetic roster size cannot exceed {roster_limit}"
            ))
            .into());
        }

        if !(0.0..=0.1).contains(&self.fallback.jitter_degrees) {
            return Err(HotelFinderError::config(
                "Fallback jitter must be between 0 and 0.1 degrees",
            )
            .into());
        }

        crate::models::Coordinate::new(
            self.fallback.default_latitude,
            self.fallback.default_longitude,
        )
        .map_err(|e| HotelFinderError::config(format!("Invalid fallback coordinate: {e}")))?;

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(HotelFinderError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "compact", "full"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(HotelFinderError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Geocoding", &self.google.geocoding_url),
            ("Places", &self.google.places_url),
            ("Routing", &self.routing.directions_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(HotelFinderError::config(format!(
                    "{name} API URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if let Some(region) = &self.google.region {
            if region.len() != 2 || !region.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(HotelFinderError::config(
                    "Region must be a two-letter country code",
                )
                .into());
            }
        }

        Ok(())
    }
}
