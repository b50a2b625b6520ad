//! # Catalog Configuration
//!
//! Configuration for the remote menu, the search bar and the local store.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     LEMON_CATALOG_URL=https://...                                      │
//! │     LEMON_DEBOUNCE_MS=500                                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/littlelemon/catalog.toml (Linux)                         │
//! │     ~/Library/Application Support/com.littlelemon.menu/catalog.toml   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Public capstone menu, 1000 ms debounce                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # catalog.toml
//! [catalog]
//! url = "https://raw.githubusercontent.com/.../capstone.json"
//! image_base_url = "https://github.com/.../images"
//! request_timeout_secs = 30
//!
//! [search]
//! debounce_ms = 1000
//! max_query_len = 100
//!
//! [database]
//! path = "/var/lib/lemon/menu.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{SyncError, SyncResult};
use lemon_core::{MenuItem, DEFAULT_DEBOUNCE_MS, MAX_QUERY_LEN};

/// Public menu used when nothing else is configured.
pub const DEFAULT_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/Meta-Mobile-Developer-PC/Working-With-Data-API/main/capstone.json";

/// Where the menu's image filenames live.
pub const DEFAULT_IMAGE_BASE_URL: &str =
    "https://github.com/Meta-Mobile-Developer-PC/Working-With-Data-API/blob/main/images";

// =============================================================================
// Catalog Settings
// =============================================================================

/// Remote catalog endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// URL answering a GET with `{ "menu": [...] }`.
    #[serde(default = "default_catalog_url")]
    pub url: String,

    /// Base that item image filenames are resolved against.
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            url: default_catalog_url(),
            image_base_url: default_image_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

// =============================================================================
// Search Settings
// =============================================================================

/// Search bar behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Quiescence window before a typed query runs (milliseconds).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Longest accepted search text, in characters.
    #[serde(default = "default_max_query_len")]
    pub max_query_len: usize,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_max_query_len() -> usize {
    MAX_QUERY_LEN
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            debounce_ms: default_debounce_ms(),
            max_query_len: default_max_query_len(),
        }
    }
}

// =============================================================================
// Database Settings
// =============================================================================

/// Local store location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file. Unset means the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Main Catalog Configuration
// =============================================================================

/// Complete catalog configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Remote endpoint.
    #[serde(default)]
    pub catalog: CatalogSettings,

    /// Search bar.
    #[serde(default)]
    pub search: SearchSettings,

    /// Local store.
    #[serde(default)]
    pub database: DatabaseSettings,
}

impl CatalogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (catalog.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// [`CatalogConfig::load`] with `env` standing in for the process environment.
    fn load_with_env(
        config_path: Option<PathBuf>,
        env: impl Fn(&str) -> Option<String>,
    ) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading catalog config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(env);
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load catalog config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SyncResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SyncError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Catalog config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SyncResult<()> {
        for (name, raw) in [
            ("catalog url", &self.catalog.url),
            ("image base url", &self.catalog.image_base_url),
        ] {
            let url = Url::parse(raw)
                .map_err(|e| SyncError::InvalidUrl(format!("{name} '{raw}': {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(SyncError::InvalidUrl(format!(
                    "{name} must start with http:// or https://, got: {raw}"
                )));
            }
        }

        if self.catalog.request_timeout_secs == 0 {
            return Err(SyncError::InvalidConfig(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.search.debounce_ms == 0 {
            return Err(SyncError::InvalidConfig(
                "debounce_ms must be greater than 0".into(),
            ));
        }

        if self.search.max_query_len == 0 {
            return Err(SyncError::InvalidConfig(
                "max_query_len must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(url) = env("LEMON_CATALOG_URL") {
            debug!(url = %url, "Overriding catalog URL from environment");
            self.catalog.url = url;
        }

        if let Some(url) = env("LEMON_IMAGE_BASE_URL") {
            self.catalog.image_base_url = url;
        }

        if let Some(path) = env("LEMON_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = Some(PathBuf::from(path));
        }

        if let Some(ms) = env("LEMON_DEBOUNCE_MS") {
            match ms.parse::<u64>() {
                Ok(ms) => self.search.debounce_ms = ms,
                Err(_) => warn!(value = %ms, "Ignoring non-numeric LEMON_DEBOUNCE_MS"),
            }
        }

        if let Some(secs) = env("LEMON_REQUEST_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) => self.catalog.request_timeout_secs = secs,
                Err(_) => warn!(value = %secs, "Ignoring non-numeric LEMON_REQUEST_TIMEOUT_SECS"),
            }
        }
    }

    fn project_dirs() -> Option<directories::ProjectDirs> {
        directories::ProjectDirs::from("com", "littlelemon", "menu")
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("catalog.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns the catalog URL.
    pub fn catalog_url(&self) -> SyncResult<Url> {
        Ok(Url::parse(&self.catalog.url)?)
    }

    /// Returns the request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog.request_timeout_secs)
    }

    /// Returns the search debounce window.
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.search.debounce_ms)
    }

    /// Returns the SQLite file to open.
    ///
    /// Falls back to the platform data directory, then the working directory.
    pub fn database_path(&self) -> PathBuf {
        self.database.path.clone().unwrap_or_else(|| {
            Self::project_dirs()
                .map(|dirs| dirs.data_dir().join("menu.db"))
                .unwrap_or_else(|| PathBuf::from("menu.db"))
        })
    }

    /// Resolves an item's image filename to a fetchable URL.
    ///
    /// ```rust,ignore
    /// config.image_url(&item) // ".../images/greekSalad.jpg?raw=true"
    /// ```
    pub fn image_url(&self, item: &MenuItem) -> String {
        format!(
            "{}/{}?raw=true",
            self.catalog.image_base_url.trim_end_matches('/'),
            item.image
        )
    }
}
