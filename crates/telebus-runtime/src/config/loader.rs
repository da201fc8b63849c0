//! Layered configuration loading on figment.
//!
//! Sources are merged in this order, later ones winning:
//!
//! ```text
//! TelebusConfig::default()
//!   └─ telebus.toml               (first search path that has one)
//!       └─ telebus.{profile}.toml (next to it)
//!           └─ TELEBUS_* variables
//!               └─ ConfigLoader::merge(..)
//! ```
//!
//! Formats are chosen by cargo feature: `toml-config` (default) reads
//! `telebus.toml` / `config.toml`, `yaml-config` reads the `.yaml` and `.yml`
//! spellings of the same names.
//!
//! Nested keys in environment variables use `__`:
//! `TELEBUS_LOGGING__LEVEL=debug`, `TELEBUS_COMMANDS__SUFFIX_MATCHING=legacy`.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use figment::Figment;
#[cfg(any(feature = "toml-config", feature = "yaml-config"))]
use figment::providers::Format;
use figment::providers::{self, Env, Serialized};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::TelebusConfig;
use super::validation::validate_config;

/// Prefix of the environment variables read by the loader.
pub const ENV_PREFIX: &str = "TELEBUS_";

/// File stems tried in each search path, in order.
const FILE_STEMS: [&str; 2] = ["telebus", "config"];

/// Deployment profile; selects the `telebus.{profile}.*` overlay file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Development,
    Production,
    Custom(String),
}

impl Profile {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Reads `TELEBUS_PROFILE`, falling back to development.
    pub fn from_env() -> Self {
        std::env::var(format!("{ENV_PREFIX}PROFILE"))
            .map(|name| Self::from(name.as_str()))
            .unwrap_or_default()
    }
}

impl From<&str> for Profile {
    fn from(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        match name.as_str() {
            "dev" | "development" => Self::Development,
            "prod" | "production" => Self::Production,
            _ => Self::Custom(name),
        }
    }
}

impl FromStr for Profile {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A configuration file format compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    #[cfg(feature = "toml-config")]
    Toml,
    #[cfg(feature = "yaml-config")]
    Yaml,
}

impl ConfigFormat {
    /// Every enabled format, in search order.
    pub const ENABLED: &'static [ConfigFormat] = &[
        #[cfg(feature = "toml-config")]
        Self::Toml,
        #[cfg(feature = "yaml-config")]
        Self::Yaml,
    ];

    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(OsStr::to_str)? {
            #[cfg(feature = "toml-config")]
            "toml" => Some(Self::Toml),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => &["toml"],
            #[cfg(feature = "yaml-config")]
            Self::Yaml => &["yaml", "yml"],
        }
    }

    fn merge(self, figment: Figment, path: &Path) -> Figment {
        match self {
            #[cfg(feature = "toml-config")]
            Self::Toml => figment.merge(providers::Toml::file(path)),
            #[cfg(feature = "yaml-config")]
            Self::Yaml => figment.merge(providers::Yaml::file(path)),
        }
    }
}

/// One file picked by [`ConfigLoader::discover`].
#[derive(Debug, Clone, PartialEq, Eq)]
struct ConfigFile {
    path: PathBuf,
    format: ConfigFormat,
}

/// Builder for a layered [`TelebusConfig`].
///
/// ```rust,ignore
/// let config = ConfigLoader::new()
///     .profile("production")
///     .search_path("/etc/telebus")
///     .load()?;
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    profile: Profile,
    search_paths: Vec<PathBuf>,
    explicit_file: Option<PathBuf>,
    read_env: bool,
    overrides: Figment,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            profile: Profile::from_env(),
            search_paths: Vec::new(),
            explicit_file: None,
            read_env: true,
            overrides: Figment::new(),
        }
    }

    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.profile = Profile::from(profile.as_ref());
        self
    }

    /// Adds a directory to search. Without any, the current directory and
    /// the user config directory are searched.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    pub fn with_current_dir(self) -> Self {
        match std::env::current_dir() {
            Ok(cwd) => self.search_path(cwd),
            Err(_) => self,
        }
    }

    /// Adds `<config dir>/telebus` (`~/.config/telebus` on Linux).
    pub fn with_user_config_dir(self) -> Self {
        match dirs::config_dir() {
            Some(dir) => self.search_path(dir.join("telebus")),
            None => self,
        }
    }

    /// Loads exactly this file instead of searching. It must exist.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.explicit_file = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_env(mut self) -> Self {
        self.read_env = true;
        self
    }

    pub fn without_env(mut self) -> Self {
        self.read_env = false;
        self
    }

    /// Layers `value` above every other source.
    ///
    /// Only the keys `value` serializes are overridden, so a partial map such
    /// as `json!({ "logging": { "level": "debug" } })` leaves the rest of the
    /// configuration alone. A whole [`TelebusConfig`] serializes every field
    /// and therefore replaces every value, defaults included.
    pub fn merge<T: Serialize>(mut self, value: T) -> Self {
        self.overrides = self.overrides.merge(Serialized::defaults(value));
        self
    }

    /// Merges, extracts and validates the configuration.
    pub fn load(self) -> ConfigResult<TelebusConfig> {
        let files = self.discover()?;

        let mut figment = Figment::from(Serialized::defaults(TelebusConfig::default()));
        for file in &files {
            info!(path = %file.path.display(), "Loading configuration file");
            figment = file.format.merge(figment, &file.path);
        }
        if self.read_env {
            trace!(prefix = ENV_PREFIX, "Reading environment overrides");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).ignore(&["PROFILE"]).split("__"));
        }
        figment = figment.merge(self.overrides);

        let config: TelebusConfig = figment
            .extract()
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        validate_config(&config)?;

        debug!(
            profile = %self.profile,
            files = files.len(),
            bots = config.bots.len(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Lists the files [`load`](Self::load) would read, lowest priority first.
    fn discover(&self) -> ConfigResult<Vec<ConfigFile>> {
        if let Some(path) = &self.explicit_file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            let format = ConfigFormat::from_path(path)
                .ok_or_else(|| ConfigError::UnsupportedFormat(path.clone()))?;
            return Ok(vec![ConfigFile {
                path: path.clone(),
                format,
            }]);
        }

        for dir in self.search_dirs() {
            for stem in FILE_STEMS {
                for &format in ConfigFormat::ENABLED {
                    for ext in format.extensions() {
                        let main = dir.join(format!("{stem}.{ext}"));
                        if !main.exists() {
                            continue;
                        }

                        let mut files = vec![ConfigFile { path: main, format }];
                        let overlay = dir.join(format!("{stem}.{}.{ext}", self.profile));
                        if overlay.exists() {
                            files.push(ConfigFile {
                                path: overlay,
                                format,
                            });
                        }
                        return Ok(files);
                    }
                }
            }
        }

        warn!("No configuration file found, using defaults");
        Ok(Vec::new())
    }

    fn search_dirs(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        std::env::current_dir()
            .ok()
            .into_iter()
            .chain(dirs::config_dir().map(|dir| dir.join("telebus")))
            .collect()
    }
}

/// Loads configuration from the default locations.
pub fn load_config() -> ConfigResult<TelebusConfig> {
    ConfigLoader::new().load()
}

/// Loads one file plus environment overrides.
pub fn load_config_from_file(path: impl AsRef<Path>) -> ConfigResult<TelebusConfig> {
    ConfigLoader::new().file(path).load()
}
