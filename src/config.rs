//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. Compiled defaults
//! 2. User config: `~/.config/smallgraphs/config.toml` (XDG) or platform config dir
//! 3. Project config: `.smallgraphs.toml`
//! 4. Environment variables: `SMALLGRAPHS_*`, with `__` separating sections
//!    (e.g. `SMALLGRAPHS_DESCRIBE__MISSING=none`)
//!
//! ```toml
//! [complement]
//! inherit_link = true
//!
//! [describe]
//! separator = "; "
//! missing = "null"
//!
//! [validation]
//! require_symmetric = true
//! ```

use std::ops::Deref;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Project config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = ".smallgraphs.toml";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "SMALLGRAPHS_";

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub complement: ComplementConfig,
    pub describe: DescribeConfig,
    pub validation: ValidationConfig,
}

/// Behaviour of the complement derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplementConfig {
    /// Copy the complement's link when the derived entity has none.
    pub inherit_link: bool,
}

impl Default for ComplementConfig {
    fn default() -> Self {
        Self { inherit_link: true }
    }
}

/// Formatting of union family descriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescribeConfig {
    /// Appended after every subfamily name.
    pub separator: String,
    /// Rendered in place of an absent link or complement.
    pub missing: String,
}

impl Default for DescribeConfig {
    fn default() -> Self {
        Self {
            separator: "; ".to_string(),
            missing: "null".to_string(),
        }
    }
}

/// Catalog validation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Report complement links that do not point back.
    pub require_symmetric: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            require_symmetric: true,
        }
    }
}

impl Config {
    /// Load config with layered resolution (defaults → user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(PROJECT_CONFIG_FILE))
    }

    /// Load config using an explicit project config file.
    pub fn load_from(project_config: &Path) -> Result<Self, ConfigError> {
        Self::figment(project_config)
            .extract()
            .map_err(ConfigError::from)
    }

    /// The layered figment, exposed so callers can merge extra providers.
    pub fn figment(project_config: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            // Layer 1: User config
            .merge(Toml::file(Self::user_config_path()))
            // Layer 2: Project config
            .merge(Toml::file(project_config))
            // Layer 3: Environment variables (highest priority)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// User config path: ~/.config/smallgraphs/config.toml (XDG) or platform config dir.
    fn user_config_path() -> PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home.join(".config").join("smallgraphs").join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        dirs::config_dir()
            .map(|p| p.join("smallgraphs").join("config.toml"))
            .unwrap_or_default()
    }
}
