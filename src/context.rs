//! Application context owning the registry and configuration.

use crate::config::Config;
use crate::error::AppError;
use crate::repositories::SmallGraphRepository;
use crate::services::{FamilyService, ValidationService};

/// Root application context.
///
/// Owns the small graph registry and hands out services that borrow it.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Registry of all small graphs and families.
    pub repo: SmallGraphRepository,
    /// Application configuration.
    pub config: Config,
}

impl Context {
    /// Creates an empty context with the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            repo: SmallGraphRepository::new(),
            config,
        }
    }

    /// Creates an empty context from the layered configuration.
    pub fn load() -> Result<Self, AppError> {
        let config = Config::load()?;
        tracing::debug!(?config, "Loaded configuration");
        Ok(Self::new(config))
    }

    pub fn families(&mut self) -> FamilyService<'_> {
        FamilyService::new(&mut self.repo, &self.config)
    }

    pub fn validation(&self) -> ValidationService<'_> {
        ValidationService::new(&self.repo, &self.config)
    }
}
