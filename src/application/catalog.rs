//! StageCatalog - produces a valid stage list for a business idea.
//!
//! Generation goes through the AI client with a timeout. Any generation
//! failure falls back to the deterministic template, so callers always get a
//! renderable list and only learn about the failure through [`CatalogBuild`].

use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::domain::catalog::{CatalogBounds, DraftValidator, GenerationError, StageTemplate};
use crate::domain::foundation::ValidationError;
use crate::domain::journey::{BusinessIdea, Stage};
use crate::ports::{AIClient, AIError};

/// Where a stage list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    Generated,
    Fallback,
}

/// Result of building a catalog. `stages` is always valid and non-empty.
#[derive(Debug, Clone)]
pub struct CatalogBuild {
    pub stages: Vec<Stage>,
    pub source: CatalogSource,
    /// Why generation was not used, when it was attempted and failed.
    pub failure: Option<GenerationError>,
}

impl CatalogBuild {
    pub fn used_fallback(&self) -> bool {
        self.source == CatalogSource::Fallback
    }
}

/// Catalog settings derived from configuration.
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub bounds: CatalogBounds,
    pub ai_enabled: bool,
    pub ai_timeout: Duration,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl CatalogSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            bounds: config.catalog.bounds(),
            ai_enabled: config.ai.enabled,
            ai_timeout: config.ai.timeout(),
        }
    }
}

/// Builds stage lists from templates or AI generation.
pub struct StageCatalog {
    ai_client: Arc<dyn AIClient>,
    settings: CatalogSettings,
}

impl StageCatalog {
    pub fn new(ai_client: Arc<dyn AIClient>, settings: CatalogSettings) -> Self {
        Self {
            ai_client,
            settings,
        }
    }

    pub fn bounds(&self) -> CatalogBounds {
        self.settings.bounds
    }

    /// Picks the idea a journey should be built for.
    ///
    /// An explicit selection wins; otherwise the first available idea is
    /// used. `None` when there is nothing to choose from.
    pub fn resolve_idea<'a>(
        selected: Option<&'a BusinessIdea>,
        available: &'a [BusinessIdea],
    ) -> Option<&'a BusinessIdea> {
        selected.or_else(|| available.first())
    }

    /// Template of the default size. Pure and infallible.
    pub fn build_template(&self, idea: &BusinessIdea) -> Vec<Stage> {
        StageTemplate::build(idea, self.settings.bounds.default_stages)
    }

    /// Asks the AI client for exactly `desired_count` stages.
    ///
    /// # Errors
    ///
    /// - `Transport` when the call fails or exceeds the configured timeout
    /// - `MalformedResponse` when the reply is not a valid stage list
    pub async fn request_generation(
        &self,
        idea: &BusinessIdea,
        desired_count: usize,
    ) -> Result<Vec<Stage>, GenerationError> {
        let brief = idea.brief();
        let call = self.ai_client.generate_stages(&brief, desired_count);
        let drafts = match tokio::time::timeout(self.settings.ai_timeout, call).await {
            Ok(Ok(drafts)) => drafts,
            Ok(Err(err)) => return Err(classify(err)),
            Err(_) => {
                return Err(GenerationError::transport(
                    AIError::timeout(self.settings.ai_timeout.as_secs()).to_string(),
                ))
            }
        };

        DraftValidator::into_stages(drafts, desired_count)
    }

    /// Builds a catalog of `desired_count` stages, falling back to the template.
    ///
    /// # Errors
    ///
    /// Only a `desired_count` outside the configured bounds is an error.
    pub async fn build(
        &self,
        idea: &BusinessIdea,
        desired_count: usize,
    ) -> Result<CatalogBuild, ValidationError> {
        let desired_count = self.settings.bounds.check(desired_count)?;

        if !self.settings.ai_enabled {
            tracing::debug!(idea_id = %idea.id, "AI generation disabled, using template");
            return Ok(CatalogBuild {
                stages: self.build_template(idea),
                source: CatalogSource::Fallback,
                failure: None,
            });
        }

        match self.request_generation(idea, desired_count).await {
            Ok(stages) => {
                tracing::info!(idea_id = %idea.id, stage_count = stages.len(), "Generated stage catalog");
                Ok(CatalogBuild {
                    stages,
                    source: CatalogSource::Generated,
                    failure: None,
                })
            }
            Err(err) => {
                tracing::warn!(idea_id = %idea.id, error = %err, "Stage generation failed, using template");
                Ok(CatalogBuild {
                    stages: self.build_template(idea),
                    source: CatalogSource::Fallback,
                    failure: Some(err),
                })
            }
        }
    }
}

fn classify(err: AIError) -> GenerationError {
    if err.is_malformed_response() {
        GenerationError::malformed(err.to_string())
    } else {
        GenerationError::transport(err.to_string())
    }
}
