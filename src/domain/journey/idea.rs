//! BusinessIdea - the idea a journey is built for.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{IdeaId, ValidationError};

/// Broad market category of a business idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdeaCategory {
    Technology,
    Retail,
    FoodBeverage,
    Services,
    Creative,
    HealthWellness,
    Education,
    #[default]
    Other,
}

impl IdeaCategory {
    /// Human-readable label used in stage copy.
    pub fn label(&self) -> &'static str {
        match self {
            IdeaCategory::Technology => "tech product",
            IdeaCategory::Retail => "retail business",
            IdeaCategory::FoodBeverage => "food business",
            IdeaCategory::Services => "service business",
            IdeaCategory::Creative => "creative studio",
            IdeaCategory::HealthWellness => "wellness business",
            IdeaCategory::Education => "education business",
            IdeaCategory::Other => "business",
        }
    }

    /// The word used for "the thing you sell" in stage copy.
    pub fn offering(&self) -> &'static str {
        match self {
            IdeaCategory::Technology => "product",
            IdeaCategory::Retail => "product line",
            IdeaCategory::FoodBeverage => "menu",
            IdeaCategory::Services => "service package",
            IdeaCategory::Creative => "portfolio",
            IdeaCategory::HealthWellness => "program",
            IdeaCategory::Education => "curriculum",
            IdeaCategory::Other => "offering",
        }
    }
}

/// How demanding the idea is to get off the ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
        };
        write!(f, "{}", s)
    }
}

/// A business idea selected by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessIdea {
    pub id: IdeaId,
    pub title: String,
    pub summary: String,
    pub category: IdeaCategory,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub target_market: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

impl BusinessIdea {
    /// Creates a new idea, returning error if the title is blank.
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        category: IdeaCategory,
        difficulty: Difficulty,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        Ok(Self {
            id: IdeaId::new(),
            title,
            summary: summary.into(),
            category,
            difficulty,
            target_market: None,
            required_skills: Vec::new(),
        })
    }

    /// Sets the target market.
    pub fn with_target_market(mut self, market: impl Into<String>) -> Self {
        self.target_market = Some(market.into());
        self
    }

    /// Sets the skills the idea relies on.
    pub fn with_required_skills(mut self, skills: Vec<String>) -> Self {
        self.required_skills = skills;
        self
    }

    /// One-paragraph summary handed to the AI client.
    pub fn brief(&self) -> String {
        let mut brief = format!(
            "{} ({}, {} difficulty): {}",
            self.title,
            self.category.label(),
            self.difficulty,
            self.summary.trim()
        );
        if let Some(market) = &self.target_market {
            brief.push_str(&format!(" Target market: {}.", market));
        }
        if !self.required_skills.is_empty() {
            brief.push_str(&format!(
                " Key skills: {}.",
                self.required_skills.join(", ")
            ));
        }
        brief
    }
}
