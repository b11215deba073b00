//! Stage ("island") definitions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StageId;

/// Categorical tag of a stage.
///
/// Views use it to pick an icon and colour; the engine treats it as an
/// opaque label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Research,
    Validation,
    Planning,
    Legal,
    Finance,
    Product,
    Branding,
    Launch,
    Marketing,
    Growth,
    #[default]
    Milestone,
}

impl StageKind {
    /// Maps a free-form label (as produced by the AI client) to a kind.
    ///
    /// Unknown labels become [`StageKind::Milestone`].
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "research" | "discovery" => StageKind::Research,
            "validation" | "validate" => StageKind::Validation,
            "planning" | "plan" | "strategy" => StageKind::Planning,
            "legal" | "compliance" => StageKind::Legal,
            "finance" | "funding" | "financial" => StageKind::Finance,
            "product" | "development" | "build" => StageKind::Product,
            "branding" | "brand" | "design" => StageKind::Branding,
            "launch" => StageKind::Launch,
            "marketing" | "sales" => StageKind::Marketing,
            "growth" | "scale" | "scaling" => StageKind::Growth,
            _ => StageKind::Milestone,
        }
    }
}

/// One step of a journey. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub title: String,
    pub description: String,
    pub kind: StageKind,
    /// Zero-based rank; contiguous within one catalog.
    pub order: usize,
}

/// Unvalidated stage as returned by the AI client.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StageDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub order: Option<usize>,
}

impl StageDraft {
    /// Creates a draft with just a title and description.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: None,
            order: None,
        }
    }

    /// Sets the kind label.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Sets the explicit order.
    pub fn with_order(mut self, order: usize) -> Self {
        self.order = Some(order);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_label_maps_synonyms() {
        assert_eq!(StageKind::from_label("Funding"), StageKind::Finance);
        assert_eq!(StageKind::from_label(" scale "), StageKind::Growth);
        assert_eq!(StageKind::from_label("LAUNCH"), StageKind::Launch);
    }

    #[test]
    fn from_label_defaults_to_milestone() {
        assert_eq!(StageKind::from_label("celebrate"), StageKind::Milestone);
        assert_eq!(StageKind::from_label(""), StageKind::Milestone);
    }

    #[test]
    fn draft_deserializes_with_missing_optionals() {
        let draft: StageDraft = serde_json::from_str(r#"{"title":"Find a niche"}"#).unwrap();
        assert_eq!(draft.title, "Find a niche");
        assert!(draft.description.is_empty());
        assert_eq!(draft.kind, None);
        assert_eq!(draft.order, None);
    }
}
