//! Stage Template - deterministic stage lists built from idea attributes.

use crate::domain::foundation::StageId;
use crate::domain::journey::{BusinessIdea, Difficulty, Stage, StageKind};

/// One phase of the canonical business blueprint, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    Research,
    Validation,
    Planning,
    Legal,
    Funding,
    Product,
    Branding,
    Launch,
    Marketing,
    Growth,
}

impl Phase {
    /// All phases in canonical order.
    pub fn all() -> &'static [Phase] {
        &[
            Phase::Research,
            Phase::Validation,
            Phase::Planning,
            Phase::Legal,
            Phase::Funding,
            Phase::Product,
            Phase::Branding,
            Phase::Launch,
            Phase::Marketing,
            Phase::Growth,
        ]
    }

    /// Slug used in template stage ids.
    pub fn slug(&self) -> &'static str {
        match self {
            Phase::Research => "research",
            Phase::Validation => "validation",
            Phase::Planning => "planning",
            Phase::Legal => "legal",
            Phase::Funding => "funding",
            Phase::Product => "product",
            Phase::Branding => "branding",
            Phase::Launch => "launch",
            Phase::Marketing => "marketing",
            Phase::Growth => "growth",
        }
    }

    /// Stage kind the phase renders as.
    pub fn kind(&self) -> StageKind {
        match self {
            Phase::Research => StageKind::Research,
            Phase::Validation => StageKind::Validation,
            Phase::Planning => StageKind::Planning,
            Phase::Legal => StageKind::Legal,
            Phase::Funding => StageKind::Finance,
            Phase::Product => StageKind::Product,
            Phase::Branding => StageKind::Branding,
            Phase::Launch => StageKind::Launch,
            Phase::Marketing => StageKind::Marketing,
            Phase::Growth => StageKind::Growth,
        }
    }

    /// Phases ranked by how much they matter at a difficulty level.
    ///
    /// Beginners get to a first sale quickly; advanced ideas front-load
    /// funding and legal work.
    pub fn priority(difficulty: Difficulty) -> &'static [Phase] {
        use Phase::*;
        match difficulty {
            Difficulty::Beginner => &[
                Research, Validation, Launch, Marketing, Product, Planning, Branding, Growth,
                Legal, Funding,
            ],
            Difficulty::Intermediate => &[
                Research, Planning, Product, Launch, Marketing, Validation, Branding, Legal,
                Funding, Growth,
            ],
            Difficulty::Advanced => &[
                Research, Planning, Funding, Legal, Product, Launch, Validation, Marketing,
                Branding, Growth,
            ],
        }
    }

    fn copy(&self, idea: &BusinessIdea) -> (String, String) {
        let label = idea.category.label();
        let offering = idea.category.offering();
        let audience = idea
            .target_market
            .as_deref()
            .unwrap_or("your future customers");

        match self {
            Phase::Research => (
                "Research the Market".to_string(),
                format!("Study {} and the competitors already serving them.", audience),
            ),
            Phase::Validation => (
                "Validate the Idea".to_string(),
                format!("Talk to real people and confirm they would pay for your {}.", offering),
            ),
            Phase::Planning => (
                "Write the Business Plan".to_string(),
                format!("Set goals, pricing and a first-year budget for your {}.", label),
            ),
            Phase::Legal => (
                "Make It Official".to_string(),
                format!("Register your {}, pick a structure and sort out permits.", label),
            ),
            Phase::Funding => (
                "Secure Funding".to_string(),
                format!("Work out what launching your {} costs and where the money comes from.", label),
            ),
            Phase::Product => (
                format!("Build Your {}", title_case(offering)),
                format!("Create a first version of your {} you can put in front of customers.", offering),
            ),
            Phase::Branding => (
                "Shape the Brand".to_string(),
                format!("Choose a name, look and voice that fit {}.", audience),
            ),
            Phase::Launch => (
                "Launch".to_string(),
                format!("Open for business and make the first sale of your {}.", offering),
            ),
            Phase::Marketing => (
                "Find Customers".to_string(),
                format!("Pick the channels where {} spend their time and start showing up.", audience),
            ),
            Phase::Growth => (
                "Grow".to_string(),
                format!("Measure what works, then scale your {}.", label),
            ),
        }
    }
}

fn title_case(words: &str) -> String {
    words
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds template stage lists.
pub struct StageTemplate;

impl StageTemplate {
    /// Builds `count` stages for an idea.
    ///
    /// Keeps the `count` highest-priority phases for the idea's difficulty,
    /// in canonical order. `count` is capped at the number of phases and
    /// raised to one. Always succeeds and is deterministic.
    pub fn build(idea: &BusinessIdea, count: usize) -> Vec<Stage> {
        let count = count.clamp(1, Phase::all().len());

        let mut phases: Vec<Phase> = Phase::priority(idea.difficulty)[..count].to_vec();
        phases.sort();

        phases
            .into_iter()
            .enumerate()
            .map(|(order, phase)| {
                let (title, description) = phase.copy(idea);
                Stage {
                    id: template_stage_id(order, phase),
                    title,
                    description,
                    kind: phase.kind(),
                    order,
                }
            })
            .collect()
    }
}

fn template_stage_id(order: usize, phase: Phase) -> StageId {
    StageId::new(format!("tpl-{}-{}", order, phase.slug()))
        .unwrap_or_else(|_| StageId::generated())
}
