//! Evaluation results and the ranked report built from them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Persona;
use crate::errors::EvaluatorError;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;
/// Midpoint score given to fallback evaluations.
pub const FALLBACK_SCORE: u8 = 3;

/// How a reader reacted to an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reaction {
    #[serde(rename = "Great insight")]
    GreatInsight,
    #[serde(rename = "Boring")]
    Boring,
    #[serde(rename = "Already seen")]
    AlreadySeen,
    #[serde(rename = "Don't care")]
    DontCare,
    #[serde(rename = "Mixed")]
    Mixed,
}

impl Reaction {
    pub const ALL: [Reaction; 5] = [
        Reaction::GreatInsight,
        Reaction::Boring,
        Reaction::AlreadySeen,
        Reaction::DontCare,
        Reaction::Mixed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Reaction::GreatInsight => "Great insight",
            Reaction::Boring => "Boring",
            Reaction::AlreadySeen => "Already seen",
            Reaction::DontCare => "Don't care",
            Reaction::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for Reaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Reaction {
    type Err = EvaluatorError;

    /// Case-insensitive; typographic apostrophes are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('\u{2019}', "'").to_lowercase();
        Reaction::ALL
            .into_iter()
            .find(|r| r.label().to_lowercase() == normalized)
            .ok_or_else(|| EvaluatorError::UnknownReaction(s.to_string()))
    }
}

/// One persona's verdict on an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub persona_id: String,
    pub persona: String,
    pub score: u8,
    pub reaction: Reaction,
    pub comment: String,
    /// Substituted because the evaluator failed for this persona.
    #[serde(default)]
    pub fallback: bool,
}

impl Evaluation {
    /// Neutral entry used when a persona's evaluation fails.
    pub fn fallback(persona: &Persona) -> Self {
        Self {
            persona_id: persona.id.clone(),
            persona: persona.name.clone(),
            score: FALLBACK_SCORE,
            reaction: Reaction::Mixed,
            comment: format!("Interesting perspective from a {} standpoint.", persona.name),
            fallback: true,
        }
    }

    /// Star rating, e.g. `⭐⭐⭐☆☆` for a 3.
    pub fn stars(&self) -> String {
        let filled = self.score.min(MAX_SCORE) as usize;
        format!(
            "{}{}",
            "⭐".repeat(filled),
            "☆".repeat(MAX_SCORE as usize - filled)
        )
    }
}

/// Evaluations ranked by score, highest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationReport {
    evaluations: Vec<Evaluation>,
}

impl EvaluationReport {
    /// Rank evaluations by score descending. The sort is stable, so equal
    /// scores keep the order in which personas were selected.
    pub fn from_evaluations(mut evaluations: Vec<Evaluation>) -> Self {
        evaluations.sort_by(|a, b| b.score.cmp(&a.score));
        Self { evaluations }
    }

    pub fn evaluations(&self) -> &[Evaluation] {
        &self.evaluations
    }

    pub fn len(&self) -> usize {
        self.evaluations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.evaluations.is_empty()
    }

    pub fn fallback_count(&self) -> usize {
        self.evaluations.iter().filter(|e| e.fallback).count()
    }

    pub fn average_score(&self) -> Option<f64> {
        if self.evaluations.is_empty() {
            return None;
        }
        let total: u32 = self.evaluations.iter().map(|e| e.score as u32).sum();
        Some(total as f64 / self.evaluations.len() as f64)
    }

    /// Render the reactions document.
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# 💬 Reader Reactions\n\n");
        out.push_str(&format!(
            "**{} personas evaluated this article:**\n\n",
            self.evaluations.len()
        ));
        for eval in &self.evaluations {
            out.push_str(&format!("### {} {}\n", eval.persona, eval.stars()));
            out.push_str(&format!("> **{}**\n\n", eval.reaction));
            out.push_str(&format!("> {}\n\n", eval.comment));
        }
        out
    }
}
