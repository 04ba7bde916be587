//! Persona evaluator seam and its generation-backed implementation.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use super::{Evaluation, MAX_SCORE, MIN_SCORE, Persona, Reaction};
use crate::errors::EvaluatorError;
use crate::generation::{GenerationService, is_error_payload};
use crate::util::extract_json_object;

/// Scores an article excerpt from one persona's point of view.
#[async_trait]
pub trait PersonaEvaluator: Send + Sync {
    async fn evaluate(
        &self,
        persona: &Persona,
        title: &str,
        excerpt: &str,
    ) -> Result<Evaluation, EvaluatorError>;
}

/// Evaluator that asks a [`GenerationService`] to answer in character and
/// parses the JSON it returns.
pub struct GenerationPersonaEvaluator {
    generator: Arc<dyn GenerationService>,
}

#[derive(Debug, Deserialize)]
struct RawEvaluation {
    score: i64,
    reaction: String,
    #[serde(default)]
    comment: String,
}

impl GenerationPersonaEvaluator {
    pub fn new(generator: Arc<dyn GenerationService>) -> Self {
        Self { generator }
    }
}

pub fn persona_prompt(persona: &Persona, title: &str, excerpt: &str) -> String {
    let reactions = Reaction::ALL
        .iter()
        .map(Reaction::label)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"You are a LinkedIn user with this profile:

Persona: {name}
Background: {background}
Focus Areas: {focus}
Communication Style: {style}

An article was posted:
Title: {title}

Content (excerpt):
{excerpt}

Your task: Evaluate this article from YOUR perspective.

Return a JSON response with:
{{
    "score": <1-5 integer>,
    "reaction": "<one of: {reactions}>",
    "comment": "<1-2 sentences, short, staying in character, funny if appropriate>"
}}

Keep the comment SHORT - max 2 sentences. Make it authentic to your persona.
If the reaction is "Boring", make a sarcastic comment.
If "Already seen", reference what you've heard before.
If "Great insight", be specific about what resonates.

Return ONLY valid JSON, no markdown or extra text."#,
        name = persona.name,
        background = persona.background,
        focus = persona.focus_areas.join(", "),
        style = persona.style,
    )
}

/// Parse an evaluator reply into an [`Evaluation`] for `persona`.
///
/// Surrounding prose or code fences around the JSON object are tolerated.
pub fn parse_evaluation(persona: &Persona, reply: &str) -> Result<Evaluation, EvaluatorError> {
    let json = extract_json_object(reply)
        .ok_or_else(|| EvaluatorError::Unparsable("no JSON object in reply".to_string()))?;
    let raw: RawEvaluation =
        serde_json::from_str(&json).map_err(|e| EvaluatorError::Unparsable(e.to_string()))?;

    if raw.score < MIN_SCORE as i64 || raw.score > MAX_SCORE as i64 {
        return Err(EvaluatorError::ScoreOutOfRange { score: raw.score });
    }
    let reaction: Reaction = raw.reaction.parse()?;

    Ok(Evaluation {
        persona_id: persona.id.clone(),
        persona: persona.name.clone(),
        score: raw.score as u8,
        reaction,
        comment: raw.comment.trim().to_string(),
        fallback: false,
    })
}

#[async_trait]
impl PersonaEvaluator for GenerationPersonaEvaluator {
    async fn evaluate(
        &self,
        persona: &Persona,
        title: &str,
        excerpt: &str,
    ) -> Result<Evaluation, EvaluatorError> {
        let prompt = persona_prompt(persona, title, excerpt);
        let reply = self
            .generator
            .complete(&prompt)
            .await
            .map_err(|e| EvaluatorError::Generation(e.to_string()))?;
        if is_error_payload(&reply) {
            return Err(EvaluatorError::Generation(reply));
        }
        parse_evaluation(persona, &reply)
    }
}
