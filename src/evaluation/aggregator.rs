//! Persona selection and fan-in of evaluation results.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

use super::{Evaluation, EvaluationReport, PersonaEvaluator, PersonaRegistry};
use crate::util::excerpt;

pub const DEFAULT_PERSONA_COUNT: usize = 3;
pub const DEFAULT_EXCERPT_CHARS: usize = 1000;

/// Runs a random subset of personas against an article and ranks the results.
///
/// A failing persona never fails the report: it is replaced by a neutral
/// [`Evaluation::fallback`] entry, so the report always holds one entry per
/// selected persona.
pub struct EvaluationAggregator {
    registry: PersonaRegistry,
    evaluator: Arc<dyn PersonaEvaluator>,
    rng: StdRng,
    excerpt_chars: usize,
}

impl EvaluationAggregator {
    pub fn new(registry: PersonaRegistry, evaluator: Arc<dyn PersonaEvaluator>) -> Self {
        Self {
            registry,
            evaluator,
            rng: StdRng::from_entropy(),
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
        }
    }

    /// Deterministic persona selection.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_excerpt_chars(mut self, chars: usize) -> Self {
        self.excerpt_chars = chars;
        self
    }

    pub fn registry(&self) -> &PersonaRegistry {
        &self.registry
    }

    /// Pick `count` registry indices without replacement, clamped to the
    /// registry size. Order is the random selection order.
    pub fn select(&mut self, count: usize) -> Vec<usize> {
        let amount = count.min(self.registry.len());
        rand::seq::index::sample(&mut self.rng, self.registry.len(), amount).into_vec()
    }

    pub async fn evaluate(&mut self, title: &str, content: &str, count: usize) -> EvaluationReport {
        let selected = self.select(count);
        let excerpt = excerpt(content, self.excerpt_chars);
        tracing::info!(requested = count, selected = selected.len(), "evaluating article");

        let mut evaluations = Vec::with_capacity(selected.len());
        for index in selected {
            let Some(persona) = self.registry.get(index) else {
                continue;
            };
            let evaluation = match self.evaluator.evaluate(persona, title, &excerpt).await {
                Ok(evaluation) => {
                    tracing::debug!(persona = %persona.id, score = evaluation.score, "persona evaluated");
                    evaluation
                }
                Err(e) => {
                    tracing::warn!(persona = %persona.id, error = %e, "persona evaluation failed, using fallback");
                    Evaluation::fallback(persona)
                }
            };
            evaluations.push(evaluation);
        }

        EvaluationReport::from_evaluations(evaluations)
    }
}
