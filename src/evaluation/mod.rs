//! Simulated reader reactions.
//!
//! The aggregator picks personas from the registry, asks a
//! [`PersonaEvaluator`] for each verdict in turn, and ranks the results into
//! an [`EvaluationReport`].

pub mod aggregator;
pub mod evaluator;
pub mod personas;
pub mod report;

pub use aggregator::{DEFAULT_EXCERPT_CHARS, DEFAULT_PERSONA_COUNT, EvaluationAggregator};
pub use evaluator::{GenerationPersonaEvaluator, PersonaEvaluator};
pub use personas::{Persona, PersonaRegistry, builtin_personas};
pub use report::{Evaluation, EvaluationReport, FALLBACK_SCORE, MAX_SCORE, MIN_SCORE, Reaction};
