//! CLI command implementations.
//!
//! Each submodule owns one `Commands` variant:
//!
//! | Module     | Commands handled |
//! |------------|------------------|
//! | `run`      | `Run`            |
//! | `evaluate` | `Evaluate`       |
//! | `status`   | `Status`         |
//! | `config`   | `Config`         |

pub mod config;
pub mod evaluate;
pub mod run;
pub mod status;

pub use config::cmd_config;
pub use evaluate::cmd_evaluate;
pub use run::{RunArgs, cmd_run};
pub use status::cmd_status;

use std::sync::Arc;

use scribe::config::Config;
use scribe::evaluation::{EvaluationAggregator, GenerationPersonaEvaluator};
use scribe::generation::ChatClient;

/// Stage client plus an aggregator whose evaluator shares its connection
/// pool with evaluation sampling settings.
pub(crate) fn build_services(config: &Config) -> (Arc<ChatClient>, EvaluationAggregator) {
    let toml = config.toml();
    let client = ChatClient::new(toml.generation_settings(config.api_key.clone()));
    let evaluation_client =
        client.with_settings(toml.evaluation_settings(config.api_key.clone()));
    let evaluator = GenerationPersonaEvaluator::new(Arc::new(evaluation_client));
    let aggregator = EvaluationAggregator::new(toml.persona_registry(), Arc::new(evaluator))
        .with_excerpt_chars(toml.excerpts.article_for_persona);
    (Arc::new(client), aggregator)
}
