//! Article pipeline stages.
//!
//! [`StageRunner`] executes one stage at a time against a topic's
//! [`ArtifactStore`](crate::store::ArtifactStore); [`Stage`] names the stages
//! and their dependency order.

pub mod prompts;
pub mod remarks;
mod revision;
pub mod runner;
pub mod stage;

pub use prompts::ExcerptLimits;
pub use remarks::{RemarksGuard, remarks_template};
pub use runner::{NoReview, ReviewDecision, StageOutput, StageReview, StageRunner};
pub use stage::{Stage, suggest_next};
