pub mod config;
pub mod errors;
pub mod evaluation;
pub mod generation;
pub mod pipeline;
pub mod scribe_config;
pub mod store;
pub mod topic;
pub mod ui;
pub mod util;
pub mod workflow;
