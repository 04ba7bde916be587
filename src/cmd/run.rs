//! Workflow execution command: `scribe run`.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use scribe::config::Config;
use scribe::pipeline::{NoReview, Stage, StageReview};
use scribe::ui::{EditorReview, StageProgress, print_run_summary};
use scribe::workflow::{WorkflowDriver, WorkflowOptions};

use super::build_services;

pub struct RunArgs {
    pub topic: String,
    pub stage: Option<Stage>,
    pub force: bool,
    pub skeleton: Option<PathBuf>,
    pub verify: bool,
    pub evaluate: Option<usize>,
    pub interactive: bool,
}

pub async fn cmd_run(config: &Config, args: RunArgs) -> Result<()> {
    let skeleton = match &args.skeleton {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read skeleton file: {}", path.display()))?,
        ),
        None => None,
    };

    let options = WorkflowOptions {
        topic: args.topic,
        stage: args.stage,
        force: args.force,
        skeleton,
        verify: args.verify,
        evaluate: args.evaluate,
    };

    let (generator, aggregator) = build_services(config);
    let progress = Arc::new(StageProgress::new(config.verbose));
    let mut driver = WorkflowDriver::new(config.output_dir(), generator, aggregator)
        .with_excerpts(config.toml().excerpts)
        .with_default_personas(config.toml().evaluation.personas)
        .with_observer(progress.clone());

    let mut review: Box<dyn StageReview + Send> = if args.interactive {
        Box::new(EditorReview::new().with_progress(progress.bar()))
    } else {
        Box::new(NoReview)
    };

    let result = driver.run(&options, review.as_mut()).await;
    progress.finish();

    let run = result.with_context(|| format!("Workflow failed for topic '{}'", options.topic))?;
    print_run_summary(&run);
    Ok(())
}
