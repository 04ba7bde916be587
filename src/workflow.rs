//! Workflow driver: composes stages in dependency order.
//!
//! ```text
//! run_all:   research ─▶ plan ─▶ article ─▶ [verify] ─▶ [feedback]
//! run_stage: any single stage, failing fast on missing prerequisites
//! ```
//!
//! Stages run strictly one after another; each reads what the previous one
//! wrote to disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::StageError;
use crate::evaluation::{DEFAULT_PERSONA_COUNT, EvaluationAggregator, EvaluationReport};
use crate::generation::GenerationService;
use crate::pipeline::{ExcerptLimits, Stage, StageOutput, StageReview, StageRunner};
use crate::store::ArtifactStore;

/// Options for one workflow invocation.
#[derive(Debug, Clone, Default)]
pub struct WorkflowOptions {
    pub topic: String,
    /// Run only this stage. `None` runs the full sequence.
    pub stage: Option<Stage>,
    pub force: bool,
    /// Outline folded verbatim into the planning prompt.
    pub skeleton: Option<String>,
    /// Full run only: verify claims after the article.
    pub verify: bool,
    /// Full run: evaluate with this many personas after the article.
    /// Single feedback stage: persona count (default when `None`).
    pub evaluate: Option<usize>,
}

impl WorkflowOptions {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }
}

/// Receives stage lifecycle notifications from the driver.
pub trait StageObserver: Send + Sync {
    fn stage_started(&self, _stage: Stage, _topic: &str) {}
    fn stage_finished(&self, _output: &StageOutput) {}
    fn stage_failed(&self, _stage: Stage, _error: &StageError) {}
}

/// What a workflow invocation produced.
#[derive(Debug, Clone)]
pub struct WorkflowRun {
    pub slug: String,
    pub dir: PathBuf,
    pub outputs: Vec<StageOutput>,
    pub report: Option<EvaluationReport>,
}

impl WorkflowRun {
    pub fn output(&self, stage: Stage) -> Option<&StageOutput> {
        self.outputs.iter().find(|o| o.stage == stage)
    }
}

pub struct WorkflowDriver {
    output_root: PathBuf,
    generator: Arc<dyn GenerationService>,
    aggregator: EvaluationAggregator,
    excerpts: ExcerptLimits,
    default_personas: usize,
    observer: Option<Arc<dyn StageObserver>>,
}

impl WorkflowDriver {
    pub fn new(
        output_root: impl Into<PathBuf>,
        generator: Arc<dyn GenerationService>,
        aggregator: EvaluationAggregator,
    ) -> Self {
        Self {
            output_root: output_root.into(),
            generator,
            aggregator,
            excerpts: ExcerptLimits::default(),
            default_personas: DEFAULT_PERSONA_COUNT,
            observer: None,
        }
    }

    pub fn with_excerpts(mut self, excerpts: ExcerptLimits) -> Self {
        self.excerpts = excerpts;
        self
    }

    pub fn with_default_personas(mut self, count: usize) -> Self {
        self.default_personas = count;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn StageObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Stage runner bound to `topic`, creating its directory if needed.
    pub fn runner(&self, topic: &str) -> Result<StageRunner, StageError> {
        let store = ArtifactStore::open(&self.output_root, topic)?;
        Ok(StageRunner::new(store, Arc::clone(&self.generator)).with_excerpts(self.excerpts))
    }

    /// Run the selected stage, or the full sequence when none is selected.
    pub async fn run(
        &mut self,
        options: &WorkflowOptions,
        review: &mut (dyn StageReview + Send),
    ) -> Result<WorkflowRun, StageError> {
        match options.stage {
            Some(stage) => self.run_stage(stage, options, review).await,
            None => self.run_all(options, review).await,
        }
    }

    pub async fn run_stage(
        &mut self,
        stage: Stage,
        options: &WorkflowOptions,
        review: &mut (dyn StageReview + Send),
    ) -> Result<WorkflowRun, StageError> {
        let runner = self.runner(&options.topic)?;
        tracing::info!(%stage, topic = %options.topic, force = options.force, "running stage");

        let mut report = None;
        self.started(stage, &options.topic);
        let result = match stage {
            Stage::Research => runner.research_with_review(options.force, review).await,
            Stage::Plan => {
                runner
                    .plan_with_review(options.skeleton.as_deref(), options.force, review)
                    .await
            }
            Stage::Article => runner.write_article(options.force, review).await,
            Stage::Revise => runner.revise(options.force).await,
            Stage::Verify => runner.verify(options.force).await,
            Stage::Feedback => {
                let count = options.evaluate.unwrap_or(self.default_personas);
                runner
                    .feedback(&mut self.aggregator, count, options.force)
                    .await
                    .map(|(output, evaluated)| {
                        report = evaluated;
                        output
                    })
            }
        };
        let output = self.finished(stage, result)?;

        Ok(WorkflowRun {
            slug: runner.store().slug().to_string(),
            dir: runner.store().dir().to_path_buf(),
            outputs: vec![output],
            report,
        })
    }

    /// research → plan → article, then the optional verify and feedback
    /// steps. The article's remarks template is already on disk before
    /// either optional step starts.
    pub async fn run_all(
        &mut self,
        options: &WorkflowOptions,
        review: &mut (dyn StageReview + Send),
    ) -> Result<WorkflowRun, StageError> {
        let runner = self.runner(&options.topic)?;
        tracing::info!(topic = %options.topic, force = options.force, "running full workflow");

        let topic = options.topic.as_str();
        let mut outputs = Vec::new();

        self.started(Stage::Research, topic);
        let result = runner.research_with_review(options.force, review).await;
        outputs.push(self.finished(Stage::Research, result)?);

        self.started(Stage::Plan, topic);
        let result = runner
            .plan_with_review(options.skeleton.as_deref(), options.force, review)
            .await;
        outputs.push(self.finished(Stage::Plan, result)?);

        self.started(Stage::Article, topic);
        let result = runner.write_article(options.force, review).await;
        outputs.push(self.finished(Stage::Article, result)?);

        if options.verify {
            self.started(Stage::Verify, topic);
            let result = runner.verify(options.force).await;
            outputs.push(self.finished(Stage::Verify, result)?);
        }

        let mut report = None;
        if let Some(count) = options.evaluate {
            self.started(Stage::Feedback, topic);
            let result = runner
                .feedback(&mut self.aggregator, count, options.force)
                .await
                .map(|(output, evaluated)| {
                    report = evaluated;
                    output
                });
            outputs.push(self.finished(Stage::Feedback, result)?);
        }

        Ok(WorkflowRun {
            slug: runner.store().slug().to_string(),
            dir: runner.store().dir().to_path_buf(),
            outputs,
            report,
        })
    }

    fn started(&self, stage: Stage, topic: &str) {
        if let Some(observer) = &self.observer {
            observer.stage_started(stage, topic);
        }
    }

    fn finished(
        &self,
        stage: Stage,
        result: Result<StageOutput, StageError>,
    ) -> Result<StageOutput, StageError> {
        if let Some(observer) = &self.observer {
            match &result {
                Ok(output) => observer.stage_finished(output),
                Err(err) => observer.stage_failed(stage, err),
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{GenerationPersonaEvaluator, PersonaRegistry};
    use crate::generation::testing::ScriptedGenerator;
    use crate::pipeline::NoReview;
    use crate::store::Artifact;
    use std::sync::Mutex;
    use tempfile::{TempDir, tempdir};

    #[derive(Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl StageObserver for RecordingObserver {
        fn stage_started(&self, stage: Stage, _topic: &str) {
            self.events.lock().unwrap().push(format!("start {stage}"));
        }

        fn stage_finished(&self, output: &StageOutput) {
            self.events.lock().unwrap().push(format!("done {}", output.stage));
        }

        fn stage_failed(&self, stage: Stage, _error: &StageError) {
            self.events.lock().unwrap().push(format!("fail {stage}"));
        }
    }

    fn driver_with(generator: Arc<ScriptedGenerator>) -> (WorkflowDriver, TempDir) {
        let dir = tempdir().unwrap();
        let evaluator = Arc::new(GenerationPersonaEvaluator::new(generator.clone()));
        let aggregator =
            EvaluationAggregator::new(PersonaRegistry::builtin(), evaluator).with_seed(21);
        (WorkflowDriver::new(dir.path(), generator, aggregator), dir)
    }

    const REACTION: &str = r#"{"score": 4, "reaction": "Great insight", "comment": "Nice."}"#;

    #[tokio::test]
    async fn test_run_all_produces_core_artifacts() {
        let generator = Arc::new(ScriptedGenerator::with_responses(["r", "p", "# Title\nA"]));
        let (mut driver, dir) = driver_with(generator.clone());

        let run = driver
            .run_all(&WorkflowOptions::new("Edge AI"), &mut NoReview)
            .await
            .unwrap();

        assert_eq!(run.slug, "edge-ai");
        assert_eq!(run.dir, dir.path().join("edge-ai"));
        let stages: Vec<Stage> = run.outputs.iter().map(|o| o.stage).collect();
        assert_eq!(stages, vec![Stage::Research, Stage::Plan, Stage::Article]);
        assert!(run.report.is_none());
        for file in ["01_research.md", "02_plan.md", "03_article.md", "remarks.md"] {
            assert!(run.dir.join(file).is_file(), "{file}");
        }
        assert_eq!(generator.calls(), 3);
    }

    #[tokio::test]
    async fn test_run_all_with_verify_and_evaluate() {
        let generator = Arc::new(ScriptedGenerator::with_responses([
            "r", "p", "# Title\nA", "claims", REACTION, REACTION,
        ]));
        let (mut driver, _dir) = driver_with(generator.clone());
        let options = WorkflowOptions {
            verify: true,
            evaluate: Some(2),
            ..WorkflowOptions::new("Edge AI")
        };

        let run = driver.run_all(&options, &mut NoReview).await.unwrap();
        assert!(run.output(Stage::Verify).is_some());
        let report = run.report.unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report.fallback_count(), 0);
        assert!(run.dir.join("sources.md").is_file());
        assert!(run.dir.join("reactions.md").is_file());
    }

    #[tokio::test]
    async fn test_run_all_reuses_existing_outputs() {
        let generator = Arc::new(ScriptedGenerator::with_responses(["r", "p", "a"]));
        let (mut driver, _dir) = driver_with(generator.clone());
        let options = WorkflowOptions::new("Edge AI");

        driver.run_all(&options, &mut NoReview).await.unwrap();
        let rerun = driver.run_all(&options, &mut NoReview).await.unwrap();
        assert!(rerun.outputs.iter().all(|o| !o.generated));
        assert_eq!(generator.calls(), 3);
    }

    #[tokio::test]
    async fn test_failed_verify_keeps_remarks() {
        let generator = Arc::new(ScriptedGenerator::with_responses([
            "r",
            "p",
            "a",
            "Error: upstream unavailable",
        ]));
        let (mut driver, dir) = driver_with(generator);
        let options = WorkflowOptions {
            verify: true,
            ..WorkflowOptions::new("Edge AI")
        };

        let err = driver.run_all(&options, &mut NoReview).await.unwrap_err();
        assert!(matches!(err, StageError::GenerationFailure { stage: Stage::Verify, .. }));
        let topic_dir = dir.path().join("edge-ai");
        assert!(topic_dir.join("remarks.md").is_file());
        assert!(!topic_dir.join("sources.md").exists());
    }

    #[tokio::test]
    async fn test_run_stage_fails_fast_on_missing_prerequisite() {
        let generator = Arc::new(ScriptedGenerator::new());
        let (mut driver, _dir) = driver_with(generator.clone());
        let options = WorkflowOptions {
            stage: Some(Stage::Plan),
            ..WorkflowOptions::new("Edge AI")
        };

        let err = driver.run(&options, &mut NoReview).await.unwrap_err();
        assert!(err.to_string().contains("research"));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_run_stage_revise_appends() {
        let generator = Arc::new(ScriptedGenerator::with_responses(["r", "p", "a", "a2"]));
        let (mut driver, _dir) = driver_with(generator);
        let options = WorkflowOptions::new("Edge AI");
        driver.run_all(&options, &mut NoReview).await.unwrap();

        let revise = WorkflowOptions {
            stage: Some(Stage::Revise),
            ..options
        };
        let run = driver.run(&revise, &mut NoReview).await.unwrap();
        assert_eq!(run.outputs[0].artifact, Artifact::article(1));
    }

    #[tokio::test]
    async fn test_feedback_stage_uses_default_persona_count() {
        let generator = Arc::new(ScriptedGenerator::new());
        let (driver, dir) = driver_with(generator);
        let mut driver = driver.with_default_personas(4);
        let store = ArtifactStore::open(dir.path(), "Edge AI").unwrap();
        store.write(Artifact::ARTICLE, "# T\nBody", false).unwrap();

        let options = WorkflowOptions {
            stage: Some(Stage::Feedback),
            ..WorkflowOptions::new("Edge AI")
        };
        let run = driver.run(&options, &mut NoReview).await.unwrap();
        assert_eq!(run.report.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_observer_sees_stage_lifecycle() {
        let generator = Arc::new(ScriptedGenerator::with_responses([
            "r",
            "p",
            "a",
            "Error: quota exceeded",
        ]));
        let (driver, _dir) = driver_with(generator);
        let observer = Arc::new(RecordingObserver::default());
        let mut driver = driver.with_observer(observer.clone());
        let options = WorkflowOptions {
            verify: true,
            ..WorkflowOptions::new("Edge AI")
        };

        assert!(driver.run_all(&options, &mut NoReview).await.is_err());
        let events = observer.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "start research",
                "done research",
                "start plan",
                "done plan",
                "start article",
                "done article",
                "start verify",
                "fail verify",
            ]
        );
    }
}
