use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::prompts::{self, ExcerptLimits};
use super::remarks::RemarksGuard;
use super::stage::Stage;
use crate::errors::StageError;
use crate::evaluation::{EvaluationAggregator, EvaluationReport};
use crate::generation::{GenerationService, is_error_payload};
use crate::store::{Artifact, ArtifactStore};
use crate::util::extract_title;

/// Content a stage produced or reused, and where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOutput {
    pub stage: Stage,
    pub artifact: Artifact,
    pub path: PathBuf,
    pub content: String,
    /// `false` when an existing artifact was reused.
    pub generated: bool,
}

/// What a reviewer wants after looking at a stage's output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    /// Keep the artifact as it is on disk, including any edits.
    Accept,
    /// Generate the artifact again. The text steers the retry: a new prompt
    /// for research, a focus for the plan, a style for the article. Empty
    /// means "try something different".
    Regenerate(String),
}

/// Human review of a stage's output.
///
/// Called after research, plan and article are persisted. The reviewer may
/// edit the file in place before deciding. For the article, the remarks
/// template is written whatever the review returns.
pub trait StageReview {
    fn review(&mut self, stage: Stage, artifact: &Path) -> anyhow::Result<ReviewDecision>;
}

/// Review that accepts every output as written.
pub struct NoReview;

impl StageReview for NoReview {
    fn review(&mut self, _stage: Stage, _artifact: &Path) -> anyhow::Result<ReviewDecision> {
        Ok(ReviewDecision::Accept)
    }
}

/// Runs individual stages against one topic's artifact store.
///
/// Every stage follows the same protocol: check prerequisites, reuse the
/// existing output unless forced, otherwise call the generation service
/// exactly once and persist the result.
pub struct StageRunner {
    store: ArtifactStore,
    generator: Arc<dyn GenerationService>,
    excerpts: ExcerptLimits,
}

impl StageRunner {
    pub fn new(store: ArtifactStore, generator: Arc<dyn GenerationService>) -> Self {
        Self {
            store,
            generator,
            excerpts: ExcerptLimits::default(),
        }
    }

    pub fn with_excerpts(mut self, excerpts: ExcerptLimits) -> Self {
        self.excerpts = excerpts;
        self
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Fail with `MissingDependency` unless every prerequisite of `stage`
    /// has produced its artifact.
    pub fn check_prerequisites(&self, stage: Stage) -> Result<(), StageError> {
        for &prerequisite in stage.prerequisites() {
            let present = match prerequisite {
                Stage::Article => self.store.revisions()?.head().is_some(),
                other => other.output().is_some_and(|a| self.store.exists(a)),
            };
            if !present {
                return Err(StageError::MissingDependency {
                    stage,
                    artifact: prerequisite.output().unwrap_or(Artifact::ARTICLE),
                    run_first: prerequisite,
                });
            }
        }
        Ok(())
    }

    /// Highest article revision and its content.
    pub(super) fn latest_article(&self, stage: Stage) -> Result<(u32, String), StageError> {
        let head = self
            .store
            .revisions()?
            .head()
            .ok_or(StageError::MissingDependency {
                stage,
                artifact: Artifact::ARTICLE,
                run_first: Stage::Article,
            })?;
        let content = self.store.read(Artifact::article(head))?;
        Ok((head, content))
    }

    pub(super) fn reuse(
        &self,
        stage: Stage,
        artifact: Artifact,
        force: bool,
    ) -> Result<Option<StageOutput>, StageError> {
        if force {
            return Ok(None);
        }
        let Some(content) = self.store.read_optional(artifact)? else {
            return Ok(None);
        };
        tracing::info!(%stage, %artifact, "reusing existing artifact");
        Ok(Some(StageOutput {
            stage,
            artifact,
            path: self.store.path(artifact),
            content,
            generated: false,
        }))
    }

    /// One generation call. `Err` and in-band error payloads both fail the
    /// stage; nothing is persisted in either case.
    pub(super) async fn generate(&self, stage: Stage, prompt: &str) -> Result<String, StageError> {
        tracing::info!(%stage, prompt_chars = prompt.len(), "generating");
        let content = self.generator.complete(prompt).await.map_err(|e| {
            StageError::GenerationFailure {
                stage,
                message: e.to_string(),
            }
        })?;
        if is_error_payload(&content) {
            return Err(StageError::GenerationFailure {
                stage,
                message: content,
            });
        }
        tracing::info!(%stage, bytes = content.len(), "generated");
        Ok(content)
    }

    pub(super) fn persist(
        &self,
        stage: Stage,
        artifact: Artifact,
        content: String,
        overwrite: bool,
    ) -> Result<StageOutput, StageError> {
        let outcome = self.store.write(artifact, &content, overwrite)?;
        Ok(StageOutput {
            stage,
            artifact,
            path: outcome.path,
            content,
            generated: outcome.written,
        })
    }

    pub async fn research(&self, force: bool) -> Result<StageOutput, StageError> {
        self.research_with_review(force, &mut NoReview).await
    }

    /// Research, then let `review` edit or regenerate a fresh result.
    /// Reused research is not reviewed.
    pub async fn research_with_review(
        &self,
        force: bool,
        review: &mut (dyn StageReview + Send),
    ) -> Result<StageOutput, StageError> {
        let stage = Stage::Research;
        if let Some(existing) = self.reuse(stage, Artifact::Research, force)? {
            return Ok(existing);
        }
        let content = self
            .generate(stage, &prompts::research_prompt(self.store.topic()))
            .await?;
        let output = self.persist(stage, Artifact::Research, content, true)?;

        let topic = self.store.topic();
        self.review_loop(output, review, |_, direction| {
            prompts::research_retry_prompt(topic, direction)
        })
        .await
    }

    pub async fn plan(&self, skeleton: Option<&str>, force: bool) -> Result<StageOutput, StageError> {
        self.plan_with_review(skeleton, force, &mut NoReview).await
    }

    /// Plan, then let `review` edit or refocus a fresh result.
    /// A reused plan is not reviewed.
    pub async fn plan_with_review(
        &self,
        skeleton: Option<&str>,
        force: bool,
        review: &mut (dyn StageReview + Send),
    ) -> Result<StageOutput, StageError> {
        let stage = Stage::Plan;
        self.check_prerequisites(stage)?;
        if let Some(existing) = self.reuse(stage, Artifact::Plan, force)? {
            return Ok(existing);
        }
        let research = self.store.read(Artifact::Research)?;
        let topic = self.store.topic();
        let prompt = prompts::plan_prompt(topic, &research, skeleton, &self.excerpts);
        let content = self.generate(stage, &prompt).await?;
        let output = self.persist(stage, Artifact::Plan, content, true)?;

        self.review_loop(output, review, |_, focus| {
            prompts::plan_focus_prompt(topic, &research, skeleton, focus, &self.excerpts)
        })
        .await
    }

    /// Write (or reuse) the base article, then run `review`.
    ///
    /// The remarks template is written on every exit path once the article
    /// exists, including a failed restyle. A generated article gets a fresh
    /// template; a reused one only gets a template if none exists yet.
    pub async fn write_article(
        &self,
        force: bool,
        review: &mut (dyn StageReview + Send),
    ) -> Result<StageOutput, StageError> {
        let stage = Stage::Article;
        self.check_prerequisites(stage)?;

        let topic = self.store.topic();
        let plan = self.store.read(Artifact::Plan)?;
        let output = match self.reuse(stage, Artifact::ARTICLE, force)? {
            Some(existing) => existing,
            None => {
                let research = self.store.read(Artifact::Research)?;
                let prompt = prompts::article_prompt(topic, &research, &plan, &self.excerpts);
                let content = self.generate(stage, &prompt).await?;
                self.persist(stage, Artifact::ARTICLE, content, true)?
            }
        };

        let remarks = RemarksGuard::arm(&self.store, output.generated);
        let output = self
            .review_loop(output, review, |current, style| {
                prompts::article_style_prompt(topic, current, &plan, style, &self.excerpts)
            })
            .await?;
        remarks.finish()?;
        Ok(output)
    }

    /// Ask `review` about `output` until it accepts, regenerating with the
    /// prompt `retry` builds from the current text and the reviewer's
    /// direction. Returns the artifact as finally stored.
    async fn review_loop<F>(
        &self,
        mut output: StageOutput,
        review: &mut (dyn StageReview + Send),
        retry: F,
    ) -> Result<StageOutput, StageError>
    where
        F: Fn(&str, &str) -> String,
    {
        let (stage, artifact) = (output.stage, output.artifact);
        let mut round = 0u32;
        loop {
            let decision = review
                .review(stage, &output.path)
                .map_err(|e| StageError::ReviewAborted {
                    message: format!("{e:#}"),
                })?;
            let ReviewDecision::Regenerate(direction) = decision else {
                break;
            };

            round += 1;
            tracing::info!(%stage, round, %direction, "regenerating on reviewer request");
            let current = self.store.read(artifact)?;
            let prompt = retry(&current, &direction);
            let content = self.generate(stage, &prompt).await?;
            output = self.persist(stage, artifact, content, true)?;
        }

        // The review may have edited the artifact on disk.
        let content = self.store.read(artifact)?;
        Ok(StageOutput { content, ..output })
    }

    /// Verify claims in the latest article revision.
    pub async fn verify(&self, force: bool) -> Result<StageOutput, StageError> {
        let stage = Stage::Verify;
        self.check_prerequisites(stage)?;
        if let Some(existing) = self.reuse(stage, Artifact::Sources, force)? {
            return Ok(existing);
        }
        let (revision, article) = self.latest_article(stage)?;
        tracing::info!(revision, "verifying latest article revision");

        let topic = self.store.topic();
        let body = self
            .generate(stage, &prompts::verification_prompt(topic, &article))
            .await?;
        let document = prompts::sources_document(topic, &body, Local::now());
        self.persist(stage, Artifact::Sources, document, true)
    }

    /// Gather persona reactions to the latest article revision.
    ///
    /// The report is `None` when existing reactions were reused.
    pub async fn feedback(
        &self,
        aggregator: &mut EvaluationAggregator,
        count: usize,
        force: bool,
    ) -> Result<(StageOutput, Option<EvaluationReport>), StageError> {
        let stage = Stage::Feedback;
        self.check_prerequisites(stage)?;
        if let Some(existing) = self.reuse(stage, Artifact::Reactions, force)? {
            return Ok((existing, None));
        }
        let (revision, article) = self.latest_article(stage)?;
        let title = extract_title(&article);
        tracing::info!(revision, %title, count, "collecting reader reactions");

        let report = aggregator.evaluate(&title, &article, count).await;
        let output = self.persist(stage, Artifact::Reactions, report.to_markdown(), true)?;
        Ok((output, Some(report)))
    }
}
