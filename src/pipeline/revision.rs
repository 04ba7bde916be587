//! Feedback-driven article revisions.
//!
//! Revisions form a strictly linear, append-only chain: revision `k + 1` is
//! generated from revision `k` (the current head) plus the remarks as they
//! are at that moment. Nothing earlier in the chain is rewritten.
//!
//! The head is recovered from the directory listing on every call. Without
//! locking, two concurrent revisions of one topic can race for the same
//! index; the loser finds its target taken and leaves it untouched.

use super::prompts::{self, NO_FEEDBACK};
use super::runner::{StageOutput, StageRunner};
use super::stage::Stage;
use crate::errors::StageError;
use crate::store::Artifact;

impl StageRunner {
    /// Append the next article revision.
    ///
    /// `force` is accepted for symmetry with the other stages but has no
    /// effect: the target revision never exists before the call.
    pub async fn revise(&self, force: bool) -> Result<StageOutput, StageError> {
        let stage = Stage::Revise;
        let (head, article) = self.latest_article(stage)?;
        let next = head
            .checked_add(1)
            .ok_or(StageError::RevisionLimit { head })?;
        tracing::info!(head, next, force, "revising article");

        let remarks = match self.store().read_optional(Artifact::Remarks)? {
            Some(remarks) if !remarks.trim().is_empty() => remarks,
            _ => {
                tracing::info!("no remarks found, revising without feedback");
                NO_FEEDBACK.to_string()
            }
        };

        let prompt = prompts::revision_prompt(self.store().topic(), &article, &remarks);
        let content = self.generate(stage, &prompt).await?;

        let output = self.persist(stage, Artifact::article(next), content, false)?;
        if !output.generated {
            tracing::warn!(
                revision = next,
                path = %output.path.display(),
                "revision appeared while generating, existing file left untouched"
            );
            let content = self.store().read(output.artifact)?;
            return Ok(StageOutput { content, ..output });
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::testing::ScriptedGenerator;
    use crate::store::ArtifactStore;
    use std::sync::Arc;
    use tempfile::{TempDir, tempdir};

    fn runner_with(generator: Arc<ScriptedGenerator>) -> (StageRunner, TempDir) {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::open(dir.path(), "Edge AI").unwrap();
        (StageRunner::new(store, generator), dir)
    }

    #[tokio::test]
    async fn test_base_only_produces_revision_one() {
        let generator = Arc::new(ScriptedGenerator::with_responses(["revised once"]));
        let (runner, _dir) = runner_with(generator.clone());
        runner.store().write(Artifact::ARTICLE, "base", false).unwrap();
        runner.store().write(Artifact::Remarks, "tighten the intro", false).unwrap();

        let output = runner.revise(false).await.unwrap();
        assert_eq!(output.artifact, Artifact::article(1));
        assert!(output.path.ends_with("03_article_v1.md"));
        assert_eq!(output.content, "revised once");

        let prompt = generator.last_prompt().unwrap();
        assert!(prompt.contains("base"));
        assert!(prompt.contains("tighten the intro"));
    }

    #[tokio::test]
    async fn test_appends_after_highest_revision_without_touching_earlier() {
        let generator = Arc::new(ScriptedGenerator::with_responses(["fourth"]));
        let (runner, _dir) = runner_with(generator.clone());
        let store = runner.store();
        store.write(Artifact::ARTICLE, "v0", false).unwrap();
        for n in 1..=3 {
            store.write(Artifact::article(n), &format!("v{n}"), false).unwrap();
        }

        let output = runner.revise(false).await.unwrap();
        assert_eq!(output.artifact, Artifact::article(4));
        assert!(generator.last_prompt().unwrap().contains("v3"));
        for n in 1..=3 {
            assert_eq!(store.read(Artifact::article(n)).unwrap(), format!("v{n}"));
        }
        assert_eq!(store.revisions().unwrap().head(), Some(4));
    }

    #[tokio::test]
    async fn test_chain_head_is_numeric() {
        let generator = Arc::new(ScriptedGenerator::with_responses(["eleventh"]));
        let (runner, _dir) = runner_with(generator);
        let store = runner.store();
        store.write(Artifact::ARTICLE, "v0", false).unwrap();
        for n in 1..=10 {
            store.write(Artifact::article(n), &format!("v{n}"), false).unwrap();
        }
        let output = runner.revise(true).await.unwrap();
        assert_eq!(output.artifact, Artifact::article(11));
    }

    #[tokio::test]
    async fn test_missing_remarks_uses_placeholder() {
        let generator = Arc::new(ScriptedGenerator::new());
        let (runner, _dir) = runner_with(generator.clone());
        runner.store().write(Artifact::ARTICLE, "base", false).unwrap();

        runner.revise(false).await.unwrap();
        assert!(generator.last_prompt().unwrap().contains(NO_FEEDBACK));
    }

    #[tokio::test]
    async fn test_full_text_is_not_truncated() {
        let generator = Arc::new(ScriptedGenerator::new());
        let (runner, _dir) = runner_with(generator.clone());
        let article = "word ".repeat(2000);
        let remarks = "note ".repeat(2000);
        runner.store().write(Artifact::ARTICLE, &article, false).unwrap();
        runner.store().write(Artifact::Remarks, &remarks, false).unwrap();

        runner.revise(false).await.unwrap();
        let prompt = generator.last_prompt().unwrap();
        assert!(prompt.contains(&article));
        assert!(prompt.contains(&remarks));
    }

    #[tokio::test]
    async fn test_no_article_is_missing_dependency() {
        let generator = Arc::new(ScriptedGenerator::new());
        let (runner, _dir) = runner_with(generator.clone());

        let err = runner.revise(false).await.unwrap_err();
        assert!(matches!(
            err,
            StageError::MissingDependency {
                stage: Stage::Revise,
                run_first: Stage::Article,
                ..
            }
        ));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_chain_unchanged() {
        let generator = Arc::new(ScriptedGenerator::with_responses(["Error: model overloaded"]));
        let (runner, _dir) = runner_with(generator);
        runner.store().write(Artifact::ARTICLE, "base", false).unwrap();

        assert!(runner.revise(false).await.is_err());
        assert_eq!(runner.store().revisions().unwrap().head(), Some(0));
    }

    #[tokio::test]
    async fn test_revision_past_last_index_is_refused() {
        let generator = Arc::new(ScriptedGenerator::new());
        let (runner, _dir) = runner_with(generator.clone());
        let last = runner.store().dir().join("03_article_v4294967295.md");
        std::fs::write(&last, "final").unwrap();

        let err = runner.revise(false).await.unwrap_err();
        assert!(matches!(err, StageError::RevisionLimit { head: u32::MAX }));
        assert!(err.to_string().contains("4294967295"));
        assert_eq!(generator.calls(), 0);
        assert_eq!(std::fs::read_to_string(&last).unwrap(), "final");
    }

    #[tokio::test]
    async fn test_large_sparse_chain_appends_after_head() {
        let generator = Arc::new(ScriptedGenerator::with_responses(["next"]));
        let (runner, _dir) = runner_with(generator);
        runner.store().write(Artifact::ARTICLE, "base", false).unwrap();
        std::fs::write(runner.store().dir().join("03_article_v200000000.md"), "far").unwrap();

        let output = runner.revise(false).await.unwrap();
        assert_eq!(output.artifact, Artifact::article(200_000_001));
    }
}
