//! Pipeline stage identities and their dependency order.

use serde::{Deserialize, Serialize};

use crate::store::{Artifact, PipelineState};

/// One step of the article pipeline.
///
/// ```text
/// research ─▶ plan ─▶ article ─┬─▶ revise
///                              ├─▶ verify
///                              └─▶ feedback
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Research,
    Plan,
    Article,
    Revise,
    Verify,
    Feedback,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Research,
        Stage::Plan,
        Stage::Article,
        Stage::Revise,
        Stage::Verify,
        Stage::Feedback,
    ];

    /// Stages whose output must exist before this one can run.
    ///
    /// An `Article` prerequisite is satisfied by any revision of the article.
    pub fn prerequisites(&self) -> &'static [Stage] {
        match self {
            Stage::Research => &[],
            Stage::Plan => &[Stage::Research],
            Stage::Article => &[Stage::Research, Stage::Plan],
            Stage::Revise | Stage::Verify | Stage::Feedback => &[Stage::Article],
        }
    }

    /// The artifact this stage writes. Revise appends to the article chain, so
    /// its target depends on what is already on disk.
    pub fn output(&self) -> Option<Artifact> {
        match self {
            Stage::Research => Some(Artifact::Research),
            Stage::Plan => Some(Artifact::Plan),
            Stage::Article => Some(Artifact::ARTICLE),
            Stage::Revise => None,
            Stage::Verify => Some(Artifact::Sources),
            Stage::Feedback => Some(Artifact::Reactions),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Stage::Research => "Research",
            Stage::Plan => "Planning",
            Stage::Article => "Writing Article",
            Stage::Revise => "Revising Article",
            Stage::Verify => "Verifying Claims & Sources",
            Stage::Feedback => "Reader Reactions",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Research => "research",
            Stage::Plan => "plan",
            Stage::Article => "article",
            Stage::Revise => "revise",
            Stage::Verify => "verify",
            Stage::Feedback => "feedback",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Stage {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "research" => Ok(Stage::Research),
            "plan" | "planning" => Ok(Stage::Plan),
            "article" | "write" | "writing" => Ok(Stage::Article),
            "revise" | "revision" => Ok(Stage::Revise),
            "verify" | "verification" => Ok(Stage::Verify),
            "feedback" | "reactions" => Ok(Stage::Feedback),
            _ => anyhow::bail!(
                "Invalid stage '{}'. Valid values: research, plan, article, revise, verify, feedback",
                s
            ),
        }
    }
}

/// The stage a user would most likely run next, given what exists on disk.
pub fn suggest_next(state: &PipelineState) -> Option<Stage> {
    if !state.research {
        Some(Stage::Research)
    } else if !state.plan {
        Some(Stage::Plan)
    } else if !state.has_article() {
        Some(Stage::Article)
    } else if state.remarks && !state.sources {
        Some(Stage::Verify)
    } else if !state.reactions {
        Some(Stage::Feedback)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_round_trips_through_from_str() {
        for stage in Stage::ALL {
            assert_eq!(stage.to_string().parse::<Stage>().unwrap(), stage);
        }
    }

    #[test]
    fn test_from_str_aliases_and_case() {
        assert_eq!("WRITING".parse::<Stage>().unwrap(), Stage::Article);
        assert_eq!(" Plan ".parse::<Stage>().unwrap(), Stage::Plan);
        let err = "publish".parse::<Stage>().unwrap_err();
        assert!(err.to_string().contains("Invalid stage"));
    }

    #[test]
    fn test_prerequisites_follow_pipeline_order() {
        assert!(Stage::Research.prerequisites().is_empty());
        assert_eq!(Stage::Plan.prerequisites(), &[Stage::Research]);
        assert_eq!(Stage::Article.prerequisites(), &[Stage::Research, Stage::Plan]);
        for stage in [Stage::Revise, Stage::Verify, Stage::Feedback] {
            assert_eq!(stage.prerequisites(), &[Stage::Article]);
        }
    }

    #[test]
    fn test_revise_has_no_fixed_output() {
        assert_eq!(Stage::Revise.output(), None);
        assert_eq!(Stage::Verify.output(), Some(Artifact::Sources));
    }

    #[test]
    fn test_suggest_next() {
        let mut state = PipelineState::default();
        assert_eq!(suggest_next(&state), Some(Stage::Research));
        state.research = true;
        state.plan = true;
        assert_eq!(suggest_next(&state), Some(Stage::Article));
        state.revisions = vec![0];
        state.remarks = true;
        assert_eq!(suggest_next(&state), Some(Stage::Verify));
        state.sources = true;
        state.reactions = true;
        assert_eq!(suggest_next(&state), None);
    }
}
