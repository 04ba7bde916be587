//! Artifact identities and their on-disk file names.

use serde::{Deserialize, Serialize};
use std::fmt;

const RESEARCH_FILE: &str = "01_research.md";
const PLAN_FILE: &str = "02_plan.md";
const ARTICLE_STEM: &str = "03_article";
const REMARKS_FILE: &str = "remarks.md";
const SOURCES_FILE: &str = "sources.md";
const REACTIONS_FILE: &str = "reactions.md";

/// A named artifact inside a topic directory.
///
/// Only the article carries a revision index: `0` is the first generated
/// article, `1..` are feedback-driven revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "name")]
pub enum Artifact {
    Research,
    Plan,
    Article { revision: u32 },
    Remarks,
    Sources,
    Reactions,
}

impl Artifact {
    /// The original article (revision 0).
    pub const ARTICLE: Artifact = Artifact::Article { revision: 0 };

    pub fn article(revision: u32) -> Self {
        Artifact::Article { revision }
    }

    /// Logical name, shared by every revision of the article.
    pub fn name(&self) -> &'static str {
        match self {
            Artifact::Research => "research",
            Artifact::Plan => "plan",
            Artifact::Article { .. } => "article",
            Artifact::Remarks => "remarks",
            Artifact::Sources => "sources",
            Artifact::Reactions => "reactions",
        }
    }

    pub fn revision(&self) -> Option<u32> {
        match self {
            Artifact::Article { revision } => Some(*revision),
            _ => None,
        }
    }

    /// File name inside the topic directory.
    ///
    /// ```
    /// use scribe::store::Artifact;
    ///
    /// assert_eq!(Artifact::ARTICLE.file_name(), "03_article.md");
    /// assert_eq!(Artifact::article(4).file_name(), "03_article_v4.md");
    /// ```
    pub fn file_name(&self) -> String {
        match self {
            Artifact::Research => RESEARCH_FILE.to_string(),
            Artifact::Plan => PLAN_FILE.to_string(),
            Artifact::Article { revision: 0 } => format!("{ARTICLE_STEM}.md"),
            Artifact::Article { revision } => format!("{ARTICLE_STEM}_v{revision}.md"),
            Artifact::Remarks => REMARKS_FILE.to_string(),
            Artifact::Sources => SOURCES_FILE.to_string(),
            Artifact::Reactions => REACTIONS_FILE.to_string(),
        }
    }

    /// Inverse of [`Artifact::file_name`]. Unknown names yield `None`.
    ///
    /// `03_article_v0.md` is rejected so every revision has exactly one name.
    pub fn parse_file_name(file_name: &str) -> Option<Self> {
        match file_name {
            RESEARCH_FILE => return Some(Artifact::Research),
            PLAN_FILE => return Some(Artifact::Plan),
            REMARKS_FILE => return Some(Artifact::Remarks),
            SOURCES_FILE => return Some(Artifact::Sources),
            REACTIONS_FILE => return Some(Artifact::Reactions),
            _ => {}
        }

        let stem = file_name.strip_suffix(".md")?;
        let rest = stem.strip_prefix(ARTICLE_STEM)?;
        if rest.is_empty() {
            return Some(Artifact::ARTICLE);
        }
        let digits = rest.strip_prefix("_v")?;
        if digits.is_empty() || digits.starts_with('0') || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Artifact::article)
    }

    /// Glob matching every article revision file.
    pub(crate) fn article_glob() -> String {
        format!("{ARTICLE_STEM}*.md")
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::Article { revision: 0 } => write!(f, "article"),
            Artifact::Article { revision } => write!(f, "article revision {revision}"),
            other => write!(f, "{}", other.name()),
        }
    }
}
