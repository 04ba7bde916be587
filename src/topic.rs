//! Topic namespace resolution.
//!
//! A free-form topic string maps to a slug that names the topic's output
//! directory. The slug is the only key for a topic's persisted state, so two
//! topics that normalize to the same slug share one directory.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::errors::StoreError;

/// Slug used when normalization leaves nothing behind.
pub const DEFAULT_SLUG: &str = "article";

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("static regex"));
static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s-]+").expect("static regex"));

/// Normalize a topic into a filesystem-safe slug.
///
/// Characters outside word characters, whitespace and hyphens are stripped
/// first, then the result is lowercased and runs of whitespace/hyphens are
/// collapsed into a single hyphen.
///
/// ```
/// use scribe::topic::resolve;
///
/// assert_eq!(resolve("AI in Healthcare: 2025!"), "ai-in-healthcare-2025");
/// assert_eq!(resolve("  --  "), "article");
/// ```
pub fn resolve(topic: &str) -> String {
    let stripped = DISALLOWED.replace_all(topic, "");
    let lowered = stripped.to_lowercase();
    let collapsed = SEPARATORS.replace_all(&lowered, "-");
    let slug = collapsed.trim_matches('-');
    if slug.is_empty() {
        DEFAULT_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Turn a slug back into a human-readable topic.
///
/// `resolve(&resolve_to_display(slug)) == slug` holds for every slug
/// produced by [`resolve`].
pub fn resolve_to_display(slug: &str) -> String {
    slug.replace('-', " ")
}

/// Output root holding one directory per topic slug.
#[derive(Debug, Clone)]
pub struct TopicSpace {
    root: PathBuf,
}

impl TopicSpace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for a topic, without touching the filesystem.
    pub fn topic_dir(&self, topic: &str) -> PathBuf {
        self.root.join(resolve(topic))
    }

    /// Create the topic directory if needed and return it. Idempotent.
    ///
    /// This is the only place topic directories are created.
    pub fn ensure(&self, topic: &str) -> Result<PathBuf, StoreError> {
        let dir = self.topic_dir(topic);
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::DirectoryFailed {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_resolve_lowercases_and_hyphenates() {
        assert_eq!(resolve("The Future of Work"), "the-future-of-work");
    }

    #[test]
    fn test_resolve_strips_punctuation_before_collapsing() {
        assert_eq!(resolve("Rust: fast, safe & fun?"), "rust-fast-safe-fun");
        assert_eq!(resolve("a - b -- c"), "a-b-c");
    }

    #[test]
    fn test_resolve_keeps_underscores_and_digits() {
        assert_eq!(resolve("web_3 in 2030"), "web_3-in-2030");
    }

    #[test]
    fn test_resolve_empty_uses_default() {
        assert_eq!(resolve(""), DEFAULT_SLUG);
        assert_eq!(resolve("!!!"), DEFAULT_SLUG);
        assert_eq!(resolve("   "), DEFAULT_SLUG);
    }

    #[test]
    fn test_resolve_is_idempotent_through_display() {
        for topic in ["AI Agents", "x", "", "Data--Mesh  101", "Ünïcode Topic"] {
            let slug = resolve(topic);
            assert_eq!(resolve(&resolve_to_display(&slug)), slug, "topic {topic:?}");
            assert_eq!(resolve(&slug), slug);
        }
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let dir = tempdir().unwrap();
        let space = TopicSpace::new(dir.path());
        let first = space.ensure("My Topic").unwrap();
        let second = space.ensure("my   topic").unwrap();
        assert_eq!(first, second);
        assert!(first.is_dir());
        assert!(first.ends_with("my-topic"));
    }

    #[test]
    fn test_ensure_reports_directory_failure() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("outputs");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = TopicSpace::new(&blocker).ensure("My Topic").unwrap_err();
        match err {
            StoreError::DirectoryFailed { path, .. } => assert!(path.ends_with("my-topic")),
            other => panic!("Expected DirectoryFailed, got {other:?}"),
        }
    }
}
