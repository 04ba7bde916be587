//! File-backed artifact storage for a single topic.
//!
//! ```text
//! <output_root>/<slug>/
//! ├── 01_research.md
//! ├── 02_plan.md
//! ├── 03_article.md        # revision 0
//! ├── 03_article_v1.md     # revision 1, 2, ...
//! ├── remarks.md
//! ├── sources.md
//! └── reactions.md
//! ```
//!
//! The set of files present is the pipeline state; nothing else is stored.
//! There is no locking, so overwrite checks and the revision scan assume a
//! single writer per topic.

mod artifact;
mod chain;

pub use artifact::Artifact;
pub use chain::RevisionChain;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::StoreError;
use crate::topic::{self, TopicSpace};

/// Missing revision indices named in the gap warning.
const GAP_SAMPLE: usize = 5;

/// Result of a write request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    pub path: PathBuf,
    /// `false` when the artifact existed and overwrite was not allowed.
    pub written: bool,
}

/// Which artifacts exist for a topic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineState {
    pub research: bool,
    pub plan: bool,
    pub revisions: Vec<u32>,
    pub remarks: bool,
    pub sources: bool,
    pub reactions: bool,
}

impl PipelineState {
    pub fn has_article(&self) -> bool {
        !self.revisions.is_empty()
    }

    pub fn latest_revision(&self) -> Option<u32> {
        self.revisions.last().copied()
    }
}

/// Artifact store scoped to one topic directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    topic: String,
    slug: String,
    dir: PathBuf,
}

impl ArtifactStore {
    /// Resolve the topic slug under `output_root` and ensure its directory.
    pub fn open(output_root: &Path, topic: &str) -> Result<Self, StoreError> {
        let slug = topic::resolve(topic);
        let dir = TopicSpace::new(output_root).ensure(topic)?;
        Ok(Self {
            topic: topic.to_string(),
            slug,
            dir,
        })
    }

    /// The topic as the user supplied it.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, artifact: Artifact) -> PathBuf {
        self.dir.join(artifact.file_name())
    }

    pub fn exists(&self, artifact: Artifact) -> bool {
        self.path(artifact).is_file()
    }

    /// Read an artifact. A missing file is `StoreError::NotFound`.
    pub fn read(&self, artifact: Artifact) -> Result<String, StoreError> {
        let path = self.path(artifact);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(source) if source.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound { artifact, path })
            }
            Err(source) => Err(StoreError::ReadFailed { path, source }),
        }
    }

    /// Read an artifact, mapping a missing file to `None`.
    pub fn read_optional(&self, artifact: Artifact) -> Result<Option<String>, StoreError> {
        match self.read(artifact) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Persist an artifact.
    ///
    /// When the artifact exists and `overwrite` is false nothing is written.
    /// The content lands in a temporary sibling first and is renamed into
    /// place, so readers never observe a half-written artifact.
    pub fn write(
        &self,
        artifact: Artifact,
        content: &str,
        overwrite: bool,
    ) -> Result<WriteOutcome, StoreError> {
        let path = self.path(artifact);
        if path.exists() && !overwrite {
            tracing::debug!(artifact = %artifact, path = %path.display(), "artifact exists, not overwriting");
            return Ok(WriteOutcome {
                path,
                written: false,
            });
        }

        let tmp = self.dir.join(format!(".{}.tmp", artifact.file_name()));
        fs::write(&tmp, content).map_err(|source| StoreError::WriteFailed {
            path: tmp.clone(),
            source,
        })?;
        if let Err(source) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::WriteFailed { path, source });
        }

        tracing::debug!(artifact = %artifact, path = %path.display(), bytes = content.len(), "artifact written");
        Ok(WriteOutcome {
            path,
            written: true,
        })
    }

    /// Rebuild the revision chain from the article files present.
    pub fn revisions(&self) -> Result<RevisionChain, StoreError> {
        let pattern = format!(
            "{}/{}",
            glob::Pattern::escape(&self.dir.to_string_lossy()),
            Artifact::article_glob()
        );
        let paths = glob::glob(&pattern).map_err(|e| StoreError::ScanFailed {
            path: self.dir.clone(),
            message: e.to_string(),
        })?;

        let mut found = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| StoreError::ScanFailed {
                path: self.dir.clone(),
                message: e.to_string(),
            })?;
            if path.is_file() {
                found.push(path);
            }
        }

        let chain = RevisionChain::from_paths(found);
        let missing = chain.missing_count();
        if missing > 0 {
            let first = chain.first_gaps(GAP_SAMPLE);
            tracing::warn!(topic = %self.slug, missing, ?first, "article revision chain has gaps");
        }
        Ok(chain)
    }

    /// Snapshot of which artifacts exist.
    pub fn snapshot(&self) -> Result<PipelineState, StoreError> {
        Ok(PipelineState {
            research: self.exists(Artifact::Research),
            plan: self.exists(Artifact::Plan),
            revisions: self.revisions()?.revisions().collect(),
            remarks: self.exists(Artifact::Remarks),
            sources: self.exists(Artifact::Sources),
            reactions: self.exists(Artifact::Reactions),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_store() -> (ArtifactStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::open(dir.path(), "Test Topic").unwrap();
        (store, dir)
    }

    #[test]
    fn test_open_creates_slug_directory() {
        let (store, dir) = open_store();
        assert_eq!(store.slug(), "test-topic");
        assert_eq!(store.topic(), "Test Topic");
        assert!(dir.path().join("test-topic").is_dir());
    }

    #[test]
    fn test_open_under_file_is_directory_failure() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("outputs");
        fs::write(&root, "").unwrap();
        let err = ArtifactStore::open(&root, "Test Topic").unwrap_err();
        assert!(matches!(err, StoreError::DirectoryFailed { .. }));
    }

    #[test]
    fn test_revisions_with_huge_index_stay_small() {
        let (store, _dir) = open_store();
        store.write(Artifact::ARTICLE, "base", false).unwrap();
        fs::write(store.dir().join("03_article_v200000000.md"), "far").unwrap();

        let chain = store.revisions().unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.head(), Some(200_000_000));
        assert_eq!(chain.missing_count(), 199_999_999);
        assert_eq!(chain.first_gaps(GAP_SAMPLE), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_read_missing_is_not_found() {
        let (store, _dir) = open_store();
        let err = store.read(Artifact::Research).unwrap_err();
        assert!(err.is_not_found());
        assert!(store.read_optional(Artifact::Research).unwrap().is_none());
    }

    #[test]
    fn test_empty_content_is_not_missing() {
        let (store, _dir) = open_store();
        store.write(Artifact::Plan, "", false).unwrap();
        assert_eq!(store.read(Artifact::Plan).unwrap(), "");
        assert_eq!(store.read_optional(Artifact::Plan).unwrap(), Some(String::new()));
    }

    #[test]
    fn test_write_without_overwrite_keeps_existing() {
        let (store, _dir) = open_store();
        let first = store.write(Artifact::Research, "original", false).unwrap();
        assert!(first.written);

        let second = store.write(Artifact::Research, "replacement", false).unwrap();
        assert!(!second.written);
        assert_eq!(second.path, first.path);
        assert_eq!(store.read(Artifact::Research).unwrap(), "original");
    }

    #[test]
    fn test_write_with_overwrite_replaces() {
        let (store, _dir) = open_store();
        store.write(Artifact::Research, "original", false).unwrap();
        let outcome = store.write(Artifact::Research, "replacement", true).unwrap();
        assert!(outcome.written);
        assert_eq!(store.read(Artifact::Research).unwrap(), "replacement");
    }

    #[test]
    fn test_write_leaves_no_temp_files() {
        let (store, _dir) = open_store();
        store.write(Artifact::Sources, "claims", true).unwrap();
        let names: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["sources.md".to_string()]);
    }

    #[test]
    fn test_revisions_recovered_from_listing() {
        let (store, _dir) = open_store();
        store.write(Artifact::ARTICLE, "v0", false).unwrap();
        store.write(Artifact::article(1), "v1", false).unwrap();
        store.write(Artifact::article(2), "v2", false).unwrap();
        store.write(Artifact::Remarks, "notes", false).unwrap();

        let chain = store.revisions().unwrap();
        assert_eq!(chain.revisions().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(chain.head(), Some(2));
    }

    #[test]
    fn test_revisions_with_glob_metacharacters_in_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("out[1]");
        let store = ArtifactStore::open(&root, "topic").unwrap();
        store.write(Artifact::ARTICLE, "v0", false).unwrap();
        assert_eq!(store.revisions().unwrap().head(), Some(0));
    }

    #[test]
    fn test_snapshot_reflects_files() {
        let (store, _dir) = open_store();
        assert_eq!(store.snapshot().unwrap(), PipelineState::default());

        store.write(Artifact::Research, "r", false).unwrap();
        store.write(Artifact::ARTICLE, "a", false).unwrap();
        let state = store.snapshot().unwrap();
        assert!(state.research);
        assert!(!state.plan);
        assert!(state.has_article());
        assert_eq!(state.latest_revision(), Some(0));
    }
}
