//! Ordered index of article revisions recovered from file names.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::Artifact;

/// Article revisions present in a topic directory, keyed by revision index.
///
/// The chain is rebuilt from the directory listing every time; there is no
/// stored head pointer. The head is the highest index present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevisionChain {
    entries: BTreeMap<u32, PathBuf>,
}

impl RevisionChain {
    /// Build the chain from candidate paths, ignoring anything that is not an
    /// article revision file.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let entries = paths
            .into_iter()
            .filter_map(|path| {
                let path = path.as_ref();
                let name = path.file_name()?.to_str()?;
                match Artifact::parse_file_name(name)? {
                    Artifact::Article { revision } => Some((revision, path.to_path_buf())),
                    _ => None,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Highest revision index present, `None` when no article exists.
    pub fn head(&self) -> Option<u32> {
        self.entries.keys().next_back().copied()
    }

    /// Index the next revision would take. `None` when no article exists or
    /// the head is already `u32::MAX`.
    pub fn next_revision(&self) -> Option<u32> {
        self.head().and_then(|head| head.checked_add(1))
    }

    pub fn path(&self, revision: u32) -> Option<&Path> {
        self.entries.get(&revision).map(PathBuf::as_path)
    }

    pub fn has_base(&self) -> bool {
        self.entries.contains_key(&0)
    }

    /// Revision indices in ascending order.
    pub fn revisions(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.keys().copied()
    }

    /// Number of indices missing below the head. A well-formed chain has none.
    pub fn missing_count(&self) -> u64 {
        match self.head() {
            Some(head) => u64::from(head) + 1 - self.entries.len() as u64,
            None => 0,
        }
    }

    /// The lowest `limit` missing indices, in ascending order.
    ///
    /// Walks the present entries rather than the index range, so the cost is
    /// bounded by the number of files and `limit`, not by the head value.
    pub fn first_gaps(&self, limit: usize) -> Vec<u32> {
        let mut gaps = Vec::new();
        let mut expected = 0u32;
        for &revision in self.entries.keys() {
            while expected < revision && gaps.len() < limit {
                gaps.push(expected);
                expected += 1;
            }
            if gaps.len() == limit {
                break;
            }
            match revision.checked_add(1) {
                Some(next) => expected = next,
                None => break,
            }
        }
        gaps
    }
}
