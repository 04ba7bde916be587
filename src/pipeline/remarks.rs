//! Remarks template and the guard that guarantees it is written.

use crate::errors::StoreError;
use crate::store::{Artifact, ArtifactStore, WriteOutcome};

pub fn remarks_template(topic: &str) -> String {
    format!(
        r#"# Remarks & Feedback: {topic}

## Your Initial Assessment

**Overall Impression:**
- [ ] Excellent - Ready to post
- [ ] Good - Needs minor edits
- [ ] Okay - Needs rework
- [ ] Weak - Start over

**Key Strengths:**
(What works well in this article?)

1.
2.
3.

**Areas for Improvement:**
(What could be better?)

1.
2.
3.

---

## Content Feedback

### Headline
**Current:** (from plan)
**Your Thoughts:**

**Suggested Alternative:**

### Hook/Opening
**Your Assessment:**

### Structure & Flow
**What's Working:**

**What Needs Adjustment:**

### Examples & Evidence
**Good Examples:**

**Missing Examples (add?):**

### Call-to-Action
**Current CTA Assessment:**

**Suggested CTA (if needed):**

---

## Tone & Voice

**Tone Assessment:**
- [ ] Too formal
- [ ] Just right
- [ ] Too casual

**Adjustments Needed:**

---

## LinkedIn-Specific

**Hashtags Review:**
**Current:** (from article)
**Your Suggestions:**

**Engagement Hooks:**
(What will make people comment?)

**Audience Fit:**
(Who is this for? Will they engage?)

---

## Final Edits

**Typos/Grammar:**

**Link/Citation Additions:**

**Personal Stories to Add:**

---

## Publish Decision

**Ready to Post:** [ ] Yes  [ ] No

**Publishing Date/Time Preference:**

---

## Notes for Next Article

**What Worked Well (repeat in future):**

**What to Avoid Next Time:**

**Topics to Explore:**
"#
    )
}

/// Writes the remarks template when dropped unless [`RemarksGuard::finish`]
/// already did.
///
/// Armed right after the article is persisted, so the template lands on every
/// exit path of the article stage: normal return, an `Err` out of the review
/// loop, or a panic unwinding through it.
pub struct RemarksGuard<'a> {
    store: &'a ArtifactStore,
    content: String,
    overwrite: bool,
    armed: bool,
}

impl<'a> RemarksGuard<'a> {
    /// `overwrite = false` keeps remarks a user may already have filled in.
    pub fn arm(store: &'a ArtifactStore, overwrite: bool) -> Self {
        Self {
            content: remarks_template(store.topic()),
            store,
            overwrite,
            armed: true,
        }
    }

    /// Write the remarks now and surface any storage error to the caller.
    pub fn finish(mut self) -> Result<WriteOutcome, StoreError> {
        self.armed = false;
        self.write()
    }

    fn write(&self) -> Result<WriteOutcome, StoreError> {
        let outcome = self
            .store
            .write(Artifact::Remarks, &self.content, self.overwrite)?;
        if outcome.written {
            tracing::info!(path = %outcome.path.display(), "remarks template created");
        } else {
            tracing::debug!(path = %outcome.path.display(), "existing remarks kept");
        }
        Ok(outcome)
    }
}

impl Drop for RemarksGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        if let Err(e) = self.write() {
            tracing::warn!(error = %e, "failed to create remarks template");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_template_names_topic() {
        let template = remarks_template("Edge AI");
        assert!(template.starts_with("# Remarks & Feedback: Edge AI\n"));
        assert!(template.contains("## Publish Decision"));
    }

    #[test]
    fn test_drop_writes_remarks() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::open(dir.path(), "Edge AI").unwrap();
        {
            let _guard = RemarksGuard::arm(&store, true);
            assert!(!store.exists(Artifact::Remarks));
        }
        let remarks = store.read(Artifact::Remarks).unwrap();
        assert!(remarks.contains("Edge AI"));
    }

    #[test]
    fn test_drop_writes_remarks_during_panic() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::open(dir.path(), "Edge AI").unwrap();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = RemarksGuard::arm(&store, true);
            panic!("review loop interrupted");
        }));
        assert!(result.is_err());
        assert!(store.exists(Artifact::Remarks));
    }

    #[test]
    fn test_finish_writes_once() {
        let dir = tempdir().unwrap();
        let store = ArtifactStore::open(dir.path(), "Edge AI").unwrap();
        let outcome = RemarksGuard::arm(&store, true).finish().unwrap();
        assert!(outcome.written);

        std::fs::write(&outcome.path, "my notes").unwrap();
        let outcome = RemarksGuard::arm(&store, false).finish().unwrap();
        assert!(!outcome.written);
        assert_eq!(store.read(Artifact::Remarks).unwrap(), "my notes");
    }
}
