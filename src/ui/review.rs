//! Interactive stage review: open fresh research, plan and article drafts in
//! the user's editor, then offer to regenerate them with a new direction.

use anyhow::{Context, Result, bail};
use console::style;
use dialoguer::{Confirm, Input};
use indicatif::ProgressBar;
use std::path::Path;
use std::process::Command;

use crate::pipeline::{ReviewDecision, Stage, StageReview};

const FALLBACK_EDITOR: &str = "vi";

/// Editor command from `$VISUAL` / `$EDITOR`, split on whitespace, or `vi`.
pub fn editor_command(lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
    for var in ["VISUAL", "EDITOR"] {
        if let Some(value) = lookup(var) {
            let parts: Vec<String> = value.split_whitespace().map(str::to_string).collect();
            if !parts.is_empty() {
                return parts;
            }
        }
    }
    vec![FALLBACK_EDITOR.to_string()]
}

/// Open `path` in the editor and wait for it to exit.
pub fn open_in_editor(command: &[String], path: &Path) -> Result<()> {
    let Some((program, args)) = command.split_first() else {
        bail!("No editor command configured");
    };
    let status = Command::new(program)
        .args(args)
        .arg(path)
        .status()
        .with_context(|| format!("Failed to launch editor '{program}'"))?;
    if !status.success() {
        bail!("Editor '{}' exited with {}", program, status);
    }
    Ok(())
}

/// Questions asked when offering to regenerate a stage's output: the yes/no
/// question and the prompt for the reviewer's direction.
pub fn regenerate_questions(stage: Stage) -> Option<(&'static str, &'static str)> {
    match stage {
        Stage::Research => Some((
            "Regenerate research with a different approach?",
            "Enter a new research prompt (or press Enter for default)",
        )),
        Stage::Plan => Some((
            "Regenerate plan with a different focus?",
            "What should the plan focus on? (e.g. 'technical depth', 'practical examples', 'emotional impact')",
        )),
        Stage::Article => Some((
            "Regenerate article with a different style?",
            "Describe the desired style (e.g. 'more conversational', 'more data-driven', 'more storytelling')",
        )),
        Stage::Revise | Stage::Verify | Stage::Feedback => None,
    }
}

/// Review loop driven by `dialoguer` prompts.
///
/// Pauses the progress spinner, if any, while the terminal is in use.
pub struct EditorReview {
    editor: Vec<String>,
    progress: Option<ProgressBar>,
}

impl EditorReview {
    pub fn new() -> Self {
        Self {
            editor: editor_command(|var| std::env::var(var).ok()),
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    fn confirm(prompt: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .context("Failed to read confirmation")
    }

    fn edit_loop(&self, stage: Stage, artifact: &Path) -> Result<()> {
        let mut prompt = format!("Would you like to edit the {stage}?");
        loop {
            if !Self::confirm(&prompt, false)? {
                return Ok(());
            }

            open_in_editor(&self.editor, artifact)?;
            tracing::debug!(%stage, path = %artifact.display(), "artifact edited");

            if Self::confirm(&format!("Are you happy with the {stage}?"), true)? {
                return Ok(());
            }
            prompt = format!("Open the {stage} again?");
        }
    }

    fn review_loop(&self, stage: Stage, artifact: &Path) -> Result<ReviewDecision> {
        println!();
        println!(
            "{} {}",
            style(format!("{stage} written to")).bold(),
            style(artifact.display()).cyan()
        );

        self.edit_loop(stage, artifact)?;

        let Some((question, direction_prompt)) = regenerate_questions(stage) else {
            return Ok(ReviewDecision::Accept);
        };
        if !Self::confirm(question, false)? {
            return Ok(ReviewDecision::Accept);
        }
        let direction: String = Input::new()
            .with_prompt(direction_prompt)
            .allow_empty(true)
            .interact_text()
            .context("Failed to read regeneration direction")?;
        Ok(ReviewDecision::Regenerate(direction.trim().to_string()))
    }
}

impl Default for EditorReview {
    fn default() -> Self {
        Self::new()
    }
}

impl StageReview for EditorReview {
    fn review(&mut self, stage: Stage, artifact: &Path) -> Result<ReviewDecision> {
        match &self.progress {
            Some(bar) => bar.suspend(|| self.review_loop(stage, artifact)),
            None => self.review_loop(stage, artifact),
        }
    }
}
