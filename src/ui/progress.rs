use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::errors::StageError;
use crate::pipeline::{Stage, StageOutput};
use crate::ui::icons::{CHECK, CROSS, REUSED, stage_icon};
use crate::workflow::StageObserver;

/// Terminal progress for a workflow run, rendered via an `indicatif` spinner.
///
/// One spinner line is reused for every stage. Finished stages are printed
/// above it, so the scrollback reads as a list of completed steps.
pub struct StageProgress {
    bar: ProgressBar,
    verbose: bool,
}

impl StageProgress {
    pub fn new(verbose: bool) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(spinner) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            bar.set_style(spinner);
        }
        Self { bar, verbose }
    }

    /// Handle for pausing the spinner while something else owns the terminal.
    pub fn bar(&self) -> ProgressBar {
        self.bar.clone()
    }

    /// Print a line above the spinner, or plainly when output is not a terminal.
    fn print_line(&self, msg: impl AsRef<str>) {
        if self.bar.is_hidden() {
            println!("{}", msg.as_ref());
        } else {
            self.bar.println(msg.as_ref());
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl StageObserver for StageProgress {
    fn stage_started(&self, stage: Stage, topic: &str) {
        self.bar.set_message(format!(
            "{}{} {}",
            stage_icon(stage),
            style(stage.title()).bold(),
            style(format!("({topic})")).dim()
        ));
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn stage_finished(&self, output: &StageOutput) {
        self.bar.disable_steady_tick();
        let (icon, verb) = if output.generated {
            (&CHECK, "generated")
        } else {
            (&REUSED, "reused")
        };
        self.print_line(format!(
            "{}{} {} {}",
            icon,
            style(output.stage.title()).bold(),
            style(verb).dim(),
            style(output.path.display()).cyan()
        ));
        if self.verbose {
            self.print_line(format!(
                "   {}",
                style(format!("{} chars", output.content.chars().count())).dim()
            ));
        }
        self.bar.set_message("");
    }

    fn stage_failed(&self, stage: Stage, error: &StageError) {
        self.bar.disable_steady_tick();
        self.print_line(format!(
            "{}{} {}",
            CROSS,
            style(stage.title()).bold().red(),
            style(error).red()
        ));
        self.bar.set_message("");
    }
}

impl Drop for StageProgress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}
