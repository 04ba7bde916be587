//! Plain terminal summaries printed after a command finishes.

use console::style;
use std::path::Path;

use crate::evaluation::EvaluationReport;
use crate::pipeline::{Stage, suggest_next};
use crate::store::{Artifact, PipelineState};
use crate::ui::icons::{CHECK, FILE_MISSING, FILE_NEW, FOLDER, NEXT, SPARKLE, WARN};
use crate::workflow::WorkflowRun;

pub fn print_run_summary(run: &WorkflowRun) {
    println!();
    println!(
        "{}{} {}",
        SPARKLE,
        style("Done:").bold().green(),
        style(&run.slug).bold()
    );
    println!("{}{}", FOLDER, style(run.dir.display()).cyan());
    for output in &run.outputs {
        println!(
            "   {}{}",
            FILE_NEW,
            output
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        );
    }
    if let Some(report) = &run.report {
        print_report(report);
    }
}

pub fn print_report(report: &EvaluationReport) {
    println!();
    println!("{}", style("Reader reactions").bold().underlined());
    if report.is_empty() {
        println!("  {}", style("No personas were evaluated.").dim());
        return;
    }
    for evaluation in report.evaluations() {
        println!(
            "  {} {} {}",
            evaluation.stars(),
            style(&evaluation.persona).bold(),
            style(evaluation.reaction.label()).cyan()
        );
        if !evaluation.comment.is_empty() {
            println!("     {}", style(&evaluation.comment).dim());
        }
    }
    if let Some(average) = report.average_score() {
        println!();
        println!("  Average score: {}", style(format!("{average:.1}/5")).bold());
    }
    let fallbacks = report.fallback_count();
    if fallbacks > 0 {
        println!(
            "  {}{} persona(s) could not be evaluated and show a neutral placeholder",
            WARN, fallbacks
        );
    }
}

/// Print which artifacts exist for a topic and what to run next.
pub fn print_status(topic: &str, dir: &Path, state: &PipelineState) {
    println!();
    println!("{} {}", style("Topic:").bold(), topic);
    println!("{}{}", FOLDER, style(dir.display()).cyan());
    println!();

    let row = |present: bool, label: &str, detail: String| {
        let icon = if present { &CHECK } else { &FILE_MISSING };
        println!("  {}{:<10} {}", icon, label, style(detail).dim());
    };

    row(
        state.research,
        "research",
        Artifact::Research.file_name(),
    );
    row(state.plan, "plan", Artifact::Plan.file_name());
    let revisions = if state.revisions.is_empty() {
        Artifact::ARTICLE.file_name()
    } else {
        let list: Vec<String> = state
            .revisions
            .iter()
            .map(|r| if *r == 0 { "base".to_string() } else { format!("v{r}") })
            .collect();
        list.join(", ")
    };
    row(state.has_article(), "article", revisions);
    row(state.remarks, "remarks", Artifact::Remarks.file_name());
    row(state.sources, "sources", Artifact::Sources.file_name());
    row(state.reactions, "reactions", Artifact::Reactions.file_name());

    println!();
    match suggest_next(state) {
        Some(stage) => println!(
            "{}Next: {}",
            NEXT,
            style(format!("scribe run --topic \"{topic}\" --stage {stage}")).bold()
        ),
        None => println!("{}{}", CHECK, style("All stages complete").green()),
    }
    if state.has_article() && !state.remarks {
        println!(
            "{}{}",
            WARN,
            style(format!("No remarks file; {} will revise without feedback", Stage::Revise)).yellow()
        );
    }
}
