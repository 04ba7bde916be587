//! Standalone reader-reaction command: `scribe evaluate`.

use anyhow::{Context, Result, bail};
use console::style;
use std::path::{Path, PathBuf};

use scribe::config::Config;
use scribe::store::{Artifact, ArtifactStore};
use scribe::topic::TopicSpace;
use scribe::ui::icons::FILE_NEW;
use scribe::ui::print_report;
use scribe::util::extract_title;

use super::build_services;

/// Article to evaluate: an explicit file, or the latest revision of a topic.
fn resolve_article(config: &Config, article: Option<&Path>, topic: Option<&str>) -> Result<PathBuf> {
    match (article, topic) {
        (Some(path), _) => Ok(path.to_path_buf()),
        (None, Some(topic)) => {
            let dir = TopicSpace::new(config.output_dir()).topic_dir(topic);
            let latest = if dir.is_dir() {
                let chain = ArtifactStore::open(config.output_dir(), topic)?.revisions()?;
                chain
                    .head()
                    .and_then(|head| chain.path(head))
                    .map(Path::to_path_buf)
            } else {
                None
            };
            match latest {
                Some(path) => Ok(path),
                None => bail!(
                    "No article found for topic '{}' in {}. Run 'scribe run --topic \"{}\"' first.",
                    topic,
                    dir.display(),
                    topic
                ),
            }
        }
        (None, None) => bail!("Provide an article path or --topic"),
    }
}

pub async fn cmd_evaluate(
    config: &Config,
    article: Option<&Path>,
    topic: Option<&str>,
    num_personas: Option<usize>,
    output: Option<&Path>,
) -> Result<()> {
    let article = resolve_article(config, article, topic)?;
    let content = std::fs::read_to_string(&article)
        .with_context(|| format!("Failed to read article: {}", article.display()))?;
    let title = extract_title(&content);
    let count = num_personas.unwrap_or(config.toml().evaluation.personas);

    println!(
        "Evaluating {} with {} persona(s)...",
        style(&title).bold(),
        count
    );

    let (_, mut aggregator) = build_services(config);
    let report = aggregator.evaluate(&title, &content, count).await;

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => article
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(Artifact::Reactions.file_name()),
    };
    std::fs::write(&output, report.to_markdown())
        .with_context(|| format!("Failed to write reactions: {}", output.display()))?;

    print_report(&report);
    println!();
    println!("{}{}", FILE_NEW, style(output.display()).cyan());
    Ok(())
}
