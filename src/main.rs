use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scribe::config::Config;
use scribe::pipeline::Stage;

mod cmd;

#[derive(Parser)]
#[command(name = "scribe")]
#[command(version, about = "Staged article generation: research, plan, write, revise")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Root directory for topic outputs. Overrides SCRIBE_OUTPUT_DIR and scribe.toml.
    #[arg(long, global = true)]
    pub output_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one stage, or research → plan → article when no stage is given
    Run {
        /// Article topic
        #[arg(short, long)]
        topic: String,

        /// Stage to run: research, plan, article, revise, verify, feedback
        #[arg(short, long)]
        stage: Option<Stage>,

        /// Regenerate even if the stage output already exists
        #[arg(long)]
        force: bool,

        /// Path to an outline folded into the planning prompt
        #[arg(long)]
        skeleton: Option<PathBuf>,

        /// Full run only: verify claims after writing the article
        #[arg(long)]
        verify: bool,

        /// Evaluate with N reader personas (full run), or the persona count for the feedback stage
        #[arg(long, value_name = "N")]
        evaluate: Option<usize>,

        /// Offer to edit the article in $EDITOR before continuing
        #[arg(short, long)]
        interactive: bool,
    },
    /// Gather reader reactions for any article file
    Evaluate {
        /// Article to evaluate (defaults to the topic's latest revision)
        article: Option<PathBuf>,

        /// Evaluate the latest revision of this topic
        #[arg(short, long, conflicts_with = "article")]
        topic: Option<String>,

        /// Number of personas
        #[arg(short = 'n', long = "num-personas")]
        num_personas: Option<usize>,

        /// Where to write the reactions (defaults to reactions.md next to the article)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show which artifacts exist for a topic and what to run next
    Status {
        #[arg(short, long)]
        topic: String,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default scribe.toml file
    Init,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("scribe={level},warn").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };
    let config = Config::new(project_dir, cli.verbose, cli.output_dir.clone())?;

    match &cli.command {
        Commands::Run {
            topic,
            stage,
            force,
            skeleton,
            verify,
            evaluate,
            interactive,
        } => {
            let args = cmd::RunArgs {
                topic: topic.clone(),
                stage: *stage,
                force: *force,
                skeleton: skeleton.clone(),
                verify: *verify,
                evaluate: *evaluate,
                interactive: *interactive,
            };
            cmd::cmd_run(&config, args).await?;
        }
        Commands::Evaluate {
            article,
            topic,
            num_personas,
            output,
        } => {
            cmd::cmd_evaluate(
                &config,
                article.as_deref(),
                topic.as_deref(),
                *num_personas,
                output.as_deref(),
            )
            .await?;
        }
        Commands::Status { topic } => cmd::cmd_status(&config, topic)?,
        Commands::Config { command } => cmd::cmd_config(&config, command.clone())?,
    }

    Ok(())
}
