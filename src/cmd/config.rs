//! Configuration view and validation commands: `scribe config`.

use anyhow::{Context, Result};

use scribe::config::Config;
use scribe::scribe_config::ScribeToml;

use super::super::ConfigCommands;

fn print_toml(toml: &ScribeToml) {
    println!("[generation]");
    println!("  api_url = \"{}\"", toml.generation.api_url);
    println!("  model = \"{}\"", toml.generation.model);
    println!("  max_tokens = {}", toml.generation.max_tokens);
    println!("  temperature = {}", toml.generation.temperature);
    println!();

    println!("[output]");
    println!("  dir = \"{}\"", toml.output.dir.display());
    println!();

    println!("[evaluation]");
    println!("  personas = {}", toml.evaluation.personas);
    println!("  max_tokens = {}", toml.evaluation.max_tokens);
    println!("  temperature = {}", toml.evaluation.temperature);
    for persona in &toml.evaluation.custom_personas {
        println!("  custom persona \"{}\": {}", persona.id, persona.name);
    }
    println!();

    println!("[excerpts]");
    println!("  research_for_plan = {}", toml.excerpts.research_for_plan);
    println!("  research_for_article = {}", toml.excerpts.research_for_article);
    println!("  plan_for_article = {}", toml.excerpts.plan_for_article);
    println!("  article_for_persona = {}", toml.excerpts.article_for_persona);
    println!("  article_for_restyle = {}", toml.excerpts.article_for_restyle);
    println!("  plan_for_restyle = {}", toml.excerpts.plan_for_restyle);
    println!();
}

pub fn cmd_config(config: &Config, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = config.config_path();

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Scribe Configuration");
            println!("====================");
            println!();

            if config.config_exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No scribe.toml found at {}", config_path.display());
                println!("Using default configuration.");
            }
            println!();
            print_toml(config.toml());

            // Effective values (including env/CLI overrides)
            println!("Effective values (with env/CLI overrides):");
            println!("  output_dir = \"{}\"", config.output_dir().display());
            println!(
                "  api_key = {}",
                if config.api_key.is_some() { "set" } else { "not set" }
            );
            println!(
                "  personas available = {}",
                config.toml().persona_registry().len()
            );
            println!();

            if !config.config_exists() {
                println!("Run 'scribe config init' to create a scribe.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config.config_exists() {
                println!("No scribe.toml found. Using defaults (valid).");
                return Ok(());
            }

            let warnings = config.toml().validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config.config_exists() {
                println!("scribe.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            std::fs::create_dir_all(&config.scribe_dir).with_context(|| {
                format!("Failed to create {}", config.scribe_dir.display())
            })?;
            ScribeToml::default().save(&config_path)?;

            println!("Created scribe.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [generation] api_url, model, max_tokens, temperature");
            println!("  - [output] dir");
            println!("  - [evaluation] personas and [[evaluation.custom_personas]]");
            println!("  - [excerpts] prompt excerpt lengths");
            println!();
        }
    }

    Ok(())
}
