use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::scribe_config::{CONFIG_DIR, CONFIG_FILE, OUTPUT_DIR_ENV, ScribeToml, resolve_api_key};

/// Runtime configuration for scribe.
///
/// Bridges `scribe.toml` with the environment and CLI flags. Precedence for
/// every value is CLI, then environment, then file, then built-in default.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_dir: PathBuf,
    pub scribe_dir: PathBuf,
    pub output_dir: PathBuf,
    pub verbose: bool,
    pub api_key: Option<String>,
    toml: ScribeToml,
}

impl Config {
    /// Load configuration for `project_dir` from the file and process
    /// environment.
    pub fn new(project_dir: PathBuf, verbose: bool, output_dir: Option<PathBuf>) -> Result<Self> {
        Self::with_env(project_dir, verbose, output_dir, |key| {
            std::env::var(key).ok()
        })
    }

    /// Like [`Config::new`], reading environment values through `lookup`.
    pub fn with_env(
        project_dir: PathBuf,
        verbose: bool,
        output_dir: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let project_dir = project_dir
            .canonicalize()
            .context("Failed to resolve project directory")?;
        let scribe_dir = project_dir.join(CONFIG_DIR);
        let toml = ScribeToml::load_or_default(&scribe_dir)?;

        let output_dir = output_dir
            .or_else(|| {
                lookup(OUTPUT_DIR_ENV)
                    .filter(|v| !v.trim().is_empty())
                    .map(PathBuf::from)
            })
            .unwrap_or_else(|| toml.output.dir.clone());
        let output_dir = if output_dir.is_absolute() {
            output_dir
        } else {
            project_dir.join(output_dir)
        };

        let api_key = resolve_api_key(&lookup);
        tracing::debug!(
            project = %project_dir.display(),
            output = %output_dir.display(),
            api_key = api_key.is_some(),
            "configuration loaded"
        );

        Ok(Self {
            project_dir,
            scribe_dir,
            output_dir,
            verbose,
            api_key,
            toml,
        })
    }

    pub fn toml(&self) -> &ScribeToml {
        &self.toml
    }

    pub fn config_path(&self) -> PathBuf {
        self.scribe_dir.join(CONFIG_FILE)
    }

    pub fn config_exists(&self) -> bool {
        self.config_path().exists()
    }

    /// Output root for topic directories.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
