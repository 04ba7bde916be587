//! Project configuration read from `.scribe/scribe.toml`.
//!
//! Layered configuration (file → environment → CLI). Every field has a
//! default, so a missing file or a partial file is valid.
//!
//! # Configuration File Format
//!
//! ```toml
//! [generation]
//! api_url = "https://api.perplexity.ai/chat/completions"
//! model = "sonar-pro"
//! max_tokens = 2000
//! temperature = 0.7
//!
//! [output]
//! dir = "outputs"
//!
//! [evaluation]
//! personas = 3
//! max_tokens = 300
//! temperature = 0.8
//!
//! [[evaluation.custom_personas]]
//! id = "investor"
//! name = "Angel Investor"
//! background = "Early-stage investor, 20+ startups"
//! focus_areas = ["Traction", "Market size"]
//! style = "Blunt, numbers-first"
//!
//! [excerpts]
//! research_for_plan = 1000
//! research_for_article = 800
//! plan_for_article = 800
//! article_for_persona = 1000
//! article_for_restyle = 500
//! plan_for_restyle = 500
//! ```
//!
//! # Environment
//!
//! - `SCRIBE_API_KEY` (falls back to `PERPLEXITY_API_KEY`): generation API key
//! - `SCRIBE_OUTPUT_DIR`: overrides `[output] dir`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::evaluation::{DEFAULT_PERSONA_COUNT, Persona, PersonaRegistry};
use crate::generation::{
    DEFAULT_API_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, GenerationSettings,
};
use crate::pipeline::ExcerptLimits;

pub const CONFIG_DIR: &str = ".scribe";
pub const CONFIG_FILE: &str = "scribe.toml";

pub const API_KEY_ENV: &str = "SCRIBE_API_KEY";
pub const FALLBACK_API_KEY_ENV: &str = "PERPLEXITY_API_KEY";
pub const OUTPUT_DIR_ENV: &str = "SCRIBE_OUTPUT_DIR";

/// Generation endpoint and sampling for the pipeline stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSection {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

impl Default for GenerationSection {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// Where topic directories are created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSection {
    /// Relative paths resolve against the project directory.
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// Reader-reaction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSection {
    /// Personas per evaluation when none is requested explicitly.
    #[serde(default = "default_personas")]
    pub personas: usize,
    #[serde(default = "default_evaluation_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_evaluation_temperature")]
    pub temperature: f32,
    /// Added to the built-in personas; a matching id replaces a built-in.
    #[serde(default)]
    pub custom_personas: Vec<Persona>,
}

fn default_personas() -> usize {
    DEFAULT_PERSONA_COUNT
}

fn default_evaluation_max_tokens() -> u32 {
    300
}

fn default_evaluation_temperature() -> f32 {
    0.8
}

impl Default for EvaluationSection {
    fn default() -> Self {
        Self {
            personas: default_personas(),
            max_tokens: default_evaluation_max_tokens(),
            temperature: default_evaluation_temperature(),
            custom_personas: Vec::new(),
        }
    }
}

/// The complete scribe.toml configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScribeToml {
    #[serde(default)]
    pub generation: GenerationSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub evaluation: EvaluationSection,
    #[serde(default)]
    pub excerpts: ExcerptLimits,
}

impl ScribeToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse scribe.toml")
    }

    /// Load `scribe.toml` from `scribe_dir`, or defaults when it is absent.
    pub fn load_or_default(scribe_dir: &Path) -> Result<Self> {
        let config_path = scribe_dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize scribe.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Settings for the pipeline stages.
    pub fn generation_settings(&self, api_key: Option<String>) -> GenerationSettings {
        GenerationSettings {
            api_url: self.generation.api_url.clone(),
            model: self.generation.model.clone(),
            max_tokens: self.generation.max_tokens,
            temperature: self.generation.temperature,
            api_key,
        }
    }

    /// Same endpoint as the stages, with the evaluation sampling limits.
    pub fn evaluation_settings(&self, api_key: Option<String>) -> GenerationSettings {
        self.generation_settings(api_key)
            .with_sampling(self.evaluation.max_tokens, self.evaluation.temperature)
    }

    pub fn persona_registry(&self) -> PersonaRegistry {
        PersonaRegistry::builtin().with_custom(self.evaluation.custom_personas.iter().cloned())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        for (section, temperature) in [
            ("generation", self.generation.temperature),
            ("evaluation", self.evaluation.temperature),
        ] {
            if !(0.0..=2.0).contains(&temperature) {
                warnings.push(format!(
                    "Invalid [{section}] temperature {temperature}: should be between 0.0 and 2.0"
                ));
            }
        }

        if self.generation.max_tokens == 0 {
            warnings.push("[generation] max_tokens is 0: every stage would return nothing".into());
        }
        if self.evaluation.max_tokens == 0 {
            warnings.push("[evaluation] max_tokens is 0: every persona would fall back".into());
        }
        if self.evaluation.personas == 0 {
            warnings.push("[evaluation] personas is 0: reactions would be empty".into());
        }

        let excerpts = [
            ("research_for_plan", self.excerpts.research_for_plan),
            ("research_for_article", self.excerpts.research_for_article),
            ("plan_for_article", self.excerpts.plan_for_article),
            ("article_for_persona", self.excerpts.article_for_persona),
            ("article_for_restyle", self.excerpts.article_for_restyle),
            ("plan_for_restyle", self.excerpts.plan_for_restyle),
        ];
        for (name, budget) in excerpts {
            if budget == 0 {
                warnings.push(format!("[excerpts] {name} is 0: prompts would omit that input"));
            }
        }

        let mut seen = HashSet::new();
        for persona in &self.evaluation.custom_personas {
            if persona.id.trim().is_empty() {
                warnings.push(format!("Custom persona '{}' has an empty id", persona.name));
            } else if !seen.insert(persona.id.as_str()) {
                warnings.push(format!("Duplicate custom persona id '{}'", persona.id));
            }
        }

        if !self.generation.api_url.starts_with("http://")
            && !self.generation.api_url.starts_with("https://")
        {
            warnings.push(format!(
                "Invalid [generation] api_url '{}': should start with http:// or https://",
                self.generation.api_url
            ));
        }

        warnings
    }
}

/// API key from the environment: `SCRIBE_API_KEY`, then `PERPLEXITY_API_KEY`.
/// Empty values count as unset.
pub fn resolve_api_key(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    [API_KEY_ENV, FALLBACK_API_KEY_ENV]
        .into_iter()
        .filter_map(&lookup)
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}
