//! Reader personas used to simulate reactions to an article.
//!
//! Personas are plain data. One shared [`PersonaEvaluator`](super::PersonaEvaluator)
//! takes a descriptor per call, so adding a persona never means adding a
//! client or connection.
//!
//! ## Built-in personas
//!
//! | id | Name |
//! |----|------|
//! | `cxo` | CxO (Chief Executive) |
//! | `engineer` | Senior Engineer |
//! | `non-technical` | Non-Technical Professional |
//! | `marketer` | Marketing Manager |
//! | `product-manager` | Product Manager |
//!
//! Extra personas come from `[[evaluation.custom_personas]]` in
//! `.scribe/scribe.toml`; a custom persona with a built-in id replaces it.

use serde::{Deserialize, Serialize};

/// Descriptor for one simulated reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub id: String,
    pub name: String,
    pub background: String,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    pub style: String,
}

impl Persona {
    pub fn new(
        id: &str,
        name: &str,
        background: &str,
        focus_areas: &[&str],
        style: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            background: background.to_string(),
            focus_areas: focus_areas.iter().map(|s| s.to_string()).collect(),
            style: style.to_string(),
        }
    }
}

pub fn builtin_personas() -> Vec<Persona> {
    vec![
        Persona::new(
            "cxo",
            "CxO (Chief Executive)",
            "VP/C-Suite leader, 15+ years enterprise experience",
            &["Business value", "ROI", "Strategic implications", "Market impact"],
            "Strategic, high-level, business-focused, sometimes dismissive of tactics",
        ),
        Persona::new(
            "engineer",
            "Senior Engineer",
            "Software engineer, 10+ years, deep technical background",
            &["Technical depth", "Implementation", "Architecture", "Code quality"],
            "Technical, detailed, asks implementation questions, references best practices",
        ),
        Persona::new(
            "non-technical",
            "Non-Technical Professional",
            "Marketing/Operations background, limited technical knowledge",
            &["Practical application", "Clarity", "Real-world impact", "Relatable examples"],
            "Accessible, sometimes confused by jargon, asks clarifying questions",
        ),
        Persona::new(
            "marketer",
            "Marketing Manager",
            "5+ years in marketing, focused on brand and messaging",
            &["Brand messaging", "Audience engagement", "Storytelling", "Market trends"],
            "Narrative-focused, engagement-oriented, trend-aware, sometimes superficial",
        ),
        Persona::new(
            "product-manager",
            "Product Manager",
            "Product leadership, user-centric mindset",
            &["User needs", "Product strategy", "Use cases", "Feature implications"],
            "User-focused, strategic, asks \"why\", connects to product decisions",
        ),
    ]
}

/// Ordered set of personas with unique ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaRegistry {
    personas: Vec<Persona>,
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PersonaRegistry {
    pub fn builtin() -> Self {
        Self {
            personas: builtin_personas(),
        }
    }

    /// Add custom personas. An id already present is replaced in place.
    pub fn with_custom(mut self, custom: impl IntoIterator<Item = Persona>) -> Self {
        for persona in custom {
            match self.personas.iter_mut().find(|p| p.id == persona.id) {
                Some(existing) => *existing = persona,
                None => self.personas.push(persona),
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Persona> {
        self.personas.get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Persona> {
        self.personas.iter()
    }
}
