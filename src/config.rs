//! Extraction settings and role catalogues loaded from YAML.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{fuzzy::RoleCatalogEntry, phrase::PhraseSet};

/// The only configuration the extraction core accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractConfig {
    #[serde(default = "ExtractConfig::default_phrase_sets")]
    pub phrase_sets: Vec<PhraseSet>,
    #[serde(default)]
    pub product_analysis: bool,
    #[serde(default)]
    pub auditor_mode: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            phrase_sets: Self::default_phrase_sets(),
            product_analysis: false,
            auditor_mode: false,
        }
    }
}

impl ExtractConfig {
    pub fn default_phrase_sets() -> Vec<PhraseSet> {
        vec![
            PhraseSet::new("mt", ["SALES IN MT", "SALES IN QTY"]),
            PhraseSet::new("value", ["SALES IN VALUE"]),
        ]
    }

    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = load_yaml(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.phrase_sets.is_empty(),
            "Configuration must define at least one phrase set"
        );
        for set in &self.phrase_sets {
            ensure!(
                set.phrases.iter().any(|phrase| !phrase.trim().is_empty()),
                "Phrase set '{}' has no phrases",
                set.name
            );
        }
        Ok(())
    }

    /// Replaces the phrase sets with one set per ad-hoc phrase, named after it.
    pub fn with_phrases(mut self, phrases: &[String]) -> Self {
        if !phrases.is_empty() {
            self.phrase_sets = phrases
                .iter()
                .map(|phrase| PhraseSet::new(phrase.clone(), [phrase.clone()]))
                .collect();
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RoleCatalogFile {
    roles: Vec<RoleCatalogEntry>,
}

pub fn load_role_catalogue(path: &Path) -> Result<Vec<RoleCatalogEntry>> {
    let file: RoleCatalogFile = load_yaml(path)?;
    ensure!(!file.roles.is_empty(), "Role catalogue {path:?} is empty");
    Ok(file.roles)
}

fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Opening YAML file {path:?}"))?;
    let reader = BufReader::new(file);
    serde_yaml::from_reader(reader).with_context(|| format!("Parsing YAML file {path:?}"))
}
