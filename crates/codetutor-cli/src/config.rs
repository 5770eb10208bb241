//! Application configuration

use crate::cli::Cli;
use codetutor_classifiers::PipelineConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Classification pipeline sections (inference, safety, topics, retry)
    #[serde(flatten)]
    pub pipeline: PipelineConfig,

    /// Practice problem fixtures
    #[serde(default)]
    pub practice: PracticeConfig,
}

impl TutorConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if cli.config.exists() {
            let content = std::fs::read_to_string(&cli.config)?;
            serde_yaml::from_str(&content)?
        } else {
            info!("Config file {} not found, using defaults", cli.config.display());
            Self::default()
        };

        config.apply_overrides(cli);
        config.pipeline.validate()?;

        Ok(config)
    }

    fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(base_url) = &cli.base_url {
            self.pipeline.inference.base_url = base_url.clone();
        }

        if let Some(model) = &cli.model {
            self.pipeline.inference.model = model.clone();
        }

        if let Some(data_dir) = &cli.data_dir {
            self.practice.data_dir = data_dir.clone();
        }
    }
}

/// Practice fixture settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for PracticeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data/practice")
}
