// src/config.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::roster::Tokenizer;

/// Runtime settings. Every field has a default so an empty file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub tokenizer: Tokenizer,
    pub store_dir: PathBuf,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tokenizer: Tokenizer::Quoted,
            store_dir: PathBuf::from("data"),
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults, overlaid by the YAML file at `path` (if given), overlaid by env:
    /// `BRIGHTBOOST_STORE_DIR`, `BRIGHTBOOST_TOKENIZER`, `LOG_LEVEL`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(p) => {
                let text = fs::read_to_string(p)
                    .with_context(|| format!("reading config {}", p.display()))?;
                Self::from_yaml(&text).with_context(|| format!("parsing config {}", p.display()))?
            }
            None => Self::default(),
        };
        cfg.apply_overrides(|key| env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("BRIGHTBOOST_STORE_DIR") {
            self.store_dir = PathBuf::from(dir);
        }
        if let Some(name) = lookup("BRIGHTBOOST_TOKENIZER") {
            self.tokenizer = name.parse()?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.log_filter = level;
        }
        Ok(())
    }
}
