use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Pipeline settings. Loaded from JSON with `--config`, then overridden by flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Keep going after a failed line so every error gets reported.
    pub continue_on_error: bool,
    /// Write the two-line image header when assembling.
    pub header: bool,
    /// Worker threads; `None` lets rayon decide.
    pub jobs: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            continue_on_error: true,
            header: true,
            jobs: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json(r#"{ "jobs": 2 }"#).unwrap();
        assert_eq!(cfg, Config { jobs: Some(2), ..Config::default() });
    }

    #[test]
    fn unknown_keys_rejected() {
        assert!(Config::from_json(r#"{ "verbose": true }"#).is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(Path::new("_no_such_config.json")).unwrap_err();
        assert!(err.to_string().contains("_no_such_config.json"));
    }
}
