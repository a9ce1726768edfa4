use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment-driven settings, read from `BETTERDOCS_*` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Mirroring program invoked for retrieval.
    pub wget: String,
    /// Directory the mirror is written into; pages land under `<mirror_dir>/<domain>/<path>`.
    pub mirror_dir: PathBuf,
    /// Directory holding the acceptable-use notice and the consent record.
    pub consent_dir: PathBuf,
    /// Non-interactive consent (`BETTERDOCS_ACCEPT_TERMS`).
    #[serde(default)]
    pub accept_terms: Option<String>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_source(config::Environment::with_prefix("BETTERDOCS"))
    }

    fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .set_default("wget", "wget")?
            .set_default("mirror_dir", ".")?
            .set_default("consent_dir", ".")?
            .add_source(source)
            .build()
            .context("loading settings")?
            .try_deserialize()
            .context("parsing settings")
    }
}
