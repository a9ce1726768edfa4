use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

const REQUIRED_RESPONSE: &str = "I AGREE";
const NOTICE_FILE: &str = "ACCEPTABLE_USE.md";
const CONSENT_FILE: &str = ".betterdocs_terms.json";
const RECORD_VERSION: u32 = 1;
const DEFAULT_NOTICE: &str = include_str!("../ACCEPTABLE_USE.md");

#[derive(Debug, Error)]
pub enum ConsentError {
    #[error("this program requires interactive acceptance of the legal notice; run interactively or set BETTERDOCS_ACCEPT_TERMS='I AGREE' for automation")]
    NonInteractive,
    #[error("aborted: the legal notice was not accepted")]
    Declined,
    #[error("consent check failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ConsentError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ConsentError::NonInteractive => 2,
            ConsentError::Declined | ConsentError::Io(_) => 1,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ConsentRecord {
    accepted: bool,
    hash: String,
    timestamp: String,
    source: String,
    script: String,
    version: u32,
}

pub struct LegalNotice {
    text: String,
    consent_file: PathBuf,
}

impl LegalNotice {
    /// Load the notice from `dir`, falling back to the bundled one.
    pub fn load(dir: &Path) -> Result<Self, ConsentError> {
        let notice_file = dir.join(NOTICE_FILE);
        let policy = if notice_file.is_file() {
            std::fs::read_to_string(&notice_file)?
        } else {
            DEFAULT_NOTICE.to_string()
        };
        Ok(Self::new(&policy, dir.join(CONSENT_FILE)))
    }

    pub fn new(policy: &str, consent_file: PathBuf) -> Self {
        LegalNotice {
            text: format!(
                "{}\n\nType {} to continue.\n",
                policy.trim(),
                REQUIRED_RESPONSE
            ),
            consent_file,
        }
    }

    /// Hex SHA-256 of the notice; editing the notice re-prompts everyone.
    pub fn hash(&self) -> String {
        format!("{:x}", Sha256::digest(self.text.as_bytes()))
    }

    fn has_recorded_consent(&self) -> bool {
        let Ok(raw) = std::fs::read_to_string(&self.consent_file) else {
            return false;
        };
        match serde_json::from_str::<ConsentRecord>(&raw) {
            Ok(record) => record.hash == self.hash(),
            Err(e) => {
                debug!("Ignoring corrupt consent record: {}", e);
                false
            }
        }
    }

    fn write_consent(&self, source: &str) -> std::io::Result<()> {
        let record = ConsentRecord {
            accepted: true,
            hash: self.hash(),
            timestamp: Utc::now().to_rfc3339(),
            source: source.to_string(),
            script: env!("CARGO_PKG_NAME").to_string(),
            version: RECORD_VERSION,
        };
        let json = serde_json::to_string_pretty(&record).map_err(std::io::Error::other)?;
        std::fs::write(&self.consent_file, json)
    }

    /// Check or obtain consent. `env_accept` is the non-interactive
    /// acceptance value, `input` the prompt source when it is a terminal.
    pub fn require(
        &self,
        env_accept: Option<&str>,
        interactive: bool,
        input: &mut impl BufRead,
        output: &mut impl Write,
    ) -> Result<(), ConsentError> {
        if env_accept.is_some_and(|v| v.trim() == REQUIRED_RESPONSE) {
            if let Err(e) = self.write_consent("env") {
                debug!("Could not persist consent record: {}", e);
            }
            return Ok(());
        }

        if self.has_recorded_consent() {
            return Ok(());
        }

        if !interactive {
            return Err(ConsentError::NonInteractive);
        }

        let rule = "=".repeat(80);
        writeln!(output, "{rule}\n{}\n{rule}", self.text)?;
        write!(output, "> ")?;
        output.flush()?;

        let mut response = String::new();
        input.read_line(&mut response)?;
        if response.trim() != REQUIRED_RESPONSE {
            return Err(ConsentError::Declined);
        }

        self.write_consent("prompt")?;
        writeln!(output, "Thank you. Proceeding...")?;
        Ok(())
    }
}

/// Gate the run on the acceptable-use notice stored in `dir`.
pub fn require_consent(dir: &Path, env_accept: Option<&str>) -> Result<(), ConsentError> {
    let notice = LegalNotice::load(dir)?;
    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    notice.require(env_accept, interactive, &mut stdin.lock(), &mut std::io::stdout())
}
