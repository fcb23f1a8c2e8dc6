//! Secret resolution for the API credential and the assistant id.
//!
//! Resolution order for each value:
//! 1. process environment (`OPENAI_API_KEY`, `OPENAI_ASSISTANT`)
//! 2. `secrets.toml` in the config directory (`openai_api_key`, `openai_assistant`)

use std::fmt;
use std::path::{Path, PathBuf};

use guidechat_common::ConfigError;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::toml_loader;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const ASSISTANT_VAR: &str = "OPENAI_ASSISTANT";
const SECRETS_FILE: &str = "secrets.toml";
const ASSISTANT_ID_PATTERN: &str = r"^asst_[A-Za-z0-9]+$";

/// The two values the chat cannot run without.
#[derive(Clone)]
pub struct Secrets {
    pub api_key: String,
    pub assistant_id: String,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("api_key", &"[REDACTED]")
            .field("assistant_id", &self.assistant_id)
            .finish()
    }
}

#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    openai_api_key: Option<String>,
    openai_assistant: Option<String>,
}

impl Secrets {
    /// Resolve secrets from the environment, then `secrets.toml` in `dir`
    /// (the platform config directory when `dir` is `None`).
    pub fn resolve(dir: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match dir {
            Some(d) => Some(d.join(SECRETS_FILE)),
            None => toml_loader::config_dir().ok().map(|d| d.join(SECRETS_FILE)),
        };
        Self::resolve_with(|name| std::env::var(name).ok(), file)
    }

    /// Resolve using an explicit variable lookup and optional secrets file.
    pub fn resolve_with(
        lookup: impl Fn(&str) -> Option<String>,
        file: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let from_file = match file {
            Some(ref path) if path.exists() => read_secrets_file(path)?,
            _ => SecretsFile::default(),
        };

        let api_key = non_empty(lookup(API_KEY_VAR))
            .or_else(|| non_empty(from_file.openai_api_key))
            .ok_or_else(|| ConfigError::MissingSecret(API_KEY_VAR.into()))?;
        let assistant_id = non_empty(lookup(ASSISTANT_VAR))
            .or_else(|| non_empty(from_file.openai_assistant))
            .ok_or_else(|| ConfigError::MissingSecret(ASSISTANT_VAR.into()))?;

        if !looks_like_assistant_id(&assistant_id) {
            warn!(assistant_id = %assistant_id, "assistant id does not look like asst_...");
        }

        Ok(Self {
            api_key,
            assistant_id,
        })
    }
}

fn read_secrets_file(path: &Path) -> Result<SecretsFile, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;
    let parsed: SecretsFile = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse {}: {e}", path.display())))?;
    debug!("read secrets from {}", path.display());
    Ok(parsed)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn looks_like_assistant_id(id: &str) -> bool {
    regex::Regex::new(ASSISTANT_ID_PATTERN)
        .map(|re| re.is_match(id))
        .unwrap_or(true)
}
