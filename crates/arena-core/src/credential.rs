//! API credential loading.
//!
//! The key is read from a dotenv-style file (default `.env`) and, failing
//! that, from the process environment. The result is returned as a plain
//! value; the process environment is never modified.

use std::fmt;
use std::path::{Path, PathBuf};

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const DEFAULT_ENV_FILE: &str = ".env";
/// Overrides the location of the env file.
pub const ENV_FILE_VAR: &str = "ARENA_ENV_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    EnvFile(PathBuf),
    ProcessEnv,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvFile(path) => write!(f, "{}", path.display()),
            Self::ProcessEnv => write!(f, "${API_KEY_VAR}"),
        }
    }
}

/// A non-empty API key together with where it was found.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    value: String,
    source: CredentialSource,
}

impl Credential {
    /// Returns `None` for blank values.
    pub fn new(value: impl Into<String>, source: CredentialSource) -> Option<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            None
        } else {
            Some(Self { value, source })
        }
    }

    pub fn expose(&self) -> &str {
        &self.value
    }

    pub fn source(&self) -> &CredentialSource {
        &self.source
    }

    /// First 15 and last 3 characters, e.g. `sk-proj-7d9200a...3ac`.
    pub fn masked(&self) -> String {
        mask_api_key(&self.value)
    }
}

// Never print the key itself.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("value", &self.masked())
            .field("source", &self.source)
            .finish()
    }
}

pub fn mask_api_key(api_key: &str) -> String {
    let chars: Vec<char> = api_key.chars().collect();
    if chars.len() <= 21 {
        return api_key.to_string();
    }
    let head: String = chars[..15].iter().collect();
    let tail: String = chars[chars.len() - 3..].iter().collect();
    format!("{}...{}", head, tail)
}

/// Path of the env file: `$ARENA_ENV_FILE` or `.env`.
pub fn env_file_path() -> PathBuf {
    std::env::var_os(ENV_FILE_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE))
}

/// Loads the credential from `path`, falling back to the process environment.
pub fn load_credential(path: &Path) -> Option<Credential> {
    resolve_credential(path, |key| std::env::var(key).ok())
}

/// Same as [`load_credential`] with an injectable environment lookup.
pub fn resolve_credential<F>(path: &Path, lookup_env: F) -> Option<Credential>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = read_env_file_key(path, API_KEY_VAR) {
        if let Some(credential) =
            Credential::new(value, CredentialSource::EnvFile(path.to_path_buf()))
        {
            tracing::info!(source = %path.display(), "loaded API credential");
            return Some(credential);
        }
        tracing::warn!(source = %path.display(), "{} is present but empty", API_KEY_VAR);
    }

    let credential = lookup_env(API_KEY_VAR)
        .and_then(|value| Credential::new(value, CredentialSource::ProcessEnv));
    match &credential {
        Some(_) => tracing::info!("loaded API credential from process environment"),
        None => tracing::warn!("no API credential found; API calls will fail"),
    }
    credential
}

fn read_env_file_key(path: &Path, key: &str) -> Option<String> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => {
            tracing::debug!(path = %path.display(), "env file not found");
            return None;
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "env file could not be read");
            return None;
        }
    };

    let mut found = None;
    for item in iter {
        match item {
            // Later definitions win, as in a shell.
            Ok((k, v)) if k == key => found = Some(v),
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "malformed env file");
                return None;
            }
        }
    }
    found
}
