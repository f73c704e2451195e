//! Configuration loading for Workable access
//!
//! Supports loading API credentials from (in order of priority):
//! 1. JSON file (~/.config/wable/credentials.json)
//! 2. Runtime environment variables (fallback)
//!
//! Command-line flags, when given, override both.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Credentials filename in the wable config directory
const CREDENTIALS_FILE: &str = "credentials.json";

const SUBDOMAIN_VAR: &str = "WORKABLE_SUBDOMAIN";
const TOKEN_VAR: &str = "WORKABLE_TOKEN";

/// Account and API token for the Workable SPI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub subdomain: String,
    pub token: String,
}

/// Credentials file format; either field may be absent
#[derive(Debug, Default, Deserialize)]
struct CredentialFile {
    subdomain: Option<String>,
    token: Option<String>,
}

impl Credentials {
    pub fn new(subdomain: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            subdomain: subdomain.into(),
            token: token.into(),
        }
    }

    /// Resolve credentials, letting explicit values win over the
    /// config file, and the config file over the environment.
    pub fn resolve(subdomain: Option<String>, token: Option<String>) -> Result<Self> {
        let file = if config::config_exists(CREDENTIALS_FILE) {
            config::load_json::<CredentialFile>(CREDENTIALS_FILE)?
        } else {
            CredentialFile::default()
        };

        let subdomain = subdomain
            .or(file.subdomain)
            .or_else(|| std::env::var(SUBDOMAIN_VAR).ok())
            .filter(|s| !s.is_empty());
        let token = token
            .or(file.token)
            .or_else(|| std::env::var(TOKEN_VAR).ok())
            .filter(|s| !s.is_empty());

        match (subdomain, token) {
            (Some(subdomain), Some(token)) => Ok(Self { subdomain, token }),
            _ => anyhow::bail!("--subdomain and --token are required"),
        }
    }

    /// Load credentials from a specific JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let file: CredentialFile = config::load_json_file(path)?;
        Self::from_credential_file(file)
    }

    /// Parse credentials from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CredentialFile =
            serde_json::from_str(json).context("Failed to parse credentials JSON")?;
        Self::from_credential_file(file)
    }

    fn from_credential_file(file: CredentialFile) -> Result<Self> {
        Ok(Self {
            subdomain: file
                .subdomain
                .context("Credentials file missing 'subdomain'")?,
            token: file.token.context("Credentials file missing 'token'")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_credentials() {
        let json = r#"{ "subdomain": "test-company", "token": "test-token" }"#;

        let creds = Credentials::from_json(json).unwrap();
        assert_eq!(creds, Credentials::new("test-company", "test-token"));
    }

    #[test]
    fn test_missing_token() {
        let json = r#"{ "subdomain": "test-company" }"#;
        let err = Credentials::from_json(json).unwrap_err();
        assert!(err.to_string().contains("token"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("creds.json");
        std::fs::write(&path, r#"{ "subdomain": "acme", "token": "t" }"#).unwrap();

        let creds = Credentials::from_file(&path).unwrap();
        assert_eq!(creds.subdomain, "acme");
    }

    #[test]
    fn test_explicit_values_win() {
        let creds = Credentials::resolve(Some("acme".into()), Some("secret".into())).unwrap();
        assert_eq!(creds, Credentials::new("acme", "secret"));
    }
}
