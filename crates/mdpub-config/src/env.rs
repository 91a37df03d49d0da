//! Environment layer: process variables over an optional `.env` file.

use std::collections::HashMap;
use std::path::Path;

use crate::ConfigError;

pub(crate) const ATLASSIAN_SITE: &str = "ATLASSIAN_SITE";
pub(crate) const ATLASSIAN_EMAIL: &str = "ATLASSIAN_EMAIL";
pub(crate) const ATLASSIAN_API_TOKEN: &str = "ATLASSIAN_API_TOKEN";
pub(crate) const CONFLUENCE_SPACE_KEY: &str = "CONFLUENCE_SPACE_KEY";
pub(crate) const CONFLUENCE_PARENT_ID: &str = "CONFLUENCE_PARENT_ID";
pub(crate) const MARKDOWN_GLOB: &str = "MARKDOWN_GLOB";
pub(crate) const PUBLISH_DEFAULT_LABELS: &str = "PUBLISH_DEFAULT_LABELS";
pub(crate) const PUBLISH_CREATE_IF_MISSING: &str = "PUBLISH_CREATE_IF_MISSING";
pub(crate) const PUBLISH_UPDATE_IF_TITLE_MATCH: &str = "PUBLISH_UPDATE_IF_TITLE_MATCH";
pub(crate) const PUBLISH_VERSION_MESSAGE: &str = "PUBLISH_VERSION_MESSAGE";
pub(crate) const PUBLISH_MARKDOWN_ENGINE: &str = "PUBLISH_MARKDOWN_ENGINE";
pub(crate) const CONFLUENCE_MERMAID_MODE: &str = "CONFLUENCE_MERMAID_MODE";
pub(crate) const CONFLUENCE_MERMAID_IMAGE_WIDTH: &str = "CONFLUENCE_MERMAID_IMAGE_WIDTH";
pub(crate) const MERMAID_CLI: &str = "MERMAID_CLI";
pub(crate) const MERMAID_INK_URL: &str = "MERMAID_INK_URL";
pub(crate) const KROKI_URL: &str = "KROKI_URL";

/// Snapshot of environment variables used for configuration.
///
/// Built once at startup. Process variables take precedence over values
/// from the `.env` file, and the process environment is never modified.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Capture the process environment layered over `dotenv`.
    ///
    /// A missing `.env` file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Dotenv`] if the file exists but cannot be read
    /// or parsed.
    pub fn capture(dotenv: Option<&Path>) -> Result<Self, ConfigError> {
        let mut vars = match dotenv {
            Some(path) if path.is_file() => {
                let parsed =
                    dotenvy::from_path_iter(path)?.collect::<Result<HashMap<_, _>, _>>()?;
                tracing::debug!(path = %path.display(), count = parsed.len(), "Loaded .env file");
                parsed
            }
            _ => HashMap::new(),
        };

        // Non-UTF-8 variables cannot hold configuration; skip them.
        vars.extend(
            std::env::vars_os()
                .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?))),
        );

        Ok(Self { vars })
    }

    /// Build an environment from explicit pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Value exactly as set, possibly empty.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Trimmed value, `None` when unset or blank.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.raw(key).map(str::trim).filter(|v| !v.is_empty())
    }

    /// Boolean value, `None` when unset.
    ///
    /// `1`, `true`, `yes`, `y` and `on` (any case) are true; anything else,
    /// including an empty value, is false.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.raw(key).map(parse_bool)
    }
}

/// Interpret an environment flag value.
#[must_use]
pub fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}
