//! Raw `mdpub.toml` structure as parsed from TOML.

use mdpub_renderer::{DiagramMode, MarkdownEngine};
use serde::Deserialize;

use crate::ConfigError;
use crate::env::Environment;
use crate::expand::expand_opt;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ConfigFile {
    pub confluence: ConfluenceSection,
    pub publish: PublishSection,
    pub diagrams: DiagramsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ConfluenceSection {
    pub site: Option<String>,
    pub email: Option<String>,
    pub api_token: Option<String>,
    pub space_key: Option<String>,
    pub parent_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct PublishSection {
    pub glob: Option<String>,
    pub default_labels: Option<LabelList>,
    pub create_if_missing: Option<bool>,
    pub update_if_title_match: Option<bool>,
    pub version_message: Option<String>,
    pub markdown_engine: Option<MarkdownEngine>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct DiagramsSection {
    pub mode: Option<DiagramMode>,
    pub image_width: Option<u32>,
    pub mmdc: Option<String>,
    pub mermaid_ink_url: Option<String>,
    pub kroki_url: Option<String>,
}

/// Labels as an array or a comma-separated string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LabelList {
    List(Vec<String>),
    Csv(String),
}

impl LabelList {
    pub fn into_labels(self) -> Vec<String> {
        match self {
            Self::List(items) => items
                .into_iter()
                .map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
                .collect(),
            Self::Csv(raw) => mdpub_document::parse_labels(&raw),
        }
    }
}

impl ConfigFile {
    /// Expand `${VAR}` references in string values.
    pub fn expand_env_vars(&mut self, env: &Environment) -> Result<(), ConfigError> {
        let c = &mut self.confluence;
        expand_opt(&mut c.site, "confluence.site", env)?;
        expand_opt(&mut c.email, "confluence.email", env)?;
        expand_opt(&mut c.api_token, "confluence.api_token", env)?;
        expand_opt(&mut c.space_key, "confluence.space_key", env)?;
        expand_opt(&mut c.parent_id, "confluence.parent_id", env)?;

        let p = &mut self.publish;
        expand_opt(&mut p.glob, "publish.glob", env)?;
        expand_opt(&mut p.version_message, "publish.version_message", env)?;

        let d = &mut self.diagrams;
        expand_opt(&mut d.mmdc, "diagrams.mmdc", env)?;
        expand_opt(&mut d.mermaid_ink_url, "diagrams.mermaid_ink_url", env)?;
        expand_opt(&mut d.kroki_url, "diagrams.kroki_url", env)?;

        Ok(())
    }
}
