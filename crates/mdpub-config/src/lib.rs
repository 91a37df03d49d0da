//! Configuration management for mdpub.
//!
//! Settings are layered, highest precedence first:
//!
//! 1. CLI flags ([`CliSettings`])
//! 2. process environment variables
//! 3. the `.env` file (see [`Environment::capture`])
//! 4. `mdpub.toml`, given explicitly or discovered in the current directory
//!    and its parents
//! 5. built-in defaults
//!
//! ## Environment Variable Expansion
//!
//! String values in `mdpub.toml` support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expansion reads the same [`Environment`] snapshot as the environment
//! layer, so `.env` values are available to it.

mod env;
mod expand;
mod file;

use std::fmt;
use std::path::{Path, PathBuf};

use mdpub_document::parse_labels;
use mdpub_renderer::{
    DEFAULT_IMAGE_WIDTH, DiagramMode, MAX_IMAGE_WIDTH, MIN_IMAGE_WIDTH, MarkdownEngine,
};

pub use env::{Environment, parse_bool};

use env::{
    ATLASSIAN_API_TOKEN, ATLASSIAN_EMAIL, ATLASSIAN_SITE, CONFLUENCE_MERMAID_IMAGE_WIDTH,
    CONFLUENCE_MERMAID_MODE, CONFLUENCE_PARENT_ID, CONFLUENCE_SPACE_KEY, KROKI_URL,
    MARKDOWN_GLOB, MERMAID_CLI, MERMAID_INK_URL, PUBLISH_CREATE_IF_MISSING,
    PUBLISH_DEFAULT_LABELS, PUBLISH_MARKDOWN_ENGINE, PUBLISH_UPDATE_IF_TITLE_MATCH,
    PUBLISH_VERSION_MESSAGE,
};
use file::ConfigFile;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdpub.toml";

/// Default `.env` file, relative to the working directory.
pub const DEFAULT_DOTENV: &str = ".env";

const DEFAULT_GLOB: &str = "docs/**/*.md";
const DEFAULT_VERSION_MESSAGE: &str = "Updated by mdpub";
const DEFAULT_MMDC: &str = "mmdc";
const DEFAULT_MERMAID_INK_URL: &str = "https://mermaid.ink";

/// CLI settings that override every other source.
///
/// All fields are optional. Only non-None values override the loaded config;
/// blank strings are treated as unset.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the markdown glob.
    pub glob: Option<String>,
    /// Override the space key.
    pub space_key: Option<String>,
    /// Override the default parent page.
    pub parent_id: Option<String>,
    /// Override default labels (comma-separated).
    pub default_labels: Option<String>,
    /// Report planned actions without writing.
    pub dry_run: Option<bool>,
    /// Override the diagram mode.
    pub mermaid_mode: Option<DiagramMode>,
    /// Override the diagram image width.
    pub mermaid_image_width: Option<u32>,
    /// Override page creation.
    pub create_if_missing: Option<bool>,
    /// Override updating pages found by title.
    pub update_if_title_match: Option<bool>,
    /// Override the markdown engine.
    pub markdown_engine: Option<MarkdownEngine>,
}

/// Application configuration after all layers are applied.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Confluence connection settings; required ones may still be missing.
    pub confluence: ConfluenceConfig,
    /// Publishing behavior.
    pub publish: PublishConfig,
    /// Diagram handling.
    pub diagrams: DiagramsConfig,
    /// Path to the config file, if one was loaded.
    pub config_path: Option<PathBuf>,
}

/// Confluence settings as collected from all sources.
#[derive(Clone, Default)]
pub struct ConfluenceConfig {
    /// Site host, e.g. `example.atlassian.net`.
    pub site: Option<String>,
    /// Account email for Basic authentication.
    pub email: Option<String>,
    /// API token for Basic authentication.
    pub api_token: Option<String>,
    /// Target space key.
    pub space_key: Option<String>,
    /// Default parent page id.
    pub parent_id: Option<String>,
}

impl fmt::Debug for ConfluenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfluenceConfig")
            .field("site", &self.site)
            .field("email", &self.email)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("space_key", &self.space_key)
            .field("parent_id", &self.parent_id)
            .finish()
    }
}

/// Publishing behavior.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Glob selecting markdown files.
    pub glob: String,
    /// Labels applied to every page, before document labels.
    pub default_labels: Vec<String>,
    /// Create pages that do not exist yet.
    pub create_if_missing: bool,
    /// Update pages found by title when no explicit id is given.
    pub update_if_title_match: bool,
    /// Version comment recorded on updates.
    pub version_message: String,
    /// Markdown engine for page bodies.
    pub markdown_engine: MarkdownEngine,
    /// Report planned actions without writing.
    pub dry_run: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            glob: DEFAULT_GLOB.to_owned(),
            default_labels: Vec::new(),
            create_if_missing: true,
            update_if_title_match: true,
            version_message: DEFAULT_VERSION_MESSAGE.to_owned(),
            markdown_engine: MarkdownEngine::default(),
            dry_run: false,
        }
    }
}

/// Diagram handling.
#[derive(Debug, Clone)]
pub struct DiagramsConfig {
    /// How diagram fences render.
    pub mode: DiagramMode,
    /// Image width in attachment mode.
    pub image_width: u32,
    /// mermaid-cli executable.
    pub mmdc: String,
    /// mermaid.ink base URL.
    pub mermaid_ink_url: String,
    /// Kroki base URL, tried before mermaid.ink when set.
    pub kroki_url: Option<String>,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            mode: DiagramMode::default(),
            image_width: DEFAULT_IMAGE_WIDTH,
            mmdc: DEFAULT_MMDC.to_owned(),
            mermaid_ink_url: DEFAULT_MERMAID_INK_URL.to_owned(),
            kroki_url: None,
        }
    }
}

/// Confluence settings with every required value present.
#[derive(Clone)]
pub struct ConfluenceSettings {
    /// Site host or URL.
    pub site: String,
    /// Account email.
    pub email: String,
    /// API token.
    pub api_token: String,
    /// Target space key.
    pub space_key: String,
    /// Default parent page id.
    pub parent_id: Option<String>,
}

impl fmt::Debug for ConfluenceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfluenceSettings")
            .field("site", &self.site)
            .field("email", &self.email)
            .field("api_token", &"***")
            .field("space_key", &self.space_key)
            .field("parent_id", &self.parent_id)
            .finish()
    }
}

/// Fully resolved settings for a publish run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Confluence connection.
    pub confluence: ConfluenceSettings,
    /// Publishing behavior.
    pub publish: PublishConfig,
    /// Diagram handling.
    pub diagrams: DiagramsConfig,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// `.env` file could not be read or parsed.
    #[error(".env error: {0}")]
    Dotenv(#[from] dotenvy::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Required settings are absent from every source.
    #[error("Missing required settings: {}", .0.join(", "))]
    Missing(Vec<String>),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`confluence.api_token`").
        field: String,
        /// Error message (e.g., "${`ATLASSIAN_API_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Require an image width within the accepted bounds.
fn require_width(width: i64, field: &str) -> Result<u32, ConfigError> {
    u32::try_from(width)
        .ok()
        .filter(|w| (MIN_IMAGE_WIDTH..=MAX_IMAGE_WIDTH).contains(w))
        .ok_or_else(|| {
            ConfigError::Validation(format!(
                "{field} must be between {MIN_IMAGE_WIDTH} and {MAX_IMAGE_WIDTH}"
            ))
        })
}

/// Trimmed, non-blank string.
fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

impl Config {
    /// Load configuration from file, environment, and CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdpub.toml` in current directory and parents;
    /// without one, defaults are used.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or a value is invalid. Missing required Confluence
    /// settings are reported by [`Config::require_confluence`] instead.
    pub fn load(
        config_path: Option<&Path>,
        env: &Environment,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path, env)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered, env)?
        } else {
            Self::default()
        };

        let no_overrides = CliSettings::default();
        config.apply_env(env, cli_settings.unwrap_or(&no_overrides))?;
        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        config.validate()?;

        Ok(config)
    }

    /// Parse `mdpub.toml` content without applying other layers.
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is invalid or expansion fails.
    pub fn from_toml_str(content: &str, env: &Environment) -> Result<Self, ConfigError> {
        let mut file: ConfigFile = toml::from_str(content)?;
        file.expand_env_vars(env)?;
        Ok(Self::from_file(file))
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path, env: &Environment) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content, env)?;
        config.config_path = Some(path.to_path_buf());
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Apply file values over defaults.
    fn from_file(file: ConfigFile) -> Self {
        let defaults = Self::default();
        let ConfigFile {
            confluence,
            publish,
            diagrams,
        } = file;

        Self {
            confluence: ConfluenceConfig {
                site: clean(confluence.site.as_deref()),
                email: clean(confluence.email.as_deref()),
                api_token: clean(confluence.api_token.as_deref()),
                space_key: clean(confluence.space_key.as_deref()),
                parent_id: clean(confluence.parent_id.as_deref()),
            },
            publish: PublishConfig {
                glob: clean(publish.glob.as_deref()).unwrap_or(defaults.publish.glob),
                default_labels: publish
                    .default_labels
                    .map(file::LabelList::into_labels)
                    .unwrap_or_default(),
                create_if_missing: publish
                    .create_if_missing
                    .unwrap_or(defaults.publish.create_if_missing),
                update_if_title_match: publish
                    .update_if_title_match
                    .unwrap_or(defaults.publish.update_if_title_match),
                version_message: publish
                    .version_message
                    .unwrap_or(defaults.publish.version_message),
                markdown_engine: publish.markdown_engine.unwrap_or_default(),
                dry_run: false,
            },
            diagrams: DiagramsConfig {
                mode: diagrams.mode.unwrap_or_default(),
                image_width: diagrams.image_width.unwrap_or(DEFAULT_IMAGE_WIDTH),
                mmdc: clean(diagrams.mmdc.as_deref()).unwrap_or(defaults.diagrams.mmdc),
                mermaid_ink_url: clean(diagrams.mermaid_ink_url.as_deref())
                    .unwrap_or(defaults.diagrams.mermaid_ink_url),
                kroki_url: clean(diagrams.kroki_url.as_deref()),
            },
            config_path: None,
        }
    }

    /// Apply environment variables over file values.
    ///
    /// Values the CLI replaces are neither parsed nor validated.
    fn apply_env(&mut self, env: &Environment, cli: &CliSettings) -> Result<(), ConfigError> {
        let set = |target: &mut Option<String>, key: &str| {
            if let Some(value) = env.get(key) {
                *target = Some(value.to_owned());
            }
        };
        set(&mut self.confluence.site, ATLASSIAN_SITE);
        set(&mut self.confluence.email, ATLASSIAN_EMAIL);
        set(&mut self.confluence.api_token, ATLASSIAN_API_TOKEN);
        set(&mut self.confluence.space_key, CONFLUENCE_SPACE_KEY);
        set(&mut self.confluence.parent_id, CONFLUENCE_PARENT_ID);
        set(&mut self.diagrams.kroki_url, KROKI_URL);

        if let Some(glob) = env.get(MARKDOWN_GLOB) {
            glob.clone_into(&mut self.publish.glob);
        }
        if let Some(labels) = env.get(PUBLISH_DEFAULT_LABELS) {
            self.publish.default_labels = parse_labels(labels);
        }
        if let Some(flag) = env.get_bool(PUBLISH_CREATE_IF_MISSING) {
            self.publish.create_if_missing = flag;
        }
        if let Some(flag) = env.get_bool(PUBLISH_UPDATE_IF_TITLE_MATCH) {
            self.publish.update_if_title_match = flag;
        }
        if let Some(message) = env.get(PUBLISH_VERSION_MESSAGE) {
            message.clone_into(&mut self.publish.version_message);
        }
        if let Some(engine) = env.get(PUBLISH_MARKDOWN_ENGINE)
            && cli.markdown_engine.is_none()
        {
            self.publish.markdown_engine = engine
                .parse()
                .map_err(|e| ConfigError::Validation(format!("{PUBLISH_MARKDOWN_ENGINE}: {e}")))?;
        }

        if let Some(mode) = env.get(CONFLUENCE_MERMAID_MODE)
            && cli.mermaid_mode.is_none()
        {
            self.diagrams.mode = mode.parse().map_err(|_| {
                ConfigError::Validation(format!(
                    "{CONFLUENCE_MERMAID_MODE} must be 'code', 'macro', or 'attachment'"
                ))
            })?;
        }
        if let Some(width) = env.get(CONFLUENCE_MERMAID_IMAGE_WIDTH)
            && cli.mermaid_image_width.is_none()
        {
            let width: i64 = width.parse().map_err(|_| {
                ConfigError::Validation(format!(
                    "{CONFLUENCE_MERMAID_IMAGE_WIDTH} must be an integer"
                ))
            })?;
            self.diagrams.image_width = require_width(width, CONFLUENCE_MERMAID_IMAGE_WIDTH)?;
        }
        if let Some(mmdc) = env.get(MERMAID_CLI) {
            mmdc.clone_into(&mut self.diagrams.mmdc);
        }
        if let Some(url) = env.get(MERMAID_INK_URL) {
            url.clone_into(&mut self.diagrams.mermaid_ink_url);
        }

        Ok(())
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(glob) = clean(settings.glob.as_deref()) {
            self.publish.glob = glob;
        }
        if let Some(space_key) = clean(settings.space_key.as_deref()) {
            self.confluence.space_key = Some(space_key);
        }
        if let Some(parent_id) = clean(settings.parent_id.as_deref()) {
            self.confluence.parent_id = Some(parent_id);
        }
        if let Some(labels) = clean(settings.default_labels.as_deref()) {
            self.publish.default_labels = parse_labels(&labels);
        }
        if let Some(dry_run) = settings.dry_run {
            self.publish.dry_run = dry_run;
        }
        if let Some(mode) = settings.mermaid_mode {
            self.diagrams.mode = mode;
        }
        if let Some(width) = settings.mermaid_image_width {
            self.diagrams.image_width = width;
        }
        if let Some(flag) = settings.create_if_missing {
            self.publish.create_if_missing = flag;
        }
        if let Some(flag) = settings.update_if_title_match {
            self.publish.update_if_title_match = flag;
        }
        if let Some(engine) = settings.markdown_engine {
            self.publish.markdown_engine = engine;
        }
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.publish.glob, "publish.glob")?;
        require_width(
            i64::from(self.diagrams.image_width),
            "diagrams.image_width",
        )?;
        require_non_empty(&self.diagrams.mmdc, "diagrams.mmdc")?;
        require_http_url(&self.diagrams.mermaid_ink_url, "diagrams.mermaid_ink_url")?;
        if let Some(ref kroki_url) = self.diagrams.kroki_url {
            require_http_url(kroki_url, "diagrams.kroki_url")?;
        }
        Ok(())
    }

    /// Get the Confluence settings, reporting every missing required value.
    ///
    /// Missing values are named by their environment variable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` listing all absent settings.
    pub fn require_confluence(&self) -> Result<ConfluenceSettings, ConfigError> {
        let c = &self.confluence;
        let required = [
            (ATLASSIAN_SITE, &c.site),
            (ATLASSIAN_EMAIL, &c.email),
            (ATLASSIAN_API_TOKEN, &c.api_token),
            (CONFLUENCE_SPACE_KEY, &c.space_key),
        ];
        let missing: Vec<String> = required
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| (*name).to_owned())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::Missing(missing));
        }

        Ok(ConfluenceSettings {
            site: c.site.clone().unwrap_or_default(),
            email: c.email.clone().unwrap_or_default(),
            api_token: c.api_token.clone().unwrap_or_default(),
            space_key: c.space_key.clone().unwrap_or_default(),
            parent_id: c.parent_id.clone(),
        })
    }

    /// Resolve the immutable settings for a publish run.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if required Confluence settings are absent.
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        Ok(Settings {
            confluence: self.require_confluence()?,
            publish: self.publish.clone(),
            diagrams: self.diagrams.clone(),
        })
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn complete_env() -> Environment {
        Environment::from_pairs([
            (ATLASSIAN_SITE, "example.atlassian.net"),
            (ATLASSIAN_EMAIL, "me@example.com"),
            (ATLASSIAN_API_TOKEN, "token"),
            (CONFLUENCE_SPACE_KEY, "DOCS"),
        ])
    }

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.publish.glob, "docs/**/*.md");
        assert!(config.publish.create_if_missing);
        assert!(config.publish.update_if_title_match);
        assert!(!config.publish.dry_run);
        assert_eq!(config.publish.version_message, "Updated by mdpub");
        assert_eq!(config.publish.markdown_engine, MarkdownEngine::Builtin);
        assert_eq!(config.diagrams.mode, DiagramMode::Code);
        assert_eq!(config.diagrams.image_width, 1000);
        assert_eq!(config.diagrams.mmdc, "mmdc");
        assert_eq!(config.diagrams.mermaid_ink_url, "https://mermaid.ink");
        assert_eq!(config.diagrams.kroki_url, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml = r#"
[confluence]
site = "example.atlassian.net"
email = "me@example.com"
api_token = "${TOKEN}"
space_key = "DOCS"
parent_id = "100"

[publish]
glob = "pages/*.md"
default_labels = ["docs", "generated"]
create_if_missing = false
update_if_title_match = false
version_message = "CI publish"
markdown_engine = "cmark"

[diagrams]
mode = "attachment"
image_width = 800
mmdc = "/opt/mmdc"
kroki_url = "https://kroki.example.com"
"#;
        let env = Environment::from_pairs([("TOKEN", "secret")]);
        let config = Config::from_toml_str(toml, &env).unwrap();

        assert_eq!(config.confluence.api_token.as_deref(), Some("secret"));
        assert_eq!(config.confluence.parent_id.as_deref(), Some("100"));
        assert_eq!(config.publish.glob, "pages/*.md");
        assert_eq!(config.publish.default_labels, vec!["docs", "generated"]);
        assert!(!config.publish.create_if_missing);
        assert!(!config.publish.update_if_title_match);
        assert_eq!(config.publish.version_message, "CI publish");
        assert_eq!(config.publish.markdown_engine, MarkdownEngine::Cmark);
        assert_eq!(config.diagrams.mode, DiagramMode::Attachment);
        assert_eq!(config.diagrams.image_width, 800);
        assert_eq!(config.diagrams.mmdc, "/opt/mmdc");
        assert_eq!(
            config.diagrams.kroki_url.as_deref(),
            Some("https://kroki.example.com")
        );
    }

    #[test]
    fn test_labels_as_comma_string() {
        let config = Config::from_toml_str(
            "[publish]\ndefault_labels = \"a, b\"\n",
            &Environment::default(),
        )
        .unwrap();
        assert_eq!(config.publish.default_labels, vec!["a", "b"]);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Config::from_toml_str("[publish]\nglobs = \"x\"\n", &Environment::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_mode_in_toml_rejected() {
        let err = Config::from_toml_str("[diagrams]\nmode = \"image\"\n", &Environment::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_expansion_var() {
        let err = Config::from_toml_str(
            "[confluence]\napi_token = \"${MDPUB_UNSET_TOKEN}\"\n",
            &Environment::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "confluence.api_token"));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(
            Some(Path::new("/nonexistent/mdpub.toml")),
            &Environment::default(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let (_dir, path) = write_config(
            "[confluence]\nspace_key = \"FILE\"\nparent_id = \"1\"\n[publish]\nglob = \"file/*.md\"\n",
        );
        let env = Environment::from_pairs([
            (CONFLUENCE_SPACE_KEY, "ENV"),
            (MARKDOWN_GLOB, "env/*.md"),
        ]);
        let cli = CliSettings {
            space_key: Some("CLI".to_owned()),
            ..CliSettings::default()
        };

        let config = Config::load(Some(&path), &env, Some(&cli)).unwrap();
        assert_eq!(config.confluence.space_key.as_deref(), Some("CLI"));
        assert_eq!(config.confluence.parent_id.as_deref(), Some("1"));
        assert_eq!(config.publish.glob, "env/*.md");
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_blank_cli_values_fall_through() {
        let (_dir, path) = write_config("");
        let cli = CliSettings {
            space_key: Some("  ".to_owned()),
            glob: Some(String::new()),
            ..CliSettings::default()
        };
        let config = Config::load(Some(&path), &complete_env(), Some(&cli)).unwrap();
        assert_eq!(config.confluence.space_key.as_deref(), Some("DOCS"));
        assert_eq!(config.publish.glob, "docs/**/*.md");
    }

    #[test]
    fn test_env_booleans_and_labels() {
        let (_dir, path) = write_config("[publish]\ncreate_if_missing = true\n");
        let env = Environment::from_pairs([
            (PUBLISH_CREATE_IF_MISSING, "no"),
            (PUBLISH_UPDATE_IF_TITLE_MATCH, "ON"),
            (PUBLISH_DEFAULT_LABELS, "[x, 'y']"),
        ]);
        let config = Config::load(Some(&path), &env, None).unwrap();
        assert!(!config.publish.create_if_missing);
        assert!(config.publish.update_if_title_match);
        assert_eq!(config.publish.default_labels, vec!["x", "y"]);
    }

    #[test]
    fn test_env_invalid_mode() {
        let (_dir, path) = write_config("");
        let env = Environment::from_pairs([(CONFLUENCE_MERMAID_MODE, "image")]);
        let err = Config::load(Some(&path), &env, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: CONFLUENCE_MERMAID_MODE must be 'code', 'macro', or 'attachment'"
        );
    }

    #[test]
    fn test_cli_replaces_invalid_env_diagram_settings() {
        let (_dir, path) = write_config("");
        let env = Environment::from_pairs([
            (CONFLUENCE_MERMAID_MODE, "image"),
            (CONFLUENCE_MERMAID_IMAGE_WIDTH, "wide"),
        ]);
        let cli = CliSettings {
            mermaid_mode: Some(DiagramMode::Code),
            mermaid_image_width: Some(1000),
            ..CliSettings::default()
        };

        let config = Config::load(Some(&path), &env, Some(&cli)).unwrap();
        assert_eq!(config.diagrams.mode, DiagramMode::Code);
        assert_eq!(config.diagrams.image_width, 1000);
    }

    #[test]
    fn test_cli_replaces_invalid_env_engine() {
        let (_dir, path) = write_config("");
        let env = Environment::from_pairs([(PUBLISH_MARKDOWN_ENGINE, "pandoc")]);
        let cli = CliSettings {
            markdown_engine: Some(MarkdownEngine::Cmark),
            ..CliSettings::default()
        };

        let config = Config::load(Some(&path), &env, Some(&cli)).unwrap();
        assert_eq!(config.publish.markdown_engine, MarkdownEngine::Cmark);

        let err = Config::load(Some(&path), &env, None).unwrap_err();
        assert!(err.to_string().contains(PUBLISH_MARKDOWN_ENGINE), "{err}");
    }

    #[test]
    fn test_cli_override_leaves_other_env_values_checked() {
        let (_dir, path) = write_config("");
        let env = Environment::from_pairs([(CONFLUENCE_MERMAID_IMAGE_WIDTH, "wide")]);
        let cli = CliSettings {
            mermaid_mode: Some(DiagramMode::Attachment),
            ..CliSettings::default()
        };

        let err = Config::load(Some(&path), &env, Some(&cli)).unwrap_err();
        assert!(err.to_string().contains("must be an integer"));
    }

    #[test]
    fn test_env_width_not_integer() {
        let (_dir, path) = write_config("");
        let env = Environment::from_pairs([(CONFLUENCE_MERMAID_IMAGE_WIDTH, "wide")]);
        let err = Config::load(Some(&path), &env, None).unwrap_err();
        assert!(err.to_string().contains("must be an integer"));
    }

    #[test]
    fn test_env_width_out_of_range() {
        let (_dir, path) = write_config("");
        for width in ["239", "4001", "-5"] {
            let env = Environment::from_pairs([(CONFLUENCE_MERMAID_IMAGE_WIDTH, width)]);
            let err = Config::load(Some(&path), &env, None).unwrap_err();
            assert!(
                err.to_string().contains("must be between 240 and 4000"),
                "{width}"
            );
        }
    }

    #[test]
    fn test_width_bounds_inclusive() {
        let (_dir, path) = write_config("");
        for width in ["240", "4000"] {
            let env = Environment::from_pairs([(CONFLUENCE_MERMAID_IMAGE_WIDTH, width)]);
            assert!(Config::load(Some(&path), &env, None).is_ok(), "{width}");
        }
    }

    #[test]
    fn test_cli_width_validated() {
        let (_dir, path) = write_config("");
        let cli = CliSettings {
            mermaid_image_width: Some(100),
            ..CliSettings::default()
        };
        let err = Config::load(Some(&path), &Environment::default(), Some(&cli)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_invalid_kroki_url() {
        let (_dir, path) = write_config("");
        let env = Environment::from_pairs([(KROKI_URL, "kroki.local")]);
        let err = Config::load(Some(&path), &env, None).unwrap_err();
        assert!(err.to_string().contains("diagrams.kroki_url"));
    }

    #[test]
    fn test_require_confluence_reports_all_missing() {
        let config = Config::default();
        let err = config.require_confluence().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required settings: ATLASSIAN_SITE, ATLASSIAN_EMAIL, ATLASSIAN_API_TOKEN, CONFLUENCE_SPACE_KEY"
        );
    }

    #[test]
    fn test_settings_resolved() {
        let (_dir, path) = write_config("");
        let cli = CliSettings {
            dry_run: Some(true),
            mermaid_mode: Some(DiagramMode::Macro),
            ..CliSettings::default()
        };
        let config = Config::load(Some(&path), &complete_env(), Some(&cli)).unwrap();
        let settings = config.settings().unwrap();

        assert_eq!(settings.confluence.site, "example.atlassian.net");
        assert_eq!(settings.confluence.space_key, "DOCS");
        assert_eq!(settings.confluence.parent_id, None);
        assert!(settings.publish.dry_run);
        assert_eq!(settings.diagrams.mode, DiagramMode::Macro);
    }

    #[test]
    fn test_debug_redacts_token() {
        let (_dir, path) = write_config("");
        let config = Config::load(Some(&path), &complete_env(), None).unwrap();
        let settings = config.require_confluence().unwrap();
        let debug = format!("{settings:?}");
        assert!(!debug.contains("\"token\""));
        assert!(debug.contains("***"));
    }
}
