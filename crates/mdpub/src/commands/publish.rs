//! `mdpub publish` command implementation.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Args;
use mdpub_config::{CliSettings, Config, DEFAULT_DOTENV, DiagramsConfig, Environment, Settings};
use mdpub_confluence::{
    ConfluenceClient, PageService, PublishOptions, PublishOutcome, Publisher,
};
use mdpub_diagrams::{DiagramRasterizer, RasterizerConfig};
use mdpub_document::{Document, discover};
use mdpub_renderer::{DiagramMode, MarkdownEngine};
use tracing::warn;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    /// Path to configuration file (default: auto-discover mdpub.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to .env file.
    #[arg(long, default_value = DEFAULT_DOTENV)]
    dotenv: PathBuf,

    /// Markdown glob pattern.
    #[arg(long)]
    glob: Option<String>,

    /// Confluence space key.
    #[arg(long)]
    space_key: Option<String>,

    /// Default parent page id.
    #[arg(long)]
    parent_id: Option<String>,

    /// Comma-separated labels applied to every page.
    #[arg(long)]
    default_labels: Option<String>,

    /// Show planned actions only.
    #[arg(long)]
    dry_run: bool,

    /// Render mermaid fences as code, Confluence macro, or image attachment.
    #[arg(long, value_name = "MODE")]
    mermaid_mode: Option<DiagramMode>,

    /// Image width in pixels for attachment mode.
    #[arg(long, value_name = "PX")]
    mermaid_image_width: Option<u32>,

    /// Create pages whose title does not exist yet.
    #[arg(long, value_name = "BOOL")]
    create_if_missing: Option<bool>,

    /// Update pages whose title already exists.
    #[arg(long, value_name = "BOOL")]
    update_if_title_match: Option<bool>,

    /// Markdown engine: builtin or cmark.
    #[arg(long, value_name = "ENGINE")]
    markdown_engine: Option<MarkdownEngine>,
}

impl PublishArgs {
    /// Execute the publish command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or invalid, discovery
    /// fails, or the space cannot be resolved. Per-file failures are
    /// reported and reflected in the exit code instead.
    pub(crate) fn execute(self, output: &Output) -> Result<ExitCode, CliError> {
        let env = Environment::capture(Some(&self.dotenv))?;
        let config = Config::load(self.config.as_deref(), &env, Some(&self.cli_settings()))?;
        let settings = config.settings()?;

        let paths = discover(&settings.publish.glob)?;
        if paths.is_empty() {
            output.info(&format!(
                "No markdown files matched: {}",
                settings.publish.glob
            ));
            return Ok(ExitCode::SUCCESS);
        }

        let conf = &settings.confluence;
        let client = ConfluenceClient::new(&conf.site, &conf.email, &conf.api_token);
        let rasterizer = DiagramRasterizer::from_config(&rasterizer_config(&settings.diagrams));

        let summary = run(&client, &rasterizer, &settings, &paths, output)?;
        Ok(summary.exit_code())
    }

    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            glob: self.glob.clone(),
            space_key: self.space_key.clone(),
            parent_id: self.parent_id.clone(),
            default_labels: self.default_labels.clone(),
            dry_run: self.dry_run.then_some(true),
            mermaid_mode: self.mermaid_mode,
            mermaid_image_width: self.mermaid_image_width,
            create_if_missing: self.create_if_missing,
            update_if_title_match: self.update_if_title_match,
            markdown_engine: self.markdown_engine,
        }
    }
}

/// Resolve the space, publish every path and print the summary.
fn run<S: PageService + ?Sized>(
    service: &S,
    rasterizer: &DiagramRasterizer,
    settings: &Settings,
    paths: &[PathBuf],
    output: &Output,
) -> Result<BatchSummary, CliError> {
    let space_key = &settings.confluence.space_key;
    let space = service.get_space_by_key(space_key)?;

    output.highlight(&format!("Space: {space_key} (id={})", space.id));
    output.info(&format!("Files: {}", paths.len()));
    if settings.publish.dry_run {
        output.highlight("Mode: dry-run");
    }

    let publisher = Publisher::new(service, rasterizer, publish_options(settings, space.id));
    let summary = publish_paths(&publisher, paths, |result| match result {
        FileResult::Published(_) => output.info(&result.to_string()),
        FileResult::Failed { .. } => output.error(&result.to_string()),
    });

    let failures = summary.failures();
    if failures > 0 {
        output.warning(&format!("Completed with {failures} failed file(s)."));
    } else {
        output.success("Completed successfully.");
    }
    Ok(summary)
}

/// Batch-wide options from resolved settings.
fn publish_options(settings: &Settings, space_id: String) -> PublishOptions {
    let publish = &settings.publish;
    PublishOptions {
        space_id,
        default_parent_id: settings.confluence.parent_id.clone(),
        default_labels: publish.default_labels.clone(),
        create_if_missing: publish.create_if_missing,
        update_if_title_match: publish.update_if_title_match,
        dry_run: publish.dry_run,
        version_message: publish.version_message.clone(),
        diagram_mode: settings.diagrams.mode,
        image_width: settings.diagrams.image_width,
        markdown_engine: publish.markdown_engine,
    }
}

pub(crate) fn rasterizer_config(diagrams: &DiagramsConfig) -> RasterizerConfig {
    RasterizerConfig {
        mmdc: diagrams.mmdc.clone(),
        mermaid_ink_url: diagrams.mermaid_ink_url.clone(),
        kroki_url: diagrams.kroki_url.clone(),
        ..RasterizerConfig::default()
    }
}

/// Result of publishing one file.
#[derive(Debug)]
enum FileResult {
    Published(PublishOutcome),
    Failed { path: PathBuf, message: String },
}

impl fmt::Display for FileResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Published(outcome) => fmt::Display::fmt(outcome, f),
            Self::Failed { path, message } => write!(f, "[error] {}: {message}", path.display()),
        }
    }
}

/// Results of a batch, in path order.
#[derive(Debug, Default)]
struct BatchSummary {
    results: Vec<FileResult>,
}

impl BatchSummary {
    fn failures(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, FileResult::Failed { .. }))
            .count()
    }

    fn exit_status(&self) -> u8 {
        u8::from(self.failures() > 0)
    }

    fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

/// Publish each path in order; a failing file never stops the batch.
fn publish_paths<S: PageService + ?Sized>(
    publisher: &Publisher<'_, S>,
    paths: &[PathBuf],
    mut on_result: impl FnMut(&FileResult),
) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for path in paths {
        let result = match publish_file(publisher, path) {
            Ok(outcome) => FileResult::Published(outcome),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to publish");
                FileResult::Failed {
                    path: path.clone(),
                    message: e.to_string(),
                }
            }
        };
        on_result(&result);
        summary.results.push(result);
    }
    summary
}

fn publish_file<S: PageService + ?Sized>(
    publisher: &Publisher<'_, S>,
    path: &Path,
) -> Result<PublishOutcome, CliError> {
    let doc = Document::from_path(path)?;
    Ok(publisher.publish(&doc)?)
}
