//! `mdpub convert` command implementation.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use mdpub_config::{CliSettings, Config, DEFAULT_DOTENV, DiagramsConfig, Environment};
use mdpub_document::Document;
use mdpub_renderer::{
    Conversion, DiagramMode, DiagramOptions, MarkdownEngine, StorageRenderer,
};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Path to the markdown file.
    markdown_file: PathBuf,

    /// Path to configuration file (default: auto-discover mdpub.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to .env file.
    #[arg(long, default_value = DEFAULT_DOTENV)]
    dotenv: PathBuf,

    /// Render mermaid fences as code, Confluence macro, or image attachment.
    #[arg(long, value_name = "MODE")]
    mermaid_mode: Option<DiagramMode>,

    /// Image width in pixels for attachment mode.
    #[arg(long, value_name = "PX")]
    mermaid_image_width: Option<u32>,

    /// Markdown engine: builtin or cmark.
    #[arg(long, value_name = "ENGINE")]
    markdown_engine: Option<MarkdownEngine>,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the file cannot be read.
    pub(crate) fn execute(self, output: &Output) -> Result<ExitCode, CliError> {
        let env = Environment::capture(Some(&self.dotenv))?;
        let cli_settings = CliSettings {
            mermaid_mode: self.mermaid_mode,
            mermaid_image_width: self.mermaid_image_width,
            markdown_engine: self.markdown_engine,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), &env, Some(&cli_settings))?;

        let doc = Document::from_path(&self.markdown_file)?;
        let conversion = convert_document(&doc, &config.diagrams, config.publish.markdown_engine);

        output.highlight(&format!("Title: {}", doc.title));
        if !doc.labels.is_empty() {
            output.info(&format!("Labels: {}", doc.labels.join(", ")));
        }
        if let Some(page_id) = &doc.page_id {
            output.info(&format!("Page id: {page_id}"));
        }
        if let Some(parent_id) = &doc.parent_id {
            output.info(&format!("Parent id: {parent_id}"));
        }
        output.info("");
        output.info(&conversion.html);

        if !conversion.diagrams.is_empty() {
            output.info(&format!("\nDiagram attachments ({}):", conversion.diagrams.len()));
            for diagram in &conversion.diagrams {
                output.info(&format!("  -> {}", diagram.filename));
            }
        }

        Ok(ExitCode::SUCCESS)
    }
}

/// Render a document body the way `publish` would.
fn convert_document(doc: &Document, diagrams: &DiagramsConfig, engine: MarkdownEngine) -> Conversion {
    StorageRenderer::new()
        .engine(engine)
        .diagrams(DiagramOptions {
            mode: diagrams.mode,
            image_width: diagrams.image_width,
            filename_prefix: doc.title.clone(),
        })
        .render(&doc.body)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;

    fn attachment_diagrams() -> DiagramsConfig {
        DiagramsConfig {
            mode: DiagramMode::Attachment,
            image_width: 800,
            ..DiagramsConfig::default()
        }
    }

    #[test]
    fn test_convert_uses_title_for_diagram_filenames() {
        let doc = Document::parse(
            Path::new("docs/flow.md"),
            "# My Doc!!\n\n```mermaid\ngraph TD\nA-->B\n```\n",
        );

        let conversion = convert_document(&doc, &attachment_diagrams(), MarkdownEngine::Builtin);

        assert_eq!(conversion.diagrams.len(), 1);
        assert_eq!(conversion.diagrams[0].filename, "My Doc Mermaid 01.svg");
        assert!(conversion.html.contains(r#"ac:width="800""#));
    }

    #[test]
    fn test_convert_code_mode_plans_nothing() {
        let doc = Document::parse(Path::new("a.md"), "```mermaid\nA-->B\n```\n");

        let conversion = convert_document(&doc, &DiagramsConfig::default(), MarkdownEngine::Cmark);

        assert!(conversion.diagrams.is_empty());
        assert!(conversion.html.contains(r#"<ac:parameter ac:name="language">mermaid</ac:parameter>"#));
    }
}
