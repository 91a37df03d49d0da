//! CLI error types.

use std::process::ExitCode;

use mdpub_config::ConfigError;
use mdpub_confluence::{ConfluenceError, PublishError};
use mdpub_document::DocumentError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Document(#[from] DocumentError),

    #[error("{0}")]
    Confluence(#[from] ConfluenceError),

    #[error("{0}")]
    Publish(#[from] PublishError),
}

impl CliError {
    /// Process exit status: 2 for bad configuration, 1 otherwise.
    pub(crate) fn exit_status(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Document(DocumentError::Pattern(_)) => 2,
            _ => 1,
        }
    }

    pub(crate) fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}
