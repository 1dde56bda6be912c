//! Subcommand implementations.
//!
//! Every command opens the platform from the state file, builds an adapter
//! from the optional model configuration, and reports through [`OutputFormat`].

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use userbridge::{InMemoryPlatform, ModelConfig, UserRecordAdapter};

use crate::cli::Cli;
use crate::output::OutputFormat;

pub mod get;
pub mod show;
pub mod write;

/// Shared state for one CLI invocation.
pub struct Context {
    pub platform: Arc<InMemoryPlatform>,
    pub config: ModelConfig,
    pub format: OutputFormat,
}

impl Context {
    /// Load the platform state and model configuration named on the command line.
    pub fn open(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let platform = InMemoryPlatform::load_from_file(&cli.state)?;
        tracing::debug!(
            state = %cli.state.display(),
            users = platform.user_count(),
            "platform loaded"
        );
        let config = match &cli.config {
            Some(path) => ModelConfig::load_from_file(path)?,
            None => ModelConfig::default(),
        };
        Ok(Self {
            platform: Arc::new(platform),
            config,
            format: cli.format,
        })
    }

    /// A fresh adapter over the platform, configured from the model config.
    pub fn adapter(&self) -> UserRecordAdapter {
        UserRecordAdapter::on_platform(self.platform.clone()).configured(&self.config)
    }

    /// Persist the platform state after a write.
    pub fn save(&self, state: &Path) -> Result<(), Box<dyn std::error::Error>> {
        self.platform.save_to_file(state)?;
        tracing::info!(state = %state.display(), "platform state saved");
        Ok(())
    }
}

/// Exit status for an operation that may have collected errors.
pub fn exit_status(adapter: &UserRecordAdapter) -> ExitCode {
    if adapter.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
