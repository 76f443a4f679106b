//! Subcommand implementations of the `scabbard` binary

pub mod analyze;
pub mod generate;
pub mod validate;

use scabbard::config::Config;
use scabbard::core::ScabbardResult;
use scabbard::di::ServiceContainer;
use std::path::{Path, PathBuf};

/// Options shared by every subcommand
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
}

/// Resolve the config for `input` and wire the production services
pub fn services(
    input: &Path,
    options: &GlobalOptions,
    output: Option<&Path>,
) -> ScabbardResult<ServiceContainer> {
    let mut config = Config::resolve(options.config.as_deref(), input)?;
    if let Some(output) = output {
        config.output_dir = Some(output.display().to_string());
    }
    ServiceContainer::new(config, input)
}
