//! Service container wiring the compiler's collaborators

use super::traits::{CodeEmitter, ErrorReporter, MetadataSource};
use crate::config::Config;
use crate::core::ScabbardResult;
use crate::diagnostics::LoggingErrorReporter;
use crate::generation::emitter::JsonCodeEmitter;
use crate::metadata::YamlMetadataSource;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Collaborators used by one compiler invocation
///
/// Production wiring reads YAML declarations, writes JSON class shapes and
/// logs reported errors. Tests swap in the doubles from [`super::mocks`].
///
/// # Example (Testing)
///
/// ```
/// use scabbard::config::Config;
/// use scabbard::di::{mocks::*, ServiceContainer};
/// use std::sync::Arc;
///
/// let container = ServiceContainer::with_services(
///     Config::default(),
///     Arc::new(MockMetadataSource::new()),
///     Arc::new(RecordingCodeEmitter::new()),
///     Arc::new(MockErrorReporter::new()),
/// );
/// assert!(!container.reporter.has_errors());
/// ```
#[derive(Clone)]
pub struct ServiceContainer {
    pub config: Arc<Config>,
    pub metadata: Arc<dyn MetadataSource>,
    pub emitter: Arc<dyn CodeEmitter>,
    pub reporter: Arc<dyn ErrorReporter>,
}

impl ServiceContainer {
    /// Create a container with production implementations
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata input cannot be read or parsed.
    pub fn new(config: Config, input: &Path) -> ScabbardResult<Self> {
        let metadata = YamlMetadataSource::load(input)?;
        info!(
            "Loaded {} class declaration(s) from {}",
            metadata.len(),
            input.display()
        );
        let emitter = JsonCodeEmitter::new(config.get_output_dir());

        Ok(Self {
            config: Arc::new(config),
            metadata: Arc::new(metadata),
            emitter: Arc::new(emitter),
            reporter: Arc::new(LoggingErrorReporter::new()),
        })
    }

    /// Create a container with custom implementations
    pub fn with_services(
        config: Config,
        metadata: Arc<dyn MetadataSource>,
        emitter: Arc<dyn CodeEmitter>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            metadata,
            emitter,
            reporter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_new_loads_metadata() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("app.yaml");
        fs::write(&input, "classes: [{name: a.A}]").unwrap();

        let container = ServiceContainer::new(Config::default(), &input).unwrap();
        assert_eq!(container.metadata.classes().len(), 1);
        assert!(!container.reporter.has_errors());
    }

    #[test]
    fn test_new_missing_input_fails() {
        let temp = TempDir::new().unwrap();
        let result = ServiceContainer::new(Config::default(), &temp.path().join("none.yaml"));
        assert!(result.is_err());
    }
}
