use crate::core::error::{ScabbardError, ScabbardResult};
use std::path::{Path, PathBuf};

/// Name of the per-project configuration file looked up next to the metadata input.
pub const PROJECT_CONFIG_NAME: &str = "scabbard.yaml";

/// Get the Scabbard home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\scabbard
/// - Linux: ~/.config/scabbard
/// - macOS: ~/Library/Application Support/scabbard
pub fn scabbard_home() -> ScabbardResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ScabbardError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("scabbard"))
}

/// Get the global config file path (`<scabbard_home>/config.yaml`)
pub fn config_file() -> ScabbardResult<PathBuf> {
    Ok(scabbard_home()?.join("config.yaml"))
}

/// Locate a project config for a metadata input.
///
/// A file input looks in its parent directory, a directory input looks inside itself.
pub fn project_config_file(input: &Path) -> Option<PathBuf> {
    let dir = if input.is_dir() {
        input
    } else {
        input.parent()?
    };
    let candidate = dir.join(PROJECT_CONFIG_NAME);
    candidate.is_file().then_some(candidate)
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> ScabbardResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_file_name() {
        let path = config_file().unwrap();
        assert!(path.ends_with("scabbard/config.yaml"));
    }

    #[test]
    fn test_ensure_dir_creates_nested() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        ensure_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[test]
    fn test_project_config_for_directory_input() {
        let temp = TempDir::new().unwrap();
        assert!(project_config_file(temp.path()).is_none());

        std::fs::write(temp.path().join(PROJECT_CONFIG_NAME), "{}").unwrap();
        assert_eq!(
            project_config_file(temp.path()),
            Some(temp.path().join(PROJECT_CONFIG_NAME))
        );
    }

    #[test]
    fn test_project_config_for_file_input() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("app.yaml");
        std::fs::write(&input, "classes: []").unwrap();
        std::fs::write(temp.path().join(PROJECT_CONFIG_NAME), "{}").unwrap();

        assert!(project_config_file(&input).is_some());
    }
}
