//! JSON rendition of generated classes

use crate::core::path::ensure_dir;
use crate::core::{ScabbardError, ScabbardResult};
use crate::di::traits::CodeEmitter;
use crate::generation::shape::{ClassShape, MethodShape};
use scabbard_core::types::ClassName;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CLASSES_DIR: &str = "classes";
const BRIDGES_DIR: &str = "bridges";

#[derive(Serialize)]
struct BridgeDocument<'a> {
    container: &'a ClassName,
    bridge: &'a MethodShape,
}

/// Writes one pretty-printed JSON document per emitted class
///
/// Classes land in `<output>/classes/<binary name>.json`, bridges in
/// `<output>/bridges/<container>#<bridge>.json`.
#[derive(Debug, Clone)]
pub struct JsonCodeEmitter {
    output_dir: PathBuf,
}

impl JsonCodeEmitter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn class_path(&self, name: &ClassName) -> PathBuf {
        self.output_dir
            .join(CLASSES_DIR)
            .join(format!("{}.json", name))
    }

    pub fn bridge_path(&self, container: &ClassName, bridge: &str) -> PathBuf {
        self.output_dir
            .join(BRIDGES_DIR)
            .join(format!("{}#{}.json", container, bridge))
    }

    fn write<T: Serialize>(&self, path: &Path, value: &T) -> ScabbardResult<()> {
        let parent = path
            .parent()
            .ok_or_else(|| ScabbardError::Path(format!("Invalid output path {}", path.display())))?;
        ensure_dir(parent)?;
        let content = serde_json::to_string_pretty(value)?;
        fs::write(path, content).map_err(|e| {
            ScabbardError::Generation(format!("Failed to write {}: {}", path.display(), e))
        })?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}

impl CodeEmitter for JsonCodeEmitter {
    fn emit_class(&self, shape: &ClassShape) -> ScabbardResult<()> {
        self.write(&self.class_path(&shape.name), shape)
    }

    fn emit_bridge(&self, container: &ClassName, bridge: &MethodShape) -> ScabbardResult<()> {
        let document = BridgeDocument { container, bridge };
        self.write(&self.bridge_path(container, &bridge.name), &document)
    }
}
