//! Declaration metadata consumed by the analyzer
//!
//! Declarations are described in YAML documents of the form
//! `{ classes: [ClassDecl] }`. A metadata input is either a single document or a
//! directory scanned recursively for `*.yaml`/`*.yml` files.

pub mod declarations;

pub use declarations::{
    Annotation, AnnotationValue, ClassDecl, Declaration, FieldDecl, MethodDecl, Modifier,
    ParameterDecl, CONSTRUCTOR_NAME,
};

use crate::core::path::PROJECT_CONFIG_NAME;
use crate::core::{ScabbardError, ScabbardResult};
use crate::di::traits::MetadataSource;
use scabbard_core::types::ClassName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// One metadata document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataDocument {
    #[serde(default)]
    pub classes: Vec<ClassDecl>,
}

/// Metadata source backed by YAML declaration documents
#[derive(Debug, Clone, Default)]
pub struct YamlMetadataSource {
    classes: BTreeMap<ClassName, ClassDecl>,
}

impl YamlMetadataSource {
    /// Merge documents, rejecting classes declared more than once
    pub fn from_documents(documents: Vec<MetadataDocument>) -> ScabbardResult<Self> {
        let mut classes = BTreeMap::new();
        for document in documents {
            for class in document.classes {
                let name = class.name.clone();
                if classes.insert(name.clone(), class).is_some() {
                    return Err(ScabbardError::Metadata(format!(
                        "Class '{}' is declared more than once",
                        name
                    )));
                }
            }
        }
        Ok(Self { classes })
    }

    pub fn parse(content: &str) -> ScabbardResult<Self> {
        let document: MetadataDocument = serde_yaml::from_str(content)?;
        Self::from_documents(vec![document])
    }

    /// Load a single document or every document below a directory
    pub fn load(path: &Path) -> ScabbardResult<Self> {
        if !path.exists() {
            return Err(ScabbardError::Path(format!(
                "Metadata input '{}' does not exist",
                path.display()
            )));
        }

        let files = if path.is_dir() {
            Self::find_documents(path)?
        } else {
            vec![path.to_path_buf()]
        };

        let mut documents = Vec::with_capacity(files.len());
        for file in files {
            debug!("Reading metadata from {}", file.display());
            let content = fs::read_to_string(&file)?;
            let document: MetadataDocument = serde_yaml::from_str(&content).map_err(|e| {
                ScabbardError::Metadata(format!("Failed to parse {}: {}", file.display(), e))
            })?;
            documents.push(document);
        }

        Self::from_documents(documents)
    }

    fn find_documents(dir: &Path) -> ScabbardResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            let is_yaml = matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("yaml") | Some("yml")
            );
            let is_config = path.file_name().and_then(|n| n.to_str()) == Some(PROJECT_CONFIG_NAME);
            if is_yaml && !is_config {
                files.push(path.to_path_buf());
            }
        }
        Ok(files)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl MetadataSource for YamlMetadataSource {
    fn find_class(&self, name: &ClassName) -> Option<&ClassDecl> {
        self.classes.get(name)
    }

    fn classes(&self) -> Vec<&ClassDecl> {
        self.classes.values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DOCUMENT: &str = r#"
classes:
  - name: com.example.Base
    modifiers: [public, abstract]
  - name: com.example.Foo
    superclass: com.example.Base
    interfaces: [com.example.Api]
  - name: com.example.Api
    modifiers: [public, interface]
    interfaces: [com.example.Marker]
"#;

    fn class(name: &str) -> ClassName {
        ClassName::parse(name).unwrap()
    }

    #[test]
    fn test_parse_document() {
        let source = YamlMetadataSource::parse(DOCUMENT).unwrap();
        assert_eq!(source.len(), 3);
        assert!(source.find_class(&class("com.example.Foo")).is_some());
        assert!(source.find_class(&class("com.example.Missing")).is_none());
    }

    #[test]
    fn test_ancestors_are_transitive() {
        let source = YamlMetadataSource::parse(DOCUMENT).unwrap();
        let ancestors = source.ancestors(&class("com.example.Foo"));
        assert_eq!(
            ancestors,
            vec![
                class("com.example.Base"),
                class("com.example.Api"),
                class("com.example.Marker"),
            ]
        );
    }

    #[test]
    fn test_duplicate_class_is_error() {
        let documents = vec![
            serde_yaml::from_str::<MetadataDocument>("classes: [{name: a.A}]").unwrap(),
            serde_yaml::from_str::<MetadataDocument>("classes: [{name: a.A}]").unwrap(),
        ];
        let err = YamlMetadataSource::from_documents(documents).unwrap_err();
        assert!(err.to_string().contains("declared more than once"));
    }

    #[test]
    fn test_load_directory_skips_project_config() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.yaml"), "classes: [{name: a.A}]").unwrap();
        fs::create_dir_all(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("nested/b.yml"), "classes: [{name: b.B}]").unwrap();
        fs::write(temp.path().join(PROJECT_CONFIG_NAME), "generated_package: x").unwrap();
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let source = YamlMetadataSource::load(temp.path()).unwrap();
        assert_eq!(source.len(), 2);
    }

    #[test]
    fn test_load_missing_path() {
        let temp = TempDir::new().unwrap();
        let result = YamlMetadataSource::load(&temp.path().join("missing.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_malformed_file_names_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("broken.yaml");
        fs::write(&file, "classes: [{name: 'not a name'}]").unwrap();
        let err = YamlMetadataSource::load(&file).unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
    }
}
