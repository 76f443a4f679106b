//! Mock implementations of the collaborator traits for testing

use super::traits::{CodeEmitter, ErrorReporter, MetadataSource};
use crate::core::ScabbardResult;
use crate::generation::shape::{ClassShape, MethodShape};
use crate::metadata::{ClassDecl, YamlMetadataSource};
use scabbard_core::types::ClassName;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory metadata source that counts class lookups
///
/// # Example
///
/// ```
/// use scabbard::di::mocks::MockMetadataSource;
/// use scabbard::di::MetadataSource;
/// use scabbard::metadata::ClassDecl;
/// use scabbard::types::ClassName;
///
/// let name = ClassName::parse("com.example.Foo").unwrap();
/// let source = MockMetadataSource::new().with_class(ClassDecl::new(name.clone()));
///
/// assert!(source.find_class(&name).is_some());
/// assert_eq!(source.lookup_count(&name), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockMetadataSource {
    classes: BTreeMap<ClassName, ClassDecl>,
    lookups: Arc<Mutex<HashMap<ClassName, usize>>>,
}

impl MockMetadataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a YAML metadata document
    pub fn from_yaml(content: &str) -> ScabbardResult<Self> {
        let source = YamlMetadataSource::parse(content)?;
        Ok(source
            .classes()
            .into_iter()
            .fold(Self::new(), |mock, class| mock.with_class(class.clone())))
    }

    pub fn with_class(mut self, class: ClassDecl) -> Self {
        self.classes.insert(class.name.clone(), class);
        self
    }

    /// Number of `find_class` calls made for `name`
    pub fn lookup_count(&self, name: &ClassName) -> usize {
        lock(&self.lookups).get(name).copied().unwrap_or(0)
    }

    pub fn reset_counts(&self) {
        lock(&self.lookups).clear();
    }
}

impl MetadataSource for MockMetadataSource {
    fn find_class(&self, name: &ClassName) -> Option<&ClassDecl> {
        *lock(&self.lookups).entry(name.clone()).or_insert(0) += 1;
        self.classes.get(name)
    }

    fn classes(&self) -> Vec<&ClassDecl> {
        self.classes.values().collect()
    }
}

/// Code emitter that keeps every emitted shape in memory
#[derive(Clone, Default)]
pub struct RecordingCodeEmitter {
    classes: Arc<Mutex<Vec<ClassShape>>>,
    bridges: Arc<Mutex<Vec<(ClassName, MethodShape)>>>,
}

impl RecordingCodeEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classes(&self) -> Vec<ClassShape> {
        lock(&self.classes).clone()
    }

    pub fn class_names(&self) -> Vec<String> {
        lock(&self.classes)
            .iter()
            .map(|shape| shape.name.to_string())
            .collect()
    }

    pub fn bridges(&self) -> Vec<(ClassName, MethodShape)> {
        lock(&self.bridges).clone()
    }
}

impl CodeEmitter for RecordingCodeEmitter {
    fn emit_class(&self, shape: &ClassShape) -> ScabbardResult<()> {
        lock(&self.classes).push(shape.clone());
        Ok(())
    }

    fn emit_bridge(&self, container: &ClassName, bridge: &MethodShape) -> ScabbardResult<()> {
        lock(&self.bridges).push((container.clone(), bridge.clone()));
        Ok(())
    }
}

/// Error reporter that only collects messages
#[derive(Clone, Default)]
pub struct MockErrorReporter {
    errors: Arc<Mutex<Vec<String>>>,
}

impl MockErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of collected messages containing `needle`
    pub fn count_containing(&self, needle: &str) -> usize {
        lock(&self.errors)
            .iter()
            .filter(|message| message.contains(needle))
            .count()
    }
}

impl ErrorReporter for MockErrorReporter {
    fn report_error(&self, message: String) {
        lock(&self.errors).push(message);
    }

    fn errors(&self) -> Vec<String> {
        lock(&self.errors).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_metadata_from_yaml() {
        let source = MockMetadataSource::from_yaml("classes: [{name: a.A}, {name: a.B}]").unwrap();
        assert_eq!(source.classes().len(), 2);

        let name = ClassName::parse("a.A").unwrap();
        assert_eq!(source.lookup_count(&name), 0);
        source.find_class(&name);
        source.find_class(&name);
        assert_eq!(source.lookup_count(&name), 2);
        source.reset_counts();
        assert_eq!(source.lookup_count(&name), 0);
    }

    #[test]
    fn test_mock_reporter() {
        let reporter = MockErrorReporter::new();
        assert!(!reporter.has_errors());
        reporter.report_error("first problem".to_string());
        reporter.report_error("second problem".to_string());
        assert_eq!(reporter.error_count(), 2);
        assert_eq!(reporter.count_containing("first"), 1);
    }

    #[test]
    fn test_recording_emitter() {
        let emitter = RecordingCodeEmitter::new();
        let name = ClassName::parse("a.Gen").unwrap();
        let object = ClassName::parse("java.lang.Object").unwrap();
        emitter.emit_class(&ClassShape::new(name.clone(), object)).unwrap();
        emitter
            .emit_bridge(&name, &MethodShape::constructor(vec![]))
            .unwrap();
        assert_eq!(emitter.class_names(), vec!["a.Gen"]);
        assert_eq!(emitter.bridges().len(), 1);
    }
}
