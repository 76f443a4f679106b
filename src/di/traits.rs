//! Trait definitions for the compiler's external collaborators

use crate::core::ScabbardResult;
use crate::generation::shape::{ClassShape, MethodShape};
use crate::metadata::{ClassDecl, Declaration, FieldDecl, MethodDecl};
use scabbard_core::types::ClassName;
use std::collections::{HashSet, VecDeque};

/// Trait for querying declaration metadata
///
/// Implementations only need `find_class` and `classes`; the annotation and
/// hierarchy queries are derived from them.
pub trait MetadataSource: Send + Sync {
    /// Look up a declared class
    fn find_class(&self, name: &ClassName) -> Option<&ClassDecl>;

    /// All declared classes, ordered by name
    fn classes(&self) -> Vec<&ClassDecl>;

    /// Classes carrying the annotation
    fn types_annotated_with(&self, annotation: &ClassName) -> Vec<&ClassDecl> {
        self.classes()
            .into_iter()
            .filter(|class| class.has_annotation(annotation))
            .collect()
    }

    /// Methods (constructors included) carrying the annotation
    fn methods_annotated_with(&self, annotation: &ClassName) -> Vec<(&ClassDecl, &MethodDecl)> {
        self.classes()
            .into_iter()
            .flat_map(|class| {
                class
                    .methods
                    .iter()
                    .filter(|method| method.has_annotation(annotation))
                    .map(move |method| (class, method))
            })
            .collect()
    }

    /// Fields carrying the annotation
    fn fields_annotated_with(&self, annotation: &ClassName) -> Vec<(&ClassDecl, &FieldDecl)> {
        self.classes()
            .into_iter()
            .flat_map(|class| {
                class
                    .fields
                    .iter()
                    .filter(|field| field.has_annotation(annotation))
                    .map(move |field| (class, field))
            })
            .collect()
    }

    /// Transitive supertypes (superclasses and interfaces), nearest first.
    /// Classes missing from the source end the walk along their branch.
    fn ancestors(&self, name: &ClassName) -> Vec<ClassName> {
        let mut result = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([name.clone()]);

        while let Some(current) = queue.pop_front() {
            let Some(class) = self.find_class(&current) else {
                continue;
            };
            for parent in class.superclass.iter().chain(class.interfaces.iter()) {
                if parent != name && seen.insert(parent.clone()) {
                    result.push(parent.clone());
                    queue.push_back(parent.clone());
                }
            }
        }

        result
    }
}

/// Trait for writing generated classes
pub trait CodeEmitter: Send + Sync {
    /// Produce a class from its declarative description
    fn emit_class(&self, shape: &ClassShape) -> ScabbardResult<()>;

    /// Add a synthetic accessor to an existing class
    fn emit_bridge(&self, container: &ClassName, bridge: &MethodShape) -> ScabbardResult<()>;
}

/// Trait for collecting errors reported during processing
///
/// Reporting never aborts the pipeline; callers check `has_errors` at stage
/// boundaries.
pub trait ErrorReporter: Send + Sync {
    fn report_error(&self, message: String);

    fn errors(&self) -> Vec<String>;

    fn error_count(&self) -> usize {
        self.errors().len()
    }

    fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}
