//! Alias bindings declared with `@ProvidedAs`

use crate::analysis::helper::AnalyzerHelper;
use crate::core::{ScabbardError, ScabbardResult};
use crate::metadata::Declaration;
use crate::model::{Binding, Dependency};
use scabbard_core::types::Type;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Bindings indexed by concrete dependency and by ancestor
#[derive(Debug, Clone, Default)]
pub struct BindingRegistry {
    by_dependency: HashMap<Dependency, Binding>,
    by_ancestor: BTreeMap<Dependency, Vec<Binding>>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding; a concrete dependency may alias a single ancestor
    pub fn register_binding(&mut self, binding: Binding) -> ScabbardResult<()> {
        if let Some(existing) = self.by_dependency.get(&binding.dependency) {
            if existing.ancestor == binding.ancestor {
                return Ok(());
            }
            return Err(ScabbardError::Analysis(format!(
                "Dependency {} is bound to both {} and {}",
                binding.dependency, existing.ancestor, binding.ancestor
            )));
        }

        self.by_ancestor
            .entry(binding.ancestor.clone())
            .or_default()
            .push(binding.clone());
        self.by_dependency
            .insert(binding.dependency.clone(), binding);
        Ok(())
    }

    pub fn find_binding(&self, dependency: &Dependency) -> Option<&Binding> {
        self.by_dependency.get(dependency)
    }

    /// Every binding aliasing `ancestor`, in registration order
    pub fn find_bindings_by_ancestor(&self, ancestor: &Dependency) -> &[Binding] {
        self.by_ancestor
            .get(ancestor)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// All bindings ordered by ancestor
    pub fn bindings(&self) -> Vec<Binding> {
        self.by_ancestor.values().flatten().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.by_dependency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_dependency.is_empty()
    }
}

pub struct BindingsAnalyzer<'h, 'a> {
    helper: &'h AnalyzerHelper<'a>,
}

impl<'h, 'a> BindingsAnalyzer<'h, 'a> {
    pub fn new(helper: &'h AnalyzerHelper<'a>) -> Self {
        Self { helper }
    }

    /// Collect one binding per ancestor listed in each `@ProvidedAs`.
    ///
    /// The host's qualifier applies to both sides of the binding. Conflicts
    /// are reported and the later binding is dropped.
    pub fn analyze(&self) -> ScabbardResult<BindingRegistry> {
        let provided_as = &self.helper.config().markers.provided_as;
        let mut registry = BindingRegistry::new();

        for class in self.helper.metadata().types_annotated_with(provided_as) {
            let Some(annotation) = class.annotation(provided_as) else {
                continue;
            };
            let ancestors = annotation.class_array_value("value")?;
            if ancestors.is_empty() {
                self.helper.reporter().report_error(format!(
                    "@{} on {} lists no ancestor types",
                    provided_as, class.name
                ));
                continue;
            }

            let dependency = self.helper.dependency_of(
                class,
                Type::Class(class.name.clone()),
                class.name.as_str(),
            );
            for ancestor in ancestors {
                let binding = Binding::new(
                    dependency.clone(),
                    Dependency::qualified(ancestor.clone(), dependency.qualifier.clone()),
                );
                debug!("Binding {}", binding);
                if let Err(e) = registry.register_binding(binding) {
                    self.helper.reporter().report_error(e.to_string());
                }
            }
        }

        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::di::mocks::{MockErrorReporter, MockMetadataSource};
    use crate::di::traits::ErrorReporter;
    use scabbard_core::types::ClassName;

    fn dependency(name: &str) -> Dependency {
        Dependency::of_class(ClassName::parse(name).unwrap())
    }

    #[test]
    fn test_ancestor_conflict_is_error() {
        let mut registry = BindingRegistry::new();
        registry
            .register_binding(Binding::new(dependency("a.D"), dependency("a.A")))
            .unwrap();
        let err = registry
            .register_binding(Binding::new(dependency("a.D"), dependency("a.A2")))
            .unwrap_err();
        assert!(err.to_string().contains("bound to both"));
        assert_eq!(registry.len(), 1);
        assert!(registry.find_bindings_by_ancestor(&dependency("a.A2")).is_empty());
    }

    #[test]
    fn test_same_binding_twice_is_accepted() {
        let mut registry = BindingRegistry::new();
        let binding = Binding::new(dependency("a.D"), dependency("a.A"));
        registry.register_binding(binding.clone()).unwrap();
        registry.register_binding(binding).unwrap();
        assert_eq!(registry.find_bindings_by_ancestor(&dependency("a.A")).len(), 1);
    }

    #[test]
    fn test_find_bindings_by_ancestor() {
        let mut registry = BindingRegistry::new();
        registry
            .register_binding(Binding::new(dependency("a.D1"), dependency("a.A")))
            .unwrap();
        registry
            .register_binding(Binding::new(dependency("a.D2"), dependency("a.A")))
            .unwrap();

        let found = registry.find_bindings_by_ancestor(&dependency("a.A"));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].dependency, dependency("a.D1"));
        assert_eq!(found[1].dependency, dependency("a.D2"));
        assert_eq!(
            registry.find_binding(&dependency("a.D2")).unwrap().ancestor,
            dependency("a.A")
        );
    }

    #[test]
    fn test_analyzer_carries_qualifier() {
        let metadata = MockMetadataSource::from_yaml(
            r#"
classes:
  - name: a.Named
    modifiers: [public, annotation]
    annotations: [{type: javax.inject.Qualifier}]
  - name: a.Impl
    interfaces: [a.Api]
    annotations:
      - type: a.Named
      - type: io.scabbard.ProvidedAs
        values: {value: {class: a.Api}}
  - name: a.Empty
    annotations:
      - type: io.scabbard.ProvidedAs
        values: {value: {array: []}}
"#,
        )
        .unwrap();
        let config = Config::default();
        let reporter = MockErrorReporter::new();
        let helper = AnalyzerHelper::new(&metadata, &config, &reporter).unwrap();

        let registry = BindingsAnalyzer::new(&helper).analyze().unwrap();

        let bindings = registry.bindings();
        assert_eq!(bindings.len(), 1);
        let qualifier = bindings[0].ancestor.qualifier.as_ref().unwrap();
        assert_eq!(qualifier.annotation_type.as_str(), "a.Named");
        assert_eq!(bindings[0].dependency.qualifier.as_ref(), Some(qualifier));
        assert_eq!(reporter.count_containing("lists no ancestor"), 1);
        assert_eq!(reporter.error_count(), 1);
    }
}
