//! Graph-level validation and the final verdict

use crate::config::Config;
use crate::di::traits::{ErrorReporter, MetadataSource};
use crate::graph::{format_trace, DirectedGraph};
use crate::model::{Component, Dependency, InjectionContext, Module};
use crate::validation::dependency_resolver::DependencyResolver;
use crate::validation::sanity_checker::SanityChecker;
use scabbard_core::types::{ClassName, Type};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, info, warn};

/// Everything accumulated along one root-to-component chain
#[derive(Clone)]
struct ChainState {
    modules: BTreeSet<ClassName>,
    /// Boxed dependency to the module providing it
    owners: BTreeMap<Dependency, ClassName>,
    resolver: DependencyResolver,
    /// Provider dependency to the dependencies it needs eagerly
    graph: DirectedGraph<Dependency>,
}

impl ChainState {
    fn new(injector: Dependency) -> Self {
        Self {
            modules: BTreeSet::new(),
            owners: BTreeMap::new(),
            resolver: DependencyResolver::new(injector),
            graph: DirectedGraph::new(),
        }
    }

    fn child(&self) -> Self {
        Self {
            resolver: self.resolver.child(),
            ..self.clone()
        }
    }
}

pub struct Validator<'a> {
    metadata: &'a dyn MetadataSource,
    config: &'a Config,
    reporter: &'a dyn ErrorReporter,
}

impl<'a> Validator<'a> {
    pub fn new(
        metadata: &'a dyn MetadataSource,
        config: &'a Config,
        reporter: &'a dyn ErrorReporter,
    ) -> Self {
        Self {
            metadata,
            config,
            reporter,
        }
    }

    /// Run every check and return true when no error has been reported so far
    pub fn validate(&self, context: &InjectionContext) -> bool {
        SanityChecker::new(self.metadata, self.config, self.reporter).check(context);
        self.check_component_cycles(context);

        let mut provided = BTreeSet::new();
        for root in context.root_components() {
            debug!("Validating component tree of {}", root.component_type);
            let mut walk = ChainWalk {
                validator: self,
                context,
                reported: HashSet::new(),
                path: Vec::new(),
                provided: &mut provided,
            };
            walk.visit(root, ChainState::new(self.injector_dependency()));
        }

        self.check_injectable_targets(context, &provided);

        let count = self.reporter.error_count();
        if count == 0 {
            info!(
                "Validated {} component(s) without errors",
                context.components.len()
            );
        } else {
            warn!("Validation finished with {} error(s)", count);
        }
        count == 0
    }

    fn injector_dependency(&self) -> Dependency {
        Dependency::new(Type::Class(self.config.runtime.injector.clone()))
    }

    fn check_component_cycles(&self, context: &InjectionContext) {
        let mut graph = DirectedGraph::new();
        for component in &context.components {
            graph.add_vertex(component.component_type.clone());
            if let Some(parent) = &component.parent {
                graph.add_edge(parent.clone(), component.component_type.clone());
            }
        }
        for cycle in graph.find_cycles() {
            self.reporter.report_error(format!(
                "Component cycle detected: {}",
                format_trace(&cycle)
            ));
        }
    }

    fn check_injectable_targets(&self, context: &InjectionContext, provided: &BTreeSet<Dependency>) {
        for target in &context.injectable_targets {
            for point in &target.injection_points {
                for injectee in point.injectees() {
                    if !provided.contains(&injectee.dependency) {
                        self.reporter.report_error(format!(
                            "Unresolved dependency {} required by {}",
                            injectee.dependency, point
                        ));
                    }
                }
            }
        }
    }
}

/// Recursive walk from one root component down through its subcomponents.
///
/// Identical messages are reported once per walk.
struct ChainWalk<'v, 'a> {
    validator: &'v Validator<'a>,
    context: &'v InjectionContext,
    reported: HashSet<String>,
    path: Vec<ClassName>,
    /// Union of what every visited component provides
    provided: &'v mut BTreeSet<Dependency>,
}

impl ChainWalk<'_, '_> {
    fn report(&mut self, message: String) {
        if self.reported.insert(message.clone()) {
            self.validator.reporter.report_error(message);
        }
    }

    fn visit(&mut self, component: &Component, mut state: ChainState) {
        if self.path.contains(&component.component_type) {
            return;
        }
        self.path.push(component.component_type.clone());
        let name = &component.component_type;

        for module in component.walk_modules() {
            if !state.modules.insert(module.module_type.clone()) {
                self.report(format!(
                    "Module {} provided more than once in component {}",
                    module.module_type, name
                ));
                continue;
            }
            self.record_owners(&module, name, &mut state.owners);
            state.resolver.add_module(&module);
            self.add_edges(&module, &mut state.graph);
        }

        let unresolved: Vec<Dependency> = state
            .resolver
            .get_unresolved_dependencies()
            .into_iter()
            .cloned()
            .collect();
        for dependency in unresolved {
            self.report(format!(
                "Unresolved dependency {} in component {}",
                dependency, name
            ));
        }

        for cycle in state.graph.find_cycles() {
            self.report(format!(
                "Dependency cycle detected: {}",
                format_trace(&cycle)
            ));
        }

        self.provided.extend(state.resolver.provided().cloned());

        let context = self.context;
        for subcomponent in &component.subcomponents {
            if let Some(child) = context.find_component(subcomponent) {
                self.visit(child, state.child());
            }
        }
        self.path.pop();
    }

    fn record_owners(
        &mut self,
        module: &Module,
        component: &ClassName,
        owners: &mut BTreeMap<Dependency, ClassName>,
    ) {
        let provided = module
            .providers
            .iter()
            .map(|provider| provider.dependency().clone())
            .chain(module.factories.iter().map(|factory| factory.dependency()))
            .chain(module.bindings.iter().map(|binding| binding.ancestor.clone()));

        for dependency in provided {
            let key = dependency.boxed();
            match owners.get(&key) {
                Some(owner) if owner == &module.module_type => {
                    let message = format!(
                        "Dependency {} is provided more than once by {} in component {}",
                        dependency, owner, component
                    );
                    self.report(message);
                }
                Some(owner) => {
                    let message = format!(
                        "Dependency {} is provided by both {} and {} in component {}",
                        dependency, owner, module.module_type, component
                    );
                    self.report(message);
                }
                None => {
                    owners.insert(key, module.module_type.clone());
                }
            }
        }
    }

    /// Edges from each provided dependency to what it needs; wrapped
    /// injectees are left out when wrapped cycles are allowed
    fn add_edges(&self, module: &Module, graph: &mut DirectedGraph<Dependency>) {
        let skip_wrapped = self.validator.config.allow_wrapped_cycles;
        for provider in &module.providers {
            let from = provider.dependency().boxed();
            graph.add_vertex(from.clone());
            for injectee in provider.provision_point.injectees() {
                if skip_wrapped && !injectee.converter.is_eager() {
                    continue;
                }
                graph.add_edge(from.clone(), injectee.dependency.boxed());
            }
        }
        for binding in &module.bindings {
            graph.add_edge(binding.ancestor.boxed(), binding.dependency.boxed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analyzer;
    use crate::di::mocks::{MockErrorReporter, MockMetadataSource};

    fn validate_with(yaml: &str, config: Config) -> (bool, MockErrorReporter) {
        let metadata = MockMetadataSource::from_yaml(yaml).unwrap();
        let reporter = MockErrorReporter::new();
        let context = Analyzer::new(&metadata, &config, &reporter)
            .analyze()
            .unwrap();
        let valid = Validator::new(&metadata, &config, &reporter).validate(&context);
        (valid, reporter)
    }

    fn validate(yaml: &str) -> (bool, MockErrorReporter) {
        validate_with(yaml, Config::default())
    }

    const CYCLE: &str = r#"
classes:
  - name: a.C
    annotations: [{type: io.scabbard.Component}]
    fields:
      - name: module
        type: a.M
        annotations: [{type: io.scabbard.Import}]
  - name: a.Child
    annotations:
      - type: io.scabbard.Component
        values: {parent: {class: a.C}}
  - name: a.M
    annotations: [{type: io.scabbard.Module}]
    methods:
      - name: provideP
        parameters: [{type: a.Q}]
        return_type: a.P
        annotations: [{type: io.scabbard.Provide}]
      - name: provideQ
        parameters: [{type: a.P}]
        return_type: a.Q
        annotations: [{type: io.scabbard.Provide}]
"#;

    const WRAPPED_CYCLE: &str = r#"
classes:
  - name: a.C
    annotations: [{type: io.scabbard.Component}]
    fields:
      - name: module
        type: a.M
        annotations: [{type: io.scabbard.Import}]
  - name: a.M
    annotations: [{type: io.scabbard.Module}]
    methods:
      - name: provideP
        parameters: [{type: "javax.inject.Provider<a.Q>"}]
        return_type: a.P
        annotations: [{type: io.scabbard.Provide}]
      - name: provideQ
        parameters: [{type: "io.scabbard.Lazy<a.P>"}]
        return_type: a.Q
        annotations: [{type: io.scabbard.Provide}]
"#;

    #[test]
    fn test_valid_graph() {
        let (valid, reporter) = validate(
            r#"
classes:
  - name: a.C
    annotations: [{type: io.scabbard.Component}]
    methods:
      - name: module
        return_type: a.M
        annotations: [{type: io.scabbard.Import}]
  - name: a.M
    annotations: [{type: io.scabbard.Module}]
    methods:
      - name: provideFoo
        return_type: a.Foo
        annotations: [{type: io.scabbard.Provide}]
      - name: provideBar
        parameters: [{type: a.Foo}, {type: io.scabbard.Injector}]
        return_type: a.Bar
        annotations: [{type: io.scabbard.Provide}]
  - name: a.Baz
    fields:
      - name: bar
        type: a.Bar
        annotations: [{type: javax.inject.Inject}]
"#,
        );
        assert!(valid, "unexpected errors: {:?}", reporter.errors());
    }

    #[test]
    fn test_unresolved_dependency_reported_once() {
        let (valid, reporter) = validate(
            r#"
classes:
  - name: a.C
    annotations: [{type: io.scabbard.Component}]
    fields:
      - name: module
        type: a.M
        annotations: [{type: io.scabbard.Import}]
  - name: a.M
    annotations: [{type: io.scabbard.Module}]
    methods:
      - name: provideFoo
        parameters: [{type: a.X}]
        return_type: a.Foo
        annotations: [{type: io.scabbard.Provide}]
      - name: provideBar
        parameters: [{type: a.X}]
        return_type: a.Bar
        annotations: [{type: io.scabbard.Provide}]
"#,
        );
        assert!(!valid);
        assert_eq!(reporter.error_count(), 1);
        assert_eq!(
            reporter.errors()[0],
            "Unresolved dependency a.X in component a.C"
        );
    }

    #[test]
    fn test_eager_cycle_reported_once() {
        let (valid, reporter) = validate(CYCLE);
        assert!(!valid);
        assert_eq!(reporter.count_containing("Dependency cycle detected"), 1);
        assert_eq!(reporter.count_containing("a.P -> a.Q -> a.P"), 1);
        assert_eq!(reporter.error_count(), 1);
    }

    #[test]
    fn test_wrapped_cycle_allowed() {
        let (valid, reporter) = validate(WRAPPED_CYCLE);
        assert!(valid, "unexpected errors: {:?}", reporter.errors());
    }

    #[test]
    fn test_wrapped_cycle_rejected_when_disabled() {
        let config = Config {
            allow_wrapped_cycles: false,
            ..Default::default()
        };
        let (valid, reporter) = validate_with(WRAPPED_CYCLE, config);
        assert!(!valid);
        assert_eq!(reporter.count_containing("Dependency cycle detected"), 1);
    }

    #[test]
    fn test_component_cycle() {
        let (valid, reporter) = validate(
            r#"
classes:
  - name: a.A
    annotations:
      - type: io.scabbard.Component
        values: {parent: {class: a.B}}
  - name: a.B
    annotations:
      - type: io.scabbard.Component
        values: {parent: {class: a.A}}
"#,
        );
        assert!(!valid);
        assert_eq!(
            reporter.errors(),
            vec!["Component cycle detected: a.A -> a.B -> a.A".to_string()]
        );
    }

    #[test]
    fn test_module_repeated_in_chain() {
        let (valid, reporter) = validate(
            r#"
classes:
  - name: a.Parent
    annotations: [{type: io.scabbard.Component}]
    fields:
      - name: shared
        type: a.Shared
        annotations: [{type: io.scabbard.Import}]
  - name: a.Child
    annotations:
      - type: io.scabbard.Component
        values: {parent: {class: a.Parent}}
    fields:
      - name: shared
        type: a.Shared
        annotations: [{type: io.scabbard.Import}]
  - name: a.Shared
    annotations: [{type: io.scabbard.Module}]
"#,
        );
        assert!(!valid);
        assert_eq!(
            reporter.errors(),
            vec!["Module a.Shared provided more than once in component a.Child".to_string()]
        );
    }

    #[test]
    fn test_dependency_provided_by_two_modules() {
        let (valid, reporter) = validate(
            r#"
classes:
  - name: a.C
    annotations: [{type: io.scabbard.Component}]
    fields:
      - name: first
        type: a.M1
        annotations: [{type: io.scabbard.Import}]
      - name: second
        type: a.M2
        annotations: [{type: io.scabbard.Import}]
  - name: a.M1
    annotations: [{type: io.scabbard.Module}]
    methods:
      - name: foo
        return_type: a.Foo
        annotations: [{type: io.scabbard.Provide}]
  - name: a.M2
    annotations: [{type: io.scabbard.Module}]
    fields:
      - name: foo
        type: a.Foo
        annotations: [{type: io.scabbard.Provide}]
"#,
        );
        assert!(!valid);
        assert_eq!(
            reporter.errors(),
            vec!["Dependency a.Foo is provided by both a.M1 and a.M2 in component a.C".to_string()]
        );
    }

    #[test]
    fn test_dependency_provided_twice_by_one_module() {
        let (valid, reporter) = validate(
            r#"
classes:
  - name: a.C
    annotations: [{type: io.scabbard.Component}]
    methods:
      - name: foo1
        return_type: a.Foo
        annotations: [{type: io.scabbard.Provide}]
      - name: foo2
        return_type: a.Foo
        annotations: [{type: io.scabbard.Provide}]
"#,
        );
        assert!(!valid);
        assert_eq!(
            reporter.errors(),
            vec!["Dependency a.Foo is provided more than once by a.C in component a.C".to_string()]
        );
    }

    #[test]
    fn test_primitive_and_boxed_provider_collide() {
        let (valid, reporter) = validate(
            r#"
classes:
  - name: a.C
    annotations: [{type: io.scabbard.Component}]
    methods:
      - name: count
        return_type: int
        annotations: [{type: io.scabbard.Provide}]
      - name: boxedCount
        return_type: java.lang.Integer
        annotations: [{type: io.scabbard.Provide}]
"#,
        );
        assert!(!valid);
        assert_eq!(reporter.count_containing("provided more than once by a.C"), 1);
    }

    #[test]
    fn test_module_diamond_in_component() {
        let (valid, reporter) = validate(
            r#"
classes:
  - name: a.C
    annotations: [{type: io.scabbard.Component}]
    fields:
      - name: left
        type: a.Left
        annotations: [{type: io.scabbard.Import}]
      - name: right
        type: a.Right
        annotations: [{type: io.scabbard.Import}]
  - name: a.Left
    annotations: [{type: io.scabbard.Module}]
    fields:
      - name: shared
        type: a.Shared
        annotations: [{type: io.scabbard.Import}]
  - name: a.Right
    annotations: [{type: io.scabbard.Module}]
    fields:
      - name: shared
        type: a.Shared
        annotations: [{type: io.scabbard.Import}]
  - name: a.Shared
    annotations: [{type: io.scabbard.Module}]
    methods:
      - name: foo
        return_type: a.Foo
        annotations: [{type: io.scabbard.Provide}]
"#,
        );
        assert!(!valid);
        assert_eq!(
            reporter.errors(),
            vec!["Module a.Shared provided more than once in component a.C".to_string()]
        );
    }

    #[test]
    fn test_factory_injector_injectees_must_resolve() {
        let (valid, reporter) = validate(
            r#"
classes:
  - name: a.C
    annotations: [{type: io.scabbard.Component}]
  - name: a.Widget
    methods:
      - name: "<init>"
        parameters:
          - type: java.lang.String
            annotations: [{type: "io.scabbard.Factory$Parameter"}]
          - type: a.Engine
        annotations: [{type: "io.scabbard.Factory$Inject"}]
  - name: a.WidgetFactory
    modifiers: [public, interface, abstract]
    annotations:
      - type: io.scabbard.Factory
      - type: io.scabbard.ProvidedBy
        values: {value: {class: a.C}}
    methods:
      - name: create
        parameters: [{type: java.lang.String}]
        return_type: a.Widget
        modifiers: [public, abstract]
"#,
        );
        assert!(!valid);
        assert_eq!(
            reporter.errors(),
            vec!["Unresolved dependency a.Engine in component a.C".to_string()]
        );
    }

    #[test]
    fn test_subcomponent_sees_parent_providers() {
        let (valid, reporter) = validate(
            r#"
classes:
  - name: a.App
    annotations: [{type: io.scabbard.Component}]
    methods:
      - name: foo
        return_type: a.Foo
        annotations: [{type: io.scabbard.Provide}]
  - name: a.Screen
    annotations:
      - type: io.scabbard.Component
        values: {parent: {class: a.App}}
    methods:
      - name: bar
        parameters: [{type: a.Foo}]
        return_type: a.Bar
        annotations: [{type: io.scabbard.Provide}]
"#,
        );
        assert!(valid, "unexpected errors: {:?}", reporter.errors());
    }

    #[test]
    fn test_injectable_target_resolved_globally() {
        let (valid, reporter) = validate(
            r#"
classes:
  - name: a.App
    annotations: [{type: io.scabbard.Component}]
    methods:
      - name: foo
        return_type: a.Foo
        annotations: [{type: io.scabbard.Provide}]
  - name: a.Baz
    fields:
      - name: foo
        type: a.Foo
        annotations: [{type: javax.inject.Inject}]
      - name: missing
        type: a.Missing
        annotations: [{type: javax.inject.Inject}]
"#,
        );
        assert!(!valid);
        assert_eq!(
            reporter.errors(),
            vec!["Unresolved dependency a.Missing required by a.Baz.missing".to_string()]
        );
    }
}
