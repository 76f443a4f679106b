//! Structural checks over declarations and the analyzed graph

use crate::config::Config;
use crate::di::traits::{ErrorReporter, MetadataSource};
use crate::metadata::{ClassDecl, Declaration};
use crate::model::{Binding, Factory, InjectionContext};
use scabbard_core::types::Type;
use tracing::debug;

/// Reports declarations the generator cannot handle.
///
/// Every check reports and moves on; nothing here aborts the run.
pub struct SanityChecker<'a> {
    metadata: &'a dyn MetadataSource,
    config: &'a Config,
    reporter: &'a dyn ErrorReporter,
}

impl<'a> SanityChecker<'a> {
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

    pub fn check(&self, context: &InjectionContext) {
        let before = self.reporter.error_count();

        self.check_static_members();
        self.check_providable_targets(context);
        self.check_provider_types(context);
        self.check_subcomponents(context);
        self.check_super_types(context);
        for factory in &context.factories {
            self.check_factory(factory);
        }
        for binding in &context.bindings {
            self.check_binding(context, binding);
        }

        debug!(
            "Sanity checks reported {} error(s)",
            self.reporter.error_count() - before
        );
    }

    fn report(&self, message: String) {
        self.reporter.report_error(message);
    }

    fn check_static_members(&self) {
        let markers = &self.config.markers;
        for marker in [&markers.inject, &markers.provide] {
            for (class, field) in self.metadata.fields_annotated_with(marker) {
                if field.is_static() {
                    self.report(format!(
                        "Static field {}.{} cannot be marked @{}",
                        class.name, field.name, marker
                    ));
                }
            }
            for (class, method) in self.metadata.methods_annotated_with(marker) {
                if method.is_static() {
                    self.report(format!(
                        "Static method {}.{} cannot be marked @{}",
                        class.name,
                        method.signature(),
                        marker
                    ));
                }
            }
        }
    }

    fn check_providable_targets(&self, context: &InjectionContext) {
        for target in &context.providable_targets {
            let Some(class) = self.metadata.find_class(&target.target_type) else {
                continue;
            };
            let kind = if class.is_annotation() {
                Some("an annotation")
            } else if class.is_interface() {
                Some("an interface")
            } else if class.is_enum() {
                Some("an enum")
            } else if class.is_abstract() {
                Some("abstract")
            } else {
                None
            };
            if let Some(kind) = kind {
                self.report(format!(
                    "Class {} has an injectable constructor but is {}",
                    class.name, kind
                ));
            }
        }
    }

    fn check_provider_types(&self, context: &InjectionContext) {
        for module in context.modules() {
            for provider in &module.providers {
                if provider.dependency().dependency_type.is_void() {
                    self.report(format!(
                        "Provider {} must not return void",
                        provider.provision_point
                    ));
                }
            }
        }
    }

    fn check_subcomponents(&self, context: &InjectionContext) {
        for component in &context.components {
            if let Some(parent) = &component.parent {
                if context.find_component(parent).is_none() {
                    self.report(format!(
                        "Component {} declares parent {} which is not a component",
                        component.component_type, parent
                    ));
                }
            }
            for subcomponent in &component.subcomponents {
                if context.find_component(subcomponent).is_none() {
                    self.report(format!(
                        "Subcomponent {} of {} is not a component",
                        subcomponent, component.component_type
                    ));
                }
            }
        }
    }

    fn check_super_types(&self, context: &InjectionContext) {
        let object = &self.config.runtime.object;
        for module in context.modules() {
            let Some(class) = self.metadata.find_class(&module.module_type) else {
                continue;
            };
            let Some(superclass) = &class.superclass else {
                continue;
            };
            if superclass != object {
                let kind = if context.find_component(&class.name).is_some() {
                    "Component"
                } else {
                    "Module"
                };
                self.report(format!(
                    "{} {} must extend {} directly, found {}",
                    kind, class.name, object, superclass
                ));
            }
        }
    }

    fn check_factory(&self, factory: &Factory) {
        let Some(class) = self.metadata.find_class(&factory.factory_type) else {
            return;
        };
        let name = &class.name;
        if !class.is_interface() {
            self.report(format!("Factory {} must be an interface", name));
        }
        if class.is_generic() {
            self.report(format!("Factory {} must not be generic", name));
        }
        if !class.interfaces.is_empty() {
            self.report(format!("Factory {} must not extend other interfaces", name));
        }
        if !class
            .methods
            .iter()
            .any(|m| !m.is_static() && !m.is_constructor())
        {
            self.report(format!("Factory {} must declare at least one method", name));
        }

        for point in &factory.provision_points {
            let Some(produced) = point.produced_type.raw_class() else {
                continue;
            };
            let assignable = match point.method.return_type.raw_class() {
                Some(declared) => {
                    declared == produced || self.metadata.ancestors(produced).contains(declared)
                }
                None => false,
            };
            if !assignable {
                self.report(format!(
                    "Factory method {}.{} produces {} which is not assignable to {}",
                    name,
                    point.method.signature(),
                    produced,
                    point.method.return_type
                ));
            }
        }
    }

    fn check_binding(&self, context: &InjectionContext, binding: &Binding) {
        let Some(host) = binding.dependency.raw_class() else {
            return;
        };
        let Some(class) = self.metadata.find_class(host) else {
            return;
        };
        if !is_plain_class(class) {
            self.report(format!(
                "@{} host {} must be a non-generic class",
                self.config.markers.provided_as, host
            ));
        }

        let ancestor = &binding.ancestor.dependency_type;
        let Type::Class(ancestor_class) = ancestor else {
            self.report(format!(
                "Ancestor {} of {} must be a non-generic class",
                ancestor, host
            ));
            return;
        };
        if self
            .metadata
            .find_class(ancestor_class)
            .is_some_and(ClassDecl::is_generic)
        {
            self.report(format!(
                "Ancestor {} of {} must be a non-generic class",
                ancestor_class, host
            ));
        }
        if ancestor_class == host {
            self.report(format!("Class {} cannot be bound as itself", host));
            return;
        }
        if context.is_providable(ancestor_class) {
            self.report(format!(
                "Ancestor {} of {} has an injectable constructor and cannot be a binding target",
                ancestor_class, host
            ));
        }
        if !self.metadata.ancestors(host).contains(ancestor_class) {
            self.report(format!(
                "Class {} is bound as {} but does not extend it",
                host, ancestor_class
            ));
        }
    }
}

fn is_plain_class(class: &ClassDecl) -> bool {
    !class.is_interface() && !class.is_annotation() && !class.is_generic()
}
