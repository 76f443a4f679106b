//! Shared conversions from declarations to model objects

use crate::config::Config;
use crate::core::ScabbardResult;
use crate::di::traits::{ErrorReporter, MetadataSource};
use crate::metadata::{Annotation, Declaration, FieldDecl, MethodDecl};
use crate::model::{Converter, Dependency, Injectee, InjectionPoint, Scope};
use scabbard_core::types::{ClassName, Type};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// A class member that can become an injection point
#[derive(Debug, Clone, Copy)]
pub enum Member<'a> {
    Method(&'a MethodDecl),
    Field(&'a FieldDecl),
}

impl fmt::Display for Member<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Method(method) => f.write_str(&method.signature()),
            Member::Field(field) => f.write_str(&field.name),
        }
    }
}

/// Scope annotations and the provider wrapper each one applies
#[derive(Debug, Clone, Default)]
pub struct ScopeRegistry {
    wrappers: BTreeMap<ClassName, ClassName>,
}

impl ScopeRegistry {
    /// Built-in scopes from the config plus every annotation class carrying the
    /// scope-provider meta-marker
    pub fn build(
        metadata: &dyn MetadataSource,
        config: &Config,
        reporter: &dyn ErrorReporter,
    ) -> ScabbardResult<Self> {
        let mut wrappers = config.scopes.clone();
        let markers = &config.markers;

        for class in metadata.types_annotated_with(&markers.scope_provider) {
            let Some(annotation) = class.annotation(&markers.scope_provider) else {
                continue;
            };
            match annotation.class_value("value")?.and_then(Type::raw_class) {
                Some(wrapper) => {
                    debug!("Scope {} wraps providers in {}", class.name, wrapper);
                    wrappers.insert(class.name.clone(), wrapper.clone());
                }
                None => reporter.report_error(format!(
                    "Scope annotation {} must name its provider class",
                    class.name
                )),
            }
        }

        for class in metadata.types_annotated_with(&markers.scope) {
            if !wrappers.contains_key(&class.name) {
                reporter.report_error(format!(
                    "Scope annotation {} has no provider class; annotate it with @{}",
                    class.name, markers.scope_provider
                ));
            }
        }

        Ok(Self { wrappers })
    }

    pub fn wrapper(&self, annotation_type: &ClassName) -> Option<&ClassName> {
        self.wrappers.get(annotation_type)
    }

    pub fn len(&self) -> usize {
        self.wrappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
    }
}

/// Converts raw declarations into injection points, injectees, qualifiers and scopes
pub struct AnalyzerHelper<'a> {
    metadata: &'a dyn MetadataSource,
    config: &'a Config,
    reporter: &'a dyn ErrorReporter,
    scopes: ScopeRegistry,
}

impl<'a> AnalyzerHelper<'a> {
    pub fn new(
        metadata: &'a dyn MetadataSource,
        config: &'a Config,
        reporter: &'a dyn ErrorReporter,
    ) -> ScabbardResult<Self> {
        let scopes = ScopeRegistry::build(metadata, config, reporter)?;
        Ok(Self {
            metadata,
            config,
            reporter,
            scopes,
        })
    }

    pub fn metadata(&self) -> &'a dyn MetadataSource {
        self.metadata
    }

    pub fn config(&self) -> &'a Config {
        self.config
    }

    pub fn reporter(&self) -> &'a dyn ErrorReporter {
        self.reporter
    }

    pub fn scopes(&self) -> &ScopeRegistry {
        &self.scopes
    }

    pub fn to_injection_point(&self, container: &ClassName, member: Member<'_>) -> InjectionPoint {
        match member {
            Member::Method(method) => {
                let injectees = method
                    .parameters
                    .iter()
                    .enumerate()
                    .map(|(index, parameter)| {
                        let qualifier = self.find_qualifier(
                            parameter,
                            &format!(
                                "parameter {} of {}.{}",
                                index,
                                container,
                                method.signature()
                            ),
                        );
                        self.to_injectee(&parameter.parameter_type, qualifier)
                    })
                    .collect();
                InjectionPoint::Method {
                    container: container.clone(),
                    method: method.clone(),
                    injectees,
                }
            }
            Member::Field(field) => {
                let qualifier =
                    self.find_qualifier(field, &format!("{}.{}", container, field.name));
                InjectionPoint::Field {
                    container: container.clone(),
                    field: field.clone(),
                    injectee: self.to_injectee(&field.field_type, qualifier),
                }
            }
        }
    }

    /// `Provider<T>` yields the provider of `T`, `Lazy<T>` an adapter over `T`,
    /// anything else the instance itself
    pub fn to_injectee(&self, declared: &Type, qualifier: Option<Annotation>) -> Injectee {
        let runtime = &self.config.runtime;
        if let Type::Parameterized(raw, arguments) = declared {
            if let [argument] = arguments.as_slice() {
                if raw == &runtime.provider {
                    return Injectee::new(
                        Dependency::qualified(argument.clone(), qualifier),
                        Converter::Identity,
                    );
                }
                if raw == &runtime.lazy {
                    return Injectee::new(
                        Dependency::qualified(argument.clone(), qualifier),
                        Converter::Adapter {
                            adapter_type: runtime.lazy_adapter.clone(),
                        },
                    );
                }
            }
        }
        Injectee::instance(Dependency::qualified(declared.clone(), qualifier))
    }

    /// Annotation meta-annotated with the qualifier marker, if any.
    ///
    /// More than one is reported and the first one wins.
    pub fn find_qualifier<D: Declaration + ?Sized>(
        &self,
        declaration: &D,
        context: &str,
    ) -> Option<Annotation> {
        let qualifiers: Vec<&Annotation> = declaration
            .annotations()
            .iter()
            .filter(|annotation| self.is_qualifier(&annotation.annotation_type))
            .collect();

        if qualifiers.len() > 1 {
            let names: Vec<String> = qualifiers
                .iter()
                .map(|q| format!("@{}", q.annotation_type))
                .collect();
            self.reporter.report_error(format!(
                "{} has multiple qualifiers: {}",
                context,
                names.join(", ")
            ));
        }

        qualifiers.first().map(|q| (*q).clone())
    }

    /// Registered scope annotation, if any.
    ///
    /// More than one is reported and the declaration is treated as unscoped.
    pub fn find_scope<D: Declaration + ?Sized>(&self, declaration: &D, context: &str) -> Scope {
        let scopes: Vec<(&ClassName, &ClassName)> = declaration
            .annotations()
            .iter()
            .filter_map(|annotation| {
                self.scopes
                    .wrapper(&annotation.annotation_type)
                    .map(|wrapper| (&annotation.annotation_type, wrapper))
            })
            .collect();

        match scopes.as_slice() {
            [] => Scope::None,
            [(_, wrapper)] => Scope::Class((*wrapper).clone()),
            _ => {
                let names: Vec<String> = scopes.iter().map(|(s, _)| format!("@{}", s)).collect();
                self.reporter.report_error(format!(
                    "{} has multiple scopes: {}",
                    context,
                    names.join(", ")
                ));
                Scope::None
            }
        }
    }

    /// Dependency a provider member or providable class produces
    pub fn dependency_of<D: Declaration + ?Sized>(
        &self,
        declaration: &D,
        produced: Type,
        context: &str,
    ) -> Dependency {
        Dependency::qualified(produced, self.find_qualifier(declaration, context))
    }

    fn is_qualifier(&self, annotation_type: &ClassName) -> bool {
        self.metadata
            .find_class(annotation_type)
            .is_some_and(|class| class.has_annotation(&self.config.markers.qualifier))
    }
}
