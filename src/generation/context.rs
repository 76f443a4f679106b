//! Generation-only data derived from the validated graph

use crate::config::{Config, RuntimeNames};
use crate::di::traits::MetadataSource;
use crate::metadata::Declaration;
use crate::model::{Dependency, InjectionContext};
use scabbard_core::types::ClassName;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Simple name of the per-package accessor class
pub const PACKAGE_INVADER_NAME: &str = "Scabbard$$PackageInvader";

/// Reified token generated code uses to look a dependency up.
///
/// Plain class-shaped dependencies need no key: the class literal is enough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// Generic-shaped type without qualifier; needs a reified type token
    Type {
        dependency: Dependency,
        field_name: String,
    },
    /// Any qualified dependency; needs the type plus the qualifier instance
    QualifiedType {
        dependency: Dependency,
        field_name: String,
    },
}

impl Key {
    pub fn dependency(&self) -> &Dependency {
        match self {
            Key::Type { dependency, .. } | Key::QualifiedType { dependency, .. } => dependency,
        }
    }

    pub fn field_name(&self) -> &str {
        match self {
            Key::Type { field_name, .. } | Key::QualifiedType { field_name, .. } => field_name,
        }
    }

    /// Runtime class of the key registry field holding this key
    pub fn field_type<'r>(&self, runtime: &'r RuntimeNames) -> &'r ClassName {
        match self {
            Key::Type { .. } => &runtime.type_token,
            Key::QualifiedType { .. } => &runtime.key,
        }
    }
}

/// One key per distinct dependency that needs a token
#[derive(Debug, Clone)]
pub struct KeyRegistry {
    registry_type: ClassName,
    keys: BTreeMap<Dependency, Key>,
}

impl KeyRegistry {
    /// Classify every dependency and name the keyed ones `key$N` in
    /// dependency order
    pub fn build(
        registry_type: ClassName,
        dependencies: impl IntoIterator<Item = Dependency>,
    ) -> Self {
        let distinct: BTreeSet<Dependency> =
            dependencies.into_iter().map(|d| d.boxed()).collect();

        let mut keys = BTreeMap::new();
        for dependency in distinct {
            let field_name = format!("key${}", keys.len());
            let key = if dependency.qualifier.is_some() {
                Key::QualifiedType {
                    dependency: dependency.clone(),
                    field_name,
                }
            } else if !dependency.dependency_type.is_class_shaped() {
                Key::Type {
                    dependency: dependency.clone(),
                    field_name,
                }
            } else {
                continue;
            };
            keys.insert(dependency, key);
        }

        Self {
            registry_type,
            keys,
        }
    }

    pub fn registry_type(&self) -> &ClassName {
        &self.registry_type
    }

    /// Key of a dependency, looked up by its boxed form
    pub fn find_key(&self, dependency: &Dependency) -> Option<&Key> {
        self.keys.get(&dependency.boxed())
    }

    /// Keys in field order
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.keys.values()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Accessor class exposing the non-public classes of one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInvader {
    pub invader_type: ClassName,
    /// Class to its `class$N` field, in class name order
    fields: BTreeMap<ClassName, String>,
}

impl PackageInvader {
    fn new(package: &str, classes: BTreeSet<ClassName>) -> Self {
        let fields = classes
            .into_iter()
            .enumerate()
            .map(|(index, class)| (class, format!("class${}", index)))
            .collect();
        Self {
            invader_type: ClassName::in_package(package, PACKAGE_INVADER_NAME),
            fields,
        }
    }

    pub fn package_name(&self) -> &str {
        self.invader_type.package_name()
    }

    pub fn field_for(&self, class: &ClassName) -> Option<&str> {
        self.fields.get(class).map(String::as_str)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&ClassName, &str)> {
        self.fields
            .iter()
            .map(|(class, field)| (class, field.as_str()))
    }
}

/// Keys and package invaders shared by every per-artifact generator
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub key_registry: KeyRegistry,
    /// Invaders by package name
    pub package_invaders: BTreeMap<String, PackageInvader>,
}

impl GenerationContext {
    /// Invader field exposing `class`, when the class is not public
    pub fn invader_field(&self, class: &ClassName) -> Option<(&ClassName, &str)> {
        let invader = self.package_invaders.get(class.package_name())?;
        invader
            .field_for(class)
            .map(|field| (&invader.invader_type, field))
    }
}

pub struct GenerationContextFactory<'a> {
    metadata: &'a dyn MetadataSource,
    config: &'a Config,
}

impl<'a> GenerationContextFactory<'a> {
    pub fn new(metadata: &'a dyn MetadataSource, config: &'a Config) -> Self {
        Self { metadata, config }
    }

    pub fn create(&self, context: &InjectionContext) -> GenerationContext {
        let dependencies = collect_dependencies(context);

        let mut hidden: BTreeMap<String, BTreeSet<ClassName>> = BTreeMap::new();
        for dependency in &dependencies {
            for class in dependency.dependency_type.referenced_classes() {
                let is_hidden = self
                    .metadata
                    .find_class(class)
                    .is_some_and(|decl| !decl.is_public());
                if is_hidden {
                    hidden
                        .entry(class.package_name().to_string())
                        .or_default()
                        .insert(class.clone());
                }
            }
        }
        let package_invaders: BTreeMap<String, PackageInvader> = hidden
            .into_iter()
            .map(|(package, classes)| {
                let invader = PackageInvader::new(&package, classes);
                (package, invader)
            })
            .collect();

        let key_registry = KeyRegistry::build(self.config.key_registry_type(), dependencies);
        debug!(
            "Generation context: {} key(s), {} package invader(s)",
            key_registry.len(),
            package_invaders.len()
        );

        GenerationContext {
            key_registry,
            package_invaders,
        }
    }
}

/// Every dependency the generated code looks up or registers
fn collect_dependencies(context: &InjectionContext) -> BTreeSet<Dependency> {
    let mut dependencies = BTreeSet::new();

    for module in context.modules() {
        for provider in &module.providers {
            dependencies.insert(provider.dependency().boxed());
            for injectee in provider.provision_point.injectees() {
                dependencies.insert(injectee.dependency.boxed());
            }
        }
        for binding in &module.bindings {
            dependencies.insert(binding.dependency.boxed());
            dependencies.insert(binding.ancestor.boxed());
        }
    }
    for factory in &context.factories {
        dependencies.insert(factory.dependency());
        for point in &factory.provision_points {
            for injectee in point.injector_injectees() {
                dependencies.insert(injectee.dependency.boxed());
            }
        }
    }
    for target in &context.injectable_targets {
        for point in &target.injection_points {
            for injectee in point.injectees() {
                dependencies.insert(injectee.dependency.boxed());
            }
        }
    }

    dependencies
}
