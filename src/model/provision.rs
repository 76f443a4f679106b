use crate::metadata::{FieldDecl, MethodDecl};
use crate::model::{Dependency, Injectee, InjectionPoint};
use scabbard_core::types::ClassName;
use std::fmt;

/// Caching policy wrapped around a generated provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    None,
    /// Provider wrapper class applied to the generated provider
    Class(ClassName),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::None => f.write_str("unscoped"),
            Scope::Class(wrapper) => write!(f, "scoped by {}", wrapper),
        }
    }
}

/// How a dependency is produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionPoint {
    /// `new Target(...)` through the target's injectable constructor
    Constructor {
        dependency: Dependency,
        injection_point: InjectionPoint,
    },
    /// A provider method of a module
    Method {
        dependency: Dependency,
        injection_point: InjectionPoint,
        /// Accessor emitted into the module when the method is private
        bridge: Option<MethodDecl>,
    },
    /// A provider field of a module
    Field {
        container: ClassName,
        dependency: Dependency,
        field: FieldDecl,
        /// Accessor emitted into the module when the field is private
        bridge: Option<MethodDecl>,
    },
}

impl ProvisionPoint {
    pub fn dependency(&self) -> &Dependency {
        match self {
            ProvisionPoint::Constructor { dependency, .. }
            | ProvisionPoint::Method { dependency, .. }
            | ProvisionPoint::Field { dependency, .. } => dependency,
        }
    }

    pub fn container(&self) -> &ClassName {
        match self {
            ProvisionPoint::Constructor {
                injection_point, ..
            }
            | ProvisionPoint::Method {
                injection_point, ..
            } => injection_point.container(),
            ProvisionPoint::Field { container, .. } => container,
        }
    }

    /// Dependencies required to produce the value
    pub fn injectees(&self) -> Vec<&Injectee> {
        match self {
            ProvisionPoint::Constructor {
                injection_point, ..
            }
            | ProvisionPoint::Method {
                injection_point, ..
            } => injection_point.injectees(),
            ProvisionPoint::Field { .. } => Vec::new(),
        }
    }

    pub fn bridge(&self) -> Option<&MethodDecl> {
        match self {
            ProvisionPoint::Constructor { .. } => None,
            ProvisionPoint::Method { bridge, .. } | ProvisionPoint::Field { bridge, .. } => {
                bridge.as_ref()
            }
        }
    }
}

impl fmt::Display for ProvisionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionPoint::Constructor {
                injection_point, ..
            }
            | ProvisionPoint::Method {
                injection_point, ..
            } => write!(f, "{}", injection_point),
            ProvisionPoint::Field {
                container, field, ..
            } => write!(f, "{}.{}", container, field.name),
        }
    }
}

/// Descriptor of one generated provider class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provider {
    pub provider_type: ClassName,
    pub provision_point: ProvisionPoint,
    /// Module or component the provider belongs to
    pub module_type: ClassName,
    pub scope: Scope,
}

impl Provider {
    pub fn dependency(&self) -> &Dependency {
        self.provision_point.dependency()
    }
}
