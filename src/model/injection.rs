use crate::metadata::{FieldDecl, MethodDecl};
use crate::model::Injectee;
use scabbard_core::types::ClassName;
use std::fmt;

/// A member that receives injected values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectionPoint {
    Method {
        container: ClassName,
        method: MethodDecl,
        injectees: Vec<Injectee>,
    },
    Field {
        container: ClassName,
        field: FieldDecl,
        injectee: Injectee,
    },
}

impl InjectionPoint {
    pub fn container(&self) -> &ClassName {
        match self {
            InjectionPoint::Method { container, .. } | InjectionPoint::Field { container, .. } => {
                container
            }
        }
    }

    pub fn injectees(&self) -> Vec<&Injectee> {
        match self {
            InjectionPoint::Method { injectees, .. } => injectees.iter().collect(),
            InjectionPoint::Field { injectee, .. } => vec![injectee],
        }
    }

    pub fn is_constructor(&self) -> bool {
        matches!(self, InjectionPoint::Method { method, .. } if method.is_constructor())
    }
}

impl fmt::Display for InjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectionPoint::Method {
                container, method, ..
            } => write!(f, "{}.{}", container, method.signature()),
            InjectionPoint::Field {
                container, field, ..
            } => write!(f, "{}.{}", container, field.name),
        }
    }
}

/// A type together with its injection points.
///
/// Constructor injection points make the type providable, field and method
/// injection points make it injectable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionTarget {
    pub target_type: ClassName,
    pub injection_points: Vec<InjectionPoint>,
}

impl InjectionTarget {
    pub fn new(target_type: ClassName, injection_points: Vec<InjectionPoint>) -> Self {
        Self {
            target_type,
            injection_points,
        }
    }

    /// The single constructor injection point of a providable target
    pub fn constructor(&self) -> Option<&InjectionPoint> {
        self.injection_points.iter().find(|p| p.is_constructor())
    }
}
