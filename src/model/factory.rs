use crate::metadata::{Annotation, MethodDecl};
use crate::model::{Dependency, Injectee, InjectionPoint};
use scabbard_core::types::{ClassName, Type};

/// Where a target constructor argument comes from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FactoryInjectee {
    /// Resolved from the graph
    FromInjector(Injectee),
    /// Passed by the caller as argument `argument_index` of the factory method
    FromMethod {
        injectee: Injectee,
        argument_index: usize,
    },
}

impl FactoryInjectee {
    pub fn injectee(&self) -> &Injectee {
        match self {
            FactoryInjectee::FromInjector(injectee)
            | FactoryInjectee::FromMethod { injectee, .. } => injectee,
        }
    }
}

/// One factory method paired with the constructor it invokes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactoryProvisionPoint {
    pub container_type: ClassName,
    pub method: MethodDecl,
    /// Type the method produces after return type overrides
    pub produced_type: Type,
    /// Constructor injection point of the produced type
    pub injection_point: InjectionPoint,
    /// One entry per constructor argument, in constructor order
    pub injectees: Vec<FactoryInjectee>,
}

impl FactoryProvisionPoint {
    /// Injectees resolved from the graph
    pub fn injector_injectees(&self) -> impl Iterator<Item = &Injectee> {
        self.injectees.iter().filter_map(|injectee| match injectee {
            FactoryInjectee::FromInjector(injectee) => Some(injectee),
            FactoryInjectee::FromMethod { .. } => None,
        })
    }
}

/// A factory interface and the provision points of its methods
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factory {
    pub factory_type: ClassName,
    pub implementation_type: ClassName,
    pub qualifier: Option<Annotation>,
    pub provision_points: Vec<FactoryProvisionPoint>,
}

impl Factory {
    pub fn dependency(&self) -> Dependency {
        Dependency::qualified(Type::Class(self.factory_type.clone()), self.qualifier.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_injectee_accessor() {
        let injectee = Injectee::instance(Dependency::new(Type::parse("int").unwrap()));
        let from_method = FactoryInjectee::FromMethod {
            injectee: injectee.clone(),
            argument_index: 1,
        };
        assert_eq!(from_method.injectee(), &injectee);
        assert_eq!(
            FactoryInjectee::FromInjector(injectee.clone()).injectee(),
            &injectee
        );
    }

    #[test]
    fn test_factory_dependency() {
        let factory = Factory {
            factory_type: ClassName::parse("a.FooFactory").unwrap(),
            implementation_type: ClassName::parse("a.FooFactory$$Factory").unwrap(),
            qualifier: None,
            provision_points: vec![],
        };
        assert_eq!(
            factory.dependency(),
            Dependency::of_class(ClassName::parse("a.FooFactory").unwrap())
        );
    }
}
