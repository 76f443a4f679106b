use crate::metadata::Annotation;
use scabbard_core::types::{ClassName, Type};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// What must be supplied: a type plus an optional qualifier.
///
/// Equality, hashing and ordering work on the boxed type, so `int` and
/// `java.lang.Integer` identify the same dependency.
#[derive(Debug, Clone)]
pub struct Dependency {
    pub dependency_type: Type,
    pub qualifier: Option<Annotation>,
}

impl Dependency {
    pub fn new(dependency_type: Type) -> Self {
        Self {
            dependency_type,
            qualifier: None,
        }
    }

    pub fn qualified(dependency_type: Type, qualifier: Option<Annotation>) -> Self {
        Self {
            dependency_type,
            qualifier,
        }
    }

    pub fn of_class(class: ClassName) -> Self {
        Self::new(Type::Class(class))
    }

    /// Same dependency with the primitive type replaced by its boxed class
    pub fn boxed(&self) -> Dependency {
        Dependency {
            dependency_type: self.dependency_type.boxed(),
            qualifier: self.qualifier.clone(),
        }
    }

    pub fn raw_class(&self) -> Option<&ClassName> {
        self.dependency_type.raw_class()
    }
}

impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.qualifier == other.qualifier
            && self.dependency_type.boxed() == other.dependency_type.boxed()
    }
}

impl Eq for Dependency {}

impl Hash for Dependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.dependency_type.boxed().hash(state);
        self.qualifier.hash(state);
    }
}

impl PartialOrd for Dependency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Dependency {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dependency_type
            .boxed()
            .cmp(&other.dependency_type.boxed())
            .then_with(|| self.qualifier.cmp(&other.qualifier))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref qualifier) = self.qualifier {
            write!(f, "@{}", qualifier.annotation_type)?;
            if !qualifier.values.is_empty() {
                let values: Vec<String> = qualifier
                    .values
                    .iter()
                    .map(|(name, value)| format!("{}={:?}", name, value))
                    .collect();
                write!(f, "({})", values.join(", "))?;
            }
            f.write_str(" ")?;
        }
        write!(f, "{}", self.dependency_type)
    }
}

/// How a resolved value is adapted at the use site
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Converter {
    /// The caller wants the provider itself
    Identity,
    /// The caller wants the instance
    Instance,
    /// The caller wants a lazily-evaluated wrapper around the provider
    Adapter { adapter_type: ClassName },
}

impl Converter {
    /// True when the value is obtained eagerly while providing the dependent
    pub fn is_eager(&self) -> bool {
        matches!(self, Converter::Instance)
    }
}

/// A dependency plus the converter applied to it at the injection site
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Injectee {
    pub dependency: Dependency,
    pub converter: Converter,
}

impl Injectee {
    pub fn new(dependency: Dependency, converter: Converter) -> Self {
        Self {
            dependency,
            converter,
        }
    }

    pub fn instance(dependency: Dependency) -> Self {
        Self::new(dependency, Converter::Instance)
    }
}

impl fmt::Display for Injectee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.converter {
            Converter::Identity => write!(f, "Provider<{}>", self.dependency),
            Converter::Instance => write!(f, "{}", self.dependency),
            Converter::Adapter { ref adapter_type } => {
                write!(f, "{}<{}>", adapter_type.simple_name(), self.dependency)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::AnnotationValue;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    fn dependency(type_name: &str) -> Dependency {
        Dependency::new(Type::parse(type_name).unwrap())
    }

    fn hash_of(value: &Dependency) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn named(value: &str) -> Annotation {
        Annotation::new(ClassName::parse("javax.inject.Named").unwrap())
            .with_value("value", AnnotationValue::String(value.to_string()))
    }

    #[test]
    fn test_primitive_and_boxed_are_equal() {
        let primitive = dependency("int");
        let boxed = dependency("java.lang.Integer");
        assert_eq!(primitive, boxed);
        assert_eq!(hash_of(&primitive), hash_of(&boxed));
        assert_eq!(primitive.cmp(&boxed), Ordering::Equal);

        let mut set = HashSet::new();
        set.insert(primitive);
        assert!(set.contains(&boxed));
    }

    #[test]
    fn test_all_primitives_box_consistently() {
        for primitive in scabbard_core::types::Primitive::ALL {
            let raw = Dependency::new(Type::Primitive(primitive));
            let boxed = Dependency::of_class(primitive.boxed_class());
            assert_eq!(raw, boxed);
            assert_eq!(hash_of(&raw), hash_of(&boxed));
        }
    }

    #[test]
    fn test_qualifier_distinguishes() {
        let plain = dependency("a.Foo");
        let first = Dependency::qualified(Type::parse("a.Foo").unwrap(), Some(named("first")));
        let second = Dependency::qualified(Type::parse("a.Foo").unwrap(), Some(named("second")));
        assert_ne!(plain, first);
        assert_ne!(first, second);
        assert_eq!(first, first.clone());
    }

    #[test]
    fn test_display() {
        let qualified = Dependency::qualified(Type::parse("a.Foo").unwrap(), Some(named("x")));
        assert_eq!(
            qualified.to_string(),
            "@javax.inject.Named(value=String(\"x\")) a.Foo"
        );
        assert_eq!(dependency("int").to_string(), "int");
    }

    #[test]
    fn test_injectee_display_and_eagerness() {
        let lazy = Injectee::new(
            dependency("a.Foo"),
            Converter::Adapter {
                adapter_type: ClassName::parse("io.scabbard.internal.LazyAdapter").unwrap(),
            },
        );
        assert_eq!(lazy.to_string(), "LazyAdapter<a.Foo>");
        assert!(!lazy.converter.is_eager());
        assert!(Injectee::instance(dependency("a.Foo")).converter.is_eager());
        assert!(!Converter::Identity.is_eager());
    }
}
