//! The key registry class

use crate::config::Config;
use crate::generation::context::{Key, KeyRegistry};
use crate::generation::shape::{ClassShape, FieldShape, MethodShape, Operation};
use crate::metadata::Modifier;
use scabbard_core::types::{ClassName, Type};

fn annotation_type() -> Type {
    Type::Class(ClassName::from_static("java.lang.annotation.Annotation"))
}

fn string_type() -> Type {
    Type::Class(ClassName::from_static("java.lang.String"))
}

pub struct KeyRegistryGenerator<'a> {
    config: &'a Config,
}

impl<'a> KeyRegistryGenerator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Holder class with one static field per key, filled by the static initializer
    pub fn generate(&self, registry: &KeyRegistry) -> ClassShape {
        let runtime = &self.config.runtime;
        let name = registry.registry_type();

        let mut shape = ClassShape::new(name.clone(), runtime.object.clone());
        let mut constructor = MethodShape::constructor(Vec::new()).with_modifiers(vec![Modifier::Private]);
        constructor
            .push(Operation::LoadThis)
            .push(Operation::InvokeConstructor {
                owner: runtime.object.clone(),
                parameters: Vec::new(),
            })
            .push(Operation::Return);
        shape.constructor = Some(constructor);

        let mut initializer = MethodShape::static_initializer();
        for key in registry.keys() {
            let field_type = Type::Class(key.field_type(runtime).clone());
            shape.fields.push(FieldShape::new(
                key.field_name(),
                field_type.clone(),
                vec![Modifier::Public, Modifier::Static, Modifier::Final],
            ));

            match key {
                Key::Type { dependency, .. } => {
                    self.push_type_token(&mut initializer, &dependency.dependency_type);
                }
                Key::QualifiedType { dependency, .. } => {
                    let object = Type::Class(runtime.object.clone());
                    initializer
                        .push(Operation::New {
                            class: runtime.key.clone(),
                        })
                        .push(Operation::Dup);
                    if dependency.dependency_type.is_class_shaped() {
                        initializer.push(Operation::PushType {
                            value: dependency.dependency_type.boxed(),
                        });
                    } else {
                        self.push_type_token(&mut initializer, &dependency.dependency_type);
                    }
                    match &dependency.qualifier {
                        Some(annotation) => initializer.push(Operation::PushAnnotation {
                            annotation: annotation.clone(),
                        }),
                        None => initializer.push(Operation::PushNull),
                    };
                    initializer.push(Operation::InvokeConstructor {
                        owner: runtime.key.clone(),
                        parameters: vec![object, annotation_type()],
                    });
                }
            }
            initializer.push(Operation::PutStatic {
                owner: name.clone(),
                name: key.field_name().to_string(),
                field_type,
            });
        }
        initializer.push(Operation::Return);
        shape.static_initializer = Some(initializer);

        shape
    }

    /// `new TypeToken("<source form>")`
    fn push_type_token(&self, method: &mut MethodShape, value: &Type) {
        let token = &self.config.runtime.type_token;
        method
            .push(Operation::New {
                class: token.clone(),
            })
            .push(Operation::Dup)
            .push(Operation::PushString {
                value: value.to_string(),
            })
            .push(Operation::InvokeConstructor {
                owner: token.clone(),
                parameters: vec![string_type()],
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Annotation, AnnotationValue};
    use crate::model::Dependency;

    #[test]
    fn test_registry_fields_and_initializer() {
        let config = Config::default();
        let named = Annotation::new(ClassName::parse("javax.inject.Named").unwrap())
            .with_value("value", AnnotationValue::String("primary".to_string()));
        let registry = KeyRegistry::build(
            config.key_registry_type(),
            vec![
                Dependency::new(Type::parse("java.util.List<a.Foo>").unwrap()),
                Dependency::qualified(Type::parse("a.Foo").unwrap(), Some(named.clone())),
                Dependency::new(Type::parse("a.Plain").unwrap()),
            ],
        );

        let shape = KeyRegistryGenerator::new(&config).generate(&registry);

        assert_eq!(shape.name.as_str(), "io.scabbard.generated.KeyRegistry");
        assert_eq!(shape.fields.len(), 2);
        let qualified = shape.find_field("key$0").unwrap();
        assert_eq!(qualified.field_type, Type::Class(config.runtime.key.clone()));
        let generic = shape.find_field("key$1").unwrap();
        assert_eq!(generic.field_type, Type::Class(config.runtime.type_token.clone()));

        let initializer = shape.static_initializer.as_ref().unwrap();
        assert!(initializer
            .body
            .contains(&Operation::PushAnnotation { annotation: named }));
        assert!(initializer.body.contains(&Operation::PushString {
            value: "java.util.List<a.Foo>".to_string()
        }));
        assert_eq!(initializer.body.last(), Some(&Operation::Return));
    }

    #[test]
    fn test_empty_registry_still_generated() {
        let config = Config::default();
        let registry = KeyRegistry::build(config.key_registry_type(), Vec::new());
        let shape = KeyRegistryGenerator::new(&config).generate(&registry);
        assert!(shape.fields.is_empty());
        assert_eq!(
            shape.static_initializer.unwrap().body,
            vec![Operation::Return]
        );
    }
}
