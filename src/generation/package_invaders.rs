//! Package invader classes

use crate::config::Config;
use crate::generation::context::PackageInvader;
use crate::generation::lookup::class_type;
use crate::generation::shape::{ClassShape, FieldShape, MethodShape, Operation};
use crate::metadata::Modifier;
use scabbard_core::types::Type;

pub struct PackageInvaderGenerator<'a> {
    config: &'a Config,
}

impl<'a> PackageInvaderGenerator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Public class in the hidden classes' package exposing each as a `Class` constant
    pub fn generate(&self, invader: &PackageInvader) -> ClassShape {
        let name = &invader.invader_type;
        let mut shape = ClassShape::new(name.clone(), self.config.runtime.object.clone());

        let mut initializer = MethodShape::static_initializer();
        for (class, field) in invader.fields() {
            shape.fields.push(FieldShape::new(
                field,
                class_type(),
                vec![Modifier::Public, Modifier::Static, Modifier::Final],
            ));
            initializer
                .push(Operation::PushType {
                    value: Type::Class(class.clone()),
                })
                .push(Operation::PutStatic {
                    owner: name.clone(),
                    name: field.to_string(),
                    field_type: class_type(),
                });
        }
        initializer.push(Operation::Return);
        shape.static_initializer = Some(initializer);

        shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analyzer;
    use crate::di::mocks::{MockErrorReporter, MockMetadataSource};
    use crate::generation::context::GenerationContextFactory;

    #[test]
    fn test_invader_exposes_hidden_classes() {
        let metadata = MockMetadataSource::from_yaml(
            r#"
classes:
  - name: a.App
    annotations: [{type: io.scabbard.Component}]
    methods:
      - name: hidden
        return_type: b.Hidden
        annotations: [{type: io.scabbard.Provide}]
  - name: b.Hidden
    modifiers: []
"#,
        )
        .unwrap();
        let config = Config::default();
        let reporter = MockErrorReporter::new();
        let injection = Analyzer::new(&metadata, &config, &reporter)
            .analyze()
            .unwrap();
        let context = GenerationContextFactory::new(&metadata, &config).create(&injection);

        let shape = PackageInvaderGenerator::new(&config).generate(&context.package_invaders["b"]);

        assert_eq!(shape.name.as_str(), "b.Scabbard$$PackageInvader");
        assert_eq!(shape.fields[0].name, "class$0");
        let initializer = shape.static_initializer.as_ref().unwrap();
        assert_eq!(
            initializer.body[0],
            Operation::PushType {
                value: Type::parse("b.Hidden").unwrap()
            }
        );
    }
}
