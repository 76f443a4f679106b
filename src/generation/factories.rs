//! Factory implementation classes

use crate::config::Config;
use crate::generation::context::GenerationContext;
use crate::generation::lookup::load_injectee;
use crate::generation::providers::{parameter_types, INJECTOR_FIELD};
use crate::generation::shape::{ClassShape, FieldShape, MethodShape, Operation};
use crate::metadata::Modifier;
use crate::model::{Factory, FactoryInjectee};
use scabbard_core::types::Type;

pub struct FactoryGenerator<'a> {
    config: &'a Config,
    context: &'a GenerationContext,
}

impl<'a> FactoryGenerator<'a> {
    pub fn new(config: &'a Config, context: &'a GenerationContext) -> Self {
        Self { config, context }
    }

    /// Implements every factory method by calling the produced type's
    /// constructor; caller-supplied arguments are forwarded by position
    pub fn generate(&self, factory: &Factory) -> ClassShape {
        let runtime = &self.config.runtime;
        let name = &factory.implementation_type;
        let injector_type = Type::Class(runtime.injector.clone());

        let mut shape = ClassShape::new(name.clone(), runtime.object.clone());
        shape.interfaces.push(factory.factory_type.clone());
        shape.fields.push(FieldShape::new(
            INJECTOR_FIELD,
            injector_type.clone(),
            vec![Modifier::Private, Modifier::Final],
        ));

        let mut constructor = MethodShape::constructor(vec![injector_type.clone()]);
        constructor
            .push(Operation::LoadThis)
            .push(Operation::InvokeConstructor {
                owner: runtime.object.clone(),
                parameters: Vec::new(),
            })
            .push(Operation::LoadThis)
            .push(Operation::LoadArgument { index: 1 })
            .push(Operation::PutField {
                owner: name.clone(),
                name: INJECTOR_FIELD.to_string(),
                field_type: injector_type.clone(),
            })
            .push(Operation::Return);
        shape.constructor = Some(constructor);

        let load_injector = [
            Operation::LoadThis,
            Operation::GetField {
                owner: name.clone(),
                name: INJECTOR_FIELD.to_string(),
                field_type: injector_type,
            },
        ];

        for point in &factory.provision_points {
            let Some(produced) = point.produced_type.raw_class() else {
                continue;
            };
            let mut method = MethodShape::new(
                point.method.name.clone(),
                point.method.parameter_types(),
                point.method.return_type.clone(),
            );
            method
                .push(Operation::New {
                    class: produced.clone(),
                })
                .push(Operation::Dup);
            for injectee in &point.injectees {
                match injectee {
                    FactoryInjectee::FromMethod { argument_index, .. } => {
                        method.push(Operation::LoadArgument {
                            index: argument_index + 1,
                        });
                    }
                    FactoryInjectee::FromInjector(injectee) => {
                        load_injectee(&mut method, self.context, runtime, &load_injector, injectee);
                    }
                }
            }
            method
                .push(Operation::InvokeConstructor {
                    owner: produced.clone(),
                    parameters: parameter_types(&point.injection_point),
                })
                .push(Operation::ReturnValue);
            shape.methods.push(method);
        }

        shape
    }
}
