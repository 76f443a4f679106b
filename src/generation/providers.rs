//! Provider classes

use crate::config::Config;
use crate::core::{ScabbardError, ScabbardResult};
use crate::generation::context::GenerationContext;
use crate::generation::lookup::{box_value, load_injectee, object_type};
use crate::generation::shape::{ClassShape, FieldShape, MethodShape, Operation};
use crate::metadata::Modifier;
use crate::model::{InjectionPoint, Provider, ProvisionPoint};
use scabbard_core::types::{ClassName, Type};

pub const INJECTOR_FIELD: &str = "injector";
pub const MODULE_FIELD: &str = "module";
pub const GET_METHOD: &str = "get";

/// Parameter types of a method injection point; empty for fields
pub fn parameter_types(point: &InjectionPoint) -> Vec<Type> {
    match point {
        InjectionPoint::Method { method, .. } => method.parameter_types(),
        InjectionPoint::Field { .. } => Vec::new(),
    }
}

pub struct ProviderGenerator<'a> {
    config: &'a Config,
    context: &'a GenerationContext,
}

impl<'a> ProviderGenerator<'a> {
    pub fn new(config: &'a Config, context: &'a GenerationContext) -> Self {
        Self { config, context }
    }

    /// Provider class: the injector (and the module instance for module
    /// members) come in through the constructor, `get()` produces the value
    pub fn generate(&self, provider: &Provider) -> ScabbardResult<ClassShape> {
        let runtime = &self.config.runtime;
        let name = &provider.provider_type;
        let injector_type = Type::Class(runtime.injector.clone());
        let module_type = Type::Class(provider.module_type.clone());
        let needs_module = !matches!(provider.provision_point, ProvisionPoint::Constructor { .. });

        let get = self.get_method(provider, &injector_type, &module_type)?;

        let mut shape = ClassShape::new(name.clone(), runtime.object.clone());
        shape.interfaces.push(runtime.provider.clone());
        shape.fields.push(FieldShape::new(
            INJECTOR_FIELD,
            injector_type.clone(),
            vec![Modifier::Private, Modifier::Final],
        ));
        if needs_module {
            shape.fields.push(FieldShape::new(
                MODULE_FIELD,
                module_type.clone(),
                vec![Modifier::Private, Modifier::Final],
            ));
        }

        let mut constructor =
            MethodShape::constructor(provider_constructor_parameters(self.config, provider));
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
                field_type: injector_type,
            });
        if needs_module {
            constructor
                .push(Operation::LoadThis)
                .push(Operation::LoadArgument { index: 2 })
                .push(Operation::PutField {
                    owner: name.clone(),
                    name: MODULE_FIELD.to_string(),
                    field_type: module_type,
                });
        }
        constructor.push(Operation::Return);
        shape.constructor = Some(constructor);
        shape.methods.push(get);

        Ok(shape)
    }

    fn get_method(
        &self,
        provider: &Provider,
        injector_type: &Type,
        module_type: &Type,
    ) -> ScabbardResult<MethodShape> {
        let runtime = &self.config.runtime;
        let name = &provider.provider_type;
        let load_injector = [
            Operation::LoadThis,
            Operation::GetField {
                owner: name.clone(),
                name: INJECTOR_FIELD.to_string(),
                field_type: injector_type.clone(),
            },
        ];
        let load_module = [
            Operation::LoadThis,
            Operation::GetField {
                owner: name.clone(),
                name: MODULE_FIELD.to_string(),
                field_type: module_type.clone(),
            },
        ];

        let mut get = MethodShape::new(GET_METHOD, Vec::new(), object_type(runtime));
        match &provider.provision_point {
            ProvisionPoint::Constructor {
                injection_point, ..
            } => {
                let target = injection_point.container().clone();
                get.push(Operation::New {
                    class: target.clone(),
                })
                .push(Operation::Dup);
                for injectee in injection_point.injectees() {
                    load_injectee(&mut get, self.context, runtime, &load_injector, injectee);
                }
                get.push(Operation::InvokeConstructor {
                    owner: target,
                    parameters: parameter_types(injection_point),
                });
            }
            ProvisionPoint::Method {
                injection_point:
                    InjectionPoint::Method {
                        container,
                        method,
                        injectees,
                    },
                bridge,
                ..
            } => {
                get.body.extend_from_slice(&load_module);
                for injectee in injectees {
                    load_injectee(&mut get, self.context, runtime, &load_injector, injectee);
                }
                let target_name = bridge.as_ref().unwrap_or(method).name.clone();
                get.push(Operation::InvokeVirtual {
                    owner: container.clone(),
                    name: target_name,
                    parameters: method.parameter_types(),
                    return_type: method.return_type.clone(),
                });
                box_value(&mut get, &method.return_type);
            }
            ProvisionPoint::Method {
                injection_point, ..
            } => {
                return Err(ScabbardError::Generation(format!(
                    "Provider {} is backed by {}, which is not a method",
                    name, injection_point
                )));
            }
            ProvisionPoint::Field {
                container,
                field,
                bridge,
                ..
            } => {
                get.body.extend_from_slice(&load_module);
                match bridge {
                    Some(bridge) => get.push(Operation::InvokeVirtual {
                        owner: container.clone(),
                        name: bridge.name.clone(),
                        parameters: Vec::new(),
                        return_type: field.field_type.clone(),
                    }),
                    None => get.push(Operation::GetField {
                        owner: container.clone(),
                        name: field.name.clone(),
                        field_type: field.field_type.clone(),
                    }),
                };
                box_value(&mut get, &field.field_type);
            }
        }
        get.push(Operation::ReturnValue);
        Ok(get)
    }
}

/// Constructor parameter types of a generated provider
pub fn provider_constructor_parameters(config: &Config, provider: &Provider) -> Vec<Type> {
    let mut parameters = vec![Type::Class(config.runtime.injector.clone())];
    if !matches!(provider.provision_point, ProvisionPoint::Constructor { .. }) {
        parameters.push(Type::Class(provider.module_type.clone()));
    }
    parameters
}
