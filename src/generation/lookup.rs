//! Operation sequences shared by the generators for injector lookups

use crate::config::RuntimeNames;
use crate::generation::context::GenerationContext;
use crate::generation::shape::{MethodShape, Operation};
use crate::model::{Converter, Dependency, Injectee};
use scabbard_core::types::{ClassName, Type};

pub const GET_INSTANCE: &str = "getInstance";
pub const GET_PROVIDER: &str = "getProvider";
pub const REGISTER_PROVIDER: &str = "registerProvider";
pub const REGISTER_INSTANCE: &str = "registerInstance";

pub fn object_type(runtime: &RuntimeNames) -> Type {
    Type::Class(runtime.object.clone())
}

pub fn class_type() -> Type {
    Type::Class(ClassName::from_static("java.lang.Class"))
}

/// Push the lookup token of `dependency`: a key registry field, a package
/// invader field, or the class literal
pub fn push_key(
    method: &mut MethodShape,
    context: &GenerationContext,
    runtime: &RuntimeNames,
    dependency: &Dependency,
) {
    let registry = &context.key_registry;
    if let Some(key) = registry.find_key(dependency) {
        method.push(Operation::GetStatic {
            owner: registry.registry_type().clone(),
            name: key.field_name().to_string(),
            field_type: Type::Class(key.field_type(runtime).clone()),
        });
        return;
    }

    let boxed = dependency.dependency_type.boxed();
    let invader = boxed
        .raw_class()
        .and_then(|class| context.invader_field(class));
    match invader {
        Some((owner, field)) => method.push(Operation::GetStatic {
            owner: owner.clone(),
            name: field.to_string(),
            field_type: class_type(),
        }),
        None => method.push(Operation::PushType { value: boxed }),
    };
}

/// Invoke an `Injector` method taking the lookup token
fn invoke_injector(method: &mut MethodShape, runtime: &RuntimeNames, name: &str, returns: Type) {
    method.push(Operation::InvokeInterface {
        owner: runtime.injector.clone(),
        name: name.to_string(),
        parameters: vec![object_type(runtime)],
        return_type: returns,
    });
}

/// Cast an `Object` on the stack to `target`, unboxing primitives
pub fn cast_to(method: &mut MethodShape, target: &Type) {
    match target {
        Type::Primitive(primitive) => {
            method
                .push(Operation::CheckCast {
                    target: target.boxed(),
                })
                .push(Operation::Unbox {
                    primitive: *primitive,
                });
        }
        other => {
            method.push(Operation::CheckCast {
                target: other.clone(),
            });
        }
    }
}

/// Box a primitive value on the stack so it can be returned as `Object`
pub fn box_value(method: &mut MethodShape, value_type: &Type) {
    if let Type::Primitive(primitive) = value_type {
        if primitive.unbox_method().is_some() {
            let boxed = primitive.boxed_class();
            method.push(Operation::InvokeStatic {
                owner: boxed.clone(),
                name: "valueOf".to_string(),
                parameters: vec![value_type.clone()],
                return_type: Type::Class(boxed),
            });
        }
    }
}

/// Load the value an injectee asks for.
///
/// `load_injector` pushes the injector; the converter decides whether the
/// instance, its provider, or an adapter around the provider ends up on the
/// stack.
pub fn load_injectee(
    method: &mut MethodShape,
    context: &GenerationContext,
    runtime: &RuntimeNames,
    load_injector: &[Operation],
    injectee: &Injectee,
) {
    let provider_type = Type::Class(runtime.provider.clone());
    match &injectee.converter {
        Converter::Instance => {
            method.body.extend_from_slice(load_injector);
            push_key(method, context, runtime, &injectee.dependency);
            invoke_injector(method, runtime, GET_INSTANCE, object_type(runtime));
            cast_to(method, &injectee.dependency.dependency_type);
        }
        Converter::Identity => {
            method.body.extend_from_slice(load_injector);
            push_key(method, context, runtime, &injectee.dependency);
            invoke_injector(method, runtime, GET_PROVIDER, provider_type);
        }
        Converter::Adapter { adapter_type } => {
            method
                .push(Operation::New {
                    class: adapter_type.clone(),
                })
                .push(Operation::Dup);
            method.body.extend_from_slice(load_injector);
            push_key(method, context, runtime, &injectee.dependency);
            invoke_injector(method, runtime, GET_PROVIDER, provider_type.clone());
            method.push(Operation::InvokeConstructor {
                owner: adapter_type.clone(),
                parameters: vec![provider_type],
            });
        }
    }
}

/// Load the provider registered for `dependency`
pub fn load_provider(
    method: &mut MethodShape,
    context: &GenerationContext,
    runtime: &RuntimeNames,
    load_injector: &[Operation],
    dependency: &Dependency,
) {
    method.body.extend_from_slice(load_injector);
    push_key(method, context, runtime, dependency);
    invoke_injector(
        method,
        runtime,
        GET_PROVIDER,
        Type::Class(runtime.provider.clone()),
    );
}
