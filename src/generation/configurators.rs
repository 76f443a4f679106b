//! Per-component injector configurators

use crate::config::Config;
use crate::generation::context::GenerationContext;
use crate::generation::lookup::{load_provider, object_type, push_key, REGISTER_INSTANCE, REGISTER_PROVIDER};
use crate::generation::providers::provider_constructor_parameters;
use crate::generation::shape::{ClassShape, MethodShape, Operation};
use crate::model::{Component, ImportPoint, Module, Provider, ProvisionPoint, Scope};
use scabbard_core::types::{ClassName, Type};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Suffix of the configurator generated for each component
pub const CONFIGURATOR_SUFFIX: &str = "$$InjectorConfigurator";
pub const CONFIGURE_METHOD: &str = "configureInjector";

/// First local slot after `this`, the injector and the component
const FIRST_MODULE_LOCAL: usize = 3;

pub struct ConfiguratorGenerator<'a> {
    config: &'a Config,
    context: &'a GenerationContext,
}

impl<'a> ConfiguratorGenerator<'a> {
    pub fn new(config: &'a Config, context: &'a GenerationContext) -> Self {
        Self { config, context }
    }

    pub fn configurator_type(component: &Component) -> ClassName {
        component.component_type.nested(CONFIGURATOR_SUFFIX)
    }

    /// `configureInjector(injector, component)` reaches every module of the
    /// component through its import point and registers providers, binding
    /// aliases and factories with the injector
    pub fn generate(&self, component: &Component) -> ClassShape {
        let runtime = &self.config.runtime;
        let name = Self::configurator_type(component);
        let injector_type = Type::Class(runtime.injector.clone());
        let provider_type = Type::Class(runtime.provider.clone());

        let mut shape = ClassShape::new(name, runtime.object.clone());
        shape.interfaces.push(runtime.injector_configurator.clone());

        let mut constructor = MethodShape::constructor(Vec::new());
        constructor
            .push(Operation::LoadThis)
            .push(Operation::InvokeConstructor {
                owner: runtime.object.clone(),
                parameters: Vec::new(),
            })
            .push(Operation::Return);
        shape.constructor = Some(constructor);

        let mut configure = MethodShape::new(
            CONFIGURE_METHOD,
            vec![injector_type.clone(), object_type(runtime)],
            Type::void(),
        );

        let locals = self.load_modules(&mut configure, component);
        let load_injector = [Operation::LoadArgument { index: 1 }];

        for module in component.modules() {
            let Some(&local) = locals.get(&module.module_type) else {
                continue;
            };
            for provider in &module.providers {
                configure.push(Operation::LoadArgument { index: 1 });
                push_key(&mut configure, self.context, runtime, provider.dependency());
                self.new_provider(&mut configure, provider, local);
                configure.push(Operation::InvokeInterface {
                    owner: runtime.injector.clone(),
                    name: REGISTER_PROVIDER.to_string(),
                    parameters: vec![object_type(runtime), provider_type.clone()],
                    return_type: Type::void(),
                });
            }

            for binding in &module.bindings {
                configure.push(Operation::LoadArgument { index: 1 });
                push_key(&mut configure, self.context, runtime, &binding.ancestor);
                load_provider(
                    &mut configure,
                    self.context,
                    runtime,
                    &load_injector,
                    &binding.dependency,
                );
                configure.push(Operation::InvokeInterface {
                    owner: runtime.injector.clone(),
                    name: REGISTER_PROVIDER.to_string(),
                    parameters: vec![object_type(runtime), provider_type.clone()],
                    return_type: Type::void(),
                });
            }

            for factory in &module.factories {
                configure.push(Operation::LoadArgument { index: 1 });
                push_key(&mut configure, self.context, runtime, &factory.dependency());
                configure
                    .push(Operation::New {
                        class: factory.implementation_type.clone(),
                    })
                    .push(Operation::Dup)
                    .push(Operation::LoadArgument { index: 1 })
                    .push(Operation::InvokeConstructor {
                        owner: factory.implementation_type.clone(),
                        parameters: vec![injector_type.clone()],
                    })
                    .push(Operation::InvokeInterface {
                        owner: runtime.injector.clone(),
                        name: REGISTER_INSTANCE.to_string(),
                        parameters: vec![object_type(runtime), object_type(runtime)],
                        return_type: Type::void(),
                    });
            }
        }

        configure.push(Operation::Return);
        shape.methods.push(configure);
        shape
    }

    /// Store the component and every imported module in locals, returning
    /// the slot of each module type
    fn load_modules(&self, method: &mut MethodShape, component: &Component) -> BTreeMap<ClassName, usize> {
        let mut locals = BTreeMap::new();
        let root = &component.default_module;
        method
            .push(Operation::LoadArgument { index: 2 })
            .push(Operation::CheckCast {
                target: Type::Class(root.module_type.clone()),
            })
            .push(Operation::StoreLocal {
                index: FIRST_MODULE_LOCAL,
            });
        locals.insert(root.module_type.clone(), FIRST_MODULE_LOCAL);
        self.load_imports(method, root, &mut locals);
        locals
    }

    fn load_imports(
        &self,
        method: &mut MethodShape,
        module: &Rc<Module>,
        locals: &mut BTreeMap<ClassName, usize>,
    ) {
        let Some(&owner_local) = locals.get(&module.module_type) else {
            return;
        };
        for import in &module.modules {
            let imported = &import.module.module_type;
            if locals.contains_key(imported) {
                continue;
            }
            match &import.import_point {
                ImportPoint::Method(getter) => {
                    method
                        .push(Operation::LoadLocal { index: owner_local })
                        .push(Operation::InvokeVirtual {
                            owner: module.module_type.clone(),
                            name: getter.name.clone(),
                            parameters: Vec::new(),
                            return_type: getter.return_type.clone(),
                        });
                }
                ImportPoint::Field(field) => {
                    method
                        .push(Operation::LoadLocal { index: owner_local })
                        .push(Operation::GetField {
                            owner: module.module_type.clone(),
                            name: field.name.clone(),
                            field_type: field.field_type.clone(),
                        });
                }
                ImportPoint::Inverse => {
                    method
                        .push(Operation::New {
                            class: imported.clone(),
                        })
                        .push(Operation::Dup)
                        .push(Operation::InvokeConstructor {
                            owner: imported.clone(),
                            parameters: Vec::new(),
                        });
                }
            }
            let local = FIRST_MODULE_LOCAL + locals.len();
            method.push(Operation::StoreLocal { index: local });
            locals.insert(imported.clone(), local);
            self.load_imports(method, &import.module, locals);
        }
    }

    /// `new Provider(injector[, module])`, wrapped in the scope's provider when scoped
    fn new_provider(&self, method: &mut MethodShape, provider: &Provider, module_local: usize) {
        let provider_type = Type::Class(self.config.runtime.provider.clone());
        if let Scope::Class(wrapper) = &provider.scope {
            method
                .push(Operation::New {
                    class: wrapper.clone(),
                })
                .push(Operation::Dup);
        }
        method
            .push(Operation::New {
                class: provider.provider_type.clone(),
            })
            .push(Operation::Dup)
            .push(Operation::LoadArgument { index: 1 });
        if !matches!(provider.provision_point, ProvisionPoint::Constructor { .. }) {
            method.push(Operation::LoadLocal {
                index: module_local,
            });
        }
        method.push(Operation::InvokeConstructor {
            owner: provider.provider_type.clone(),
            parameters: provider_constructor_parameters(self.config, provider),
        });
        if let Scope::Class(wrapper) = &provider.scope {
            method.push(Operation::InvokeConstructor {
                owner: wrapper.clone(),
                parameters: vec![provider_type],
            });
        }
    }
}
