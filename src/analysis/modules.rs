//! Module parsing and memoized module resolution

use crate::analysis::bridges::BridgeRegistry;
use crate::analysis::helper::{AnalyzerHelper, Member};
use crate::core::{ScabbardError, ScabbardResult};
use crate::metadata::{ClassDecl, Declaration};
use crate::model::{
    Binding, Dependency, Factory, ImportPoint, InjectionTarget, Module, ModuleImport, Provider,
    ProvisionPoint, Scope,
};
use scabbard_core::types::{ClassName, Type};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use tracing::debug;

/// Infix of generated provider names: `<Module>$$Provider$<N>`
pub const PROVIDER_SUFFIX: &str = "$$Provider$";

#[derive(Clone)]
struct OwnedTarget {
    target: InjectionTarget,
    dependency: Dependency,
    scope: Scope,
}

/// Providable targets, factories and bindings grouped by owning module
#[derive(Default)]
struct Ownership {
    targets: BTreeMap<ClassName, Vec<OwnedTarget>>,
    factories: BTreeMap<ClassName, Vec<Factory>>,
    bindings: BTreeMap<ClassName, Vec<Binding>>,
    /// Importer to the modules naming it in `@ImportedBy`
    inverse_imports: BTreeMap<ClassName, Vec<ClassName>>,
}

/// Members of one module before its imports are resolved
#[derive(Debug, Default)]
pub struct ParsedModule {
    pub providers: Vec<Provider>,
    pub bindings: Vec<Binding>,
    pub factories: Vec<Factory>,
    pub imports: Vec<(ClassName, ImportPoint)>,
}

pub struct ModuleParser<'h, 'a> {
    helper: &'h AnalyzerHelper<'a>,
    ownership: Ownership,
    bridges: BridgeRegistry,
}

impl<'h, 'a> ModuleParser<'h, 'a> {
    /// Assign each providable target, factory and binding to the modules named by
    /// its `@ProvidedBy`, or to every default module when it names none
    pub fn new(
        helper: &'h AnalyzerHelper<'a>,
        providable_targets: &[InjectionTarget],
        factories: &[Factory],
        bindings: &[Binding],
    ) -> ScabbardResult<Self> {
        let mut parser = Self {
            helper,
            ownership: Ownership::default(),
            bridges: BridgeRegistry::new(),
        };
        let default_modules = parser.default_modules()?;

        for target in providable_targets {
            let Some(class) = helper.metadata().find_class(&target.target_type) else {
                continue;
            };
            let context = class.name.to_string();
            let owned = OwnedTarget {
                target: target.clone(),
                dependency: helper.dependency_of(class, Type::Class(class.name.clone()), &context),
                scope: helper.find_scope(class, &context),
            };
            for owner in parser.owners_of(&target.target_type, &default_modules)? {
                parser
                    .ownership
                    .targets
                    .entry(owner)
                    .or_default()
                    .push(owned.clone());
            }
        }

        for factory in factories {
            for owner in parser.owners_of(&factory.factory_type, &default_modules)? {
                parser
                    .ownership
                    .factories
                    .entry(owner)
                    .or_default()
                    .push(factory.clone());
            }
        }

        for binding in bindings {
            let Some(host) = binding.dependency.raw_class() else {
                continue;
            };
            for owner in parser.owners_of(host, &default_modules)? {
                parser
                    .ownership
                    .bindings
                    .entry(owner)
                    .or_default()
                    .push(binding.clone());
            }
        }

        let imported_by = &helper.config().markers.imported_by;
        for class in helper.metadata().types_annotated_with(imported_by) {
            let Some(annotation) = class.annotation(imported_by) else {
                continue;
            };
            for importer in annotation.class_array_value("value")? {
                if let Some(importer) = importer.raw_class() {
                    parser
                        .ownership
                        .inverse_imports
                        .entry(importer.clone())
                        .or_default()
                        .push(class.name.clone());
                }
            }
        }

        Ok(parser)
    }

    fn default_modules(&self) -> ScabbardResult<Vec<ClassName>> {
        let marker = &self.helper.config().markers.module;
        let mut modules = Vec::new();
        for class in self.helper.metadata().types_annotated_with(marker) {
            let is_default = match class.annotation(marker) {
                Some(annotation) => annotation.bool_value("isDefault")?.unwrap_or(false),
                None => false,
            };
            if is_default {
                modules.push(class.name.clone());
            }
        }
        Ok(modules)
    }

    fn owners_of(
        &self,
        class_name: &ClassName,
        default_modules: &[ClassName],
    ) -> ScabbardResult<Vec<ClassName>> {
        let provided_by = &self.helper.config().markers.provided_by;
        let declared = match self
            .helper
            .metadata()
            .find_class(class_name)
            .and_then(|class| class.annotation(provided_by))
        {
            Some(annotation) => annotation
                .class_array_value("value")?
                .into_iter()
                .filter_map(Type::raw_class)
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        if declared.is_empty() {
            Ok(default_modules.to_vec())
        } else {
            Ok(declared)
        }
    }

    /// Collect a module's own providers and import declarations.
    ///
    /// `require_marker` is false for a component's implicit module.
    pub fn parse(&mut self, class: &ClassDecl, require_marker: bool) -> ParsedModule {
        let helper = self.helper;
        let markers = &helper.config().markers;
        let reporter = helper.reporter();

        if require_marker && !class.has_annotation(&markers.module) {
            reporter.report_error(format!(
                "Class {} is imported as a module but is not annotated with @{}",
                class.name, markers.module
            ));
            return ParsedModule::default();
        }

        let mut parsed = ParsedModule::default();
        let mut next_index = 0usize;
        let mut provider_type = || {
            let name = class
                .name
                .nested(&format!("{}{}", PROVIDER_SUFFIX, next_index));
            next_index += 1;
            name
        };

        for field in &class.fields {
            if field.is_static() {
                continue;
            }
            let context = format!("{}.{}", class.name, field.name);
            if field.has_annotation(&markers.provide) {
                let bridge = field
                    .is_private()
                    .then(|| self.bridges.field_bridge(class, field));
                parsed.providers.push(Provider {
                    provider_type: provider_type(),
                    provision_point: ProvisionPoint::Field {
                        container: class.name.clone(),
                        dependency: helper.dependency_of(field, field.field_type.clone(), &context),
                        field: field.clone(),
                        bridge,
                    },
                    module_type: class.name.clone(),
                    scope: helper.find_scope(field, &context),
                });
            }
            if field.has_annotation(&markers.import) {
                match field.field_type.raw_class() {
                    Some(imported) => parsed
                        .imports
                        .push((imported.clone(), ImportPoint::Field(field.clone()))),
                    None => reporter.report_error(format!(
                        "Import {} must have a module type, found {}",
                        context, field.field_type
                    )),
                }
            }
        }

        for method in &class.methods {
            if method.is_static() || method.is_constructor() {
                continue;
            }
            let context = format!("{}.{}", class.name, method.signature());
            if method.has_annotation(&markers.provide) {
                let bridge = method
                    .is_private()
                    .then(|| self.bridges.method_bridge(class, method));
                parsed.providers.push(Provider {
                    provider_type: provider_type(),
                    provision_point: ProvisionPoint::Method {
                        dependency: helper.dependency_of(
                            method,
                            method.return_type.clone(),
                            &context,
                        ),
                        injection_point: helper
                            .to_injection_point(&class.name, Member::Method(method)),
                        bridge,
                    },
                    module_type: class.name.clone(),
                    scope: helper.find_scope(method, &context),
                });
            }
            if method.has_annotation(&markers.import) {
                match method.return_type.raw_class() {
                    Some(imported) => parsed
                        .imports
                        .push((imported.clone(), ImportPoint::Method(method.clone()))),
                    None => reporter.report_error(format!(
                        "Import {} must return a module type, found {}",
                        context, method.return_type
                    )),
                }
            }
        }

        if let Some(targets) = self.ownership.targets.get(&class.name) {
            for owned in targets {
                let Some(constructor) = owned.target.constructor() else {
                    continue;
                };
                parsed.providers.push(Provider {
                    provider_type: provider_type(),
                    provision_point: ProvisionPoint::Constructor {
                        dependency: owned.dependency.clone(),
                        injection_point: constructor.clone(),
                    },
                    module_type: class.name.clone(),
                    scope: owned.scope.clone(),
                });
            }
        }

        if let Some(factories) = self.ownership.factories.get(&class.name) {
            parsed.factories = factories.clone();
        }
        if let Some(bindings) = self.ownership.bindings.get(&class.name) {
            parsed.bindings = bindings.clone();
        }
        if let Some(modules) = self.ownership.inverse_imports.get(&class.name) {
            parsed.imports.extend(
                modules
                    .iter()
                    .map(|module| (module.clone(), ImportPoint::Inverse)),
            );
        }

        parsed
    }
}

enum ModuleState {
    InProgress,
    Resolved(Rc<Module>),
    /// Part of an import cycle; carries the trace
    Failed(String),
}

/// Resolves modules by type, parsing each one at most once
pub struct ModuleRegistry<'h, 'a> {
    parser: ModuleParser<'h, 'a>,
    states: HashMap<ClassName, ModuleState>,
    stack: Vec<ClassName>,
}

impl<'h, 'a> ModuleRegistry<'h, 'a> {
    pub fn new(parser: ModuleParser<'h, 'a>) -> Self {
        Self {
            parser,
            states: HashMap::new(),
            stack: Vec::new(),
        }
    }

    /// Parsed module with its imports resolved.
    ///
    /// Returns `ModuleCycle` when the module imports itself, directly or
    /// through other modules.
    pub fn get_module(&mut self, module_type: &ClassName) -> ScabbardResult<Rc<Module>> {
        self.resolve(module_type, true)
    }

    /// Implicit module of a component
    pub fn get_component_module(
        &mut self,
        component_type: &ClassName,
    ) -> ScabbardResult<Rc<Module>> {
        self.resolve(component_type, false)
    }

    fn resolve(&mut self, module_type: &ClassName, require_marker: bool) -> ScabbardResult<Rc<Module>> {
        match self.states.get(module_type) {
            Some(ModuleState::Resolved(module)) => return Ok(Rc::clone(module)),
            Some(ModuleState::Failed(trace)) => {
                return Err(ScabbardError::ModuleCycle {
                    trace: trace.clone(),
                })
            }
            Some(ModuleState::InProgress) => {
                let start = self
                    .stack
                    .iter()
                    .position(|entry| entry == module_type)
                    .unwrap_or(0);
                let mut trace: Vec<String> =
                    self.stack[start..].iter().map(ClassName::to_string).collect();
                trace.push(module_type.to_string());
                return Err(ScabbardError::ModuleCycle {
                    trace: trace.join(" -> "),
                });
            }
            None => {}
        }

        self.states
            .insert(module_type.clone(), ModuleState::InProgress);
        self.stack.push(module_type.clone());
        let result = self.parse_and_link(module_type, require_marker);
        self.stack.pop();

        match result {
            Ok(module) => {
                self.states
                    .insert(module_type.clone(), ModuleState::Resolved(Rc::clone(&module)));
                Ok(module)
            }
            Err(ScabbardError::ModuleCycle { trace }) => {
                self.states
                    .insert(module_type.clone(), ModuleState::Failed(trace.clone()));
                Err(ScabbardError::ModuleCycle { trace })
            }
            Err(e) => {
                self.states.remove(module_type);
                Err(e)
            }
        }
    }

    fn parse_and_link(
        &mut self,
        module_type: &ClassName,
        require_marker: bool,
    ) -> ScabbardResult<Rc<Module>> {
        let helper = self.parser.helper;
        let Some(class) = helper.metadata().find_class(module_type) else {
            helper
                .reporter()
                .report_error(format!("Cannot find module class {}", module_type));
            return Ok(Rc::new(Module::new(module_type.clone())));
        };

        debug!("Parsing module {}", module_type);
        let parsed = self.parser.parse(class, require_marker);

        let mut modules = Vec::with_capacity(parsed.imports.len());
        for (imported, import_point) in parsed.imports {
            let module = self.get_module(&imported)?;
            modules.push(ModuleImport {
                module,
                import_point,
            });
        }

        Ok(Rc::new(Module {
            module_type: module_type.clone(),
            providers: parsed.providers,
            bindings: parsed.bindings,
            factories: parsed.factories,
            modules,
        }))
    }
}
