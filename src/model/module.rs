use crate::metadata::{FieldDecl, MethodDecl};
use crate::model::{Binding, Factory, Provider};
use scabbard_core::types::ClassName;
use std::collections::HashSet;
use std::rc::Rc;

/// How a module instance is reached from the module importing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportPoint {
    /// `@Import` method returning the module
    Method(MethodDecl),
    /// `@Import` field holding the module
    Field(FieldDecl),
    /// `@ImportedBy` back-reference; the module is created with its default constructor
    Inverse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleImport {
    pub module: Rc<Module>,
    pub import_point: ImportPoint,
}

/// A parsed module: its own providers plus the modules it imports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub module_type: ClassName,
    pub providers: Vec<Provider>,
    /// Aliases whose concrete dependency is provided by this module
    pub bindings: Vec<Binding>,
    pub factories: Vec<Factory>,
    pub modules: Vec<ModuleImport>,
}

impl Module {
    /// Module without providers or imports
    pub fn new(module_type: ClassName) -> Self {
        Self {
            module_type,
            providers: Vec::new(),
            bindings: Vec::new(),
            factories: Vec::new(),
            modules: Vec::new(),
        }
    }

    pub fn imported_modules(&self) -> impl Iterator<Item = &Rc<Module>> {
        self.modules.iter().map(|import| &import.module)
    }

    /// This module and everything it imports transitively, each module once, in
    /// depth-first pre-order
    pub fn flatten(self: &Rc<Self>) -> Vec<Rc<Module>> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        Self::flatten_into(self, &mut seen, &mut result);
        result
    }

    /// Like `flatten`, but a module reached through several import paths
    /// appears once per path
    pub fn walk(self: &Rc<Self>) -> Vec<Rc<Module>> {
        let mut result = Vec::new();
        Self::walk_into(self, &mut result);
        result
    }

    fn walk_into(module: &Rc<Module>, result: &mut Vec<Rc<Module>>) {
        result.push(Rc::clone(module));
        for imported in module.imported_modules() {
            Self::walk_into(imported, result);
        }
    }

    fn flatten_into(
        module: &Rc<Module>,
        seen: &mut HashSet<ClassName>,
        result: &mut Vec<Rc<Module>>,
    ) {
        if !seen.insert(module.module_type.clone()) {
            return;
        }
        result.push(Rc::clone(module));
        for imported in module.imported_modules() {
            Self::flatten_into(imported, seen, result);
        }
    }
}

/// A resolution scope: an implicit top-level module plus its place in the component tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub component_type: ClassName,
    pub parent: Option<ClassName>,
    /// The component's own providers and imports
    pub default_module: Rc<Module>,
    pub subcomponents: Vec<ClassName>,
}

impl Component {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Every module reachable from this component, the default module first
    pub fn modules(&self) -> Vec<Rc<Module>> {
        self.default_module.flatten()
    }

    /// Every import path's module, repeats included
    pub fn walk_modules(&self) -> Vec<Rc<Module>> {
        self.default_module.walk()
    }
}
