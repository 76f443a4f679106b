//! Reservation of synthetic accessor names

use crate::metadata::{ClassDecl, FieldDecl, MethodDecl, ParameterDecl};
use scabbard_core::types::ClassName;
use std::collections::{HashMap, HashSet};

/// Hands out `<member>$bridge$N` names that collide neither with declared
/// members nor with bridges reserved earlier in the same run
#[derive(Debug, Default)]
pub struct BridgeRegistry {
    reserved: HashMap<ClassName, HashSet<String>>,
}

impl BridgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reserve_name(&mut self, container: &ClassDecl, member_name: &str) -> String {
        let reserved = self.reserved.entry(container.name.clone()).or_default();
        let mut index = 0usize;
        loop {
            let candidate = format!("{}$bridge${}", member_name, index);
            if !container.has_member_named(&candidate) && !reserved.contains(&candidate) {
                reserved.insert(candidate.clone());
                return candidate;
            }
            index += 1;
        }
    }

    /// Accessor with the same signature as a private provider method
    pub fn method_bridge(&mut self, container: &ClassDecl, method: &MethodDecl) -> MethodDecl {
        MethodDecl {
            name: self.reserve_name(container, &method.name),
            parameters: method
                .parameters
                .iter()
                .map(|p| ParameterDecl::new(p.parameter_type.clone()))
                .collect(),
            return_type: method.return_type.clone(),
            modifiers: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Getter for a private provider field
    pub fn field_bridge(&mut self, container: &ClassDecl, field: &FieldDecl) -> MethodDecl {
        MethodDecl {
            name: self.reserve_name(container, &field.name),
            parameters: Vec::new(),
            return_type: field.field_type.clone(),
            modifiers: Vec::new(),
            annotations: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scabbard_core::types::Type;

    fn module() -> ClassDecl {
        let mut decl = ClassDecl::new(ClassName::parse("a.Module").unwrap());
        decl.methods.push(MethodDecl {
            name: "value$bridge$0".to_string(),
            parameters: vec![],
            return_type: Type::parse("a.Foo").unwrap(),
            modifiers: vec![],
            annotations: vec![],
        });
        decl
    }

    #[test]
    fn test_names_skip_existing_members_and_reservations() {
        let container = module();
        let mut registry = BridgeRegistry::new();
        assert_eq!(registry.reserve_name(&container, "value"), "value$bridge$1");
        assert_eq!(registry.reserve_name(&container, "value"), "value$bridge$2");
        assert_eq!(registry.reserve_name(&container, "other"), "other$bridge$0");
    }

    #[test]
    fn test_reservations_are_per_container() {
        let first = module();
        let second = ClassDecl::new(ClassName::parse("b.Module").unwrap());
        let mut registry = BridgeRegistry::new();
        registry.reserve_name(&first, "other");
        assert_eq!(registry.reserve_name(&second, "other"), "other$bridge$0");
    }

    #[test]
    fn test_field_bridge_returns_field_type() {
        let container = module();
        let field = FieldDecl {
            name: "foo".to_string(),
            field_type: Type::parse("a.Foo").unwrap(),
            modifiers: vec![],
            annotations: vec![],
        };
        let mut registry = BridgeRegistry::new();
        let bridge = registry.field_bridge(&container, &field);
        assert_eq!(bridge.name, "foo$bridge$0");
        assert_eq!(bridge.return_type, field.field_type);
        assert!(bridge.parameters.is_empty());
    }
}
