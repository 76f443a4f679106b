//! Declarations read from the metadata source

use crate::core::{ScabbardError, ScabbardResult};
use scabbard_core::types::{ClassName, Type};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name used for constructors in method declarations
pub const CONSTRUCTOR_NAME: &str = "<init>";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Interface,
    Enum,
    Annotation,
}

/// Value of an annotation element
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationValue {
    Bool(bool),
    Int(i64),
    String(String),
    Class(Type),
    Enum {
        #[serde(rename = "type")]
        enum_type: ClassName,
        value: String,
    },
    Array(Vec<AnnotationValue>),
    Annotation(Annotation),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(rename = "type")]
    pub annotation_type: ClassName,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, AnnotationValue>,
}

impl Annotation {
    pub fn new(annotation_type: ClassName) -> Self {
        Self {
            annotation_type,
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, name: &str, value: AnnotationValue) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    /// Class-valued element; a wrong value shape is a fatal metadata error
    pub fn class_value(&self, name: &str) -> ScabbardResult<Option<&Type>> {
        match self.values.get(name) {
            None => Ok(None),
            Some(AnnotationValue::Class(value)) => Ok(Some(value)),
            Some(other) => Err(self.shape_error(name, "a class", other)),
        }
    }

    /// Class-array element; a single class is accepted as a one-element array
    pub fn class_array_value(&self, name: &str) -> ScabbardResult<Vec<&Type>> {
        match self.values.get(name) {
            None => Ok(Vec::new()),
            Some(AnnotationValue::Class(value)) => Ok(vec![value]),
            Some(AnnotationValue::Array(items)) => items
                .iter()
                .map(|item| match item {
                    AnnotationValue::Class(value) => Ok(value),
                    other => Err(self.shape_error(name, "an array of classes", other)),
                })
                .collect(),
            Some(other) => Err(self.shape_error(name, "an array of classes", other)),
        }
    }

    pub fn bool_value(&self, name: &str) -> ScabbardResult<Option<bool>> {
        match self.values.get(name) {
            None => Ok(None),
            Some(AnnotationValue::Bool(value)) => Ok(Some(*value)),
            Some(other) => Err(self.shape_error(name, "a boolean", other)),
        }
    }

    fn shape_error(&self, name: &str, expected: &str, actual: &AnnotationValue) -> ScabbardError {
        ScabbardError::Metadata(format!(
            "Annotation @{} element '{}' must be {}, found {:?}",
            self.annotation_type, name, expected, actual
        ))
    }
}

/// Shared lookups over `annotations` + `modifiers`
pub trait Declaration {
    fn annotations(&self) -> &[Annotation];
    fn modifiers(&self) -> &[Modifier];

    fn has_annotation(&self, annotation_type: &ClassName) -> bool {
        self.annotation(annotation_type).is_some()
    }

    fn annotation(&self, annotation_type: &ClassName) -> Option<&Annotation> {
        self.annotations()
            .iter()
            .find(|a| &a.annotation_type == annotation_type)
    }

    fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers().contains(&modifier)
    }

    fn is_static(&self) -> bool {
        self.has_modifier(Modifier::Static)
    }

    fn is_private(&self) -> bool {
        self.has_modifier(Modifier::Private)
    }

    fn is_public(&self) -> bool {
        self.has_modifier(Modifier::Public)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterDecl {
    #[serde(rename = "type")]
    pub parameter_type: Type,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl ParameterDecl {
    pub fn new(parameter_type: Type) -> Self {
        Self {
            parameter_type,
            annotations: Vec::new(),
        }
    }
}

impl Declaration for ParameterDecl {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    fn modifiers(&self) -> &[Modifier] {
        &[]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: Type,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl Declaration for FieldDecl {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDecl>,
    #[serde(default = "Type::void")]
    pub return_type: Type,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
}

impl MethodDecl {
    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }

    /// `name(param, param)` for messages
    pub fn signature(&self) -> String {
        let params: Vec<String> = self
            .parameters
            .iter()
            .map(|p| p.parameter_type.to_string())
            .collect();
        format!("{}({})", self.name, params.join(", "))
    }

    pub fn parameter_types(&self) -> Vec<Type> {
        self.parameters
            .iter()
            .map(|p| p.parameter_type.clone())
            .collect()
    }
}

impl Declaration for MethodDecl {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: ClassName,
    /// Classes are public unless the document says otherwise
    #[serde(default = "default_class_modifiers")]
    pub modifiers: Vec<Modifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superclass: Option<ClassName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<ClassName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldDecl>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodDecl>,
}

fn default_class_modifiers() -> Vec<Modifier> {
    vec![Modifier::Public]
}

impl ClassDecl {
    pub fn new(name: ClassName) -> Self {
        Self {
            name,
            modifiers: vec![Modifier::Public],
            superclass: None,
            interfaces: Vec::new(),
            type_parameters: Vec::new(),
            annotations: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.has_modifier(Modifier::Interface)
    }

    pub fn is_abstract(&self) -> bool {
        self.has_modifier(Modifier::Abstract)
    }

    pub fn is_enum(&self) -> bool {
        self.has_modifier(Modifier::Enum)
    }

    pub fn is_annotation(&self) -> bool {
        self.has_modifier(Modifier::Annotation)
    }

    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    pub fn constructors(&self) -> impl Iterator<Item = &MethodDecl> {
        self.methods.iter().filter(|m| m.is_constructor())
    }

    /// True when any field or method already uses `name`
    pub fn has_member_named(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name) || self.methods.iter().any(|m| m.name == name)
    }
}

impl Declaration for ClassDecl {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }
}
