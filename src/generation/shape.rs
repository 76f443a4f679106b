//! Declarative class descriptions handed to the code emitter

use crate::metadata::{Annotation, Modifier, CONSTRUCTOR_NAME};
use scabbard_core::types::{ClassName, Primitive, Type};
use serde::Serialize;

/// Static initializer method name
pub const STATIC_INITIALIZER_NAME: &str = "<clinit>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldShape {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: Type,
    pub modifiers: Vec<Modifier>,
}

impl FieldShape {
    pub fn new(name: impl Into<String>, field_type: Type, modifiers: Vec<Modifier>) -> Self {
        Self {
            name: name.into(),
            field_type,
            modifiers,
        }
    }
}

/// One emitted instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    LoadThis,
    LoadArgument {
        index: usize,
    },
    LoadLocal {
        index: usize,
    },
    StoreLocal {
        index: usize,
    },
    GetField {
        owner: ClassName,
        name: String,
        #[serde(rename = "type")]
        field_type: Type,
    },
    PutField {
        owner: ClassName,
        name: String,
        #[serde(rename = "type")]
        field_type: Type,
    },
    GetStatic {
        owner: ClassName,
        name: String,
        #[serde(rename = "type")]
        field_type: Type,
    },
    PutStatic {
        owner: ClassName,
        name: String,
        #[serde(rename = "type")]
        field_type: Type,
    },
    New {
        class: ClassName,
    },
    Dup,
    Pop,
    /// `invokespecial <init>` on `owner`
    InvokeConstructor {
        owner: ClassName,
        parameters: Vec<Type>,
    },
    InvokeVirtual {
        owner: ClassName,
        name: String,
        parameters: Vec<Type>,
        return_type: Type,
    },
    InvokeInterface {
        owner: ClassName,
        name: String,
        parameters: Vec<Type>,
        return_type: Type,
    },
    InvokeStatic {
        owner: ClassName,
        name: String,
        parameters: Vec<Type>,
        return_type: Type,
    },
    /// Class literal
    PushType {
        value: Type,
    },
    PushString {
        value: String,
    },
    PushInt {
        value: i64,
    },
    PushNull,
    /// Materialized annotation instance
    PushAnnotation {
        annotation: Annotation,
    },
    CheckCast {
        target: Type,
    },
    Unbox {
        primitive: Primitive,
    },
    Return,
    ReturnValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodShape {
    pub name: String,
    pub parameters: Vec<Type>,
    pub return_type: Type,
    pub modifiers: Vec<Modifier>,
    pub body: Vec<Operation>,
}

impl MethodShape {
    pub fn new(name: impl Into<String>, parameters: Vec<Type>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type,
            modifiers: vec![Modifier::Public],
            body: Vec::new(),
        }
    }

    pub fn constructor(parameters: Vec<Type>) -> Self {
        Self::new(CONSTRUCTOR_NAME, parameters, Type::void())
    }

    pub fn static_initializer() -> Self {
        let mut shape = Self::new(STATIC_INITIALIZER_NAME, Vec::new(), Type::void());
        shape.modifiers = vec![Modifier::Static];
        shape
    }

    pub fn with_modifiers(mut self, modifiers: Vec<Modifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn push(&mut self, operation: Operation) -> &mut Self {
        self.body.push(operation);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassShape {
    pub name: ClassName,
    pub modifiers: Vec<Modifier>,
    pub superclass: ClassName,
    pub interfaces: Vec<ClassName>,
    pub fields: Vec<FieldShape>,
    pub constructor: Option<MethodShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub static_initializer: Option<MethodShape>,
    pub methods: Vec<MethodShape>,
}

impl ClassShape {
    pub fn new(name: ClassName, superclass: ClassName) -> Self {
        Self {
            name,
            modifiers: vec![Modifier::Public, Modifier::Final],
            superclass,
            interfaces: Vec::new(),
            fields: Vec::new(),
            constructor: None,
            static_initializer: None,
            methods: Vec::new(),
        }
    }

    pub fn find_method(&self, name: &str) -> Option<&MethodShape> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn find_field(&self, name: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|f| f.name == name)
    }
}
