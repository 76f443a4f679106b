use crate::types::ClassName;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl Primitive {
    pub const ALL: [Primitive; 9] = [
        Primitive::Boolean,
        Primitive::Byte,
        Primitive::Char,
        Primitive::Short,
        Primitive::Int,
        Primitive::Long,
        Primitive::Float,
        Primitive::Double,
        Primitive::Void,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Void => "void",
        }
    }

    fn boxed_name(self) -> &'static str {
        match self {
            Primitive::Boolean => "java.lang.Boolean",
            Primitive::Byte => "java.lang.Byte",
            Primitive::Char => "java.lang.Character",
            Primitive::Short => "java.lang.Short",
            Primitive::Int => "java.lang.Integer",
            Primitive::Long => "java.lang.Long",
            Primitive::Float => "java.lang.Float",
            Primitive::Double => "java.lang.Double",
            Primitive::Void => "java.lang.Void",
        }
    }

    /// The reference type a value of this primitive is boxed into
    pub fn boxed_class(self) -> ClassName {
        ClassName::from_static(self.boxed_name())
    }

    /// Reverse lookup from a boxed class to its primitive
    pub fn unboxed(class: &ClassName) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.boxed_name() == class.as_str())
    }

    /// Accessor used by generated code to unbox the boxed counterpart
    pub fn unbox_method(self) -> Option<&'static str> {
        match self {
            Primitive::Boolean => Some("booleanValue"),
            Primitive::Byte => Some("byteValue"),
            Primitive::Char => Some("charValue"),
            Primitive::Short => Some("shortValue"),
            Primitive::Int => Some("intValue"),
            Primitive::Long => Some("longValue"),
            Primitive::Float => Some("floatValue"),
            Primitive::Double => Some("doubleValue"),
            Primitive::Void => None,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
