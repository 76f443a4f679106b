//! Host type model
//!
//! Types are written the way they appear in source: `int`, `com.example.Foo`,
//! `java.util.List<com.example.Foo>`, `byte[]`.

mod class_name;
mod primitive;

pub use class_name::ClassName;
pub use primitive::Primitive;

use crate::core::error::{ScabbardError, ScabbardResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Type {
    Primitive(Primitive),
    Class(ClassName),
    Parameterized(ClassName, Vec<Type>),
    Array(Box<Type>),
}

impl Type {
    pub fn parse(input: &str) -> ScabbardResult<Self> {
        let mut parser = TypeParser {
            input,
            chars: input.char_indices().collect(),
            position: 0,
        };
        let parsed = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.position != parser.chars.len() {
            return Err(ScabbardError::type_syntax(input, "unexpected trailing input"));
        }
        Ok(parsed)
    }

    pub fn class(name: ClassName) -> Self {
        Type::Class(name)
    }

    pub fn void() -> Self {
        Type::Primitive(Primitive::Void)
    }

    pub fn is_void(&self) -> bool {
        match self {
            Type::Primitive(Primitive::Void) => true,
            Type::Class(name) => Primitive::unboxed(name) == Some(Primitive::Void),
            _ => false,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Type::Primitive(_))
    }

    /// Primitive types are replaced by their boxed class, everything else is unchanged
    pub fn boxed(&self) -> Type {
        match self {
            Type::Primitive(primitive) => Type::Class(primitive.boxed_class()),
            other => other.clone(),
        }
    }

    /// Raw class of a class or parameterized type
    pub fn raw_class(&self) -> Option<&ClassName> {
        match self {
            Type::Class(name) | Type::Parameterized(name, _) => Some(name),
            Type::Primitive(_) | Type::Array(_) => None,
        }
    }

    pub fn type_arguments(&self) -> &[Type] {
        match self {
            Type::Parameterized(_, args) => args,
            _ => &[],
        }
    }

    /// True when the runtime class alone identifies this type
    pub fn is_class_shaped(&self) -> bool {
        match self {
            Type::Class(_) | Type::Primitive(_) => true,
            Type::Parameterized(_, _) => false,
            Type::Array(element) => element.is_class_shaped(),
        }
    }

    /// Every class mentioned by this type, outermost first
    pub fn referenced_classes(&self) -> Vec<&ClassName> {
        let mut classes = Vec::new();
        self.collect_classes(&mut classes);
        classes
    }

    fn collect_classes<'a>(&'a self, classes: &mut Vec<&'a ClassName>) {
        match self {
            Type::Primitive(_) => {}
            Type::Class(name) => classes.push(name),
            Type::Parameterized(name, args) => {
                classes.push(name);
                for arg in args {
                    arg.collect_classes(classes);
                }
            }
            Type::Array(element) => element.collect_classes(classes),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(primitive) => write!(f, "{}", primitive),
            Type::Class(name) => write!(f, "{}", name),
            Type::Parameterized(name, args) => {
                write!(f, "{}<", name)?;
                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(">")
            }
            Type::Array(element) => write!(f, "{}[]", element),
        }
    }
}

impl FromStr for Type {
    type Err = ScabbardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Type {
    type Error = ScabbardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Type> for String {
    fn from(value: Type) -> Self {
        value.to_string()
    }
}

impl From<ClassName> for Type {
    fn from(value: ClassName) -> Self {
        Type::Class(value)
    }
}

struct TypeParser<'a> {
    input: &'a str,
    chars: Vec<(usize, char)>,
    position: usize,
}

impl TypeParser<'_> {
    fn parse_type(&mut self) -> ScabbardResult<Type> {
        self.skip_whitespace();
        let name = self.parse_name()?;
        self.skip_whitespace();

        let mut parsed = if self.peek() == Some('<') {
            if Primitive::from_name(&name).is_some() {
                return Err(self.error("primitive types take no type arguments"));
            }
            self.position += 1;
            let raw = ClassName::parse(&name)?;
            let mut args = vec![self.parse_type()?];
            loop {
                self.skip_whitespace();
                match self.peek() {
                    Some(',') => {
                        self.position += 1;
                        args.push(self.parse_type()?);
                    }
                    Some('>') => {
                        self.position += 1;
                        break;
                    }
                    _ => return Err(self.error("expected ',' or '>'")),
                }
            }
            Type::Parameterized(raw, args)
        } else if let Some(primitive) = Primitive::from_name(&name) {
            Type::Primitive(primitive)
        } else {
            Type::Class(ClassName::parse(&name)?)
        };

        loop {
            self.skip_whitespace();
            if self.peek() == Some('[') {
                self.position += 1;
                if self.peek() != Some(']') {
                    return Err(self.error("expected ']'"));
                }
                self.position += 1;
                if parsed.is_void() {
                    return Err(self.error("void cannot be an array element"));
                }
                parsed = Type::Array(Box::new(parsed));
            } else {
                break;
            }
        }

        Ok(parsed)
    }

    fn parse_name(&mut self) -> ScabbardResult<String> {
        let start = self.position;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '$' || c == '.' {
                self.position += 1;
            } else {
                break;
            }
        }
        if start == self.position {
            return Err(self.error("expected a type name"));
        }
        Ok(self.chars[start..self.position].iter().map(|(_, c)| c).collect())
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).map(|(_, c)| *c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    fn error(&self, reason: &str) -> ScabbardError {
        let offset = self
            .chars
            .get(self.position)
            .map(|(offset, _)| *offset)
            .unwrap_or(self.input.len());
        ScabbardError::type_syntax(self.input, format!("{} at offset {}", reason, offset))
    }
}
