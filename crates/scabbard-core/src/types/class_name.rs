use crate::core::error::{ScabbardError, ScabbardResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

fn binary_name_pattern() -> ScabbardResult<&'static Regex> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$"))
        .as_ref()
        .map_err(|e| ScabbardError::Config(format!("Invalid regex: {}", e)))
}

/// Dotted binary name of a class, e.g. `com.example.Foo` or `com.example.Outer$Inner`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClassName(String);

impl ClassName {
    /// Parse and validate a binary name
    pub fn parse(name: &str) -> ScabbardResult<Self> {
        let trimmed = name.trim();
        if !binary_name_pattern()?.is_match(trimmed) {
            return Err(ScabbardError::type_syntax(name, "not a valid class name"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Build a name known to be well formed (built-in runtime names)
    pub fn from_static(name: &'static str) -> Self {
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Package part of the name, empty for the default package
    pub fn package_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(index) => &self.0[..index],
            None => "",
        }
    }

    /// Name without the package
    pub fn simple_name(&self) -> &str {
        match self.0.rfind('.') {
            Some(index) => &self.0[index + 1..],
            None => &self.0,
        }
    }

    /// Synthetic nested name, `Outer` + `$$Provider$0` style suffixes
    pub fn nested(&self, suffix: &str) -> ClassName {
        ClassName(format!("{}{}", self.0, suffix))
    }

    /// Class with the given simple name inside `package`
    pub fn in_package(package: &str, simple_name: &str) -> ClassName {
        if package.is_empty() {
            ClassName(simple_name.to_string())
        } else {
            ClassName(format!("{}.{}", package, simple_name))
        }
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ClassName {
    type Err = ScabbardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ClassName {
    type Error = ScabbardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ClassName> for String {
    fn from(value: ClassName) -> Self {
        value.0
    }
}
