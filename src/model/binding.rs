use crate::model::Dependency;
use std::fmt;

/// Alias from a concrete dependency to an ancestor it may satisfy
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Binding {
    pub dependency: Dependency,
    pub ancestor: Dependency,
}

impl Binding {
    pub fn new(dependency: Dependency, ancestor: Dependency) -> Self {
        Self {
            dependency,
            ancestor,
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} as {}", self.dependency, self.ancestor)
    }
}
