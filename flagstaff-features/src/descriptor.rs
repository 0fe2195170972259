//! Activator parameter descriptors
//!
//! Every activator statically declares the named, typed parameters it reads
//! from the store. Descriptor identity is `(activator_name, name)`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic type tag of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    String,
    Double,
    Int,
    Boolean,
    DateTime,
    StringList,
}

impl ParameterKind {
    /// Get the type tag name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Double => "Double",
            Self::Int => "Int64",
            Self::Boolean => "Boolean",
            Self::DateTime => "DateTime",
            Self::StringList => "String[]",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declaration of one parameter an activator requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivatorParameterDescriptor {
    /// Parameter key (e.g. `header-name`)
    pub name: String,

    /// Short name of the owning activator type
    pub activator_name: String,

    /// Declared value kind
    pub kind: ParameterKind,

    /// Whether a missing value is tolerated
    pub is_optional: bool,
}

impl ActivatorParameterDescriptor {
    /// Declare a required parameter.
    pub fn required(
        activator_name: impl Into<String>,
        name: impl Into<String>,
        kind: ParameterKind,
    ) -> Self {
        Self {
            name: name.into(),
            activator_name: activator_name.into(),
            kind,
            is_optional: false,
        }
    }

    /// Declare an optional parameter.
    pub fn optional(
        activator_name: impl Into<String>,
        name: impl Into<String>,
        kind: ParameterKind,
    ) -> Self {
        Self {
            is_optional: true,
            ..Self::required(activator_name, name, kind)
        }
    }

    /// Descriptor identity.
    pub fn identity(&self) -> (&str, &str) {
        (&self.activator_name, &self.name)
    }

    /// Whether `other` shares this identity but disagrees on kind or optionality.
    pub fn conflicts_with(&self, other: &Self) -> bool {
        self.identity() == other.identity()
            && (self.kind != other.kind || self.is_optional != other.is_optional)
    }
}

/// Short (unqualified) type name of an activator type.
///
/// This is the identity the store indexes parameters by. The fully-qualified
/// path from [`std::any::type_name`] never matches.
pub fn activator_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    // Strip generic arguments before taking the last path segment
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
