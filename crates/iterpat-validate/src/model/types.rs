//! Type handles
//!
//! Opaque type identities as seen by the rule sets. The only semantic
//! operations the rules need (assignability, sameness) are answered by the
//! [`SymbolModel`](super::SymbolModel); this module only carries the
//! primitive conversion tables the in-memory snapshot relies on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the root reference type every declared type converts to.
pub const OBJECT_TYPE: &str = "Object";

/// Primitive (non-reference) types of the analyzed language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Float,
    Double,
    Void,
}

impl PrimitiveType {
    /// Source-level keyword for this primitive
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Char => "char",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Void => "void",
        }
    }

    /// Wrapper reference type used when boxing, `None` for `void`
    pub fn boxed_name(self) -> Option<&'static str> {
        match self {
            Self::Boolean => Some("Boolean"),
            Self::Byte => Some("Byte"),
            Self::Short => Some("Short"),
            Self::Char => Some("Character"),
            Self::Int => Some("Integer"),
            Self::Long => Some("Long"),
            Self::Float => Some("Float"),
            Self::Double => Some("Double"),
            Self::Void => None,
        }
    }

    /// Inverse of [`boxed_name`](Self::boxed_name)
    pub fn unboxed_from(name: &str) -> Option<Self> {
        match name {
            "Boolean" => Some(Self::Boolean),
            "Byte" => Some(Self::Byte),
            "Short" => Some(Self::Short),
            "Character" => Some(Self::Char),
            "Integer" => Some(Self::Int),
            "Long" => Some(Self::Long),
            "Float" => Some(Self::Float),
            "Double" => Some(Self::Double),
            _ => None,
        }
    }

    /// Identity or widening primitive conversion from `self` to `target`
    pub fn widens_to(self, target: Self) -> bool {
        use PrimitiveType::{Boolean, Byte, Char, Double, Float, Int, Long, Short, Void};

        if self == target {
            return true;
        }
        match self {
            Byte => matches!(target, Short | Int | Long | Float | Double),
            Short | Char => matches!(target, Int | Long | Float | Double),
            Int => matches!(target, Long | Float | Double),
            Long => matches!(target, Float | Double),
            Float => matches!(target, Double),
            Double | Boolean | Void => false,
        }
    }

    /// Built-in supertypes of a wrapper type
    pub fn boxed_supertypes(self) -> &'static [&'static str] {
        match self {
            Self::Boolean | Self::Char => &[OBJECT_TYPE],
            Self::Void => &[],
            _ => &["Number", OBJECT_TYPE],
        }
    }
}

impl FromStr for PrimitiveType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolean" => Ok(Self::Boolean),
            "byte" => Ok(Self::Byte),
            "short" => Ok(Self::Short),
            "char" => Ok(Self::Char),
            "int" => Ok(Self::Int),
            "long" => Ok(Self::Long),
            "float" => Ok(Self::Float),
            "double" => Ok(Self::Double),
            "void" => Ok(Self::Void),
            _ => Err(()),
        }
    }
}

/// A semantic type handle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    /// A primitive such as `int` or `boolean`
    Primitive(PrimitiveType),
    /// A declared reference type, identified by its simple name
    Declared(String),
}

impl TypeRef {
    /// Parse a type as written in a snapshot: primitive keywords map to
    /// [`TypeRef::Primitive`], everything else names a declared type.
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        name.parse::<PrimitiveType>()
            .map_or_else(|()| Self::Declared(name.to_string()), Self::Primitive)
    }

    pub fn declared(name: impl Into<String>) -> Self {
        Self::Declared(name.into())
    }

    pub fn boolean() -> Self {
        Self::Primitive(PrimitiveType::Boolean)
    }

    pub fn int() -> Self {
        Self::Primitive(PrimitiveType::Int)
    }

    pub fn void() -> Self {
        Self::Primitive(PrimitiveType::Void)
    }

    /// Name of the declared type, `None` for primitives
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            Self::Declared(name) => Some(name),
            Self::Primitive(_) => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(p) => write!(f, "{}", p.keyword()),
            Self::Declared(name) => write!(f, "{name}"),
        }
    }
}
