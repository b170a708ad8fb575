//! Closed type tags
//!
//! Every value the codec handles is described by a [`TypeTag`]. Tags render to
//! a stable identifier string stored in `Field::type_id`:
//! - primitives: `bool`, `i8` .. `u64`, `f32`, `f64`, `string`
//! - named types: `enum:Name`, `composite:Name`, `asset:Name`
//! - sequences: `array<T>`, `list<T>`

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Sequence flavor: fixed array (`Box<[T]>`) or growable list (`Vec<T>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeqKind {
    Array,
    List,
}

/// Declared type of a member, field or sequence element
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Str,
    /// Enumerated constant of a registered enum
    Enum(String),
    Array(Box<TypeTag>),
    List(Box<TypeTag>),
    /// Value-object of a registered composite type
    Composite(String),
    /// Reference to a named external resource
    Asset(String),
}

impl TypeTag {
    pub fn array(element: TypeTag) -> Self {
        TypeTag::Array(Box::new(element))
    }

    pub fn list(element: TypeTag) -> Self {
        TypeTag::List(Box::new(element))
    }

    pub fn composite(name: impl Into<String>) -> Self {
        TypeTag::Composite(name.into())
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        TypeTag::Enum(name.into())
    }

    pub fn asset(name: impl Into<String>) -> Self {
        TypeTag::Asset(name.into())
    }

    /// Sequence kind and element tag, if this is a sequence
    pub fn as_sequence(&self) -> Option<(SeqKind, &TypeTag)> {
        match self {
            TypeTag::Array(element) => Some((SeqKind::Array, element)),
            TypeTag::List(element) => Some((SeqKind::List, element)),
            _ => None,
        }
    }

    /// Fixed-size numeric or boolean
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            TypeTag::Bool
                | TypeTag::I8
                | TypeTag::I16
                | TypeTag::I32
                | TypeTag::I64
                | TypeTag::U8
                | TypeTag::U16
                | TypeTag::U32
                | TypeTag::U64
                | TypeTag::F32
                | TypeTag::F64
        )
    }

    pub fn is_float(&self) -> bool {
        matches!(self, TypeTag::F32 | TypeTag::F64)
    }

    /// Return types the schema cache treats as queryable
    pub fn is_bool_or_float(&self) -> bool {
        matches!(self, TypeTag::Bool) || self.is_float()
    }

    fn primitive_name(&self) -> Option<&'static str> {
        Some(match self {
            TypeTag::Bool => "bool",
            TypeTag::I8 => "i8",
            TypeTag::I16 => "i16",
            TypeTag::I32 => "i32",
            TypeTag::I64 => "i64",
            TypeTag::U8 => "u8",
            TypeTag::U16 => "u16",
            TypeTag::U32 => "u32",
            TypeTag::U64 => "u64",
            TypeTag::F32 => "f32",
            TypeTag::F64 => "f64",
            TypeTag::Str => "string",
            _ => return None,
        })
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.primitive_name() {
            return f.write_str(name);
        }
        match self {
            TypeTag::Enum(name) => write!(f, "enum:{name}"),
            TypeTag::Composite(name) => write!(f, "composite:{name}"),
            TypeTag::Asset(name) => write!(f, "asset:{name}"),
            TypeTag::Array(element) => write!(f, "array<{element}>"),
            TypeTag::List(element) => write!(f, "list<{element}>"),
            _ => unreachable!("primitive handled above"),
        }
    }
}

impl FromStr for TypeTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unresolved = || Error::UnresolvedType(s.to_string());

        // Peel sequence wrappers iteratively so hostile nesting cannot blow the stack
        let mut wrappers = Vec::new();
        let mut rest = s.trim();
        loop {
            let (kind, inner) = if let Some(inner) = rest.strip_prefix("array<") {
                (SeqKind::Array, inner)
            } else if let Some(inner) = rest.strip_prefix("list<") {
                (SeqKind::List, inner)
            } else {
                break;
            };
            if wrappers.len() >= crate::consts::MAX_DEPTH {
                return Err(unresolved());
            }
            rest = inner.strip_suffix('>').ok_or_else(unresolved)?.trim();
            wrappers.push(kind);
        }

        let mut tag = parse_leaf(rest).ok_or_else(unresolved)?;
        for kind in wrappers.into_iter().rev() {
            tag = match kind {
                SeqKind::Array => TypeTag::array(tag),
                SeqKind::List => TypeTag::list(tag),
            };
        }
        Ok(tag)
    }
}

fn parse_leaf(s: &str) -> Option<TypeTag> {
    let tag = match s {
        "bool" => TypeTag::Bool,
        "i8" => TypeTag::I8,
        "i16" => TypeTag::I16,
        "i32" => TypeTag::I32,
        "i64" => TypeTag::I64,
        "u8" => TypeTag::U8,
        "u16" => TypeTag::U16,
        "u32" => TypeTag::U32,
        "u64" => TypeTag::U64,
        "f32" => TypeTag::F32,
        "f64" => TypeTag::F64,
        "string" => TypeTag::Str,
        _ => {
            let (prefix, name) = s.split_once(':')?;
            if !is_identifier(name) {
                return None;
            }
            match prefix {
                "enum" => TypeTag::enumeration(name),
                "composite" => TypeTag::composite(name),
                "asset" => TypeTag::asset(name),
                _ => return None,
            }
        }
    };
    Some(tag)
}

/// Registered type names: ASCII letters, digits, `_` and `::` path separators
fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_display() {
        assert_eq!(TypeTag::F32.to_string(), "f32");
        assert_eq!(TypeTag::Str.to_string(), "string");
        assert_eq!(TypeTag::composite("ClassTest").to_string(), "composite:ClassTest");
        assert_eq!(
            TypeTag::list(TypeTag::array(TypeTag::I32)).to_string(),
            "list<array<i32>>"
        );
    }

    #[test]
    fn test_tag_parse_nested() {
        let tag: TypeTag = "array<list<composite:ClassTest>>".parse().unwrap();
        assert_eq!(
            tag,
            TypeTag::array(TypeTag::list(TypeTag::composite("ClassTest")))
        );
        let tag: TypeTag = "asset:Weapon".parse().unwrap();
        assert_eq!(tag, TypeTag::asset("Weapon"));
    }

    #[test]
    fn test_tag_parse_rejects_garbage() {
        assert!("System.Int32, mscorlib".parse::<TypeTag>().is_err());
        assert!("array<i32".parse::<TypeTag>().is_err());
        assert!("widget:Thing".parse::<TypeTag>().is_err());
        assert!("composite:".parse::<TypeTag>().is_err());
        assert!("".parse::<TypeTag>().is_err());
    }

    #[test]
    fn test_tag_parse_limits_nesting() {
        let nested = |n: usize| format!("{}i32{}", "list<".repeat(n), ">".repeat(n));

        let tag: TypeTag = nested(crate::consts::MAX_DEPTH).parse().unwrap();
        assert!(tag.as_sequence().is_some());

        let err = nested(crate::consts::MAX_DEPTH + 1).parse::<TypeTag>();
        assert!(matches!(err, Err(Error::UnresolvedType(_))));
        let err = nested(200_000).parse::<TypeTag>();
        assert!(matches!(err, Err(Error::UnresolvedType(_))));
    }

    #[test]
    fn test_sequence_accessor() {
        let tag = TypeTag::list(TypeTag::Bool);
        let (kind, element) = tag.as_sequence().unwrap();
        assert_eq!(kind, SeqKind::List);
        assert_eq!(element, &TypeTag::Bool);
        assert!(TypeTag::Bool.as_sequence().is_none());
    }
}
