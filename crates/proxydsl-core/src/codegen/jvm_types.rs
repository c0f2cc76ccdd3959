//! JVM type mappings for Kotlin builder generation.
//!
//! Attribute setter parameters are projected onto Kotlin types, and child
//! setter parameters are parsed far enough to tell a single element from a
//! collection of elements.
//!
//! # Type Mappings
//!
//! | Java | Kotlin | Nullable |
//! |------|--------|----------|
//! | `boolean` | `Boolean` | never |
//! | `byte` | `Byte` | never |
//! | `short` | `Short` | never |
//! | `int` | `Int` | never |
//! | `long` | `Long` | never |
//! | `String` | `String` | when no value is supplied |
//! | `Boolean` / `Byte` / `Short` / `Integer` / `Long` | `Boolean` / `Byte` / `Short` / `Int` / `Long` | always |
//! | enum `E` | `E` | always |
//! | other class `C` | `C` | always |

use super::kotlin::ClassName;
use crate::manifest::AttributeDef;
use std::ops::RangeInclusive;

/// A JVM type together with its Kotlin projection.
#[derive(Debug, Clone, PartialEq)]
pub struct JvmType {
    /// The Java type name as declared (e.g., "int", "java.lang.String").
    pub java: String,
    /// The Kotlin class the Java type maps to.
    pub kotlin: ClassName,
    /// Whether this is a Java primitive (never null).
    pub is_primitive: bool,
}

impl JvmType {
    fn builtin(java: &str, kotlin: &str, is_primitive: bool) -> Self {
        Self {
            java: java.to_string(),
            kotlin: ClassName::kotlin(kotlin),
            is_primitive,
        }
    }

    /// Create a JVM reference type from a qualified Java name.
    pub fn reference(java: &str) -> Self {
        Self {
            java: java.to_string(),
            kotlin: ClassName::parse(java),
            is_primitive: false,
        }
    }

    /// Get the Kotlin type string.
    ///
    /// Kotlin always uses the same type name, but adds `?` for nullable.
    pub fn kotlin_type(&self, nullable: bool) -> String {
        if nullable {
            format!("{}?", self.kotlin.simple_name())
        } else {
            self.kotlin.simple_name().to_string()
        }
    }
}

/// Classification of an attribute's value type.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueType {
    /// Primitive `boolean`
    Boolean,
    /// Primitive `byte`
    Byte,
    /// Primitive `short`
    Short,
    /// Primitive `int`
    Int,
    /// Primitive `long`
    Long,
    /// `java.lang.String`
    String,
    /// `Boolean`, `Byte`, `Short`, `Integer` or `Long` wrapper
    Boxed(JvmType),
    /// Enum type
    Enum(JvmType),
    /// Any other class
    Object(JvmType),
}

impl ValueType {
    /// Classify an attribute's declared parameter type.
    pub fn of(attribute: &AttributeDef) -> Self {
        let ty = attribute.ty.trim();
        if attribute.is_enum {
            return ValueType::Enum(JvmType::reference(ty));
        }
        match ty {
            "boolean" => ValueType::Boolean,
            "byte" => ValueType::Byte,
            "short" => ValueType::Short,
            "int" => ValueType::Int,
            "long" => ValueType::Long,
            "String" | "java.lang.String" => ValueType::String,
            "Boolean" | "java.lang.Boolean" => {
                ValueType::Boxed(JvmType::builtin(ty, "Boolean", false))
            }
            "Byte" | "java.lang.Byte" => ValueType::Boxed(JvmType::builtin(ty, "Byte", false)),
            "Short" | "java.lang.Short" => ValueType::Boxed(JvmType::builtin(ty, "Short", false)),
            "Integer" | "java.lang.Integer" => ValueType::Boxed(JvmType::builtin(ty, "Int", false)),
            "Long" | "java.lang.Long" => ValueType::Boxed(JvmType::builtin(ty, "Long", false)),
            other => ValueType::Object(JvmType::reference(other)),
        }
    }

    /// Map to a JVM type.
    pub fn jvm_type(&self) -> JvmType {
        match self {
            ValueType::Boolean => JvmType::builtin("boolean", "Boolean", true),
            ValueType::Byte => JvmType::builtin("byte", "Byte", true),
            ValueType::Short => JvmType::builtin("short", "Short", true),
            ValueType::Int => JvmType::builtin("int", "Int", true),
            ValueType::Long => JvmType::builtin("long", "Long", true),
            ValueType::String => JvmType::builtin("String", "String", false),
            ValueType::Boxed(ty) | ValueType::Enum(ty) | ValueType::Object(ty) => ty.clone(),
        }
    }

    /// Whether the getter for this type uses the `is` prefix.
    pub fn is_primitive_boolean(&self) -> bool {
        matches!(self, ValueType::Boolean)
    }

    /// Whether the Kotlin parameter can never be null.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            ValueType::Boolean | ValueType::Byte | ValueType::Short | ValueType::Int | ValueType::Long
        )
    }

    /// Values a primitive integral type can hold.
    pub fn integral_range(&self) -> Option<RangeInclusive<i64>> {
        match self {
            ValueType::Byte => Some(i8::MIN.into()..=i8::MAX.into()),
            ValueType::Short => Some(i16::MIN.into()..=i16::MAX.into()),
            ValueType::Int => Some(i32::MIN.into()..=i32::MAX.into()),
            ValueType::Long => Some(i64::MIN..=i64::MAX),
            _ => None,
        }
    }

    /// Literal used when a primitive has no sampled value.
    pub fn zero_literal(&self) -> Option<&'static str> {
        match self {
            ValueType::Boolean => Some("false"),
            ValueType::Byte | ValueType::Short | ValueType::Int | ValueType::Long => Some("0"),
            _ => None,
        }
    }
}

/// Simple names of Java collection types accepted by repeatable child setters.
const COLLECTION_TYPES: &[&str] = &[
    "Collection",
    "List",
    "ArrayList",
    "LinkedList",
    "Set",
    "HashSet",
    "LinkedHashSet",
    "SortedSet",
    "TreeSet",
];

/// A parsed Java type expression such as `java.util.List<Interceptor>`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    /// Raw type name as written
    pub name: String,
    /// Generic type arguments
    pub args: Vec<TypeExpr>,
}

impl TypeExpr {
    /// Parse a type expression.
    ///
    /// Upper-bounded wildcards (`? extends T`) are read as `T`.
    pub fn parse(source: &str) -> Result<Self, String> {
        let mut parser = TypeParser {
            chars: source.chars().collect(),
            pos: 0,
        };
        let expr = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos != parser.chars.len() {
            return Err(format!("unexpected trailing input at offset {}", parser.pos));
        }
        Ok(expr)
    }

    /// Simple name without package qualification.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Whether this names a known Java collection type.
    pub fn is_collection(&self) -> bool {
        let qualified_elsewhere = self.name.contains('.') && !self.name.starts_with("java.util.");
        !qualified_elsewhere && COLLECTION_TYPES.contains(&self.simple_name())
    }
}

struct TypeParser {
    chars: Vec<char>,
    pos: usize,
}

impl TypeParser {
    fn skip_whitespace(&mut self) {
        while self.chars.get(self.pos).is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn parse_name(&mut self) -> Result<String, String> {
        self.skip_whitespace();
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '$' | '.'))
        {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        if name.is_empty() || name.starts_with('.') || name.ends_with('.') || name.contains("..")
        {
            return Err(format!("expected a type name at offset {start}"));
        }
        Ok(name)
    }

    fn parse_type(&mut self) -> Result<TypeExpr, String> {
        self.skip_whitespace();
        if self.peek() == Some('?') {
            self.pos += 1;
            let keyword = self.parse_name()?;
            if keyword != "extends" {
                return Err(format!("unsupported wildcard '? {keyword}'"));
            }
        }

        let name = self.parse_name()?;
        let mut args = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some('<') {
            self.pos += 1;
            loop {
                args.push(self.parse_type()?);
                self.skip_whitespace();
                match self.peek() {
                    Some(',') => self.pos += 1,
                    Some('>') => {
                        self.pos += 1;
                        break;
                    }
                    _ => return Err(format!("expected ',' or '>' at offset {}", self.pos)),
                }
            }
        }

        Ok(TypeExpr { name, args })
    }
}
