//! Intermediate representation for builder generation.
//!
//! The shape deriver turns each discovered element class into an
//! [`ElementShape`]: its attributes and child relationships with every
//! polymorphic slot already expanded into concrete targets. The builder
//! synthesizer then turns a shape into [`Parts`], the pieces of one generated
//! Kotlin class.
//!
//! # Structure
//!
//! - [`ElementShape`]: one element class and the slots it accepts
//! - [`ChildRelationship`]: one child setter, singular or repeatable
//! - [`ChildTarget`]: one concrete class a relationship accepts
//! - [`AttributeDescriptor`]: one scalar parameter with its mined default
//! - [`Parts`]: generated name, constructor property, and functions

use super::jvm_types::ValueType;
use super::kotlin::{ClassName, Code, FunSpec, ParameterSpec, TypeName, string_literal};

/// Name of the receiver-lambda parameter of nesting builder functions.
pub const INIT_PARAMETER: &str = "init";

/// One configurable scalar property of an element.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDescriptor {
    /// Java setter applied in the builder body
    pub setter: String,

    /// Kotlin parameter name (already keyword-escaped)
    pub parameter: String,

    /// Declared value type
    pub value_type: ValueType,

    /// Mandatory: carries the required or text-content marker
    pub required: bool,

    /// Whether the Kotlin parameter admits `null`
    pub nullable: bool,

    /// Mined default; always `None` for required attributes
    pub default: Option<DefaultValue>,
}

impl AttributeDescriptor {
    /// Kotlin parameter type.
    pub fn kotlin_type(&self) -> TypeName {
        TypeName::with_nullability(self.value_type.jvm_type().kotlin, self.nullable)
    }

    /// Kotlin parameter declaration.
    pub fn parameter_spec(&self) -> ParameterSpec {
        let spec = ParameterSpec::new(self.parameter.clone(), self.kotlin_type());
        match &self.default {
            Some(default) => spec.with_default(default.to_code()),
            None => spec,
        }
    }
}

/// A default value rendered into a parameter declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Boolean or integral literal, written as is
    Literal(String),
    /// String literal
    Str(String),
    /// Enum constant, written as `Type.CONSTANT`
    EnumConstant { class: ClassName, constant: String },
    /// `null`
    Null,
}

impl DefaultValue {
    /// Kotlin expression for this default.
    pub fn to_code(&self) -> Code {
        match self {
            DefaultValue::Literal(literal) => Code::of(literal.clone()),
            DefaultValue::Str(value) => Code::of(string_literal(value)),
            DefaultValue::EnumConstant { class, constant } => {
                Code::new().ty(class).text(format!(".{constant}"))
            }
            DefaultValue::Null => Code::of("null"),
        }
    }
}

/// How a child instance is attached to its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// `parent.prop = child`
    Single,
    /// `parent.prop.add(child)`
    Repeatable,
}

/// One concrete class accepted by a child relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildTarget {
    /// Host class instantiated by the builder function
    pub class: ClassName,

    /// Builder function name: the class's external element name
    pub function: String,

    /// Local variable holding the new instance
    pub local: String,

    /// Required attributes first, then optional ones
    pub attributes: Vec<AttributeDescriptor>,

    /// Generated builder of the target, when it accepts children itself
    pub nested_spec: Option<ClassName>,
}

impl ChildTarget {
    /// Parameter types of the generated function as the JVM sees them.
    ///
    /// Nullability and lambda receivers are erased, so two functions with
    /// the same name and signature clash even when their Kotlin types differ.
    pub fn signature(&self) -> Vec<String> {
        self.attributes
            .iter()
            .map(|attribute| attribute.value_type.jvm_type().kotlin.canonical())
            .chain(self.nested_spec.as_ref().map(|_| "kotlin.Function1".to_string()))
            .collect()
    }
}

/// One nested-element slot of an element.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildRelationship {
    /// Java setter carrying the child marker
    pub setter: String,

    /// Kotlin property behind the setter
    pub accessor: String,

    pub cardinality: Cardinality,

    /// Declared element type, as resolved
    pub declared: String,

    /// Concrete targets, one generated function each
    pub targets: Vec<ChildTarget>,
}

/// Everything the synthesizer needs about one element class.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementShape {
    /// Generated builder type
    pub spec: ClassName,

    /// Wrapped host class
    pub host: ClassName,

    /// Constructor property exposing the wrapped instance
    pub property: String,

    pub relationships: Vec<ChildRelationship>,
}

impl ElementShape {
    /// Number of builder functions this shape expands to.
    pub fn function_count(&self) -> usize {
        self.relationships.iter().map(|r| r.targets.len()).sum()
    }
}

/// The pieces of one generated builder class.
#[derive(Debug, Clone, PartialEq)]
pub struct Parts {
    /// Generated type name
    pub name: String,

    /// Primary constructor parameter wrapping the host instance
    pub constructor: ParameterSpec,

    /// Property exposing the wrapped instance
    pub property: String,

    /// One function per relationship × concrete target
    pub functions: Vec<FunSpec>,
}
