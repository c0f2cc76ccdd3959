//! Shape derivation: one element class in, one [`ElementShape`] out.
//!
//! Attributes are classified and given their mined defaults, child setters
//! are parsed into singular or repeatable relationships, and every declared
//! child type is expanded into the concrete element classes it accepts.

use super::discover::{ClassId, SchemaIndex, Unresolved};
use super::ir::{
    AttributeDescriptor, Cardinality, ChildRelationship, ChildTarget, DefaultValue, ElementShape,
    INIT_PARAMETER,
};
use super::jvm_types::{TypeExpr, ValueType};
use super::kotlin::ClassName;
use super::naming;
use crate::error::GenerateError;
use crate::manifest::{AttributeDef, ChildDef};
use serde_json::Value;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, warn};

/// Prefix for locals that would otherwise shadow another name in scope.
const SHADOW_PREFIX: &str = "child";

/// Suffix for an attribute parameter that collides with the `init` lambda.
const RENAMED_INIT_SUFFIX: &str = "Value";

/// Derives builder shapes from a [`SchemaIndex`].
#[derive(Debug, Clone, Copy)]
pub struct ShapeDeriver<'a, 'm> {
    index: &'a SchemaIndex<'m>,
    package: &'a str,
}

impl<'a, 'm> ShapeDeriver<'a, 'm> {
    /// Create a deriver placing generated builders in `package`.
    pub fn new(index: &'a SchemaIndex<'m>, package: &'a str) -> Self {
        Self { index, package }
    }

    /// Generated builder class for an element.
    pub fn spec_class(&self, id: ClassId) -> ClassName {
        ClassName::top_level(self.package, self.index.generated_name(id))
    }

    /// Derive the shape of one element class.
    pub fn derive(&self, id: ClassId) -> Result<ElementShape, GenerateError> {
        let host = self.index.class_name(id);
        let owner = self.index.generated_name(id);
        let property = naming::escape_identifier(&naming::type_to_property_name(host.simple_name()));

        let relationships = self
            .index
            .children(id)
            .into_iter()
            .map(|child| self.relationship(&owner, &property, child))
            .collect::<Result<Vec<_>, _>>()?;

        check_conflicts(&owner, &relationships)?;

        let shape = ElementShape {
            spec: self.spec_class(id),
            host,
            property,
            relationships,
        };

        debug!(
            spec = %owner,
            relationships = shape.relationships.len(),
            functions = shape.function_count(),
            "derived element shape"
        );

        Ok(shape)
    }

    fn relationship(
        &self,
        owner: &str,
        property: &str,
        child: &ChildDef,
    ) -> Result<ChildRelationship, GenerateError> {
        let unsupported = |reason: String| GenerateError::UnsupportedParameter {
            owner: owner.to_string(),
            setter: child.setter.clone(),
            parameter: child.parameter.clone(),
            reason,
        };

        let accessor = naming::property_from_setter(&child.setter)
            .map(|name| naming::escape_identifier(&name))
            .ok_or_else(|| unsupported("not a setter".to_string()))?;

        let expr = TypeExpr::parse(&child.parameter).map_err(unsupported)?;

        let (cardinality, declared) = if expr.is_collection() {
            match expr.args.as_slice() {
                [] => {
                    return Err(GenerateError::RawCollection {
                        owner: owner.to_string(),
                        setter: child.setter.clone(),
                        parameter: child.parameter.clone(),
                    });
                }
                [element] if element.args.is_empty() => {
                    (Cardinality::Repeatable, element.name.clone())
                }
                [_] => {
                    return Err(unsupported("nested generic element type".to_string()));
                }
                _ => return Err(unsupported("collection with several type arguments".to_string())),
            }
        } else if expr.args.is_empty() {
            (Cardinality::Single, expr.name.clone())
        } else {
            return Err(unsupported(format!("{} is not a collection", expr.name)));
        };

        let declared_id = self.index.resolve(&declared).map_err(|err| match err {
            Unresolved::Missing => GenerateError::UnknownChildType {
                owner: owner.to_string(),
                setter: child.setter.clone(),
                type_name: declared.clone(),
            },
            Unresolved::Ambiguous(candidates) => unsupported(format!(
                "'{declared}' is ambiguous: {}",
                candidates.join(", ")
            )),
        })?;

        let targets = self
            .concrete_targets(declared_id)
            .ok_or_else(|| GenerateError::NotAnElement {
                owner: owner.to_string(),
                setter: child.setter.clone(),
                type_name: self.index.class(declared_id).qualified_name(),
            })?
            .into_iter()
            .map(|target| self.target(owner, property, target))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ChildRelationship {
            setter: child.setter.clone(),
            accessor,
            cardinality,
            declared: self.index.class(declared_id).qualified_name(),
            targets,
        })
    }

    /// Concrete element subtypes of a declared type, or the declared type
    /// itself when none are registered and it is an element.
    fn concrete_targets(&self, declared: ClassId) -> Option<Vec<ClassId>> {
        let concrete: Vec<ClassId> = self
            .index
            .subtypes_of(declared)
            .filter(|&id| {
                let class = self.index.class(id);
                class.is_element() && !class.is_abstract
            })
            .collect();

        if !concrete.is_empty() {
            Some(concrete)
        } else if self.index.class(declared).is_element() {
            Some(vec![declared])
        } else {
            None
        }
    }

    fn target(&self, owner: &str, property: &str, id: ClassId) -> Result<ChildTarget, GenerateError> {
        let class = self.index.class(id);
        if !class.is_instantiable() {
            let reason = if class.is_abstract {
                "class is abstract"
            } else {
                "no public no-argument constructor"
            };
            return Err(GenerateError::Sampling {
                owner: owner.to_string(),
                class: class.qualified_name(),
                reason: reason.to_string(),
            });
        }

        let nested_spec = self.index.has_children(id).then(|| self.spec_class(id));
        let mut attributes = self.attributes(id);
        if nested_spec.is_some() {
            for attribute in attributes.iter_mut().filter(|a| a.parameter == INIT_PARAMETER) {
                attribute.parameter = format!("{INIT_PARAMETER}{RENAMED_INIT_SUFFIX}");
            }
        }

        let host = self.index.class_name(id);
        let mut local = naming::type_to_property_name(host.simple_name());
        let escaped = naming::escape_identifier(&local);
        let taken = escaped == property
            || (nested_spec.is_some() && escaped == INIT_PARAMETER)
            || attributes.iter().any(|a| a.parameter == escaped);
        if taken {
            local = format!("{SHADOW_PREFIX}{}", naming::capitalize(&local));
        }

        Ok(ChildTarget {
            function: naming::escape_identifier(class.element.as_deref().unwrap_or(&class.name)),
            local: naming::escape_identifier(&local),
            attributes,
            nested_spec,
            class: host,
        })
    }

    /// Attribute descriptors: required first, then text content, then optional.
    fn attributes(&self, id: ClassId) -> Vec<AttributeDescriptor> {
        let declared = self.index.attributes(id);
        let (mandatory, optional): (Vec<_>, Vec<_>) = declared
            .into_iter()
            .partition(|a| a.required || a.text_content);
        let (text, required): (Vec<_>, Vec<_>) = mandatory.into_iter().partition(|a| a.text_content);

        required
            .into_iter()
            .chain(text)
            .map(|attribute| self.mandatory(attribute))
            .chain(optional.into_iter().map(|attribute| self.optional(id, attribute)))
            .collect()
    }

    fn mandatory(&self, attribute: &AttributeDef) -> AttributeDescriptor {
        let value_type = ValueType::of(attribute);
        AttributeDescriptor {
            setter: attribute.setter.clone(),
            parameter: parameter_for(attribute, &value_type),
            nullable: false,
            required: true,
            default: None,
            value_type,
        }
    }

    fn optional(&self, id: ClassId, attribute: &AttributeDef) -> AttributeDescriptor {
        let value_type = ValueType::of(attribute);
        let getter = naming::getter_name(&attribute.setter, value_type.is_primitive_boolean());
        let sampled = self.index.sampled_getter(id, &getter).or_else(|| {
            naming::property_from_setter(&attribute.setter)
                .and_then(|field| self.index.sampled_field(id, &field))
        });

        let default = match sampled {
            Some(value) => coerce(&value_type, value).unwrap_or_else(|| {
                warn!(
                    class = %self.index.class(id).qualified_name(),
                    setter = %attribute.setter,
                    value = %value,
                    "sampled value does not fit the attribute type, using zero value"
                );
                fallback(&value_type)
            }),
            None => {
                warn!(
                    class = %self.index.class(id).qualified_name(),
                    getter = %getter,
                    "no sampled default, using zero value"
                );
                fallback(&value_type)
            }
        };

        let nullable = !value_type.is_primitive()
            && (value_type != ValueType::String || default == DefaultValue::Null);

        debug!(
            setter = %attribute.setter,
            ty = %value_type.jvm_type().kotlin_type(nullable),
            "optional attribute"
        );

        AttributeDescriptor {
            setter: attribute.setter.clone(),
            parameter: parameter_for(attribute, &value_type),
            value_type,
            required: false,
            nullable,
            default: Some(default),
        }
    }
}

/// Reject two functions that share a name and JVM signature.
fn check_conflicts(owner: &str, relationships: &[ChildRelationship]) -> Result<(), GenerateError> {
    let mut seen: HashMap<(&str, Vec<String>), &str> = HashMap::new();
    for relationship in relationships {
        for target in &relationship.targets {
            match seen.entry((target.function.as_str(), target.signature())) {
                Entry::Occupied(first) => {
                    let mut setters = vec![first.get().to_string()];
                    if *first.get() != relationship.setter {
                        setters.push(relationship.setter.clone());
                    }
                    return Err(GenerateError::ConflictingFunctions {
                        owner: owner.to_string(),
                        function: target.function.clone(),
                        setters,
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(&relationship.setter);
                }
            }
        }
    }
    Ok(())
}

fn parameter_for(attribute: &AttributeDef, value_type: &ValueType) -> String {
    let getter = naming::getter_name(&attribute.setter, value_type.is_primitive_boolean());
    naming::escape_identifier(&naming::parameter_name(&getter))
}

/// Default used when nothing usable was sampled.
fn fallback(value_type: &ValueType) -> DefaultValue {
    value_type
        .zero_literal()
        .map(|zero| DefaultValue::Literal(zero.to_string()))
        .unwrap_or(DefaultValue::Null)
}

/// Turn a sampled value into a default, or `None` when it does not fit.
fn coerce(value_type: &ValueType, value: &Value) -> Option<DefaultValue> {
    if let Some(range) = value_type.integral_range() {
        return value
            .as_i64()
            .filter(|n| range.contains(n))
            .map(|n| DefaultValue::Literal(n.to_string()));
    }

    match (value_type, value) {
        (ValueType::Boolean, Value::Bool(b)) => Some(DefaultValue::Literal(b.to_string())),
        (ValueType::Boolean, _) => None,

        (_, Value::Null) => Some(DefaultValue::Null),

        (ValueType::Enum(ty), Value::String(constant)) if naming::is_identifier(constant) => {
            Some(DefaultValue::EnumConstant {
                class: ty.kotlin.clone(),
                constant: naming::escape_identifier(constant),
            })
        }
        (ValueType::Enum(_), _) => None,

        (ValueType::Boxed(_), Value::Bool(_)) => Some(DefaultValue::Literal(value.to_string())),
        (ValueType::Boxed(_), Value::Number(n)) if n.is_i64() || n.is_u64() => {
            Some(DefaultValue::Literal(n.to_string()))
        }
        (ValueType::Boxed(_), _) => None,

        (_, Value::String(s)) => Some(DefaultValue::Str(s.clone())),
        (_, other) => Some(DefaultValue::Str(other.to_string())),
    }
}
