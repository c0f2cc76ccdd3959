//! Schema manifest parsing and validation
//!
//! The manifest is a static description of the host framework's configuration
//! classes: everything the generator needs to know about marker annotations,
//! setter signatures, inheritance, and the state of a default-constructed
//! instance. It can be written as TOML or JSON.

use crate::codegen::naming;
use crate::config::GeneratorConfig;
use crate::error::ManifestError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Top-level manifest structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default, rename = "class")]
    pub classes: Vec<ClassDef>,
}

/// One host class: element, abstract supertype, or plain ancestor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Simple class name
    pub name: String,

    /// Java package
    #[serde(default)]
    pub package: String,

    /// Enclosing class for nested classes (`Outer` or `Outer.Middle`)
    #[serde(default)]
    pub enclosing: Option<String>,

    /// Direct superclass and implemented interfaces
    #[serde(default)]
    pub supertypes: Vec<String>,

    /// Interfaces and abstract classes
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,

    /// Whether a public no-argument constructor exists
    #[serde(default = "default_true")]
    pub default_constructible: bool,

    /// External element name; present when the class carries the element marker
    #[serde(default)]
    pub element: Option<String>,

    #[serde(default, rename = "attribute")]
    pub attributes: Vec<AttributeDef>,

    #[serde(default, rename = "child")]
    pub children: Vec<ChildDef>,

    #[serde(default)]
    pub sample: Sample,
}

/// A setter carrying the attribute or text-content marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDef {
    pub setter: String,

    /// Declared parameter type as written in Java
    #[serde(rename = "type")]
    pub ty: String,

    /// The parameter type is an enum
    #[serde(default, rename = "enum")]
    pub is_enum: bool,

    #[serde(default)]
    pub required: bool,

    /// Carries the text-content marker instead of the attribute marker
    #[serde(default)]
    pub text_content: bool,
}

/// A setter carrying the child-element marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildDef {
    pub setter: String,

    /// Declared parameter type, e.g. `Target` or `java.util.List<Interceptor>`
    pub parameter: String,
}

/// State observed on a freshly default-constructed instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Getter name to returned value
    #[serde(default)]
    pub getters: BTreeMap<String, serde_json::Value>,

    /// Internal field name to value
    #[serde(default)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

fn default_true() -> bool {
    true
}

impl ClassDef {
    /// Create a concrete, default-constructible class without members
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: package.into(),
            enclosing: None,
            supertypes: Vec::new(),
            is_abstract: false,
            default_constructible: true,
            element: None,
            attributes: Vec::new(),
            children: Vec::new(),
            sample: Sample::default(),
        }
    }

    /// Name relative to the package: `Outer.Name` for nested classes
    pub fn nested_name(&self) -> String {
        match &self.enclosing {
            Some(enclosing) => format!("{enclosing}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Fully qualified name
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.nested_name()
        } else {
            format!("{}.{}", self.package, self.nested_name())
        }
    }

    /// Simple name of the immediately enclosing class
    pub fn enclosing_simple_name(&self) -> Option<&str> {
        self.enclosing
            .as_deref()
            .and_then(|enclosing| enclosing.rsplit('.').next())
    }

    /// Whether the class carries the element marker
    pub fn is_element(&self) -> bool {
        self.element.is_some()
    }

    /// Whether instances can be created by the generated code
    pub fn is_instantiable(&self) -> bool {
        !self.is_abstract && self.default_constructible
    }
}

impl Manifest {
    /// Load manifest from a file; the extension selects TOML or JSON
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            _ => Err(ManifestError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Parse manifest from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse manifest from a JSON string
    pub fn from_json(content: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Validate the per-class facts that need no cross-references.
    ///
    /// Reference resolution, inheritance cycles and generated-name
    /// collisions are checked when the schema index is built.
    pub fn validate(&self) -> Result<(), ManifestError> {
        let mut seen = HashSet::new();
        for class in &self.classes {
            if class.name.is_empty() {
                return Err(ManifestError::EmptyName(format!(
                    "class name in package '{}'",
                    class.package
                )));
            }

            let qualified = class.qualified_name();
            if !seen.insert(qualified.clone()) {
                return Err(ManifestError::DuplicateClass(qualified));
            }

            if let Some(element) = &class.element {
                if !naming::is_identifier(element) {
                    return Err(ManifestError::InvalidElementName {
                        class: qualified,
                        name: element.clone(),
                    });
                }
            }

            let setters = class
                .attributes
                .iter()
                .map(|a| a.setter.as_str())
                .chain(class.children.iter().map(|c| c.setter.as_str()));
            for setter in setters {
                if naming::property_from_setter(setter).is_none() {
                    return Err(ManifestError::InvalidSetter {
                        class: qualified,
                        setter: setter.to_string(),
                    });
                }
            }

            for attribute in &class.attributes {
                if attribute.ty.is_empty() {
                    return Err(ManifestError::EmptyName(format!(
                        "type of {}.{}",
                        qualified, attribute.setter
                    )));
                }
            }
        }

        Ok(())
    }

    /// Number of classes carrying the element marker
    pub fn element_count(&self) -> usize {
        self.classes.iter().filter(|c| c.is_element()).count()
    }
}
