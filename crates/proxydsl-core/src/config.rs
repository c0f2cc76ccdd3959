//! Generator configuration

use crate::error::ManifestError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for one generator run, read from the `[generator]` table of the
/// schema manifest and optionally overridden on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Package of the generated Kotlin sources
    #[serde(default = "default_package")]
    pub package: String,

    /// Root directory that receives generated sources
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Spaces per indentation level
    #[serde(default = "default_indent")]
    pub indent: usize,

    /// Extension of generated artifacts, without the dot
    #[serde(default = "default_file_extension")]
    pub file_extension: String,

    /// Optional top-level entry function wrapping a root element
    #[serde(default)]
    pub entry: Option<EntryPoint>,
}

/// A top-level DSL entry function such as `router { ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPoint {
    /// Name of the generated function
    pub function: String,

    /// Class instantiated as the configuration root
    pub class: String,
}

fn default_package() -> String {
    "com.predic8.membrane.dsl".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("build/generated")
}

fn default_indent() -> usize {
    4
}

fn default_file_extension() -> String {
    "kt".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            package: default_package(),
            output_dir: default_output_dir(),
            indent: default_indent(),
            file_extension: default_file_extension(),
            entry: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the output directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Override the generated package
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Directory inside `output_dir` that mirrors the package path
    pub fn package_dir(&self) -> PathBuf {
        self.package
            .split('.')
            .filter(|segment| !segment.is_empty())
            .fold(self.output_dir.clone(), |dir, segment| dir.join(segment))
    }

    /// Indentation unit used by the renderer
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indent)
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), ManifestError> {
        let package_ok = !self.package.is_empty()
            && self
                .package
                .split('.')
                .all(crate::codegen::naming::is_identifier);
        if !package_ok {
            return Err(ManifestError::Config(format!(
                "invalid package name '{}'",
                self.package
            )));
        }

        if self.indent == 0 {
            return Err(ManifestError::Config("indent must be positive".to_string()));
        }

        if self.file_extension.is_empty() || self.file_extension.contains(['.', '/', '\\']) {
            return Err(ManifestError::Config(format!(
                "invalid file extension '{}'",
                self.file_extension
            )));
        }

        if let Some(entry) = &self.entry {
            if !crate::codegen::naming::is_identifier(&entry.function) {
                return Err(ManifestError::Config(format!(
                    "invalid entry function name '{}'",
                    entry.function
                )));
            }
            if entry.class.is_empty() {
                return Err(ManifestError::EmptyName("entry class".to_string()));
            }
        }

        Ok(())
    }
}
