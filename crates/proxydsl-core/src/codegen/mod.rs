//! Kotlin builder generation from a schema manifest.
//!
//! # Architecture
//!
//! The generator is a four-stage pipeline:
//!
//! ```text
//! Manifest (TOML / JSON)
//!     ↓
//!  [Discoverer]    SchemaIndex: elements, subtypes, inherited markers
//!     ↓
//!  [Deriver]       ElementShape per element
//!     ↓
//!  [Synthesizer]   Parts → FileSpec
//!     ↓
//!  [Renderer]      Kotlin source text
//! ```
//!
//! Stages before rendering are pure; a failure while deriving one element
//! is recorded against that element and the others are still generated.
//!
//! # Usage
//!
//! ```rust
//! use proxydsl_core::codegen::{SchemaIndex, generate_sources};
//! use proxydsl_core::{GeneratorConfig, Manifest};
//!
//! let manifest = Manifest::from_toml(r#"
//! [[class]]
//! name = "Target"
//! package = "com.example"
//! element = "target"
//! "#).unwrap();
//!
//! let index = SchemaIndex::build(&manifest).unwrap();
//! let report = generate_sources(&index, &GeneratorConfig::default()).unwrap();
//!
//! assert_eq!(report.files[0].type_name, "TargetSpec");
//! assert!(report.failures.is_empty());
//! ```
//!
//! # See Also
//!
//! - [`discover`] for the subtype index
//! - [`derive`] for attribute and child classification
//! - [`builder`] for the generated class layout
//! - [`kotlin`] for import handling and rendering

pub mod builder;
pub mod derive;
pub mod discover;
pub mod ir;
pub mod jvm_types;
pub mod kotlin;
pub mod naming;

pub use derive::ShapeDeriver;
pub use discover::{ClassId, SchemaIndex};
pub use ir::{ElementShape, Parts};

use crate::config::GeneratorConfig;
use crate::error::{GenerateError, ManifestError};
use tracing::{debug, warn};

/// Rendered source of one generated type.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    /// Generated type (or entry file) name, also the file stem
    pub type_name: String,

    /// Kotlin source text
    pub source: String,

    /// Builder functions declared in the file
    pub functions: usize,
}

/// Outcome of generating every element of a manifest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    /// Successfully rendered files, in manifest order
    pub files: Vec<GeneratedFile>,

    /// Elements whose builder could not be generated
    pub failures: Vec<GenerateError>,
}

impl GenerationReport {
    /// Total builder functions across all generated files.
    pub fn function_count(&self) -> usize {
        self.files.iter().map(|f| f.functions).sum()
    }

    /// Whether every element was generated.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Generate the sources of every element in the index.
///
/// Per-element failures are collected in the report; only an invalid
/// entry point is fatal.
pub fn generate_sources(
    index: &SchemaIndex<'_>,
    config: &GeneratorConfig,
) -> Result<GenerationReport, ManifestError> {
    let deriver = ShapeDeriver::new(index, &config.package);
    let indent = config.indent_unit();
    let mut report = GenerationReport::default();

    for id in index.elements() {
        match deriver.derive(id) {
            Ok(shape) => {
                let parts = builder::parts(&shape);
                let source = builder::builder_file(&parts, &config.package).render(&indent);
                debug!(type_name = %parts.name, bytes = source.len(), "rendered builder");
                report.files.push(GeneratedFile {
                    type_name: parts.name,
                    source,
                    functions: parts.functions.len(),
                });
            }
            Err(err) => {
                warn!(type_name = %err.type_name(), error = %err, "builder generation failed");
                report.failures.push(err);
            }
        }
    }

    if let Some(entry) = &config.entry {
        let (root, element) = index.entry_point(entry)?;
        let file = builder::entry_file(
            &entry.function,
            &index.class_name(root),
            &deriver.spec_class(element),
            &config.package,
        );
        report.files.push(GeneratedFile {
            type_name: file.name.clone(),
            source: file.render(&indent),
            functions: file.functions.len(),
        });
    }

    Ok(report)
}
