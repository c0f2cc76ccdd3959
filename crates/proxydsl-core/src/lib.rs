//! proxydsl-core - Kotlin builder DSL generation for proxy configuration classes
//!
//! This crate turns a schema manifest describing annotated configuration
//! classes into one Kotlin builder per configuration element:
//! - [`Manifest`] for the class graph and its markers
//! - [`codegen`] for discovery, shape derivation, and synthesis
//! - [`Emitter`] for writing artifacts
//! - [`GeneratorConfig`] for run settings

pub mod codegen;
mod config;
mod emit;
mod error;
mod manifest;

pub use codegen::{GeneratedFile, GenerationReport, SchemaIndex, generate_sources};
pub use config::{EntryPoint, GeneratorConfig};
pub use emit::Emitter;
pub use error::{DslError, DslResult, EmitError, GenerateError, ManifestError};
pub use manifest::{AttributeDef, ChildDef, ClassDef, Manifest, Sample};

use std::path::PathBuf;
use tracing::info;

/// What a completed run produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Artifacts written, in generation order
    pub written: Vec<PathBuf>,

    /// Elements whose builder could not be generated
    pub failures: Vec<GenerateError>,

    /// Builder functions across all written artifacts
    pub functions: usize,
}

impl RunSummary {
    /// Whether every element was generated and written.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Derive and render every builder without writing anything.
pub fn check(manifest: &Manifest, config: &GeneratorConfig) -> DslResult<GenerationReport> {
    config.validate()?;
    let index = SchemaIndex::build(manifest)?;
    Ok(generate_sources(&index, config)?)
}

/// Run the whole pipeline: discover, derive, synthesize, and emit.
///
/// `config` is the effective configuration, normally the manifest's
/// `[generator]` table with command-line overrides applied. Per-element
/// failures are returned in the summary; manifest and emission errors
/// abort the run.
pub fn run(manifest: &Manifest, config: &GeneratorConfig) -> DslResult<RunSummary> {
    let report = check(manifest, config)?;

    let emitter = Emitter::new(config);
    let written = emitter.emit_all(&report.files)?;

    info!(
        written = written.len(),
        failed = report.failures.len(),
        dir = %emitter.package_dir().display(),
        "generation finished"
    );

    Ok(RunSummary {
        functions: report.function_count(),
        written,
        failures: report.failures,
    })
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        DslError, DslResult, Emitter, GeneratorConfig, Manifest, RunSummary, SchemaIndex, check,
        run,
    };
}
