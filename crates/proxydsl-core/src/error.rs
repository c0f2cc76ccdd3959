//! Error types for schema loading, builder generation, and emission

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for whole-run operations
pub type DslResult<T> = Result<T, DslError>;

/// Errors raised while loading or validating a schema manifest.
///
/// All of these are fatal: nothing is generated from an invalid manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("failed to read manifest {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("invalid TOML manifest: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error.
    #[error("invalid JSON manifest: {0}")]
    Json(#[from] serde_json::Error),

    /// The file extension is neither `.toml` nor `.json`.
    #[error("unsupported manifest format: {0}")]
    UnsupportedFormat(PathBuf),

    /// A required name is empty.
    #[error("empty {0}")]
    EmptyName(String),

    /// Two classes share one qualified name.
    #[error("duplicate class: {0}")]
    DuplicateClass(String),

    /// A type reference does not name any class in the manifest.
    #[error("{class}: unresolved type reference '{reference}'")]
    UnresolvedType { class: String, reference: String },

    /// A simple-name reference matches more than one class.
    #[error("ambiguous type reference '{reference}', candidates: {}", candidates.join(", "))]
    AmbiguousType {
        reference: String,
        candidates: Vec<String>,
    },

    /// A class is its own ancestor.
    #[error("inheritance cycle through {0}")]
    InheritanceCycle(String),

    /// An element name is not a usable identifier.
    #[error("{class}: invalid element name '{name}'")]
    InvalidElementName { class: String, name: String },

    /// A marked method is not a `setXxx` setter.
    #[error("{class}: '{setter}' is not a setter")]
    InvalidSetter { class: String, setter: String },

    /// Two element classes derive the same generated type name.
    #[error("generated name {name} is shared by {first} and {second}")]
    GeneratedNameCollision {
        name: String,
        first: String,
        second: String,
    },

    /// The configured entry point names a class without any element ancestry.
    #[error("entry point class {0} is not a configuration element")]
    EntryNotAnElement(String),

    /// Invalid generator settings.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Per-type generation failures.
///
/// Each variant names the generated type whose artifact could not be
/// produced; the rest of the run is unaffected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerateError {
    /// A child type cannot be default-constructed, so neither its defaults
    /// nor its instantiation in the builder body are available.
    #[error("{owner}: cannot sample {class}: {reason}")]
    Sampling {
        owner: String,
        class: String,
        reason: String,
    },

    /// A repeatable child slot whose collection type carries no element type.
    #[error("{owner}: {setter} accepts raw collection '{parameter}'")]
    RawCollection {
        owner: String,
        setter: String,
        parameter: String,
    },

    /// The child parameter names a class missing from the manifest.
    #[error("{owner}: {setter} accepts unknown type '{type_name}'")]
    UnknownChildType {
        owner: String,
        setter: String,
        type_name: String,
    },

    /// The child type neither is an element nor has element subtypes.
    #[error("{owner}: {setter} accepts {type_name}, which has no element implementations")]
    NotAnElement {
        owner: String,
        setter: String,
        type_name: String,
    },

    /// The child parameter type could not be interpreted.
    #[error("{owner}: {setter} has unsupported parameter '{parameter}': {reason}")]
    UnsupportedParameter {
        owner: String,
        setter: String,
        parameter: String,
        reason: String,
    },

    /// Two child slots expand to builder functions with the same name and
    /// JVM signature.
    #[error("{owner}: function {function} is generated twice, from {}", setters.join(" and "))]
    ConflictingFunctions {
        owner: String,
        function: String,
        setters: Vec<String>,
    },
}

impl GenerateError {
    /// Name of the generated type this failure belongs to.
    pub fn type_name(&self) -> &str {
        match self {
            GenerateError::Sampling { owner, .. }
            | GenerateError::RawCollection { owner, .. }
            | GenerateError::UnknownChildType { owner, .. }
            | GenerateError::NotAnElement { owner, .. }
            | GenerateError::UnsupportedParameter { owner, .. }
            | GenerateError::ConflictingFunctions { owner, .. } => owner,
        }
    }
}

/// Failures while writing generated artifacts. Always fatal.
#[derive(Debug, Error)]
pub enum EmitError {
    /// The artifact's directory could not be created.
    #[error("{type_name}: cannot create directory {path}: {source}")]
    CreateDir {
        type_name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact could not be written.
    #[error("{type_name}: cannot write {path}: {source}")]
    Write {
        type_name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EmitError {
    /// Name of the generated type whose artifact failed.
    pub fn type_name(&self) -> &str {
        match self {
            EmitError::CreateDir { type_name, .. } | EmitError::Write { type_name, .. } => {
                type_name
            }
        }
    }
}

/// Fatal errors that stop a run.
#[derive(Debug, Error)]
pub enum DslError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Emit(#[from] EmitError),
}
