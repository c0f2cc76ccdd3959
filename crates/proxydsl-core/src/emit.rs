//! Writing generated sources to disk

use crate::codegen::GeneratedFile;
use crate::config::GeneratorConfig;
use crate::error::EmitError;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Writes generated files below the configured package directory.
#[derive(Debug, Clone)]
pub struct Emitter {
    package_dir: PathBuf,
    extension: String,
}

impl Emitter {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            package_dir: config.package_dir(),
            extension: config.file_extension.clone(),
        }
    }

    /// Directory receiving every artifact.
    pub fn package_dir(&self) -> &PathBuf {
        &self.package_dir
    }

    /// Path of the artifact for a generated type.
    pub fn path_for(&self, type_name: &str) -> PathBuf {
        self.package_dir
            .join(format!("{type_name}.{}", self.extension))
    }

    /// Write one artifact, replacing any previous version.
    pub fn emit(&self, file: &GeneratedFile) -> Result<PathBuf, EmitError> {
        fs::create_dir_all(&self.package_dir).map_err(|source| EmitError::CreateDir {
            type_name: file.type_name.clone(),
            path: self.package_dir.clone(),
            source,
        })?;

        let path = self.path_for(&file.type_name);
        fs::write(&path, &file.source).map_err(|source| EmitError::Write {
            type_name: file.type_name.clone(),
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), "wrote artifact");
        Ok(path)
    }

    /// Write every artifact, stopping at the first failure.
    pub fn emit_all(&self, files: &[GeneratedFile]) -> Result<Vec<PathBuf>, EmitError> {
        files.iter().map(|file| self.emit(file)).collect()
    }
}
