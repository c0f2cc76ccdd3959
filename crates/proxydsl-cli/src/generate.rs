//! `proxydsl generate`

use anyhow::{Context, Result};
use proxydsl_core::{GeneratorConfig, Manifest};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Load a manifest, naming the file in any error.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    Manifest::from_file(path).with_context(|| format!("Failed to load manifest: {}", path.display()))
}

/// The manifest's `[generator]` settings with command-line overrides applied.
///
/// A relative output directory from the manifest is resolved against the
/// manifest's directory; one given on the command line is used as is.
pub fn effective_config(
    manifest: &Manifest,
    manifest_path: &Path,
    output: Option<PathBuf>,
    package: Option<String>,
) -> GeneratorConfig {
    let mut config = manifest.generator.clone();

    config.output_dir = match output {
        Some(output) => output,
        None if config.output_dir.is_relative() => manifest_path
            .parent()
            .map(|dir| dir.join(&config.output_dir))
            .unwrap_or_else(|| config.output_dir.clone()),
        None => config.output_dir.clone(),
    };

    if let Some(package) = package {
        config = config.with_package(package);
    }

    debug!(
        package = %config.package,
        output = %config.output_dir.display(),
        extension = %config.file_extension,
        "effective generator config"
    );

    config
}

pub fn run(manifest_path: &Path, output: Option<PathBuf>, package: Option<String>) -> Result<()> {
    let manifest = load_manifest(manifest_path)?;
    let config = effective_config(&manifest, manifest_path, output, package);

    println!("Generating Kotlin DSL from {}", manifest_path.display());
    println!("  Package: {}", config.package);
    println!("  Output:  {}", config.output_dir.display());

    info!(
        manifest = %manifest_path.display(),
        classes = manifest.classes.len(),
        "loaded manifest"
    );

    let summary = proxydsl_core::run(&manifest, &config).context("Generation failed")?;

    println!(
        "✓ Wrote {} files ({} builder functions)",
        summary.written.len(),
        summary.functions
    );

    if !summary.is_success() {
        eprintln!("\n✗ {} types could not be generated:", summary.failures.len());
        for failure in &summary.failures {
            eprintln!("  - {failure}");
        }
        anyhow::bail!("{} of the configuration elements failed", summary.failures.len());
    }

    Ok(())
}
