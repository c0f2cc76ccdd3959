//! `proxydsl check`

use crate::generate::{effective_config, load_manifest};
use anyhow::{Context, Result};
use std::path::Path;

pub fn run(manifest_path: &Path) -> Result<()> {
    println!("Checking manifest: {}", manifest_path.display());

    let manifest = load_manifest(manifest_path)?;
    let config = effective_config(&manifest, manifest_path, None, None);
    let report = proxydsl_core::check(&manifest, &config).context("Manifest is invalid")?;

    let abstract_types = manifest.classes.iter().filter(|c| c.is_abstract).count();

    println!("✓ Classes: {}", manifest.classes.len());
    println!("✓ Elements: {}", manifest.element_count());
    println!("✓ Abstract types: {abstract_types}");
    println!("✓ Builder functions: {}", report.function_count());

    if !report.is_complete() {
        eprintln!("\n✗ Failures: {}", report.failures.len());
        for failure in &report.failures {
            eprintln!("  - {failure}");
        }
        anyhow::bail!("{} types cannot be generated", report.failures.len());
    }

    println!("\nManifest is valid!");
    Ok(())
}
