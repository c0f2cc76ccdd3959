//! Integration tests for the proxydsl binary.
//!
//! Runs the built executable against manifests in temporary directories.

#![allow(non_snake_case)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const MANIFEST: &str = r#"
[generator]
package = "com.example.dsl"
output_dir = "generated"

[[class]]
name = "ServiceProxy"
package = "com.example"
element = "serviceProxy"

[[class.child]]
setter = "setTarget"
parameter = "Target"

[[class]]
name = "Target"
package = "com.example"
element = "target"

[[class.attribute]]
setter = "setHost"
type = "String"
required = true
"#;

fn proxydsl(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_proxydsl"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write_manifest(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("proxydsl.toml");
    fs::write(&path, content).unwrap();
    path
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

// =============================================================================
// generate
// =============================================================================

mod generate {
    use super::*;

    #[test]
    fn generate___valid_manifest___writes_next_to_manifest() {
        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(&dir, MANIFEST);

        let output = proxydsl(&["generate", "-m", arg(&manifest)]);

        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        let spec = dir.path().join("generated/com/example/dsl/ServiceProxySpec.kt");
        assert!(fs::read_to_string(spec).unwrap().contains("fun target(host: String) {"));
        assert!(String::from_utf8_lossy(&output.stdout).contains("✓ Wrote 2 files"));
    }

    #[test]
    fn generate___output_and_package_flags___override_manifest() {
        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(&dir, MANIFEST);
        let out = dir.path().join("out");

        let output = proxydsl(&[
            "generate",
            "-m",
            arg(&manifest),
            "-o",
            arg(&out),
            "-p",
            "org.acme",
        ]);

        assert!(output.status.success());
        let target = fs::read_to_string(out.join("org/acme/TargetSpec.kt")).unwrap();
        assert!(target.contains("package org.acme\n"));
    }

    #[test]
    fn generate___failing_type___exits_non_zero_and_writes_others() {
        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(
            &dir,
            &MANIFEST.replace(
                "element = \"target\"",
                "element = \"target\"\ndefault_constructible = false",
            ),
        );

        let output = proxydsl(&["generate", "-m", arg(&manifest)]);

        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("ServiceProxySpec"));
        assert!(dir.path().join("generated/com/example/dsl/TargetSpec.kt").exists());
        assert!(!dir.path().join("generated/com/example/dsl/ServiceProxySpec.kt").exists());
    }

    #[test]
    fn generate___verbose___logs_loaded_manifest() {
        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(&dir, MANIFEST);

        let quiet = proxydsl(&["generate", "-m", arg(&manifest)]);
        let verbose = proxydsl(&["-v", "generate", "-m", arg(&manifest)]);

        assert!(verbose.status.success());
        assert!(!String::from_utf8_lossy(&quiet.stderr).contains("loaded manifest"));
        assert!(String::from_utf8_lossy(&verbose.stderr).contains("loaded manifest"));
    }

    #[test]
    fn generate___missing_manifest___fails_with_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent.toml");

        let output = proxydsl(&["generate", "-m", arg(&missing)]);

        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("absent.toml"));
    }

    #[test]
    fn generate___unresolved_supertype___fails_without_writing() {
        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(
            &dir,
            &format!("{MANIFEST}\n[[class]]\nname = \"Orphan\"\npackage = \"p\"\nsupertypes = [\"Nowhere\"]\n"),
        );

        let output = proxydsl(&["generate", "-m", arg(&manifest)]);

        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("Nowhere"));
        assert!(!dir.path().join("generated").exists());
    }
}

// =============================================================================
// check
// =============================================================================

mod check {
    use super::*;

    #[test]
    fn check___valid_manifest___prints_summary_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(&dir, MANIFEST);

        let output = proxydsl(&["check", "-m", arg(&manifest)]);

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("✓ Elements: 2"));
        assert!(stdout.contains("✓ Builder functions: 1"));
        assert!(!dir.path().join("generated").exists());
    }

    #[test]
    fn check___failing_type___exits_non_zero() {
        let dir = TempDir::new().unwrap();
        let manifest = write_manifest(&dir, &MANIFEST.replace("parameter = \"Target\"", "parameter = \"java.util.List\""));

        let output = proxydsl(&["check", "-m", arg(&manifest)]);

        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr).contains("raw collection"));
    }
}
