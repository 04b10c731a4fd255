//! Integration tests for the racketreport CLI
//!
//! Runs the built binary against the fixtures in `tests/fixtures`. None of the
//! fixtures reference remote images, so no network is needed.

use anyhow::Result;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::{tempdir, TempDir};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn setup_temp_dir() -> TempDir {
    tempdir().expect("Failed to create temp directory")
}

/// Runs the CLI with a clean environment for its own variables
fn run_cli_command(args: &[&str]) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_racketreport"))
        .args(args)
        .env_remove("RACKET_REPORT_PROXY")
        .env_remove("RACKET_REPORT_CONFIG")
        .env("RUST_LOG", "off")
        .output()?;
    Ok(output)
}

fn assert_pdf_exists_and_valid(path: &Path) {
    assert!(path.exists(), "PDF file should exist: {}", path.display());
    let content = fs::read(path).expect("Failed to read PDF file");
    assert!(content.len() > 1000, "PDF file should have content");
    assert!(content.starts_with(b"%PDF-"), "File should start with PDF header");
}

fn stdout_path(output: &Output) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(&output.stdout).trim())
}

#[test]
fn test_cli_generate_command() -> Result<()> {
    let temp_dir = setup_temp_dir();
    let out = temp_dir.path().join("reports");
    let input = fixture("comparison.json");

    let output = run_cli_command(&[
        "generate",
        input.to_str().unwrap(),
        "--output-dir",
        out.to_str().unwrap(),
    ])?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let path = stdout_path(&output);
    assert_pdf_exists_and_valid(&path);
    assert_eq!(path.parent(), Some(out.as_path()));

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("Smashly-Comparativa-"), "unexpected name {name}");
    assert!(name.ends_with(".pdf"));
    Ok(())
}

#[test]
fn test_cli_generate_with_prefix_and_config() -> Result<()> {
    let temp_dir = setup_temp_dir();
    let config = temp_dir.path().join("config.json");
    fs::write(&config, r#"{ "page": "letter", "footer_brand": "Smashly.app", "author": "QA" }"#)?;
    let input = fixture("comparison.json");

    let output = run_cli_command(&[
        "generate",
        input.to_str().unwrap(),
        "-o",
        temp_dir.path().to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--prefix",
        "Vertex-vs-Metalbone",
    ])?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let path = stdout_path(&output);
    assert_pdf_exists_and_valid(&path);
    assert!(path
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("Vertex-vs-Metalbone-"));

    let content = String::from_utf8_lossy(&fs::read(&path)?).into_owned();
    assert!(content.contains("/MediaBox [0 0 612 792]"));
    assert!(content.contains("/Author (QA)"));
    Ok(())
}

#[test]
fn test_cli_generate_legacy_input() -> Result<()> {
    let temp_dir = setup_temp_dir();
    let input = fixture("legacy.json");

    let output = run_cli_command(&[
        "generate",
        input.to_str().unwrap(),
        "-o",
        temp_dir.path().to_str().unwrap(),
        "--legacy",
    ])?;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_pdf_exists_and_valid(&stdout_path(&output));
    Ok(())
}

#[test]
fn test_cli_inspect_command() -> Result<()> {
    let input = fixture("comparison.json");

    let output = run_cli_command(&["inspect", input.to_str().unwrap()])?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Items: 2"));
    assert!(stdout.contains("#101 Bullpadel Vertex 04 (Bullpadel) image: none"));
    assert!(stdout.contains("Table rows: 4"));
    assert!(stdout.contains("Table columns: Vertex 04, Metalbone 3.3"));
    assert!(stdout.contains(
        "Sections: cover, executive summary, comparison table, technical analysis, \
         recommended profiles, biomechanical considerations, conclusion"
    ));
    Ok(())
}

#[test]
fn test_cli_inspect_legacy() -> Result<()> {
    let input = fixture("legacy.json");

    let output = run_cli_command(&["inspect", input.to_str().unwrap(), "--legacy"])?;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Table rows: 2"));
    assert!(stdout.contains("Table columns: AT10 Genius, Delta Pro"));
    assert!(stdout.contains("Sections: cover, executive summary, comparison table"));
    Ok(())
}

#[test]
fn test_cli_rejects_single_item() -> Result<()> {
    let temp_dir = setup_temp_dir();
    let input = temp_dir.path().join("single.json");
    fs::write(&input, r#"{ "items": [ { "id": 1, "name": "Solo" } ] }"#)?;

    let output = run_cli_command(&[
        "generate",
        input.to_str().unwrap(),
        "-o",
        temp_dir.path().to_str().unwrap(),
    ])?;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("need 2 or 3 items"));
    Ok(())
}

#[test]
fn test_cli_missing_input() -> Result<()> {
    let output = run_cli_command(&["generate", "/nonexistent/comparison.json"])?;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read"));
    Ok(())
}

#[test]
fn test_cli_invalid_config() -> Result<()> {
    let temp_dir = setup_temp_dir();
    let config = temp_dir.path().join("config.json");
    fs::write(&config, r#"{ "margin_mm": -5 }"#)?;
    let input = fixture("comparison.json");

    let output = run_cli_command(&[
        "generate",
        input.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
    ])?;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("margin_mm"));
    Ok(())
}

#[test]
fn test_cli_help() -> Result<()> {
    let output = run_cli_command(&["--help"])?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("inspect"));
    Ok(())
}
