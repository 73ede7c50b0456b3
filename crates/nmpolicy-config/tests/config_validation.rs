//! Config load and validation tests for nmpolicy-config.
// crates/nmpolicy-config/tests/config_validation.rs
// =============================================================================
// Module: Config Validation Tests
// Description: Validate config loading guards and limit checks.
// Purpose: Ensure config input handling is strict.
// =============================================================================

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::io::Write;
use std::path::Path;

use nmpolicy_config::ConfigError;
use nmpolicy_config::LogLevel;
use nmpolicy_config::NmpolicyConfig;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<NmpolicyConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

fn write_config(content: &[u8]) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(content).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn empty_config_uses_defaults() -> TestResult {
    let config = NmpolicyConfig::from_toml_str("").map_err(|err| err.to_string())?;
    let generator = config.generator_config();
    if generator.expression_limits.max_bytes != 4096
        || generator.expression_limits.max_segments != 64
        || generator.max_document_bytes != 16 * 1024 * 1024
    {
        return Err(format!("unexpected defaults: {generator:?}"));
    }
    if config.logging.level != LogLevel::Warn {
        return Err(format!("unexpected log level: {}", config.logging.level));
    }
    Ok(())
}

#[test]
fn load_reads_limits_and_logging() -> TestResult {
    let file = write_config(
        b"[limits]\nmax_expression_bytes = 128\nmax_document_bytes = 2048\n\n\
          [logging]\nlevel = \"debug\"\n",
    )?;
    let config = NmpolicyConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.limits.max_expression_bytes != 128
        || config.limits.max_path_segments != 64
        || config.limits.max_document_bytes != 2048
    {
        return Err(format!("unexpected limits: {:?}", config.limits));
    }
    if config.logging.level != LogLevel::Debug {
        return Err(format!("unexpected log level: {}", config.logging.level));
    }
    if config.source.as_deref() != Some(file.path()) {
        return Err("config source not recorded".to_string());
    }
    Ok(())
}

#[test]
fn load_rejects_missing_explicit_file() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(NmpolicyConfig::load(Some(&path)), "config io error")
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(NmpolicyConfig::load(Some(path)), "config path component too long")
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let file = write_config(&vec![b'#'; 1_048_577])?;
    assert_invalid(NmpolicyConfig::load(Some(file.path())), "config file exceeds size limit")
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let file = write_config(&[0xFF, 0xFE, 0xFF])?;
    assert_invalid(NmpolicyConfig::load(Some(file.path())), "config file must be utf-8")
}

#[test]
fn unknown_keys_are_rejected() -> TestResult {
    assert_invalid(NmpolicyConfig::from_toml_str("[limits]\nmax_widgets = 3\n"), "parse error")?;
    assert_invalid(NmpolicyConfig::from_toml_str("[server]\n"), "parse error")
}

#[test]
fn zero_limits_are_rejected() -> TestResult {
    assert_invalid(
        NmpolicyConfig::from_toml_str("[limits]\nmax_path_segments = 0\n"),
        "limits.max_path_segments must be greater than zero",
    )
}

#[test]
fn limits_above_cap_are_rejected() -> TestResult {
    assert_invalid(
        NmpolicyConfig::from_toml_str("[limits]\nmax_expression_bytes = 1048577\n"),
        "limits.max_expression_bytes must be at most 1048576",
    )?;
    assert_invalid(
        NmpolicyConfig::from_toml_str("[limits]\nmax_document_bytes = 268435457\n"),
        "limits.max_document_bytes must be at most 268435456",
    )
}

#[test]
fn unknown_log_level_is_rejected() -> TestResult {
    assert_invalid(NmpolicyConfig::from_toml_str("[logging]\nlevel = \"loud\"\n"), "parse error")?;
    match "LOUD".parse::<LogLevel>() {
        Err(ConfigError::Invalid(message)) if message.contains("unknown log level") => {}
        other => return Err(format!("unexpected parse result: {other:?}")),
    }
    if "Info".parse::<LogLevel>() != Ok(LogLevel::Info) {
        return Err("log level parsing should ignore case".to_string());
    }
    Ok(())
}
