use faclog_core::{ExErrorKind, LogConfig, Severity, ThresholdResolver};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_full_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("faclog.toml");
    fs::write(
        &path,
        r##"
        enabled = true
        threshold = "WARNING"
        stack_trace_threshold = "critical"
        database_exclude = ["audit"]
        date_format = "%d/%m/%Y %H:%M"
        log_path = "/var/log/app"
        file_extension = "txt"
        file_header = "# application log"
        database_path = "/var/lib/app/logs.db"

        [facilities]
        audit = "all"
        "##,
    )
    .unwrap();

    let config = LogConfig::load(&path).unwrap();

    assert_eq!(config.threshold, Severity::Warning.rank());
    assert_eq!(config.stack_trace_threshold, Severity::Critical.rank());
    assert!(config.is_database_excluded("audit"));
    assert!(!config.is_database_excluded("php_error"));
    assert_eq!(config.file_extension, "txt");
    assert_eq!(config.file_header.as_deref(), Some("# application log"));
    assert!(config.database_path.is_some());

    // Non-empty facility table replaces the defaults
    let resolver = ThresholdResolver::from_config(&config);
    assert_eq!(resolver.resolve_threshold("audit"), 6);
    assert_eq!(resolver.resolve_threshold("php_error"), 3);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = LogConfig::load(dir.path().join("absent.toml")).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Io);
    assert!(err.message().contains("absent.toml"));
}

#[test]
fn test_malformed_toml_is_invalid_config() {
    let err = LogConfig::from_toml_str("threshold = ").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidConfig);
}

#[test]
fn test_empty_document_yields_defaults() {
    assert_eq!(LogConfig::from_toml_str("").unwrap(), LogConfig::default());
}

#[test]
fn test_disabled_flag_reaches_resolver() {
    let config = LogConfig::from_toml_str("enabled = false").unwrap();
    let resolver = ThresholdResolver::from_config(&config);

    assert!(!resolver.enabled());
    assert!(!resolver.passes("CRITICAL", "anything"));
}
