//! Integration tests for logger behavior.

use curriculum_flow::logger::{init_file_logging, set_level, set_level_from_str, Level};
use curriculum_flow::{debug, error, info, verbose, warn};

#[test]
fn level_parse_accepts_valid() {
    assert!(set_level_from_str("error"));
    assert!(set_level_from_str("warn"));
    assert!(set_level_from_str("WARNING"));
    assert!(set_level_from_str("info"));
    assert!(set_level_from_str("debug"));
}

#[test]
fn level_parse_rejects_invalid() {
    assert!(!set_level_from_str("invalid"));
    assert!(!set_level_from_str(""));
}

#[test]
fn level_from_str_aliases() {
    assert_eq!("err".parse::<Level>(), Ok(Level::Error));
    assert_eq!("Warning".parse::<Level>(), Ok(Level::Warn));
    assert!("trace".parse::<Level>().is_err());
}

#[test]
fn logs_do_not_panic() {
    set_level(Level::Debug);
    info!("info integration");
    warn!("warn integration");
    error!("error integration");
    debug!("debug integration {}", 42);
    verbose!("verbose integration");
}

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_opens_target() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("curriculum-flow.log");
    assert!(init_file_logging(&path));
    assert!(path.exists());
    assert!(!init_file_logging(&dir.path().join("missing").join("x.log")));
}
