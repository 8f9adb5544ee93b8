//! Tests for core error types

use plantscribe::core::ScribeError;
use std::error::Error;

#[test]
fn test_load_failure() {
    let error = ScribeError::load_failure("Solution not found");
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("Load failure"));
    assert!(error_msg.contains("Solution not found"));
    assert!(error.is_load_failure());
    assert!(error.source().is_none());
}

#[test]
fn test_load_failure_keeps_source() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "zoo.json missing");
    let error = ScribeError::load_failure_with("Cannot open manifest", io);
    assert!(error.to_string().contains("Cannot open manifest"));
    let source = error.source().expect("source should be kept");
    assert!(source.to_string().contains("zoo.json missing"));
}

#[test]
fn test_load_in_progress() {
    let error = ScribeError::LoadInProgress;
    assert_eq!(error.to_string(), "Load already in progress");
    assert!(!error.is_load_failure());
}

#[test]
fn test_render_error() {
    let error = ScribeError::render_error("Render failed");
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("Render error"));
    assert!(error_msg.contains("Render failed"));
    assert!(!error.is_load_failure());
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: ScribeError = io.into();
    assert!(error.to_string().contains("IO error"));
    assert!(error.is_load_failure());
}

#[test]
fn test_manifest_error_conversion() {
    let json = serde_json::from_str::<serde_json::Value>("[1,").unwrap_err();
    let error: ScribeError = json.into();
    assert!(error.to_string().contains("Manifest error"));
    assert!(error.is_load_failure());
}

#[test]
fn test_invalid_manifest_surfaces_as_load_failure() {
    let error = plantscribe::render_manifest_class("not json", "Zoo", "Dog").unwrap_err();
    assert!(matches!(error, ScribeError::LoadFailure { .. }));
}
