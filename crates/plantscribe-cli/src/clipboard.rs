//! File-backed clipboard sink
//!
//! Stands in for a system clipboard: every published diagram overwrites the
//! target file.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use plantscribe::controller::ClipboardSink;

#[derive(Debug, Clone)]
pub struct FileClipboard {
    path: PathBuf,
}

impl FileClipboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ClipboardSink for FileClipboard {
    fn publish(&mut self, text: &str) -> Result<()> {
        fs::write(&self.path, text)
            .with_context(|| format!("Failed to copy diagram to '{}'", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_publish_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clipboard.puml");
        let mut clipboard = FileClipboard::new(&path);

        clipboard.publish("first").unwrap();
        clipboard.publish("second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_publish_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let mut clipboard = FileClipboard::new(dir.path().join("missing/clipboard.puml"));
        let err = clipboard.publish("text").unwrap_err();
        assert!(err.to_string().contains("Failed to copy diagram"));
    }
}
