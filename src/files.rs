use crate::error::ConfigError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Sorted snapshot of the visible files directly inside a directory.
#[derive(Debug, Clone)]
pub struct FileIndex {
    root: PathBuf,
    names: Vec<String>,
}

impl FileIndex {
    pub fn scan<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let root = dir.as_ref();
        if !root.is_dir() {
            return Err(ConfigError::MissingPath(root.to_path_buf()).into());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(root).min_depth(1).max_depth(1) {
            let entry =
                entry.with_context(|| format!("Failed to list directory: {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                log::warn!("Skipping non UTF-8 file name: {}", entry.path().display());
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            names.push(name.to_string());
        }
        names.sort();

        Ok(FileIndex {
            root: root.to_path_buf(),
            names,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// First file (in sorted order) whose name starts with `surname`,
    /// ignoring case and surrounding whitespace.
    pub fn find_prefix(&self, surname: &str) -> Option<&str> {
        let needle = surname.trim().to_lowercase();
        self.names
            .iter()
            .find(|name| name.to_lowercase().starts_with(&needle))
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn index_with(files: &[&str]) -> (tempfile::TempDir, FileIndex) {
        let dir = tempfile::tempdir().unwrap();
        for f in files {
            fs::write(dir.path().join(f), b"x").unwrap();
        }
        let index = FileIndex::scan(dir.path()).unwrap();
        (dir, index)
    }

    #[test]
    fn test_scan_sorts_and_hides_dotfiles() {
        let (dir, _) = index_with(&["b.pdf", ".DS_Store", "a.pdf"]);
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.pdf"), b"x").unwrap();

        let index = FileIndex::scan(dir.path()).unwrap();
        assert_eq!(index.names(), ["a.pdf", "b.pdf"]);
        assert_eq!(index.path_of("a.pdf"), dir.path().join("a.pdf"));
    }

    #[test]
    fn test_find_prefix_case_insensitive() {
        let (_dir, index) = index_with(&["Durand_scan.pdf", "Martin_scan.pdf"]);
        assert_eq!(index.find_prefix(" MARTIN "), Some("Martin_scan.pdf"));
        assert_eq!(index.find_prefix("Leroy"), None);
    }

    #[test]
    fn test_find_prefix_first_sorted_match_wins() {
        let (_dir, index) = index_with(&["Martin.pdf", "Marchetti.pdf"]);
        assert_eq!(index.find_prefix("Mar"), Some("Marchetti.pdf"));
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileIndex::scan(dir.path().join("missing")).unwrap_err();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }
}
