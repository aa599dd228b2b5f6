// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Directory traversal producing file candidates

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// A regular file discovered during traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    /// Path as found under the scan root
    pub path: PathBuf,
    /// Absolute, canonical path
    pub resolved: PathBuf,
    /// File name including extension
    pub name: String,
    /// Dotted extension as found on disk (`.pdf`), empty if none
    pub extension: String,
    /// Parent directory as found under the scan root
    pub parent: PathBuf,
}

impl FileCandidate {
    pub fn new(path: PathBuf) -> Self {
        let resolved = std::fs::canonicalize(&path).unwrap_or_else(|_| {
            std::env::current_dir()
                .map(|cwd| cwd.join(&path))
                .unwrap_or_else(|_| path.clone())
        });
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();

        Self { path, resolved, name, extension, parent }
    }

    /// Resolved path as stored in classification records
    pub fn full_path(&self) -> String {
        self.resolved.to_string_lossy().into_owned()
    }

    /// Parent folder as shown to the classifier
    pub fn parent_folder(&self) -> String {
        if self.parent.as_os_str().is_empty() {
            ".".to_string()
        } else {
            self.parent.display().to_string()
        }
    }
}

/// Walk `root` once and return every regular file, in a stable order.
///
/// Directories whose name is in `excluded_dirs` are pruned at any depth.
pub fn scan(root: &Path, excluded_dirs: &[String]) -> Vec<FileCandidate> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded(entry, excluded_dirs));

    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_dir() || !entry.path().is_file() {
                    continue;
                }
                files.push(FileCandidate::new(entry.into_path()));
            }
            Err(e) => warn!("Skipping unreadable entry: {}", e),
        }
    }

    debug!("Scan of {:?} found {} files", root, files.len());
    files
}

fn is_excluded(entry: &DirEntry, excluded_dirs: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    excluded_dirs.iter().any(|d| *d == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn excluded() -> Vec<String> {
        vec![".git".to_string(), "venv".to_string(), "__pycache__".to_string()]
    }

    fn names(files: &[FileCandidate]) -> Vec<String> {
        files.iter().map(|f| f.name.clone()).collect()
    }

    #[test]
    fn test_excluded_dirs_pruned_at_any_depth() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join(".git/objects")).unwrap();
        std::fs::create_dir_all(root.join("code/venv/lib")).unwrap();
        std::fs::create_dir_all(root.join("code/__pycache__")).unwrap();
        std::fs::write(root.join(".git/objects/HEAD.txt"), "x").unwrap();
        std::fs::write(root.join("code/venv/lib/site.txt"), "x").unwrap();
        std::fs::write(root.join("code/__pycache__/mod.txt"), "x").unwrap();
        std::fs::write(root.join("code/main.txt"), "x").unwrap();
        std::fs::write(root.join("notes.md"), "x").unwrap();

        let files = scan(root, &excluded());
        assert_eq!(names(&files), vec!["main.txt", "notes.md"]);
    }

    #[test]
    fn test_directories_never_yielded() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("empty.txt")).unwrap();

        assert!(scan(dir.path(), &excluded()).is_empty());
    }

    #[test]
    fn test_candidate_fields() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("Inbox");
        std::fs::create_dir_all(&sub).unwrap();
        std::fs::write(sub.join("Resume.PDF"), "x").unwrap();

        let files = scan(dir.path(), &excluded());
        assert_eq!(files.len(), 1);
        let candidate = &files[0];
        assert_eq!(candidate.name, "Resume.PDF");
        assert_eq!(candidate.extension, ".PDF");
        assert_eq!(candidate.parent, sub);
        assert!(candidate.resolved.is_absolute());
        assert!(candidate.full_path().ends_with("Resume.PDF"));
    }

    #[test]
    fn test_no_extension() {
        let candidate = FileCandidate::new(PathBuf::from("LICENSE"));
        assert_eq!(candidate.extension, "");
        assert_eq!(candidate.parent_folder(), ".");
    }
}
