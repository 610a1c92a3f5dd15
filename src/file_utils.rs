use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

static MARKDOWN_EXTENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\.(md|mdx)$").expect("markdown extension pattern is valid")
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @checks: Markdown or MDX file name, case-insensitive
    pub fn is_markdown_file<P: AsRef<Path>>(path: P) -> bool {
        MARKDOWN_EXTENSION.is_match(&path.as_ref().to_string_lossy())
    }

    /// Collect every Markdown/MDX file below `dir`, in file-name order
    ///
    /// A missing directory yields an empty list.
    pub fn collect_markdown_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut result = Vec::new();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            if entry.file_type().is_file() && Self::is_markdown_file(entry.path()) {
                result.push(entry.path().to_path_buf());
            }
        }

        Ok(result)
    }

    /// Resolve a path against `base` and fold `.` and `..` components
    ///
    /// Purely lexical, the path does not need to exist.
    pub fn absolutize<P: AsRef<Path>>(path: P, base: &Path) -> PathBuf {
        let path = path.as_ref();
        let joined = if path.is_absolute() { path.to_path_buf() } else { base.join(path) };

        let mut normalized = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other.as_os_str()),
            }
        }
        normalized
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}

/// Destination of translated documents
pub trait OutputWriter: Send + Sync {
    /// Write `content` to `path`, replacing any previous content
    fn write(&self, path: &Path, content: &str) -> Result<()>;

    /// Whether something already exists at `path`
    fn exists(&self, path: &Path) -> bool {
        FileManager::file_exists(path)
    }
}

/// Writes translations to the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsOutputWriter;

impl OutputWriter for FsOutputWriter {
    fn write(&self, path: &Path, content: &str) -> Result<()> {
        FileManager::write_to_file(path, content)
    }
}
