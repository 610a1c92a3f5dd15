/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use doctrans::file_utils::{FileManager, FsOutputWriter, OutputWriter};

use crate::common;

/// Test markdown detection by extension
#[test]
fn test_is_markdown_file_withVariousExtensions_shouldMatchMdAndMdx() {
    assert!(FileManager::is_markdown_file("guide/intro.md"));
    assert!(FileManager::is_markdown_file("guide/intro.MDX"));
    assert!(FileManager::is_markdown_file("README.Md"));
    assert!(!FileManager::is_markdown_file("guide/intro.markdown"));
    assert!(!FileManager::is_markdown_file("guide/md"));
    assert!(!FileManager::is_markdown_file("image.md.png"));
}

/// Test recursive collection in file-name order
#[test]
fn test_collect_markdown_files_withNestedTree_shouldReturnSortedMarkdownOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "b.md", "b")?;
    common::create_test_file(root, "a.mdx", "a")?;
    common::create_test_file(root, "guide/intro.md", "intro")?;
    common::create_test_file(root, "guide/logo.png", "png")?;
    common::create_test_file(root, "notes.txt", "txt")?;

    let files = FileManager::collect_markdown_files(root)?;
    let relative: Vec<PathBuf> = files.iter().map(|f| f.strip_prefix(root).unwrap().to_path_buf()).collect();

    assert_eq!(
        relative,
        vec![PathBuf::from("a.mdx"), PathBuf::from("b.md"), PathBuf::from("guide/intro.md")]
    );
    Ok(())
}

/// Test collection below a directory that does not exist
#[test]
fn test_collect_markdown_files_withMissingDir_shouldReturnEmpty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let files = FileManager::collect_markdown_files(temp_dir.path().join("nope"))?;
    assert!(files.is_empty());
    Ok(())
}

/// Test lexical path resolution
#[test]
fn test_absolutize_withRelativeAndDottedPaths_shouldNormalize() {
    let base = Path::new("/work/site");
    assert_eq!(
        FileManager::absolutize("content/docs/zh/a.md", base),
        PathBuf::from("/work/site/content/docs/zh/a.md")
    );
    assert_eq!(
        FileManager::absolutize("./content/../content/docs/./zh/a.md", base),
        PathBuf::from("/work/site/content/docs/zh/a.md")
    );
    assert_eq!(FileManager::absolutize("/abs/../other.md", base), PathBuf::from("/other.md"));
}

/// Test that the filesystem writer creates parents and overwrites
#[test]
fn test_fs_output_writer_withMissingParents_shouldCreateAndOverwrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("en/guide/deep/intro.md");

    assert!(!FsOutputWriter.exists(&target));
    FsOutputWriter.write(&target, "first")?;
    FsOutputWriter.write(&target, "second")?;

    assert!(FsOutputWriter.exists(&target));
    assert_eq!(fs::read_to_string(&target)?, "second");
    Ok(())
}

/// Test reading a missing file
#[test]
fn test_read_to_string_withMissingFile_shouldFailWithPath() {
    let error = FileManager::read_to_string("/definitely/not/here.md").unwrap_err();
    assert!(format!("{:#}", error).contains("here.md"));
}
