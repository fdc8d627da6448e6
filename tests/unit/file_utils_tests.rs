/*!
 * Tests for file utility functions
 */

use std::fs;
use std::path::Path;
use anyhow::Result;
use srtstream::errors::InputError;
use srtstream::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test that the output name gets the language suffix
#[test]
fn test_generate_output_path_withValidInputs_shouldCreateCorrectPath() {
    let output_path = FileManager::generate_output_path(
        Path::new("/tmp/input/movie.srt"),
        Path::new("/tmp/output"),
        "fa",
    );

    assert_eq!(output_path, Path::new("/tmp/output/movie_fa.srt"));
}

/// Test that a byte order mark and Windows line endings are normalised
#[test]
fn test_read_source_withBomAndCrlf_shouldNormalize() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "windows.srt",
        "\u{feff}1\r\n00:00:01,000 --> 00:00:02,000\r\nHello\r\n",
    )?;

    let content = FileManager::read_source(&path)?;

    assert_eq!(content, "1\n00:00:01,000 --> 00:00:02,000\nHello\n");
    Ok(())
}

/// Test that a missing source is reported as an input error
#[test]
fn test_read_source_withMissingFile_shouldReturnSourceError() {
    let result = FileManager::read_source("definitely_missing_12345.srt");

    assert!(matches!(result, Err(InputError::SourceFile { .. })));
}

/// Test that atomic writes create directories and replace content
#[test]
fn test_write_atomic_withExistingFile_shouldReplaceContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("out.srt");

    FileManager::write_atomic(&path, "first")?;
    FileManager::write_atomic(&path, "second")?;

    assert_eq!(fs::read_to_string(&path)?, "second");
    assert_eq!(fs::read_dir(temp_dir.path().join("nested"))?.count(), 1);
    Ok(())
}

/// Test filename sanitising
#[test]
fn test_sanitize_filename_withUnsafeCharacters_shouldReplaceRuns() {
    assert_eq!(FileManager::sanitize_filename("my movie (1).srt"), "my_movie_1_.srt");
    assert_eq!(FileManager::sanitize_filename("../../etc/passwd"), "etc_passwd");
    assert_eq!(FileManager::sanitize_filename("..."), "upload.srt");
}

/// Test that staging copies the file into the upload directory
#[test]
fn test_stage_upload_withSourceFile_shouldCopyUnderSafeName() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let source = common::create_test_file(temp_dir.path(), "my movie.srt", common::TWO_BLOCK_SRT)?;
    let upload_dir = temp_dir.path().join("uploads");

    let staged = FileManager::stage_upload(&source, &upload_dir)?;

    assert_eq!(staged, upload_dir.join("my_movie.srt"));
    assert_eq!(fs::read_to_string(&staged)?, common::TWO_BLOCK_SRT);
    assert!(source.exists());
    Ok(())
}

/// Test that staging a file that already sits in the upload directory, spelled
/// through another path, leaves its content intact
#[test]
fn test_stage_upload_withSourceAlreadyInUploadDir_shouldKeepContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let upload_dir = temp_dir.path().join("uploads");
    fs::create_dir_all(&upload_dir)?;
    common::create_test_file(&upload_dir, "movie.srt", common::TWO_BLOCK_SRT)?;
    let roundabout = upload_dir.join("..").join("uploads").join("movie.srt");

    let staged = FileManager::stage_upload(&roundabout, &upload_dir)?;

    assert_eq!(staged, upload_dir.join("movie.srt"));
    assert_eq!(fs::read_to_string(&staged)?, common::TWO_BLOCK_SRT);
    Ok(())
}

/// Test that staging through a symlinked directory does not truncate the source
#[cfg(unix)]
#[test]
fn test_stage_upload_withSymlinkedSource_shouldKeepContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let upload_dir = temp_dir.path().join("uploads");
    fs::create_dir_all(&upload_dir)?;
    common::create_test_file(&upload_dir, "movie.srt", common::TWO_BLOCK_SRT)?;
    let link = temp_dir.path().join("linked");
    std::os::unix::fs::symlink(&upload_dir, &link)?;

    let staged = FileManager::stage_upload(link.join("movie.srt"), &upload_dir)?;

    assert_eq!(fs::read_to_string(&staged)?, common::TWO_BLOCK_SRT);
    assert!(FileManager::is_same_file(&staged, link.join("movie.srt")));
    Ok(())
}

/// Test that staging replaces an older upload of the same name
#[test]
fn test_stage_upload_withExistingTarget_shouldReplaceIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let upload_dir = temp_dir.path().join("uploads");
    fs::create_dir_all(&upload_dir)?;
    common::create_test_file(&upload_dir, "movie.srt", "stale")?;
    let source = common::create_test_file(temp_dir.path(), "movie.srt", common::TWO_BLOCK_SRT)?;

    let staged = FileManager::stage_upload(&source, &upload_dir)?;

    assert_eq!(fs::read_to_string(&staged)?, common::TWO_BLOCK_SRT);
    assert_eq!(fs::read_dir(&upload_dir)?.count(), 1);
    Ok(())
}
