use anyhow::{Result, Context, anyhow};
use log::debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use once_cell::sync::Lazy;
use regex::Regex;
use tempfile::NamedTempFile;

use crate::errors::InputError;

// @module: File and directory utilities

// @const: Characters kept in staged upload names
static UNSAFE_FILENAME_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^A-Za-z0-9_.-]+").unwrap()
});

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    /// Read a subtitle file as UTF-8 text.
    ///
    /// Line endings are normalised to `\n` and a leading byte order mark is
    /// dropped so that block splitting sees plain blank-line separators.
    pub fn read_source<P: AsRef<Path>>(path: P) -> Result<String, InputError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| InputError::SourceFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        Ok(Self::normalize_newlines(content.strip_prefix('\u{feff}').unwrap_or(&content)))
    }

    // @converts: CRLF and lone CR to LF
    pub fn normalize_newlines(content: &str) -> String {
        content.replace("\r\n", "\n").replace('\r', "\n")
    }

    // @generates: Output path for translated subtitle
    // @params: input_file, output_dir, target_language
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        target_language: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        // Get the file stem (filename without extension)
        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('_');
        output_filename.push_str(target_language);
        output_filename.push_str(".srt");

        output_dir.join(output_filename)
    }

    /// Write a string to a file through a temporary sibling and a rename,
    /// so the target is either absent, the old content, or complete.
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Self::ensure_dir(dir)?;

        let mut temp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        temp.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write to file: {:?}", path))?;
        temp.persist(path)
            .map_err(|e| anyhow!("Failed to move translated file into place {:?}: {}", path, e))?;

        Ok(())
    }

    /// Reduce a file name to a safe ASCII form
    pub fn sanitize_filename(name: &str) -> String {
        let replaced = UNSAFE_FILENAME_CHARS.replace_all(name.trim(), "_");
        let cleaned = replaced.trim_matches(|c| c == '.' || c == '_');
        if cleaned.is_empty() {
            "upload.srt".to_string()
        } else {
            cleaned.to_string()
        }
    }

    // @checks: Both paths resolve to the same file on disk
    pub fn is_same_file<P1: AsRef<Path>, P2: AsRef<Path>>(first: P1, second: P2) -> bool {
        match (fs::canonicalize(first), fs::canonicalize(second)) {
            (Ok(first), Ok(second)) => first == second,
            _ => false,
        }
    }

    /// Copy an input file into the upload directory under a sanitised name.
    ///
    /// A source already sitting at the target location is used in place. The
    /// copy goes through a temporary file, so the target is only replaced
    /// once the whole source has been read.
    pub fn stage_upload<P1: AsRef<Path>, P2: AsRef<Path>>(source: P1, upload_dir: P2) -> Result<PathBuf> {
        let source = source.as_ref();
        let upload_dir = upload_dir.as_ref();
        if !Self::file_exists(source) {
            return Err(anyhow!("Source file does not exist: {:?}", source));
        }

        let name = source.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let target = upload_dir.join(Self::sanitize_filename(&name));

        Self::ensure_dir(upload_dir)?;
        if Self::is_same_file(source, &target) {
            debug!("{:?} is already staged", source);
            return Ok(target);
        }

        let mut reader = fs::File::open(source)
            .with_context(|| format!("Failed to open {:?}", source))?;
        let mut temp = NamedTempFile::new_in(upload_dir)
            .with_context(|| format!("Failed to create temporary file in {}", upload_dir.display()))?;
        std::io::copy(&mut reader, temp.as_file_mut())
            .with_context(|| format!("Failed to copy {:?} to {:?}", source, target))?;
        temp.persist(&target)
            .map_err(|e| anyhow!("Failed to move staged file into place {:?}: {}", target, e))?;

        Ok(target)
    }
}
