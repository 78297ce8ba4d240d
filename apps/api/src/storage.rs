//! Per-request scratch storage for uploaded and generated files.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::errors::AppError;

pub const OUTPUT_FILENAME: &str = "formatted_resume.docx";

const FALLBACK_UPLOAD_NAME: &str = "upload";

/// A uniquely-named scratch directory holding one request's uploaded source
/// and generated output. No two requests ever share a path, and the
/// directory is removed when the workspace drops, on success and on every
/// error path alike.
pub struct RequestWorkspace {
    dir: TempDir,
}

impl RequestWorkspace {
    pub fn create(upload_root: &Path) -> Result<Self, AppError> {
        fs::create_dir_all(upload_root)?;
        let dir = tempfile::Builder::new()
            .prefix("resume-")
            .tempdir_in(upload_root)?;
        Ok(Self { dir })
    }

    /// Stores the uploaded bytes under the client's sanitized filename and
    /// returns the stored path. The extension is kept intact so format
    /// detection can route on it.
    pub fn store_upload(&self, filename: &str, data: &[u8]) -> Result<PathBuf, AppError> {
        let path = self.dir.path().join(sanitize_filename(filename));
        fs::write(&path, data)?;
        Ok(path)
    }

    /// Where this request's populated document is written.
    pub fn output_path(&self) -> PathBuf {
        self.dir.path().join(OUTPUT_FILENAME)
    }
}

/// Reduces a client-supplied filename to a safe basename: path components
/// are stripped, characters outside `[A-Za-z0-9._-]` become `_`, and leading
/// dots are removed. An empty result falls back to a fixed name.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        FALLBACK_UPLOAD_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\Users\\me\\resume.pdf"), "resume.pdf");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(
            sanitize_filename("my résumé (final).docx"),
            "my_r_sum___final_.docx"
        );
    }

    #[test]
    fn test_sanitize_keeps_extension() {
        assert_eq!(sanitize_filename("resume.PDF"), "resume.PDF");
    }

    #[test]
    fn test_sanitize_removes_leading_dots() {
        assert_eq!(sanitize_filename(".hidden.docx"), "hidden.docx");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_filename("///"), "upload");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn test_workspace_paths_are_unique_and_cleaned_up() {
        let root = tempfile::tempdir().unwrap();

        let first = RequestWorkspace::create(root.path()).unwrap();
        let second = RequestWorkspace::create(root.path()).unwrap();
        let first_upload = first.store_upload("resume.docx", b"a").unwrap();
        let second_upload = second.store_upload("resume.docx", b"b").unwrap();
        assert_ne!(first_upload, second_upload);
        assert_ne!(first.output_path(), second.output_path());

        let kept = first_upload.clone();
        drop(first);
        assert!(!kept.exists());
        assert!(second_upload.exists());
    }
}
