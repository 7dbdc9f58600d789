use crate::line_buffer::LineBuffer;
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};

/// An open file (or scratch buffer) in the viewer.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: Option<String>,
    pub buffer: LineBuffer,
    pub is_modified: bool,
    pub read_only: bool,
    /// Hash of the canonical path, used to dedupe re-opened files.
    pub fingerprint: Option<u64>,
}

impl Document {
    pub fn new(path: Option<String>, contents: String) -> Self {
        let fingerprint = path.as_deref().map(compute_fingerprint);
        Self {
            path,
            buffer: LineBuffer::from_text(contents),
            is_modified: false,
            read_only: false,
            fingerprint,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let contents = fs::read_to_string(&path_buf)?;
        let read_only = fs::metadata(&path_buf)
            .map(|meta| meta.permissions().readonly())
            .unwrap_or(false);

        let mut document = Self::new(Some(path_buf.to_string_lossy().to_string()), contents);
        document.read_only = read_only;
        Ok(document)
    }

    pub fn display_name(&self) -> &str {
        if let Some(path) = &self.path {
            Path::new(path)
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or(path)
        } else {
            "(scratch)"
        }
    }

    /// Replaces the buffer contents, tracking the modified flag.
    pub fn update_contents(&mut self, contents: String) {
        if self.buffer.as_str() == contents {
            return;
        }
        self.buffer.set_text(contents);
        self.is_modified = true;
    }

    pub fn mark_clean(&mut self) {
        self.is_modified = false;
    }

    pub fn set_path(&mut self, path: String) {
        self.fingerprint = Some(compute_fingerprint(&path));
        self.path = Some(path);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(None, String::new())
    }
}

fn compute_fingerprint(path: &str) -> u64 {
    let resolved = canonicalize_lossy(path);
    let mut hasher = DefaultHasher::new();
    resolved.hash(&mut hasher);
    hasher.finish()
}

fn canonicalize_lossy(path: &str) -> String {
    let path_buf = PathBuf::from(path);
    fs::canonicalize(&path_buf)
        .unwrap_or(path_buf)
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scratch_document_has_no_fingerprint() {
        let doc = Document::default();
        assert_eq!(doc.display_name(), "(scratch)");
        assert!(doc.fingerprint.is_none());
        assert!(!doc.is_modified);
    }

    #[test]
    fn update_contents_sets_modified_flag() {
        let mut doc = Document::new(None, "before".to_string());
        doc.update_contents("before".to_string());
        assert!(!doc.is_modified);
        doc.update_contents("after".to_string());
        assert!(doc.is_modified);
        doc.mark_clean();
        assert!(!doc.is_modified);
    }

    #[test]
    fn from_path_reads_contents() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("sample.txt");
        fs::write(&file, "hello\nworld").unwrap();

        let doc = Document::from_path(&file).unwrap();
        assert_eq!(doc.display_name(), "sample.txt");
        assert_eq!(doc.buffer.line_count(), 2);
        assert!(doc.fingerprint.is_some());
    }

    #[test]
    fn same_path_means_same_fingerprint() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("sample.txt");
        fs::write(&file, "x").unwrap();

        let a = Document::from_path(&file).unwrap();
        let b = Document::from_path(&file).unwrap();
        assert_eq!(a.fingerprint, b.fingerprint);
    }
}
