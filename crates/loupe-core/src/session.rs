use crate::document::Document;
use crate::workspace::FileNode;

/// Open-document list plus the workspace the explorer is rooted at.
#[derive(Debug)]
pub struct Session {
    open_documents: Vec<Document>,
    active_index: usize,
    workspace_root: Option<String>,
    workspace_tree: Vec<FileNode>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            open_documents: vec![Document::default()],
            active_index: 0,
            workspace_root: None,
            workspace_tree: Vec::new(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_documents(&self) -> &[Document] {
        &self.open_documents
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.open_documents.get(self.active_index)
    }

    pub fn active_document_mut(&mut self) -> Option<&mut Document> {
        self.open_documents.get_mut(self.active_index)
    }

    pub fn set_active(&mut self, index: usize) {
        if index < self.open_documents.len() {
            self.active_index = index;
        }
    }

    /// Adds a document, or focuses the existing tab when the same file is
    /// already open (matched by canonical-path fingerprint).
    pub fn open_document(&mut self, document: Document) -> usize {
        if let Some(fingerprint) = document.fingerprint {
            if let Some(index) = self
                .open_documents
                .iter()
                .position(|doc| doc.fingerprint == Some(fingerprint))
            {
                self.open_documents[index] = document;
                self.active_index = index;
                return index;
            }
        }

        // A pristine scratch tab gets replaced instead of lingering.
        if self.open_documents.len() == 1
            && self.open_documents[0].path.is_none()
            && !self.open_documents[0].is_modified
            && self.open_documents[0].buffer.is_empty()
        {
            self.open_documents[0] = document;
            self.active_index = 0;
            return 0;
        }

        self.open_documents.push(document);
        self.active_index = self.open_documents.len() - 1;
        self.active_index
    }

    /// Closes the tab at `index`; the session always keeps at least one
    /// (scratch) document.
    pub fn close_document(&mut self, index: usize) {
        if index >= self.open_documents.len() {
            return;
        }
        self.open_documents.remove(index);
        if self.open_documents.is_empty() {
            self.open_documents.push(Document::default());
        }
        if self.active_index >= self.open_documents.len() {
            self.active_index = self.open_documents.len() - 1;
        }
    }

    pub fn workspace_root(&self) -> Option<&str> {
        self.workspace_root.as_deref()
    }

    pub fn workspace_tree(&self) -> Option<&[FileNode]> {
        self.workspace_root
            .is_some()
            .then_some(self.workspace_tree.as_slice())
    }

    pub fn workspace_tree_mut(&mut self) -> &mut Vec<FileNode> {
        &mut self.workspace_tree
    }

    pub fn set_workspace(&mut self, root: String, tree: Vec<FileNode>) {
        self.workspace_root = Some(root);
        self.workspace_tree = tree;
    }

    /// Human-friendly status line for the active tab.
    pub fn status_line(&self) -> String {
        match self.active_document() {
            Some(doc) => {
                let name = doc.path.as_deref().unwrap_or("(scratch)");
                let dirty = if doc.is_modified { "*" } else { "" };
                format!("{}{}", name, dirty)
            }
            None => "No document".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn opening_replaces_pristine_scratch_tab() {
        let mut session = Session::new();
        assert_eq!(session.open_documents().len(), 1);

        session.open_document(Document::new(None, "pasted".to_string()));
        assert_eq!(session.open_documents().len(), 1);
        assert_eq!(session.active_document().unwrap().buffer.as_str(), "pasted");
    }

    #[test]
    fn reopening_same_path_focuses_existing_tab() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "hello").unwrap();

        let mut session = Session::new();
        let first = session.open_document(Document::from_path(&file).unwrap());
        session.open_document(Document::new(None, "other".to_string()));
        let again = session.open_document(Document::from_path(&file).unwrap());

        assert_eq!(first, again);
        assert_eq!(session.open_documents().len(), 2);
        assert_eq!(session.active_index(), first);
    }

    #[test]
    fn closing_the_last_tab_leaves_a_scratch_buffer() {
        let mut session = Session::new();
        session.close_document(0);
        assert_eq!(session.open_documents().len(), 1);
        assert!(session.active_document().unwrap().path.is_none());
    }

    #[test]
    fn closing_clamps_the_active_index() {
        let mut session = Session::new();
        session.open_document(Document::new(None, "a".to_string()));
        session.open_document(Document::new(None, "b".to_string()));
        session.set_active(2);
        session.close_document(2);
        assert_eq!(session.active_index(), session.open_documents().len() - 1);
    }

    #[test]
    fn status_line_marks_modified_documents() {
        let mut session = Session::new();
        assert_eq!(session.status_line(), "(scratch)");
        session
            .active_document_mut()
            .unwrap()
            .update_contents("x".to_string());
        assert_eq!(session.status_line(), "(scratch)*");
    }
}
