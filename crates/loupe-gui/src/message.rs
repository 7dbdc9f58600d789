use crate::commands::{RestoredSession, WorkspaceData};
use iced::widget::text_editor::Action as TextEditorAction;
use loupe_core::{Document, FileNode};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Message {
    OpenFileRequested,
    FileLoaded(Result<Option<Document>, String>),
    DocumentSelected(usize),
    DocumentCloseRequested(usize),
    DocumentSaved(Result<Option<String>, String>),
    SaveRequested,
    WorkspaceOpenRequested,
    WorkspaceLoaded(Result<Option<WorkspaceData>, String>),
    WorkspaceFileActivated(String),
    WorkspaceDirectoryToggled(String),
    BufferAction(TextEditorAction),
    SessionRestored(Result<RestoredSession, String>),
    SessionPersisted(Result<(), String>),
    ConfigPersisted(Result<(), String>),
    SearchOpened,
    SearchClosed,
    SearchQueryChanged(String),
    SearchCaseToggled(bool),
    SearchNextRequested,
    SearchPreviousRequested,
    SearchReplacementChanged(String),
    ReplaceCurrentRequested,
    ReplaceAllRequested,
    ThemeToggled,
    MinimapToggled,
    IndentGuidesToggled,
    MinimapScrollRequested(usize),
    WindowResized(iced::Size),
}

/// Cheap identity handle over the explorer tree, so the lazy widget only
/// re-renders when the tree version changes.
#[derive(Clone)]
pub struct WorkspaceSnapshot {
    pub version: u64,
    pub tree: Arc<Vec<FileNode>>,
}

impl WorkspaceSnapshot {
    pub fn new(version: u64, tree: Arc<Vec<FileNode>>) -> Self {
        Self { version, tree }
    }
}

impl fmt::Debug for WorkspaceSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceSnapshot")
            .field("version", &self.version)
            .field("tree_entries", &self.tree.len())
            .finish()
    }
}

impl Hash for WorkspaceSnapshot {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.version.hash(state);
        (Arc::as_ptr(&self.tree) as usize).hash(state);
    }
}
