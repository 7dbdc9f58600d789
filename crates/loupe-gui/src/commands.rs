use loupe_config::{AppConfig, SessionSnapshot};
use loupe_core::workspace;
use loupe_core::{Document, FileNode};
use rfd::FileDialog;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SaveDocumentRequest {
    pub path: Option<String>,
    pub contents: String,
    pub suggested_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WorkspaceData {
    pub root: String,
    pub tree: Vec<FileNode>,
}

/// Everything the previous run left behind, reloaded from disk.
#[derive(Debug, Clone)]
pub struct RestoredSession {
    pub workspace: Option<WorkspaceData>,
    pub documents: Vec<Document>,
    pub active_index: usize,
}

pub async fn pick_document() -> Result<Option<Document>, String> {
    if let Some(path) = FileDialog::new().pick_file() {
        let document = Document::from_path(&path)
            .map_err(|err| format!("Failed to read file: {}", err))?;
        Ok(Some(document))
    } else {
        Ok(None)
    }
}

pub async fn load_document_from_path(path: String) -> Result<Document, String> {
    Document::from_path(&path).map_err(|err| format!("Failed to read file: {}", err))
}

pub async fn pick_workspace(ignored: Vec<String>) -> Result<Option<WorkspaceData>, String> {
    if let Some(path) = FileDialog::new().pick_folder() {
        load_workspace(path, &ignored).map(Some)
    } else {
        Ok(None)
    }
}

pub async fn load_workspace_from_path(
    path: PathBuf,
    ignored: Vec<String>,
) -> Result<Option<WorkspaceData>, String> {
    if path.is_dir() {
        load_workspace(path, &ignored).map(Some)
    } else {
        Ok(None)
    }
}

fn load_workspace(path: PathBuf, ignored: &[String]) -> Result<WorkspaceData, String> {
    let root = path.to_string_lossy().to_string();
    let tree = workspace::build_tree(&path, ignored)
        .map_err(|err| format!("Failed to read folder: {}", err))?;
    Ok(WorkspaceData { root, tree })
}

pub async fn save_document(request: SaveDocumentRequest) -> Result<Option<String>, String> {
    let SaveDocumentRequest {
        path,
        contents,
        suggested_name,
    } = request;

    if let Some(path) = path {
        let target = PathBuf::from(path);
        fs::write(&target, contents).map_err(|err| format!("Failed to write file: {}", err))?;
        return Ok(Some(target.to_string_lossy().to_string()));
    }

    let mut dialog = FileDialog::new();
    if let Some(name) = suggested_name.as_deref() {
        if !name.trim().is_empty() && name != "(scratch)" {
            dialog = dialog.set_file_name(name);
        }
    }

    if let Some(target) = dialog.save_file() {
        fs::write(&target, contents).map_err(|err| format!("Failed to write file: {}", err))?;
        Ok(Some(target.to_string_lossy().to_string()))
    } else {
        Ok(None)
    }
}

pub async fn save_config(dir: PathBuf, config: AppConfig) -> Result<(), String> {
    config
        .save(&dir)
        .map_err(|err| format!("Failed to save configuration: {}", err))
}

pub async fn save_session(dir: PathBuf, snapshot: SessionSnapshot) -> Result<(), String> {
    snapshot
        .save(&dir)
        .map_err(|err| format!("Failed to save session: {}", err))
}

/// Reloads the previous run's snapshot. Files that vanished in the meantime
/// are skipped rather than failing the whole restore.
pub async fn restore_session(
    dir: PathBuf,
    ignored: Vec<String>,
) -> Result<RestoredSession, String> {
    let snapshot = SessionSnapshot::load_or_default(&dir)
        .map_err(|err| format!("Failed to load session: {}", err))?;

    let workspace = match snapshot.workspace_root.as_deref() {
        Some(root) => load_workspace_from_path(PathBuf::from(root), ignored).await?,
        None => None,
    };

    let active_path = snapshot.open_files.get(snapshot.active_index).cloned();
    let mut documents = Vec::new();
    for path in &snapshot.open_files {
        match Document::from_path(path) {
            Ok(document) => documents.push(document),
            Err(err) => log::warn!("skipping {} from previous session: {}", path, err),
        }
    }

    let active_index = active_path
        .and_then(|path| {
            documents
                .iter()
                .position(|doc| doc.path.as_deref() == Some(path.as_str()))
        })
        .unwrap_or(0);

    Ok(RestoredSession {
        workspace,
        documents,
        active_index,
    })
}
