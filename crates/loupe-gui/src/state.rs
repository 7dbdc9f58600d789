use crate::commands::WorkspaceData;
use crate::message::WorkspaceSnapshot;
use crate::syntax::Settings as SyntaxSettings;
use crate::widgets::code_editor::{self, ScrollMetrics};
use iced::widget::canvas;
use iced::widget::text_editor::{Action as TextEditorAction, Content};
use loupe_config::{AppConfig, SessionSnapshot, Theme};
use loupe_core::minimap::RasterCache;
use loupe_core::scope;
use loupe_core::search::{self, SearchMatch};
use loupe_core::workspace;
use loupe_core::{Document, Position, ScopeRange, Session};
use loupe_syntax::{Language, Palette, DARK_PALETTE, LIGHT_PALETTE};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct AppState {
    session: Session,
    config: AppConfig,
    config_dir: Option<PathBuf>,
    error: Option<String>,
    buffer_content: Content,
    /// Line snapshot of the active buffer, the input every detector works on.
    buffer_lines: Vec<String>,
    active_scope: Option<ScopeRange>,
    search: SearchState,
    minimap: MinimapState,
    workspace_version: u64,
    workspace_snapshot: Option<Arc<Vec<loupe_core::FileNode>>>,
}

impl AppState {
    pub fn load() -> Self {
        let config_dir = loupe_config::default_config_dir();
        let config = match config_dir
            .as_deref()
            .map(AppConfig::load_or_default)
            .transpose()
        {
            Ok(config) => config.unwrap_or_default(),
            Err(err) => {
                log::warn!("falling back to default configuration: {}", err);
                AppConfig::default()
            }
        };

        let mut state = Self {
            session: Session::new(),
            config,
            config_dir,
            error: None,
            buffer_content: Content::new(),
            buffer_lines: Vec::new(),
            active_scope: None,
            search: SearchState::default(),
            minimap: MinimapState::default(),
            workspace_version: 0,
            workspace_snapshot: None,
        };
        state.sync_buffer_from_session();
        state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_dir(&self) -> Option<&Path> {
        self.config_dir.as_deref()
    }

    pub fn buffer_content(&self) -> &Content {
        &self.buffer_content
    }

    pub fn buffer_lines(&self) -> &[String] {
        &self.buffer_lines
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: Option<String>) {
        if let Some(message) = &message {
            log::warn!("{}", message);
        }
        self.error = message;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn active_scope(&self) -> Option<ScopeRange> {
        self.active_scope
    }

    pub fn theme(&self) -> iced::Theme {
        match self.config.theme {
            Theme::Dark => iced::Theme::Dark,
            Theme::Light => iced::Theme::Light,
        }
    }

    pub fn palette(&self) -> &'static Palette {
        match self.config.theme {
            Theme::Dark => &DARK_PALETTE,
            Theme::Light => &LIGHT_PALETTE,
        }
    }

    pub fn active_language(&self) -> Language {
        self.session
            .active_document()
            .and_then(|doc| doc.path.as_deref())
            .map(Language::from_path)
            .unwrap_or(Language::PlainText)
    }

    pub fn syntax_settings(&self) -> SyntaxSettings {
        SyntaxSettings {
            language: self.active_language(),
            theme: self.config.theme,
        }
    }

    pub fn cursor_position(&self) -> (usize, usize) {
        self.buffer_content.cursor_position()
    }

    pub fn scroll_metrics(&self) -> ScrollMetrics {
        code_editor::buffer_scroll_metrics(&self.buffer_content)
    }

    // -- documents ---------------------------------------------------------

    pub fn open_document(&mut self, document: Document) {
        self.session.open_document(document);
        self.clear_error();
        self.sync_buffer_from_session();
    }

    pub fn select_document(&mut self, index: usize) {
        if index != self.session.active_index() {
            self.session.set_active(index);
            self.sync_buffer_from_session();
        }
    }

    pub fn close_document(&mut self, index: usize) {
        self.session.close_document(index);
        self.sync_buffer_from_session();
    }

    pub fn handle_document_saved(&mut self, path: Option<String>) {
        if let Some(document) = self.session.active_document_mut() {
            if let Some(path) = path {
                document.set_path(path);
            }
            document.mark_clean();
        }
        self.clear_error();
    }

    pub fn sync_buffer_from_session(&mut self) {
        let contents = self
            .session
            .active_document()
            .map(|doc| doc.buffer.as_str().to_string())
            .unwrap_or_default();

        self.buffer_content = Content::with_text(&contents);
        self.refresh_buffer_lines();
        self.refresh_search_matches();
        self.refresh_scope();
        self.minimap.invalidate();
    }

    pub fn apply_buffer_action(&mut self, action: TextEditorAction) {
        let is_edit = action.is_edit();
        self.buffer_content.perform(action);

        if is_edit {
            let updated = self.buffer_contents_to_string();
            if let Some(document) = self.session.active_document_mut() {
                document.update_contents(updated);
            }
            self.refresh_buffer_lines();
            self.refresh_search_matches();
            self.minimap.invalidate();
        }

        self.refresh_scope();
    }

    fn buffer_contents_to_string(&self) -> String {
        let mut text = self.buffer_content.text();
        if text.ends_with('\n') {
            text.pop();
        }
        text
    }

    fn refresh_buffer_lines(&mut self) {
        self.buffer_lines = self
            .session
            .active_document()
            .map(|doc| doc.buffer.lines().map(str::to_string).collect())
            .unwrap_or_default();
    }

    /// Recomputes the unified scope at the cursor. The editor reports the
    /// column in characters; the detectors expect bytes.
    fn refresh_scope(&mut self) {
        if !self.config.highlight_active_scope {
            self.active_scope = None;
            return;
        }

        let (line, column) = self.buffer_content.cursor_position();
        let byte_column = self
            .buffer_lines
            .get(line)
            .map(|text| char_to_byte_column(text, column))
            .unwrap_or(0);

        self.active_scope = scope::unified_scope(
            &self.buffer_lines,
            Position::new(line, byte_column),
        )
        .filter(|range| !range.is_trivial());
    }

    pub fn scroll_to_visual_line(&mut self, target: usize) {
        code_editor::scroll_to(&mut self.buffer_content, target);
        self.refresh_scope();
    }

    // -- workspace ---------------------------------------------------------

    pub fn install_workspace(&mut self, data: WorkspaceData) {
        self.config.record_recent_workspace(&data.root);
        self.session.set_workspace(data.root, data.tree);
        self.bump_workspace_version();
        self.clear_error();
    }

    pub fn toggle_workspace_directory(&mut self, path: String) {
        let ignored = self.config.ignored_directories.clone();
        match workspace::toggle_directory(self.session.workspace_tree_mut(), &path, &ignored) {
            Ok(true) => self.bump_workspace_version(),
            Ok(false) => {}
            Err(err) => self.set_error(Some(format!("Failed to read {}: {}", path, err))),
        }
    }

    fn bump_workspace_version(&mut self) {
        self.workspace_version += 1;
        self.workspace_snapshot = self
            .session
            .workspace_tree()
            .map(|tree| Arc::new(tree.to_vec()));
    }

    pub fn workspace_snapshot(&self) -> Option<WorkspaceSnapshot> {
        self.workspace_snapshot
            .as_ref()
            .map(|tree| WorkspaceSnapshot::new(self.workspace_version, Arc::clone(tree)))
    }

    // -- search ------------------------------------------------------------

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    pub fn open_search(&mut self) {
        self.search.open = true;
    }

    /// Closes the bar and drops the match list. Returns whether it was open,
    /// so Escape can fall through to other consumers when it was not.
    pub fn close_search(&mut self) -> bool {
        let was_open = self.search.open;
        self.search = SearchState {
            case_sensitive: self.search.case_sensitive,
            ..SearchState::default()
        };
        was_open
    }

    pub fn set_search_query(&mut self, query: String) {
        self.search.query = query;
        self.refresh_search_matches();
    }

    pub fn set_search_case_sensitive(&mut self, case_sensitive: bool) {
        self.search.case_sensitive = case_sensitive;
        self.refresh_search_matches();
    }

    pub fn set_search_replacement(&mut self, replacement: String) {
        self.search.replacement = replacement;
    }

    /// Replaces the current match (seeding it from the cursor when none is
    /// selected yet) and re-runs the search over the rewritten buffer.
    pub fn replace_current(&mut self) {
        if self.active_document_read_only() || self.search.matches.is_empty() {
            return;
        }

        let index = match self.search.current {
            Some(index) => index,
            None => match search::next_match(&self.search.matches, self.cursor_as_position()) {
                Some(index) => index,
                None => return,
            },
        };

        let found = self.search.matches[index];
        let Some(new_line) =
            search::replace_match(&self.buffer_lines, found, &self.search.replacement)
        else {
            return;
        };

        self.buffer_lines[found.line] = new_line;
        let updated = self.buffer_lines.join("\n");
        if let Some(document) = self.session.active_document_mut() {
            document.update_contents(updated);
        }
        self.sync_buffer_from_session();
    }

    /// Replaces every match in the buffer and returns how many were rewritten.
    pub fn replace_all_matches(&mut self) -> usize {
        if self.active_document_read_only() || self.search.query.is_empty() {
            return 0;
        }

        let text = self.buffer_lines.join("\n");
        let (updated, count) = search::replace_all(
            &text,
            &self.search.query,
            &self.search.replacement,
            self.search.case_sensitive,
        );

        if count > 0 {
            if let Some(document) = self.session.active_document_mut() {
                document.update_contents(updated);
            }
            self.sync_buffer_from_session();
        }
        count
    }

    pub fn active_document_read_only(&self) -> bool {
        self.session
            .active_document()
            .map(|doc| doc.read_only)
            .unwrap_or(true)
    }

    fn cursor_as_position(&self) -> Position {
        let (line, column) = self.buffer_content.cursor_position();
        let byte_column = self
            .buffer_lines
            .get(line)
            .map(|text| char_to_byte_column(text, column))
            .unwrap_or(0);
        Position::new(line, byte_column)
    }

    fn refresh_search_matches(&mut self) {
        if !self.search.open || self.search.query.is_empty() {
            self.search.matches.clear();
            self.search.current = None;
            return;
        }

        self.search.matches = search::find_all(
            &self.buffer_lines,
            &self.search.query,
            self.search.case_sensitive,
        );
        self.search.current = self
            .search
            .current
            .filter(|index| *index < self.search.matches.len());
    }

    /// Advances to the next or previous match relative to the cursor and
    /// returns the line to bring into view.
    pub fn advance_search(&mut self, forward: bool) -> Option<usize> {
        if self.search.matches.is_empty() {
            return None;
        }

        let cursor = self.cursor_as_position();

        let index = match self.search.current {
            Some(current) => {
                let len = self.search.matches.len();
                if forward {
                    (current + 1) % len
                } else {
                    (current + len - 1) % len
                }
            }
            None if forward => search::next_match(&self.search.matches, cursor)?,
            None => search::prev_match(&self.search.matches, cursor)?,
        };

        self.search.current = Some(index);
        Some(self.search.matches[index].line)
    }

    // -- settings ----------------------------------------------------------

    pub fn toggle_theme(&mut self) {
        self.config.theme = self.config.theme.toggled();
        self.minimap.invalidate();
    }

    pub fn toggle_minimap(&mut self) {
        self.config.show_minimap = !self.config.show_minimap;
        self.minimap.invalidate();
    }

    pub fn toggle_indent_guides(&mut self) {
        self.config.show_indent_guides = !self.config.show_indent_guides;
    }

    // -- minimap -----------------------------------------------------------

    pub fn minimap_cache(&self) -> &canvas::Cache {
        &self.minimap.cache
    }

    pub fn observe_window_resize(&mut self, width: u32, height: u32) {
        self.minimap.raster.observe_size(width, height);
    }

    /// Flushes pending minimap invalidations into the canvas cache. Called
    /// once per update cycle so edit bursts clear the raster only once.
    pub fn sync_minimap(&mut self) {
        if self.minimap.raster.take_rebuild() {
            self.minimap.cache.clear();
        }
    }

    // -- persistence -------------------------------------------------------

    pub fn session_snapshot(&self) -> SessionSnapshot {
        let open_files: Vec<String> = self
            .session
            .open_documents()
            .iter()
            .filter_map(|doc| doc.path.clone())
            .collect();

        let active_index = self
            .session
            .active_document()
            .and_then(|active| active.path.as_deref())
            .and_then(|path| open_files.iter().position(|entry| entry == path))
            .unwrap_or(0);

        SessionSnapshot {
            workspace_root: self.session.workspace_root().map(str::to_string),
            open_files,
            active_index,
        }
    }
}

#[derive(Debug, Default)]
pub struct SearchState {
    open: bool,
    query: String,
    replacement: String,
    case_sensitive: bool,
    matches: Vec<SearchMatch>,
    current: Option<usize>,
}

impl SearchState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }
}

struct MinimapState {
    raster: RasterCache,
    cache: canvas::Cache,
}

impl Default for MinimapState {
    fn default() -> Self {
        Self {
            raster: RasterCache::new(),
            cache: canvas::Cache::new(),
        }
    }
}

impl MinimapState {
    fn invalidate(&mut self) {
        self.raster.invalidate();
    }
}

fn char_to_byte_column(line: &str, char_column: usize) -> usize {
    line.char_indices()
        .nth(char_column)
        .map(|(byte, _)| byte)
        .unwrap_or(line.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_columns_map_to_byte_columns() {
        assert_eq!(char_to_byte_column("abc", 0), 0);
        assert_eq!(char_to_byte_column("abc", 2), 2);
        assert_eq!(char_to_byte_column("abc", 9), 3);
        // Multibyte characters widen the byte column.
        assert_eq!(char_to_byte_column("éé x", 2), 4);
    }
}
