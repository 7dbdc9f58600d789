use crate::commands::{self, SaveDocumentRequest};
use crate::keyboard;
use crate::message::Message;
use crate::state::AppState;
use crate::view;
use iced::{Element, Subscription, Task, Theme};

pub fn run() -> iced::Result {
    iced::application(App::title, App::update, App::view)
        .subscription(App::subscription)
        .theme(App::theme)
        .antialiasing(true)
        .run_with(App::new)
}

struct App {
    state: AppState,
}

impl App {
    fn new() -> (Self, Task<Message>) {
        let state = AppState::load();

        let task = match state.config_dir() {
            Some(dir) => Task::perform(
                commands::restore_session(
                    dir.to_path_buf(),
                    state.config().ignored_directories.clone(),
                ),
                Message::SessionRestored,
            ),
            None => Task::none(),
        };

        (Self { state }, task)
    }

    fn title(&self) -> String {
        match self.state.session().active_document() {
            Some(document) => format!("{} - loupe", document.display_name()),
            None => "loupe".to_string(),
        }
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        let task = self.handle(message);
        self.state.sync_minimap();
        task
    }

    fn handle(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::OpenFileRequested => {
                Task::perform(commands::pick_document(), Message::FileLoaded)
            }
            Message::FileLoaded(Ok(Some(document))) => {
                self.state.open_document(document);
                self.persist_session()
            }
            Message::FileLoaded(Ok(None)) => Task::none(),
            Message::FileLoaded(Err(err)) => {
                self.state.set_error(Some(err));
                Task::none()
            }
            Message::DocumentSelected(index) => {
                self.state.select_document(index);
                self.persist_session()
            }
            Message::DocumentCloseRequested(index) => {
                self.state.close_document(index);
                self.persist_session()
            }
            Message::SaveRequested => match self.state.session().active_document() {
                Some(document) => {
                    let request = SaveDocumentRequest {
                        path: document.path.clone(),
                        contents: document.buffer.as_str().to_string(),
                        suggested_name: Some(document.display_name().to_string()),
                    };
                    Task::perform(commands::save_document(request), Message::DocumentSaved)
                }
                None => Task::none(),
            },
            Message::DocumentSaved(Ok(Some(path))) => {
                self.state.handle_document_saved(Some(path));
                self.persist_session()
            }
            Message::DocumentSaved(Ok(None)) => Task::none(),
            Message::DocumentSaved(Err(err)) => {
                self.state.set_error(Some(err));
                Task::none()
            }
            Message::WorkspaceOpenRequested => Task::perform(
                commands::pick_workspace(self.state.config().ignored_directories.clone()),
                Message::WorkspaceLoaded,
            ),
            Message::WorkspaceLoaded(Ok(Some(data))) => {
                self.state.install_workspace(data);
                Task::batch([self.persist_config(), self.persist_session()])
            }
            Message::WorkspaceLoaded(Ok(None)) => Task::none(),
            Message::WorkspaceLoaded(Err(err)) => {
                self.state.set_error(Some(err));
                Task::none()
            }
            Message::WorkspaceFileActivated(path) => Task::perform(
                commands::load_document_from_path(path),
                |result| Message::FileLoaded(result.map(Some)),
            ),
            Message::WorkspaceDirectoryToggled(path) => {
                self.state.toggle_workspace_directory(path);
                Task::none()
            }
            Message::BufferAction(action) => {
                self.state.apply_buffer_action(action);
                Task::none()
            }
            Message::SessionRestored(Ok(restored)) => {
                if let Some(workspace) = restored.workspace {
                    self.state.install_workspace(workspace);
                }
                for document in restored.documents {
                    self.state.open_document(document);
                }
                self.state.select_document(restored.active_index);
                Task::none()
            }
            Message::SessionRestored(Err(err)) => {
                log::warn!("session restore failed: {}", err);
                Task::none()
            }
            Message::SessionPersisted(result) => {
                if let Err(err) = result {
                    log::warn!("{}", err);
                }
                Task::none()
            }
            Message::ConfigPersisted(result) => {
                if let Err(err) = result {
                    log::warn!("{}", err);
                }
                Task::none()
            }
            Message::SearchOpened => {
                self.state.open_search();
                Task::none()
            }
            Message::SearchClosed => {
                self.state.close_search();
                Task::none()
            }
            Message::SearchQueryChanged(query) => {
                self.state.set_search_query(query);
                Task::none()
            }
            Message::SearchCaseToggled(case_sensitive) => {
                self.state.set_search_case_sensitive(case_sensitive);
                Task::none()
            }
            Message::SearchNextRequested => {
                self.advance_search(true);
                Task::none()
            }
            Message::SearchPreviousRequested => {
                self.advance_search(false);
                Task::none()
            }
            Message::SearchReplacementChanged(replacement) => {
                self.state.set_search_replacement(replacement);
                Task::none()
            }
            Message::ReplaceCurrentRequested => {
                self.state.replace_current();
                Task::none()
            }
            Message::ReplaceAllRequested => {
                self.state.replace_all_matches();
                Task::none()
            }
            Message::ThemeToggled => {
                self.state.toggle_theme();
                self.persist_config()
            }
            Message::MinimapToggled => {
                self.state.toggle_minimap();
                self.persist_config()
            }
            Message::IndentGuidesToggled => {
                self.state.toggle_indent_guides();
                self.persist_config()
            }
            Message::MinimapScrollRequested(target) => {
                self.state.scroll_to_visual_line(target);
                Task::none()
            }
            Message::WindowResized(size) => {
                self.state
                    .observe_window_resize(size.width as u32, size.height as u32);
                Task::none()
            }
        }
    }

    fn advance_search(&mut self, forward: bool) {
        if !self.state.search().is_open() {
            self.state.open_search();
        }
        if let Some(line) = self.state.advance_search(forward) {
            self.state.scroll_to_visual_line(line);
        }
    }

    fn view(&self) -> Element<'_, Message> {
        view::view(&self.state)
    }

    fn theme(&self) -> Theme {
        self.state.theme()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            iced::keyboard::on_key_press(keyboard::on_key_press),
            iced::window::resize_events().map(|(_id, size)| Message::WindowResized(size)),
        ])
    }

    fn persist_config(&self) -> Task<Message> {
        match self.state.config_dir() {
            Some(dir) => Task::perform(
                commands::save_config(dir.to_path_buf(), self.state.config().clone()),
                Message::ConfigPersisted,
            ),
            None => Task::none(),
        }
    }

    fn persist_session(&self) -> Task<Message> {
        match self.state.config_dir() {
            Some(dir) => Task::perform(
                commands::save_session(dir.to_path_buf(), self.state.session_snapshot()),
                Message::SessionPersisted,
            ),
            None => Task::none(),
        }
    }
}
