use crate::message::Message;
use crate::state::AppState;
use crate::style;
use crate::syntax::{self, DocumentHighlighter};
use crate::widgets::code_editor::CodeEditor;
use crate::widgets::file_explorer;
use crate::widgets::minimap::Minimap;
use iced::widget::{
    button, checkbox, column, container, lazy, row, text, text_input, Row,
};
use iced::{Alignment, Element, Font, Length};

pub fn view(state: &AppState) -> Element<'_, Message> {
    let body = row![
        explorer_panel(state),
        column![
            tab_strip(state),
            search_bar(state),
            editor_row(state),
            status_bar(state),
        ]
        .spacing(6)
        .width(Length::FillPortion(4))
        .height(Length::Fill),
    ]
    .spacing(8)
    .width(Length::Fill)
    .height(Length::Fill);

    container(
        column![toolbar(state), body]
            .spacing(8)
            .width(Length::Fill)
            .height(Length::Fill),
    )
    .padding(8.0)
    .width(Length::Fill)
    .height(Length::Fill)
    .style(style::root_container)
    .into()
}

fn toolbar(state: &AppState) -> Element<'_, Message> {
    let toggle = |label: &'static str, message: Message| {
        button(text(label).size(13))
            .style(style::toolbar_button)
            .on_press(message)
    };

    let theme_label = match state.config().theme {
        loupe_config::Theme::Dark => "Light theme",
        loupe_config::Theme::Light => "Dark theme",
    };
    let minimap_label = if state.config().show_minimap {
        "Hide minimap"
    } else {
        "Show minimap"
    };
    let guides_label = if state.config().show_indent_guides {
        "Hide guides"
    } else {
        "Show guides"
    };

    container(
        row![
            text("loupe").size(18),
            toggle("Open File…", Message::OpenFileRequested),
            toggle("Open Folder…", Message::WorkspaceOpenRequested),
            toggle("Save", Message::SaveRequested),
            toggle("Find", Message::SearchOpened),
            toggle(theme_label, Message::ThemeToggled),
            toggle(minimap_label, Message::MinimapToggled),
            toggle(guides_label, Message::IndentGuidesToggled),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .padding([8.0, 12.0])
    .width(Length::Fill)
    .style(style::toolbar_container)
    .into()
}

fn explorer_panel(state: &AppState) -> Element<'_, Message> {
    let title = state
        .session()
        .workspace_root()
        .map(|root| {
            std::path::Path::new(root)
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or(root)
                .to_string()
        })
        .unwrap_or_else(|| "Explorer".to_string());

    let contents: Element<'_, Message> = match state.workspace_snapshot() {
        Some(snapshot) => lazy(snapshot, |snapshot| file_explorer::file_explorer(snapshot)).into(),
        None => file_explorer::empty_explorer(),
    };

    container(
        column![text(title).size(14), contents]
            .spacing(8)
            .height(Length::Fill),
    )
    .padding(10.0)
    .width(Length::FillPortion(1))
    .height(Length::Fill)
    .style(style::panel_container)
    .into()
}

fn tab_strip(state: &AppState) -> Element<'_, Message> {
    let mut tabs = Row::new().spacing(4);

    for (index, document) in state.session().open_documents().iter().enumerate() {
        let is_active = index == state.session().active_index();
        let mut label = document.display_name().to_string();
        if document.is_modified {
            label.push('*');
        }

        tabs = tabs.push(
            button(
                row![
                    text(label).size(13),
                    button(text("×").size(13))
                        .style(style::tab_button(false))
                        .padding([0.0, 4.0])
                        .on_press(Message::DocumentCloseRequested(index)),
                ]
                .spacing(4)
                .align_y(Alignment::Center),
            )
            .style(style::tab_button(is_active))
            .padding([3.0, 8.0])
            .on_press(Message::DocumentSelected(index)),
        );
    }

    tabs.into()
}

fn search_bar(state: &AppState) -> Element<'_, Message> {
    if !state.search().is_open() {
        return row![].into();
    }

    let counter = match (state.search().current_index(), state.search().match_count()) {
        (_, 0) if state.search().query().is_empty() => String::new(),
        (_, 0) => "no matches".to_string(),
        (Some(current), total) => format!("{}/{}", current + 1, total),
        (None, total) => format!("{} matches", total),
    };

    let find_row = row![
        text_input("Find…", state.search().query())
            .on_input(Message::SearchQueryChanged)
            .on_submit(Message::SearchNextRequested)
            .style(style::search_input)
            .size(13)
            .width(Length::Fixed(240.0)),
        checkbox("Aa", state.search().case_sensitive())
            .on_toggle(Message::SearchCaseToggled)
            .size(14)
            .text_size(13),
        button(text("↓").size(13))
            .style(style::toolbar_button)
            .on_press(Message::SearchNextRequested),
        button(text("↑").size(13))
            .style(style::toolbar_button)
            .on_press(Message::SearchPreviousRequested),
        text(counter).size(13),
        button(text("×").size(13))
            .style(style::toolbar_button)
            .on_press(Message::SearchClosed),
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    let mut replace_button = button(text("Replace").size(13)).style(style::toolbar_button);
    let mut replace_all_button = button(text("Replace all").size(13)).style(style::toolbar_button);
    if !state.active_document_read_only() {
        replace_button = replace_button.on_press(Message::ReplaceCurrentRequested);
        replace_all_button = replace_all_button.on_press(Message::ReplaceAllRequested);
    }

    let replace_row = row![
        text_input("Replace with…", state.search().replacement())
            .on_input(Message::SearchReplacementChanged)
            .on_submit(Message::ReplaceCurrentRequested)
            .style(style::search_input)
            .size(13)
            .width(Length::Fixed(240.0)),
        replace_button,
        replace_all_button,
    ]
    .spacing(8)
    .align_y(Alignment::Center);

    container(column![find_row, replace_row].spacing(4))
        .padding([4.0, 8.0])
        .style(style::panel_container)
        .into()
}

fn editor_row(state: &AppState) -> Element<'_, Message> {
    let colors = style::editor_colors(state.config().theme);

    let mut editor = CodeEditor::new(state.buffer_content())
        .height(Length::Fill)
        .padding(6.0)
        .font(Font::MONOSPACE)
        .font_size(state.config().font_size)
        .line_number_color(colors.muted)
        .gutter_background(colors.gutter_background)
        .style(style::editor_style);

    // Read-only documents never receive actions, which also hides the caret.
    if !state.active_document_read_only() {
        editor = editor.on_action(Message::BufferAction);
    }

    if state.config().show_indent_guides {
        editor = editor.indent_guides(style::guide_color(colors.background));
    }

    if let Some(scope) = state.active_scope() {
        editor = editor.active_scope(scope, colors.accent);
    }

    let editor: Element<'_, Message> = editor
        .highlight::<DocumentHighlighter>(state.syntax_settings(), syntax::to_format)
        .into();

    if state.config().show_minimap {
        let minimap = Minimap::new(
            state.buffer_lines(),
            state.scroll_metrics(),
            state.minimap_cache(),
            state.palette(),
            state.active_language().supports_highlighting(),
        )
        .view();

        row![editor, minimap]
            .spacing(2)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    } else {
        editor
    }
}

fn status_bar(state: &AppState) -> Element<'_, Message> {
    let (line, column) = state.cursor_position();

    let scope_label = state
        .active_scope()
        .map(|scope| format!("scope {}–{}", scope.start + 1, scope.end + 1))
        .unwrap_or_default();

    let mut items = row![
        text(state.session().status_line()).size(12),
        text(state.active_language().display_name()).size(12),
        text(format!("Ln {}, Col {}", line + 1, column + 1)).size(12),
        text(scope_label).size(12),
    ]
    .spacing(18)
    .align_y(Alignment::Center);

    if let Some(error) = state.error() {
        items = items.push(text(format!("Error: {}", error)).size(12));
    }

    container(items)
        .padding([5.0, 10.0])
        .width(Length::Fill)
        .style(style::status_container)
        .into()
}
