//! Workspace file tree rendering. Directories expand in place; children are
//! only present on nodes that have been expanded at least once.

use crate::message::{Message, WorkspaceSnapshot};
use crate::style;
use iced::widget::{button, column, container, scrollable, text, Column};
use iced::{Element, Length, Padding};
use loupe_core::FileNode;

const INDENT_STEP: f32 = 14.0;

pub fn file_explorer(snapshot: &WorkspaceSnapshot) -> Element<'static, Message> {
    scrollable(render_nodes(snapshot.tree.as_slice(), 0))
        .height(Length::Fill)
        .into()
}

pub fn empty_explorer() -> Element<'static, Message> {
    column![text("Open a folder to browse files").size(13)]
        .width(Length::Fill)
        .into()
}

fn render_nodes(nodes: &[FileNode], depth: u16) -> Column<'static, Message> {
    nodes.iter().fold(Column::new().spacing(2), |column, node| {
        column.push(render_node(node, depth))
    })
}

fn render_node(node: &FileNode, depth: u16) -> Element<'static, Message> {
    let label = if node.is_directory {
        let marker = if node.expanded { "▾" } else { "▸" };
        format!("{} {}", marker, node.name)
    } else {
        node.name.clone()
    };

    let message = if node.is_directory {
        Message::WorkspaceDirectoryToggled(node.path.clone())
    } else {
        Message::WorkspaceFileActivated(node.path.clone())
    };

    let entry = button(text(label).size(13))
        .style(style::explorer_entry_button)
        .width(Length::Fill)
        .padding([1.0, 4.0])
        .on_press(message);

    let indent = depth as f32 * INDENT_STEP;
    let mut column = Column::new();
    column = column.push(container(entry).padding(Padding {
        left: indent,
        ..Padding::ZERO
    }));

    if node.is_directory && node.expanded {
        column = column.push(render_nodes(&node.children, depth + 1));
    }

    column.into()
}
