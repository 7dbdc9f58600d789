use crate::message::Message;
use iced::keyboard::key::Named;
use iced::keyboard::{Key, Modifiers};

/// Global shortcuts, checked before the focused widget sees the key.
pub fn on_key_press(key: Key, modifiers: Modifiers) -> Option<Message> {
    match &key {
        Key::Character(c) if modifiers.command() => match c.as_str() {
            "s" => Some(Message::SaveRequested),
            "o" if modifiers.shift() => Some(Message::WorkspaceOpenRequested),
            "o" => Some(Message::OpenFileRequested),
            "f" => Some(Message::SearchOpened),
            _ => None,
        },
        Key::Named(Named::Escape) => Some(Message::SearchClosed),
        Key::Named(Named::F3) if modifiers.shift() => Some(Message::SearchPreviousRequested),
        Key::Named(Named::F3) => Some(Message::SearchNextRequested),
        _ => None,
    }
}
