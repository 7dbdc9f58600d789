pub mod code_editor;
pub mod file_explorer;
pub mod minimap;
