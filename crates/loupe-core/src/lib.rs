pub mod document;
pub mod line_buffer;
pub mod minimap;
pub mod scope;
pub mod search;
pub mod session;
pub mod workspace;

pub use document::Document;
pub use line_buffer::LineBuffer;
pub use scope::{IndentLevel, Position, ScopeRange};
pub use session::Session;
pub use workspace::FileNode;
