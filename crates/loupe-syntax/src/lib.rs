mod highlighter;
mod rules;

pub use highlighter::{fragments, highlight_line, BlockState, StyledSpan};
pub use rules::{Color, Palette, TokenKind, TokenStyle, DARK_PALETTE, LIGHT_PALETTE};

use std::fmt;
use std::path::Path;

/// Languages the viewer can recognize from a file path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    PlainText,
    C,
    CHeader,
    Cpp,
    CppHeader,
    Rust,
    Java,
    CSharp,
    JavaScript,
    TypeScript,
    Go,
    Python,
    Json,
    Toml,
    Yaml,
    Markdown,
    Shell,
}

impl Language {
    /// Human friendly label for the status bar.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::PlainText => "Plain Text",
            Self::C => "C",
            Self::CHeader => "C Header",
            Self::Cpp => "C++",
            Self::CppHeader => "C++ Header",
            Self::Rust => "Rust",
            Self::Java => "Java",
            Self::CSharp => "C#",
            Self::JavaScript => "JavaScript",
            Self::TypeScript => "TypeScript",
            Self::Go => "Go",
            Self::Python => "Python",
            Self::Json => "JSON",
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
            Self::Markdown => "Markdown",
            Self::Shell => "Shell",
        }
    }

    /// Whether the regex rule set applies; plain text and markdown render flat.
    pub fn supports_highlighting(self) -> bool {
        !matches!(self, Self::PlainText | Self::Markdown)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            if name.eq_ignore_ascii_case("makefile") {
                return Self::Shell;
            }
        }

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("c") => Self::C,
            Some("h") => Self::CHeader,
            Some("cpp" | "cc" | "cxx" | "c++") => Self::Cpp,
            Some("hh" | "hpp" | "hxx" | "h++") => Self::CppHeader,
            Some("rs") => Self::Rust,
            Some("java") => Self::Java,
            Some("cs") => Self::CSharp,
            Some("js" | "jsx" | "mjs") => Self::JavaScript,
            Some("ts" | "tsx") => Self::TypeScript,
            Some("go") => Self::Go,
            Some("py") => Self::Python,
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            Some("yaml" | "yml") => Self::Yaml,
            Some("md" | "markdown") => Self::Markdown,
            Some("sh" | "bash" | "zsh") => Self::Shell,
            _ => Self::PlainText,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_languages_from_extensions() {
        assert_eq!(Language::from_path("main.c"), Language::C);
        assert_eq!(Language::from_path("widget.hpp"), Language::CppHeader);
        assert_eq!(Language::from_path("lib.rs"), Language::Rust);
        assert_eq!(Language::from_path("app.TSX"), Language::TypeScript);
        assert_eq!(Language::from_path("notes.md"), Language::Markdown);
        assert_eq!(Language::from_path("no_extension"), Language::PlainText);
        assert_eq!(Language::from_path("Makefile"), Language::Shell);
    }

    #[test]
    fn plain_text_renders_flat() {
        assert!(!Language::PlainText.supports_highlighting());
        assert!(!Language::Markdown.supports_highlighting());
        assert!(Language::Cpp.supports_highlighting());
    }

    #[test]
    fn display_names() {
        assert_eq!(format!("{}", Language::Cpp), "C++");
        assert_eq!(format!("{}", Language::PlainText), "Plain Text");
    }
}
