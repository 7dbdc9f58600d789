use regex::Regex;
use std::sync::OnceLock;

/// Plain sRGB color, independent of any UI toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Token classes the rule set can assign to a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TokenKind {
    #[default]
    Text,
    Keyword,
    Comment,
    String,
    Variable,
    Method,
    Class,
    Number,
    Preprocessor,
    Parameter,
}

/// Display style resolved from a token kind and palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenStyle {
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
}

/// Token colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub keyword: Color,
    pub comment: Color,
    pub string: Color,
    pub variable: Color,
    pub method: Color,
    pub class: Color,
    pub number: Color,
    pub preprocessor: Color,
    pub parameter: Color,
}

pub const DARK_PALETTE: Palette = Palette {
    text: Color::new(230, 230, 230),
    keyword: Color::new(0x4F, 0xC3, 0xF7),
    comment: Color::new(0x81, 0xC7, 0x84),
    string: Color::new(0xF4, 0x8F, 0xB1),
    variable: Color::new(0xFF, 0xD5, 0x4F),
    method: Color::new(0x64, 0xB5, 0xF6),
    class: Color::new(0xBA, 0x68, 0xC8),
    number: Color::new(0xFF, 0x70, 0x43),
    preprocessor: Color::new(0xFF, 0xEB, 0x3B),
    parameter: Color::new(0xFF, 0xB7, 0x4D),
};

pub const LIGHT_PALETTE: Palette = Palette {
    text: Color::new(30, 30, 30),
    keyword: Color::new(0x15, 0x65, 0xC0),
    comment: Color::new(0x2E, 0x7D, 0x32),
    string: Color::new(0xAD, 0x14, 0x57),
    variable: Color::new(0xFF, 0x8F, 0x00),
    method: Color::new(0x0D, 0x47, 0xA1),
    class: Color::new(0x6A, 0x1B, 0x9A),
    number: Color::new(0xE6, 0x51, 0x00),
    preprocessor: Color::new(0xF5, 0x7F, 0x17),
    parameter: Color::new(0xEF, 0x6C, 0x00),
};

impl Palette {
    pub fn color(&self, kind: TokenKind) -> Color {
        match kind {
            TokenKind::Text => self.text,
            TokenKind::Keyword => self.keyword,
            TokenKind::Comment => self.comment,
            TokenKind::String => self.string,
            TokenKind::Variable => self.variable,
            TokenKind::Method => self.method,
            TokenKind::Class => self.class,
            TokenKind::Number => self.number,
            TokenKind::Preprocessor => self.preprocessor,
            TokenKind::Parameter => self.parameter,
        }
    }

    pub fn style(&self, kind: TokenKind) -> TokenStyle {
        let bold = matches!(
            kind,
            TokenKind::Keyword
                | TokenKind::Method
                | TokenKind::Class
                | TokenKind::Number
                | TokenKind::Preprocessor
        );
        let italic = matches!(kind, TokenKind::Variable | TokenKind::Parameter);
        TokenStyle {
            color: self.color(kind),
            bold,
            italic,
        }
    }
}

/// One pattern -> token-kind rule. When `capture` is nonzero only that
/// capture group is painted.
#[derive(Debug)]
pub struct HighlightRule {
    pub pattern: Regex,
    pub kind: TokenKind,
    pub capture: usize,
}

/// The fixed, ordered rule list. Order is paint precedence: later rules
/// overpaint earlier ones where matches overlap.
pub fn rules() -> &'static [HighlightRule] {
    static RULES: OnceLock<Vec<HighlightRule>> = OnceLock::new();
    RULES.get_or_init(build_rules)
}

fn build_rules() -> Vec<HighlightRule> {
    let rule = |pattern: &str, kind: TokenKind, capture: usize| HighlightRule {
        // Patterns are fixed literals; a failure here is a programming error.
        pattern: Regex::new(pattern).expect("fixed pattern must compile"),
        kind,
        capture,
    };

    vec![
        rule(
            r"\b(?:class|const|int|float|return|if|else)\b",
            TokenKind::Keyword,
            0,
        ),
        rule(r"//[^\n]*", TokenKind::Comment, 0),
        rule(r#"".*""#, TokenKind::String, 0),
        rule(
            r"\b(?:int|float|double|char|auto)\s+(\w+)\b",
            TokenKind::Variable,
            1,
        ),
        rule(r"\b(\w+)\(", TokenKind::Method, 1),
        rule(r"\b[A-Z][A-Za-z0-9_]*\b", TokenKind::Class, 0),
        rule(r"\b\d+\b", TokenKind::Number, 0),
        rule(r"\b\d+\.\d+\b", TokenKind::Number, 0),
        rule(r"0x[0-9A-Fa-f]+", TokenKind::Number, 0),
        rule(r"^\s*#\w+", TokenKind::Preprocessor, 0),
        rule(r"\(([^)]*)\)", TokenKind::Parameter, 1),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_list_is_built_once() {
        let first = rules().as_ptr();
        let second = rules().as_ptr();
        assert_eq!(first, second);
        assert!(!rules().is_empty());
    }

    #[test]
    fn palettes_map_every_kind() {
        for kind in [
            TokenKind::Text,
            TokenKind::Keyword,
            TokenKind::Comment,
            TokenKind::String,
            TokenKind::Variable,
            TokenKind::Method,
            TokenKind::Class,
            TokenKind::Number,
            TokenKind::Preprocessor,
            TokenKind::Parameter,
        ] {
            // Styling must be total over kinds for both themes.
            let _ = DARK_PALETTE.style(kind);
            let _ = LIGHT_PALETTE.style(kind);
        }
        assert!(DARK_PALETTE.style(TokenKind::Keyword).bold);
        assert!(LIGHT_PALETTE.style(TokenKind::Parameter).italic);
        assert_ne!(DARK_PALETTE.keyword, LIGHT_PALETTE.keyword);
    }
}
