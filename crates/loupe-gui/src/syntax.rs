use iced::advanced::text::highlighter::{Format, Highlighter};
use iced::font::{Style, Weight};
use iced::Font;
use loupe_config::Theme;
use loupe_syntax::{highlight_line, BlockState, Language, TokenKind, TokenStyle};
use loupe_syntax::{DARK_PALETTE, LIGHT_PALETTE};
use std::ops::Range;

/// What the editor widget needs to know to color a document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub language: Language,
    pub theme: Theme,
}

/// One styled region handed back to iced; resolved to a concrete color and
/// font up front so `to_format` stays a plain function pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Highlight(TokenStyle);

impl Highlight {
    fn new(kind: TokenKind, theme: Theme) -> Self {
        let palette = match theme {
            Theme::Dark => &DARK_PALETTE,
            Theme::Light => &LIGHT_PALETTE,
        };
        Self(palette.style(kind))
    }
}

pub fn to_format(highlight: &Highlight, _theme: &iced::Theme) -> Format<Font> {
    let style = highlight.0;
    let font = Font {
        weight: if style.bold { Weight::Bold } else { Weight::Normal },
        style: if style.italic { Style::Italic } else { Style::Normal },
        ..Font::MONOSPACE
    };
    Format {
        color: Some(iced::Color::from_rgb8(
            style.color.r,
            style.color.g,
            style.color.b,
        )),
        font: Some(font),
    }
}

/// Line-by-line highlighter driven by iced's text editor. Keeps the block
/// comment state entering every line so re-highlighting can restart from an
/// edited line without scanning the whole document.
pub struct DocumentHighlighter {
    settings: Settings,
    current_line: usize,
    /// `states[n]` is the state entering line `n`.
    states: Vec<BlockState>,
}

impl Highlighter for DocumentHighlighter {
    type Settings = Settings;
    type Highlight = Highlight;
    type Iterator<'a> = Box<dyn Iterator<Item = (Range<usize>, Highlight)> + 'a>;

    fn new(settings: &Self::Settings) -> Self {
        Self {
            settings: *settings,
            current_line: 0,
            states: vec![BlockState::default()],
        }
    }

    fn update(&mut self, new_settings: &Self::Settings) {
        self.settings = *new_settings;
        self.states.truncate(1);
        self.current_line = 0;
    }

    fn change_line(&mut self, line: usize) {
        self.current_line = line.min(self.states.len().saturating_sub(1));
    }

    fn highlight_line(&mut self, line: &str) -> Self::Iterator<'_> {
        let index = self.current_line;
        self.current_line += 1;

        if !self.settings.language.supports_highlighting() {
            return Box::new(std::iter::empty());
        }

        let entry = self.states.get(index).copied().unwrap_or_default();
        let (spans, exit) = highlight_line(line, entry);

        if self.states.len() <= index + 1 {
            self.states.push(exit);
        } else {
            self.states[index + 1] = exit;
            // Anything cached past this point assumed the old exit state.
            self.states.truncate(index + 2);
        }

        let theme = self.settings.theme;
        Box::new(
            spans
                .into_iter()
                .filter(|span| span.kind != TokenKind::Text)
                .map(move |span| (span.range, Highlight::new(span.kind, theme))),
        )
    }

    fn current_line(&self) -> usize {
        self.current_line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            language: Language::Cpp,
            theme: Theme::Dark,
        }
    }

    #[test]
    fn highlights_restart_from_a_changed_line() {
        let mut highlighter = DocumentHighlighter::new(&settings());

        let _ = highlighter.highlight_line("int a = 1; /* open").count();
        let all_comment: Vec<_> = highlighter.highlight_line("still inside").collect();
        assert!(!all_comment.is_empty());

        highlighter.change_line(1);
        assert_eq!(highlighter.current_line(), 1);
        // Line 1 still begins inside the block comment from line 0.
        let again: Vec<_> = highlighter.highlight_line("still inside").collect();
        assert_eq!(again.len(), all_comment.len());
    }

    #[test]
    fn plain_text_yields_nothing() {
        let mut highlighter = DocumentHighlighter::new(&Settings {
            language: Language::PlainText,
            theme: Theme::Dark,
        });
        assert_eq!(highlighter.highlight_line("int x = 1;").count(), 0);
        assert_eq!(highlighter.current_line(), 1);
    }

    #[test]
    fn formats_carry_palette_colors() {
        let highlight = Highlight::new(TokenKind::Keyword, Theme::Dark);
        let format = to_format(&highlight, &iced::Theme::Dark);
        assert!(format.color.is_some());
        assert!(format.font.is_some());
    }
}
