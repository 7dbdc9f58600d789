use iced::widget::{button, container, text_editor, text_input};
use iced::{Background, Border, Color, Shadow, Theme};
use loupe_config::Theme as ConfigTheme;

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::from_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

const DARK_BG_PRIMARY: Color = rgb(30, 30, 30);
const DARK_BG_PANEL: Color = rgb(45, 45, 48);
const DARK_BG_TOOLBAR: Color = rgb(37, 37, 38);
const DARK_BG_STATUS: Color = rgb(40, 40, 43);
const DARK_BG_HOVER: Color = rgb(62, 62, 66);
const DARK_TEXT_PRIMARY: Color = rgb(231, 231, 231);
const DARK_TEXT_MUTED: Color = rgb(180, 180, 180);
const DARK_GUTTER_BG: Color = rgb(37, 37, 38);

const LIGHT_BG_PRIMARY: Color = rgb(250, 250, 250);
const LIGHT_BG_PANEL: Color = rgb(238, 238, 238);
const LIGHT_BG_TOOLBAR: Color = rgb(228, 228, 228);
const LIGHT_BG_STATUS: Color = rgb(232, 232, 232);
const LIGHT_BG_HOVER: Color = rgb(210, 210, 212);
const LIGHT_TEXT_PRIMARY: Color = rgb(30, 30, 30);
const LIGHT_TEXT_MUTED: Color = rgb(90, 90, 90);
const LIGHT_GUTTER_BG: Color = rgb(240, 240, 240);

const ACCENT: Color = rgb(0, 120, 215);

/// Fixed editor colors for one UI theme.
#[derive(Debug, Clone, Copy)]
pub struct EditorColors {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub gutter_background: Color,
    pub accent: Color,
}

pub fn editor_colors(theme: ConfigTheme) -> EditorColors {
    match theme {
        ConfigTheme::Dark => EditorColors {
            background: DARK_BG_PRIMARY,
            text: DARK_TEXT_PRIMARY,
            muted: DARK_TEXT_MUTED,
            gutter_background: DARK_GUTTER_BG,
            accent: ACCENT,
        },
        ConfigTheme::Light => EditorColors {
            background: LIGHT_BG_PRIMARY,
            text: LIGHT_TEXT_PRIMARY,
            muted: LIGHT_TEXT_MUTED,
            gutter_background: LIGHT_GUTTER_BG,
            accent: ACCENT,
        },
    }
}

/// Indent guide color derived from the editor background: perceived-gray
/// backgrounds above the midpoint get darkened guides, dark backgrounds get
/// lightened ones, so guides stay faint on both themes.
pub fn guide_color(background: Color) -> Color {
    let gray = 0.299 * background.r + 0.587 * background.g + 0.114 * background.b;
    if gray >= 0.5 {
        Color {
            r: (background.r - 0.18).max(0.0),
            g: (background.g - 0.18).max(0.0),
            b: (background.b - 0.18).max(0.0),
            a: 1.0,
        }
    } else {
        Color {
            r: (background.r + 0.18).min(1.0),
            g: (background.g + 0.18).min(1.0),
            b: (background.b + 0.18).min(1.0),
            a: 1.0,
        }
    }
}

/// Translucent fill for the active scope band.
pub fn scope_fill(accent: Color) -> Color {
    Color { a: 0.12, ..accent }
}

fn is_dark(theme: &Theme) -> bool {
    theme.extended_palette().is_dark
}

pub fn root_container(theme: &Theme) -> container::Style {
    let (background, text) = if is_dark(theme) {
        (DARK_BG_PRIMARY, DARK_TEXT_PRIMARY)
    } else {
        (LIGHT_BG_PRIMARY, LIGHT_TEXT_PRIMARY)
    };
    container::Style {
        background: Some(Background::Color(background)),
        text_color: Some(text),
        ..Default::default()
    }
}

pub fn panel_container(theme: &Theme) -> container::Style {
    let (background, text, border) = if is_dark(theme) {
        (DARK_BG_PANEL, DARK_TEXT_PRIMARY, rgb(60, 60, 63))
    } else {
        (LIGHT_BG_PANEL, LIGHT_TEXT_PRIMARY, rgb(200, 200, 203))
    };
    container::Style {
        background: Some(Background::Color(background)),
        text_color: Some(text),
        border: Border {
            radius: 4.0.into(),
            width: 1.0,
            color: border,
        },
        ..Default::default()
    }
}

pub fn toolbar_container(theme: &Theme) -> container::Style {
    let (background, text) = if is_dark(theme) {
        (DARK_BG_TOOLBAR, DARK_TEXT_PRIMARY)
    } else {
        (LIGHT_BG_TOOLBAR, LIGHT_TEXT_PRIMARY)
    };
    container::Style {
        background: Some(Background::Color(background)),
        text_color: Some(text),
        ..Default::default()
    }
}

pub fn status_container(theme: &Theme) -> container::Style {
    let (background, text, border) = if is_dark(theme) {
        (DARK_BG_STATUS, DARK_TEXT_MUTED, rgb(63, 63, 70))
    } else {
        (LIGHT_BG_STATUS, LIGHT_TEXT_MUTED, rgb(196, 196, 200))
    };
    container::Style {
        background: Some(Background::Color(background)),
        text_color: Some(text),
        border: Border {
            radius: 0.0.into(),
            width: 1.0,
            color: border,
        },
        ..Default::default()
    }
}

pub fn toolbar_button(theme: &Theme, status: button::Status) -> button::Style {
    let dark = is_dark(theme);
    let text = if dark { DARK_TEXT_PRIMARY } else { LIGHT_TEXT_PRIMARY };
    let background = match status {
        button::Status::Hovered => {
            if dark {
                DARK_BG_HOVER
            } else {
                LIGHT_BG_HOVER
            }
        }
        button::Status::Pressed => ACCENT,
        _ => {
            if dark {
                DARK_BG_TOOLBAR
            } else {
                LIGHT_BG_TOOLBAR
            }
        }
    };
    button::Style {
        background: Some(Background::Color(background)),
        text_color: if status == button::Status::Pressed {
            Color::WHITE
        } else {
            text
        },
        border: Border {
            radius: 3.0.into(),
            width: 0.0,
            color: Color::TRANSPARENT,
        },
        shadow: Shadow::default(),
    }
}

pub fn tab_button(active: bool) -> impl Fn(&Theme, button::Status) -> button::Style {
    move |theme, status| {
        let dark = is_dark(theme);
        if active {
            return button::Style {
                background: Some(Background::Color(ACCENT)),
                text_color: Color::WHITE,
                border: Border::default(),
                shadow: Shadow::default(),
            };
        }
        let hovered = status == button::Status::Hovered;
        button::Style {
            background: hovered.then_some(Background::Color(if dark {
                DARK_BG_HOVER
            } else {
                LIGHT_BG_HOVER
            })),
            text_color: if dark { DARK_TEXT_MUTED } else { LIGHT_TEXT_MUTED },
            border: Border::default(),
            shadow: Shadow::default(),
        }
    }
}

pub fn explorer_entry_button(theme: &Theme, status: button::Status) -> button::Style {
    let dark = is_dark(theme);
    let hovered = status == button::Status::Hovered;
    button::Style {
        background: hovered.then_some(Background::Color(if dark {
            DARK_BG_HOVER
        } else {
            LIGHT_BG_HOVER
        })),
        text_color: if dark { DARK_TEXT_PRIMARY } else { LIGHT_TEXT_PRIMARY },
        border: Border::default(),
        shadow: Shadow::default(),
    }
}

pub fn editor_style(theme: &Theme, _status: text_editor::Status) -> text_editor::Style {
    let dark = is_dark(theme);
    let (background, value, placeholder) = if dark {
        (DARK_BG_PRIMARY, DARK_TEXT_PRIMARY, DARK_TEXT_MUTED)
    } else {
        (LIGHT_BG_PRIMARY, LIGHT_TEXT_PRIMARY, LIGHT_TEXT_MUTED)
    };
    text_editor::Style {
        background: Background::Color(background),
        border: Border {
            radius: 0.0.into(),
            width: 0.0,
            color: Color::TRANSPARENT,
        },
        icon: value,
        placeholder,
        value,
        selection: Color { a: 0.35, ..ACCENT },
    }
}

pub fn search_input(theme: &Theme, status: text_input::Status) -> text_input::Style {
    let dark = is_dark(theme);
    let focused = matches!(status, text_input::Status::Focused | text_input::Status::Hovered);
    text_input::Style {
        background: Background::Color(if dark { DARK_BG_PANEL } else { LIGHT_BG_PANEL }),
        border: Border {
            radius: 3.0.into(),
            width: 1.0,
            color: if focused { ACCENT } else { Color::TRANSPARENT },
        },
        icon: if dark { DARK_TEXT_MUTED } else { LIGHT_TEXT_MUTED },
        placeholder: if dark { DARK_TEXT_MUTED } else { LIGHT_TEXT_MUTED },
        value: if dark { DARK_TEXT_PRIMARY } else { LIGHT_TEXT_PRIMARY },
        selection: Color { a: 0.35, ..ACCENT },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guides_darken_light_backgrounds_and_lighten_dark_ones() {
        let on_light = guide_color(LIGHT_BG_PRIMARY);
        assert!(on_light.r < LIGHT_BG_PRIMARY.r);

        let on_dark = guide_color(DARK_BG_PRIMARY);
        assert!(on_dark.r > DARK_BG_PRIMARY.r);
    }

    #[test]
    fn scope_fill_is_translucent() {
        assert!(scope_fill(ACCENT).a < 0.5);
    }
}
