//! Canvas-based document minimap.
//!
//! Line blocks are rasterized into a `canvas::Cache` that the state layer
//! clears when the document changes; the viewport handle is drawn fresh
//! every frame because it moves with every scroll.

use crate::message::Message;
use crate::widgets::code_editor::ScrollMetrics;
use iced::mouse;
use iced::widget::canvas::{self, Canvas, Event, Frame, Geometry};
use iced::{Color, Length, Point, Rectangle, Renderer, Size, Theme};
use loupe_core::minimap::{
    click_scroll_target, drag_scroll_target, viewport_rect, ScrollState, ViewportRect,
};
use loupe_syntax::{fragments, highlight_line, BlockState, Palette, TokenKind};

pub const MINIMAP_WIDTH: f32 = 110.0;
const ROW_HEIGHT: f32 = 2.0;
const ROW_GAP: f32 = 1.0;
const SIDE_PADDING: f32 = 4.0;
// Horizontal pixels per character in a line block.
const CHAR_SCALE: f32 = 1.0;

pub struct Minimap<'a> {
    lines: &'a [String],
    metrics: ScrollMetrics,
    cache: &'a canvas::Cache,
    palette: &'a Palette,
    /// When false the document renders as flat neutral blocks.
    highlight: bool,
}

impl<'a> Minimap<'a> {
    pub fn new(
        lines: &'a [String],
        metrics: ScrollMetrics,
        cache: &'a canvas::Cache,
        palette: &'a Palette,
        highlight: bool,
    ) -> Self {
        Self {
            lines,
            metrics,
            cache,
            palette,
            highlight,
        }
    }

    pub fn view(self) -> Canvas<Self, Message> {
        Canvas::new(self)
            .width(Length::Fixed(MINIMAP_WIDTH))
            .height(Length::Fill)
    }

    fn scroll_state(&self) -> ScrollState {
        ScrollState {
            scroll: self.metrics.scroll,
            page_step: self.metrics.visible_lines,
            max_scroll: self.metrics.max_scroll(),
        }
    }

    fn handle(&self, bounds: Rectangle) -> Option<ViewportRect> {
        viewport_rect(self.scroll_state(), bounds.height)
    }

    fn token_color(&self, kind: TokenKind) -> Color {
        let color = self.palette.color(kind);
        Color::from_rgba8(color.r, color.g, color.b, 0.55)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging {
        grab_offset: f32,
        handle_height: f32,
    },
}

impl<'a> canvas::Program<Message> for Minimap<'a> {
    type State = Interaction;

    fn update(
        &self,
        state: &mut Self::State,
        event: Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let max_scroll = self.metrics.max_scroll();

        match event {
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let Some(position) = cursor.position_in(bounds) else {
                    return (canvas::event::Status::Ignored, None);
                };
                let Some(handle) = self.handle(bounds) else {
                    return (canvas::event::Status::Ignored, None);
                };

                if handle.contains(position.y) {
                    *state = Interaction::Dragging {
                        grab_offset: position.y - handle.y,
                        handle_height: handle.height,
                    };
                    (canvas::event::Status::Captured, None)
                } else {
                    // An outside press jumps; dragging only starts on the handle.
                    let target = click_scroll_target(position.y, bounds.height, max_scroll);
                    (
                        canvas::event::Status::Captured,
                        Some(Message::MinimapScrollRequested(target)),
                    )
                }
            }
            Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                let Interaction::Dragging {
                    grab_offset,
                    handle_height,
                } = *state
                else {
                    return (canvas::event::Status::Ignored, None);
                };
                let Some(position) = cursor.position() else {
                    return (canvas::event::Status::Ignored, None);
                };
                let local_y = position.y - bounds.y;
                let target = drag_scroll_target(
                    local_y,
                    grab_offset,
                    handle_height,
                    bounds.height,
                    max_scroll,
                );
                (
                    canvas::event::Status::Captured,
                    Some(Message::MinimapScrollRequested(target)),
                )
            }
            Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                if matches!(state, Interaction::Dragging { .. }) {
                    *state = Interaction::Idle;
                    (canvas::event::Status::Captured, None)
                } else {
                    (canvas::event::Status::Ignored, None)
                }
            }
            _ => (canvas::event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let raster = self.cache.draw(renderer, bounds.size(), |frame| {
            self.draw_line_blocks(frame, bounds.size());
        });

        let mut overlay = Frame::new(renderer, bounds.size());
        if let Some(handle) = self.handle(bounds) {
            overlay.fill_rectangle(
                Point::new(0.0, handle.y),
                Size::new(bounds.width, handle.height),
                Color::from_rgba(0.5, 0.5, 0.5, 0.25),
            );
        }

        vec![raster, overlay.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        _bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        match state {
            Interaction::Dragging { .. } => mouse::Interaction::Grabbing,
            Interaction::Idle => mouse::Interaction::default(),
        }
    }
}

impl<'a> Minimap<'a> {
    fn draw_line_blocks(&self, frame: &mut Frame, size: Size) {
        if self.lines.is_empty() {
            return;
        }

        let stride = ROW_HEIGHT + ROW_GAP;
        let rows_that_fit = (size.height / stride).floor() as usize;
        let visible = self.lines.len().min(rows_that_fit);
        let right_edge = size.width - SIDE_PADDING;

        // Block-comment state threads through every drawn line, starting at
        // the top of the document.
        let mut block_state = BlockState::Default;

        for (row, line) in self.lines.iter().take(visible).enumerate() {
            let y = row as f32 * stride;

            if !self.highlight {
                self.draw_flat_block(frame, line, y, right_edge);
                continue;
            }

            let (spans, next_state) = highlight_line(line, block_state);
            block_state = next_state;

            let mut x = SIDE_PADDING;
            for (fragment, kind) in fragments(line, &spans) {
                let width = fragment.chars().count() as f32 * CHAR_SCALE;
                if x >= right_edge {
                    break;
                }
                if !fragment.trim().is_empty() {
                    frame.fill_rectangle(
                        Point::new(x, y),
                        Size::new(width.min(right_edge - x).max(1.0), ROW_HEIGHT),
                        self.token_color(kind),
                    );
                }
                x += width;
            }
        }
    }

    fn draw_flat_block(&self, frame: &mut Frame, line: &str, y: f32, right_edge: f32) {
        let trimmed = line.trim_end();
        if trimmed.trim_start().is_empty() {
            return;
        }

        let indent = trimmed.len() - trimmed.trim_start().len();
        let x = SIDE_PADDING + indent as f32 * CHAR_SCALE;
        if x >= right_edge {
            return;
        }
        let width = (trimmed.trim_start().chars().count() as f32 * CHAR_SCALE)
            .min(right_edge - x)
            .max(1.0);

        frame.fill_rectangle(
            Point::new(x, y),
            Size::new(width, ROW_HEIGHT),
            self.token_color(TokenKind::Text),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::widget::canvas::Program;
    use loupe_syntax::DARK_PALETTE;

    fn metrics() -> ScrollMetrics {
        ScrollMetrics {
            scroll: 0,
            visible_lines: 40,
            total_visual_lines: 140,
        }
    }

    fn press(
        widget: &Minimap<'_>,
        state: &mut Interaction,
        y: f32,
    ) -> (canvas::event::Status, Option<Message>) {
        let bounds = Rectangle::new(Point::ORIGIN, Size::new(MINIMAP_WIDTH, 400.0));
        let cursor = mouse::Cursor::Available(Point::new(10.0, y));
        widget.update(
            state,
            Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)),
            bounds,
            cursor,
        )
    }

    #[test]
    fn outside_press_jumps_without_starting_a_drag() {
        let lines: &[String] = &[];
        let cache = canvas::Cache::new();
        let widget = Minimap::new(lines, metrics(), &cache, &DARK_PALETTE, true);
        let mut state = Interaction::Idle;

        // The handle sits near the top; y = 300 lands well below it.
        let (status, message) = press(&widget, &mut state, 300.0);

        assert!(matches!(status, canvas::event::Status::Captured));
        assert!(matches!(message, Some(Message::MinimapScrollRequested(_))));
        assert!(matches!(state, Interaction::Idle));
    }

    #[test]
    fn handle_press_starts_a_drag_without_jumping() {
        let lines: &[String] = &[];
        let cache = canvas::Cache::new();
        let widget = Minimap::new(lines, metrics(), &cache, &DARK_PALETTE, true);
        let mut state = Interaction::Idle;

        let (status, message) = press(&widget, &mut state, 10.0);

        assert!(matches!(status, canvas::event::Status::Captured));
        assert!(message.is_none());
        assert!(matches!(state, Interaction::Dragging { .. }));
    }
}
