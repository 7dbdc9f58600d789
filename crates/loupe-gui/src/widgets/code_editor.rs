//! Text editor wrapper that paints a line-number gutter, indent guides and
//! the active scope band around iced's `text_editor`.
//!
//! The inner widget knows nothing about the decorations; pointer positions
//! are corrected for the gutter before actions reach it.

use iced::advanced::clipboard::Clipboard;
use iced::advanced::layout::{self, Layout};
use iced::advanced::mouse;
use iced::advanced::renderer;
use iced::advanced::text::highlighter;
use iced::advanced::text::Highlighter as IcedHighlighter;
use iced::advanced::text::Renderer as TextRenderer;
use iced::advanced::text::{LineHeight, Shaping, Text as PrimitiveText, Wrapping};
use iced::advanced::widget::{tree, Widget};
use iced::advanced::Renderer as _;
use iced::advanced::Shell;
use iced::alignment;
use iced::event::{self, Event};
use iced::widget::text_editor;
pub use iced::widget::text_editor::{Action, Content};
use iced::Border;
use iced::Color;
use iced::Element;
use iced::Length;
use iced::Padding;
use iced::Pixels;
use iced::Point;
use iced::Rectangle;
use iced::Renderer as IcedRenderer;
use iced::Shadow;
use iced::Size;
use iced::Theme as IcedTheme;
use iced_graphics::text::cosmic_text::Buffer as CosmicBuffer;
use iced_graphics::text::Editor as GraphicsEditor;
use loupe_core::scope::indent_level_of;
use loupe_core::ScopeRange;
use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

const DEFAULT_LINE_COLOR: Color = Color::from_rgba(0.7, 0.7, 0.7, 1.0);
const GUTTER_TEXT_PADDING: f32 = 6.0;
const GUTTER_DIGIT_ADVANCE: f32 = 9.0;
const INDENT_UNITS_PER_LEVEL: usize = 4;
// Monospace advance approximation; good enough for guide placement.
const ADVANCE_PER_FONT_SIZE: f32 = 0.6;

pub struct CodeEditor<'a, Message, H = highlighter::PlainText>
where
    H: IcedHighlighter,
{
    inner: text_editor::TextEditor<'a, H, Message>,
    content: &'a Content,
    base_padding: Padding,
    gutter_width: f32,
    line_color: Color,
    pointer_correction: Rc<Cell<f32>>,
    indent_guides: Option<Color>,
    active_scope: Option<(ScopeRange, Color)>,
    gutter_background: Option<Color>,
    font_size: Option<Pixels>,
}

impl<'a, Message> CodeEditor<'a, Message, highlighter::PlainText> {
    pub fn new(content: &'a Content) -> Self {
        let base_padding = Padding::new(5.0);
        let gutter_width = gutter_width_for(content.line_count());
        let mut inner = text_editor::TextEditor::new(content);
        inner = inner.padding(add_gutter(base_padding, gutter_width));
        let pointer_correction = Rc::new(Cell::new(pointer_correction_value(
            base_padding,
            gutter_width,
        )));

        Self {
            inner,
            content,
            base_padding,
            gutter_width,
            line_color: DEFAULT_LINE_COLOR,
            pointer_correction,
            indent_guides: None,
            active_scope: None,
            gutter_background: None,
            font_size: None,
        }
    }

    pub fn highlight<NH>(
        self,
        settings: NH::Settings,
        to_format: fn(
            &NH::Highlight,
            &IcedTheme,
        ) -> highlighter::Format<<IcedRenderer as TextRenderer>::Font>,
    ) -> CodeEditor<'a, Message, NH>
    where
        NH: IcedHighlighter,
    {
        CodeEditor {
            inner: self.inner.highlight_with::<NH>(settings, to_format),
            content: self.content,
            base_padding: self.base_padding,
            gutter_width: self.gutter_width,
            line_color: self.line_color,
            pointer_correction: Rc::clone(&self.pointer_correction),
            indent_guides: self.indent_guides,
            active_scope: self.active_scope,
            gutter_background: self.gutter_background,
            font_size: self.font_size,
        }
    }
}

impl<'a, Message, H> CodeEditor<'a, Message, H>
where
    H: IcedHighlighter,
{
    pub fn on_action(mut self, on_edit: impl Fn(Action) -> Message + 'a) -> Self {
        let correction = Rc::clone(&self.pointer_correction);
        self.inner = self.inner.on_action(move |action| {
            let adjusted = adjust_action(action, correction.get());
            on_edit(adjusted)
        });
        self
    }

    pub fn height(mut self, height: impl Into<Length>) -> Self {
        self.inner = self.inner.height(height);
        self
    }

    pub fn padding(mut self, padding: impl Into<Padding>) -> Self {
        self.base_padding = padding.into();
        self.inner = self
            .inner
            .padding(add_gutter(self.base_padding, self.gutter_width));
        self.pointer_correction
            .set(pointer_correction_value(self.base_padding, self.gutter_width));
        self
    }

    pub fn font<F>(mut self, font: F) -> Self
    where
        F: Into<<IcedRenderer as TextRenderer>::Font>,
    {
        self.inner = self.inner.font(font);
        self
    }

    pub fn line_number_color(mut self, color: Color) -> Self {
        self.line_color = color;
        self
    }

    pub fn indent_guides(mut self, color: Color) -> Self {
        self.indent_guides = Some(color);
        self
    }

    pub fn active_scope(mut self, scope: ScopeRange, color: Color) -> Self {
        self.active_scope = Some((scope, color));
        self
    }

    pub fn gutter_background(mut self, color: Color) -> Self {
        self.gutter_background = Some(color);
        self
    }

    pub fn font_size(mut self, size: impl Into<Pixels>) -> Self {
        let size = size.into();
        self.inner = self.inner.size(size);
        self.font_size = Some(size);
        self
    }

    pub fn style(
        mut self,
        style: impl Fn(&IcedTheme, text_editor::Status) -> text_editor::Style + 'a,
    ) -> Self {
        self.inner = self.inner.style(style);
        self
    }
}

impl<'a, Message, H> Widget<Message, IcedTheme, IcedRenderer> for CodeEditor<'a, Message, H>
where
    Message: 'a,
    H: IcedHighlighter,
{
    fn tag(&self) -> tree::Tag {
        self.inner.tag()
    }

    fn state(&self) -> tree::State {
        self.inner.state()
    }

    fn size(&self) -> Size<Length> {
        Widget::size(&self.inner)
    }

    fn layout(
        &self,
        tree: &mut tree::Tree,
        renderer: &IcedRenderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        self.inner.layout(tree, renderer, limits)
    }

    fn on_event(
        &mut self,
        tree: &mut tree::Tree,
        event: Event,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        renderer: &IcedRenderer,
        clipboard: &mut dyn Clipboard,
        shell: &mut Shell<'_, Message>,
        viewport: &Rectangle,
    ) -> event::Status {
        self.inner.on_event(
            tree,
            event,
            layout,
            cursor,
            renderer,
            clipboard,
            shell,
            viewport,
        )
    }

    fn draw(
        &self,
        tree: &tree::Tree,
        renderer: &mut IcedRenderer,
        theme: &IcedTheme,
        style: &renderer::Style,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        viewport: &Rectangle,
    ) {
        let bounds = layout.bounds();

        self.inner
            .draw(tree, renderer, theme, style, layout, cursor, viewport);

        let rows = {
            let editor = borrow_editor(self.content);
            visible_rows(editor.buffer())
        };

        if let Some(background) = self.gutter_background {
            let gutter = Rectangle {
                width: self.base_padding.left + self.gutter_width,
                ..bounds
            };
            renderer.fill_quad(
                renderer::Quad {
                    bounds: gutter,
                    border: Border::default(),
                    shadow: Shadow::default(),
                },
                background,
            );
        }

        self.draw_line_numbers(renderer, bounds, viewport, &rows);

        if let Some(color) = self.indent_guides {
            self.draw_indent_guides(renderer, bounds, &rows, color);
        }

        if let Some((scope, color)) = self.active_scope {
            self.draw_scope_band(renderer, bounds, &rows, scope, color);
        }
    }

    fn mouse_interaction(
        &self,
        tree: &tree::Tree,
        layout: Layout<'_>,
        cursor: mouse::Cursor,
        viewport: &Rectangle,
        renderer: &IcedRenderer,
    ) -> mouse::Interaction {
        self.inner
            .mouse_interaction(tree, layout, cursor, viewport, renderer)
    }
}

impl<'a, Message, H> From<CodeEditor<'a, Message, H>>
    for Element<'a, Message, IcedTheme, IcedRenderer>
where
    Message: 'a,
    H: IcedHighlighter,
{
    fn from(editor: CodeEditor<'a, Message, H>) -> Self {
        Element::new(editor)
    }
}

impl<'a, Message, H> CodeEditor<'a, Message, H>
where
    H: IcedHighlighter,
{
    fn metrics(&self) -> (f32, f32) {
        let editor = borrow_editor(self.content);
        let buffer = editor.buffer();
        let line_height = buffer.metrics().line_height.max(1.0);
        let font_size = self
            .font_size
            .map(|size| size.0)
            .unwrap_or(buffer.metrics().font_size);
        (font_size, line_height)
    }

    fn text_origin_x(&self, bounds: Rectangle) -> f32 {
        bounds.x + self.base_padding.left + self.gutter_width
    }

    fn draw_line_numbers(
        &self,
        renderer: &mut IcedRenderer,
        bounds: Rectangle,
        viewport: &Rectangle,
        rows: &[VisibleRow],
    ) {
        let (font_size, line_height) = self.metrics();
        let gutter_right = bounds.x + self.base_padding.left + self.gutter_width;
        let start_y = bounds.y + self.base_padding.top;
        let font = renderer.default_font();
        let text_width = (self.gutter_width - GUTTER_TEXT_PADDING * 2.0).max(0.0);
        let start_x = (gutter_right - text_width - GUTTER_TEXT_PADDING).max(bounds.x);

        for (index, row) in rows.iter().enumerate() {
            if !row.first_wrap {
                continue;
            }
            let y = start_y + index as f32 * line_height;
            let text = PrimitiveText {
                content: (row.buffer_line + 1).to_string(),
                bounds: Size::new(text_width, line_height),
                size: Pixels(font_size),
                line_height: LineHeight::Absolute(Pixels(line_height)),
                font,
                horizontal_alignment: alignment::Horizontal::Right,
                vertical_alignment: alignment::Vertical::Top,
                shaping: Shaping::Basic,
                wrapping: Wrapping::None,
            };

            renderer.fill_text(text, Point::new(start_x, y), self.line_color, *viewport);
        }
    }

    fn draw_indent_guides(
        &self,
        renderer: &mut IcedRenderer,
        bounds: Rectangle,
        rows: &[VisibleRow],
        color: Color,
    ) {
        let (font_size, line_height) = self.metrics();
        let indent_width = INDENT_UNITS_PER_LEVEL as f32 * font_size * ADVANCE_PER_FONT_SIZE;
        let text_x = self.text_origin_x(bounds);
        let start_y = bounds.y + self.base_padding.top;

        // The guide matching the cursor's own indentation level is emphasized.
        let cursor_level = {
            let editor = borrow_editor(self.content);
            let buffer = editor.buffer();
            let (cursor_line, _) = self.content.cursor_position();
            buffer
                .lines
                .get(cursor_line)
                .map(|line| indent_level_of(line.text()).level)
                .unwrap_or(0)
        };

        renderer.with_layer(bounds, |renderer| {
            for (index, row) in rows.iter().enumerate() {
                if row.blank || row.indent_level == 0 {
                    continue;
                }
                let y = start_y + index as f32 * line_height;
                for level in 1..=row.indent_level {
                    let x = text_x + level as f32 * indent_width - indent_width / 2.0;
                    let alpha = if level == cursor_level {
                        color.a
                    } else {
                        color.a * 0.5
                    };
                    renderer.fill_quad(
                        renderer::Quad {
                            bounds: Rectangle {
                                x,
                                y,
                                width: 1.0,
                                height: line_height,
                            },
                            border: Border::default(),
                            shadow: Shadow::default(),
                        },
                        Color { a: alpha, ..color },
                    );
                }
            }
        });
    }

    fn draw_scope_band(
        &self,
        renderer: &mut IcedRenderer,
        bounds: Rectangle,
        rows: &[VisibleRow],
        scope: ScopeRange,
        color: Color,
    ) {
        let (_, line_height) = self.metrics();
        let text_x = self.text_origin_x(bounds);
        let start_y = bounds.y + self.base_padding.top;
        let band_width = (bounds.x + bounds.width - self.base_padding.right - text_x).max(0.0);
        let fill = crate::style::scope_fill(color);

        renderer.with_layer(bounds, |renderer| {
            for (index, row) in rows.iter().enumerate() {
                if !scope.contains_line(row.buffer_line) {
                    continue;
                }
                let y = start_y + index as f32 * line_height;
                renderer.fill_quad(
                    renderer::Quad {
                        bounds: Rectangle {
                            x: text_x,
                            y,
                            width: band_width,
                            height: line_height,
                        },
                        border: Border::default(),
                        shadow: Shadow::default(),
                    },
                    fill,
                );
                renderer.fill_quad(
                    renderer::Quad {
                        bounds: Rectangle {
                            x: text_x - 4.0,
                            y,
                            width: 2.0,
                            height: line_height,
                        },
                        border: Border::default(),
                        shadow: Shadow::default(),
                    },
                    color,
                );
            }
        });
    }
}

// Wide enough for the largest line number, never narrower than two digits.
fn gutter_width_for(line_count: usize) -> f32 {
    let digits = line_count.max(1).to_string().len().max(2);
    GUTTER_TEXT_PADDING * 2.0 + digits as f32 * GUTTER_DIGIT_ADVANCE
}

fn add_gutter(mut padding: Padding, gutter: f32) -> Padding {
    padding.left += gutter;
    padding
}

fn pointer_correction_value(base_padding: Padding, gutter_width: f32) -> f32 {
    (base_padding.left + gutter_width) - base_padding.top
}

fn adjust_action(action: Action, pointer_correction: f32) -> Action {
    if pointer_correction.abs() <= f32::EPSILON {
        return action;
    }

    match action {
        Action::Click(position) => Action::Click(adjust_point(position, pointer_correction)),
        Action::Drag(position) => Action::Drag(adjust_point(position, pointer_correction)),
        other => other,
    }
}

fn adjust_point(position: Point, pointer_correction: f32) -> Point {
    Point::new(
        position.x - pointer_correction,
        position.y + pointer_correction,
    )
}

/// One display row of the visible viewport.
struct VisibleRow {
    buffer_line: usize,
    first_wrap: bool,
    indent_level: usize,
    blank: bool,
}

fn visible_rows(buffer: &CosmicBuffer) -> Vec<VisibleRow> {
    let capacity = visible_line_capacity(buffer);
    let first_line = buffer.scroll().line;
    let mut rows = Vec::with_capacity(capacity.saturating_add(1));

    let mut line_index = first_line;
    while rows.len() <= capacity && line_index < buffer.lines.len() {
        let line = &buffer.lines[line_index];
        let text = line.text();
        let indent = indent_level_of(text);
        let blank = text.trim().is_empty();
        let wraps = line
            .layout_opt()
            .as_ref()
            .map(|layout| layout.len())
            .unwrap_or(1)
            .max(1);

        for wrap in 0..wraps {
            rows.push(VisibleRow {
                buffer_line: line_index,
                first_wrap: wrap == 0,
                indent_level: indent.level,
                blank,
            });
            if rows.len() > capacity {
                break;
            }
        }

        line_index += 1;
    }

    rows
}

fn visible_line_capacity(buffer: &CosmicBuffer) -> usize {
    let line_height = buffer.metrics().line_height.max(1.0);
    buffer
        .size()
        .1
        .map(|height| (height / line_height).floor() as usize)
        .unwrap_or(0)
}

fn count_visual_lines(buffer: &CosmicBuffer) -> usize {
    buffer
        .lines
        .iter()
        .map(|line| {
            line.layout_opt()
                .as_ref()
                .map(|layout| layout.len())
                .unwrap_or(1)
        })
        .sum()
}

fn visual_lines_before(buffer: &CosmicBuffer, line: usize) -> usize {
    buffer
        .lines
        .iter()
        .take(line)
        .map(|buffer_line| {
            buffer_line
                .layout_opt()
                .as_ref()
                .map(|layout| layout.len())
                .unwrap_or(1)
        })
        .sum()
}

/// Editor scroll position expressed in visual (wrapped) lines; this is what
/// the minimap geometry consumes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollMetrics {
    pub scroll: usize,
    pub visible_lines: usize,
    pub total_visual_lines: usize,
}

impl ScrollMetrics {
    pub fn max_scroll(&self) -> usize {
        self.total_visual_lines.saturating_sub(self.visible_lines)
    }
}

pub fn buffer_scroll_metrics(content: &Content) -> ScrollMetrics {
    let editor = borrow_editor(content);
    let buffer = editor.buffer();

    ScrollMetrics {
        scroll: visual_lines_before(buffer, buffer.scroll().line),
        visible_lines: visible_line_capacity(buffer),
        total_visual_lines: count_visual_lines(buffer),
    }
}

/// Scrolls the content so that visual line `target` is at the top, going
/// through `Action::Scroll` so the inner editor stays the source of truth.
pub fn scroll_to(content: &mut Content, target: usize) {
    let metrics = buffer_scroll_metrics(content);
    let clamped = target.min(metrics.max_scroll());
    let delta = clamped as isize - metrics.scroll as isize;
    let delta = delta.clamp(i32::MIN as isize, i32::MAX as isize) as i32;

    if delta != 0 {
        content.perform(Action::Scroll { lines: delta });
    }
}

// `Content` keeps its editor behind a private RefCell; mirror the layout to
// reach the cosmic-text buffer for scroll and wrap information the public
// API does not expose.
#[repr(transparent)]
struct ContentRepr(RefCell<InternalRepr>);

#[repr(C)]
struct InternalRepr {
    editor: GraphicsEditor,
    is_dirty: bool,
}

fn borrow_editor(content: &Content) -> Ref<'_, GraphicsEditor> {
    unsafe {
        let repr = &*(content as *const Content as *const ContentRepr);
        Ref::map(repr.0.borrow(), |internal| &internal.editor)
    }
}
