//! Minimap geometry and cache bookkeeping, kept free of any drawing API.
//!
//! The widget layer owns the actual raster; this module answers "where is
//! the viewport rectangle", "what scroll value does this press mean", and
//! "does the raster need rebuilding".

/// Smallest viewport handle that stays clickable.
pub const MIN_HANDLE_HEIGHT: f32 = 10.0;
/// Gap kept between the handle and the widget edges.
pub const EDGE_MARGIN: f32 = 2.0;

/// Scroll state of the host editor, in visual lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    /// First visible line.
    pub scroll: usize,
    /// Lines shown per page (the scrollbar's page step).
    pub page_step: usize,
    /// Greatest reachable `scroll` value.
    pub max_scroll: usize,
}

/// The minimap's visual proxy for the visible line range, in widget pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRect {
    pub y: f32,
    pub height: f32,
}

impl ViewportRect {
    pub fn contains(&self, y: f32) -> bool {
        y >= self.y && y < self.y + self.height
    }
}

/// Maps the editor scroll state onto a handle rectangle within a widget of
/// `height` pixels. Returns `None` when there is nothing to scroll, which
/// callers treat as "no visible region" rather than dividing by zero.
pub fn viewport_rect(state: ScrollState, height: f32) -> Option<ViewportRect> {
    if state.max_scroll == 0 || height <= 0.0 {
        return None;
    }

    let start_ratio = state.scroll as f32 / state.max_scroll as f32;
    let size_ratio = state.page_step as f32 / (state.max_scroll + state.page_step) as f32;

    let h = (size_ratio * height)
        .max(MIN_HANDLE_HEIGHT)
        .min(height - 2.0 * EDGE_MARGIN);
    let y = (start_ratio * height)
        .max(EDGE_MARGIN)
        .min((height - h - EDGE_MARGIN).max(EDGE_MARGIN));

    Some(ViewportRect { y, height: h })
}

/// Scroll value for a press outside the handle: the click's vertical ratio
/// applied to the whole scroll range.
pub fn click_scroll_target(y: f32, height: f32, max_scroll: usize) -> usize {
    if height <= 0.0 || max_scroll == 0 {
        return 0;
    }
    let ratio = (y / height).clamp(0.0, 1.0);
    (ratio * max_scroll as f32).round() as usize
}

/// Scroll value while dragging the handle. `grab_offset` is where inside the
/// handle the press landed, so the handle tracks the pointer instead of
/// snapping its top edge to it.
pub fn drag_scroll_target(
    pointer_y: f32,
    grab_offset: f32,
    handle_height: f32,
    height: f32,
    max_scroll: usize,
) -> usize {
    if height <= 0.0 || max_scroll == 0 {
        return 0;
    }
    let top = (pointer_y - grab_offset).clamp(0.0, (height - handle_height).max(0.0));
    let ratio = (top / height).clamp(0.0, 1.0);
    (ratio * max_scroll as f32).round() as usize
}

/// Dirty/Clean validity tracking for the minimap raster.
///
/// Content changes and resizes mark the cache dirty; the rebuild happens
/// lazily when the next draw asks, so bursts of edits collapse into a single
/// rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterCache {
    dirty: bool,
    size: (u32, u32),
}

impl Default for RasterCache {
    fn default() -> Self {
        Self {
            dirty: true,
            size: (0, 0),
        }
    }
}

impl RasterCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Marks the raster stale after a content change.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Records the widget size as of this frame; a size change invalidates.
    pub fn observe_size(&mut self, width: u32, height: u32) {
        if self.size != (width, height) {
            self.size = (width, height);
            self.dirty = true;
        }
    }

    /// Asks whether this draw must rebuild the raster. Transitions
    /// Dirty -> Clean exactly once; repeated draws without an intervening
    /// invalidation return `false`.
    pub fn take_rebuild(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_scroll_range_means_no_viewport() {
        let state = ScrollState {
            scroll: 0,
            page_step: 40,
            max_scroll: 0,
        };
        assert_eq!(viewport_rect(state, 400.0), None);
    }

    #[test]
    fn viewport_height_stays_within_bounds() {
        for max_scroll in [1usize, 10, 100, 10_000] {
            for scroll in [0usize, max_scroll / 2, max_scroll] {
                let state = ScrollState {
                    scroll,
                    page_step: 40,
                    max_scroll,
                };
                let rect = viewport_rect(state, 400.0).unwrap();
                assert!(rect.height >= MIN_HANDLE_HEIGHT);
                assert!(rect.height <= 400.0 - 2.0 * EDGE_MARGIN);
                assert!(rect.y >= EDGE_MARGIN);
                assert!(rect.y + rect.height <= 400.0 - EDGE_MARGIN + f32::EPSILON);
            }
        }
    }

    #[test]
    fn viewport_tracks_scroll_proportionally() {
        let top = viewport_rect(
            ScrollState {
                scroll: 0,
                page_step: 40,
                max_scroll: 100,
            },
            400.0,
        )
        .unwrap();
        let bottom = viewport_rect(
            ScrollState {
                scroll: 100,
                page_step: 40,
                max_scroll: 100,
            },
            400.0,
        )
        .unwrap();
        assert!(top.y < bottom.y);
    }

    #[test]
    fn click_target_is_proportional_and_clamped() {
        assert_eq!(click_scroll_target(0.0, 400.0, 100), 0);
        assert_eq!(click_scroll_target(200.0, 400.0, 100), 50);
        assert_eq!(click_scroll_target(400.0, 400.0, 100), 100);
        assert_eq!(click_scroll_target(900.0, 400.0, 100), 100);
        assert_eq!(click_scroll_target(200.0, 0.0, 100), 0);
        assert_eq!(click_scroll_target(200.0, 400.0, 0), 0);
    }

    #[test]
    fn drag_target_clamps_to_track() {
        assert_eq!(drag_scroll_target(-50.0, 5.0, 40.0, 400.0, 100), 0);
        let mid = drag_scroll_target(205.0, 5.0, 40.0, 400.0, 100);
        assert_eq!(mid, 50);
        let end = drag_scroll_target(1000.0, 0.0, 40.0, 400.0, 100);
        assert_eq!(end, 90);
    }

    #[test]
    fn cache_rebuilds_once_per_invalidation() {
        let mut cache = RasterCache::new();
        assert!(cache.is_dirty());
        assert!(cache.take_rebuild());
        assert!(!cache.take_rebuild());
        assert!(!cache.take_rebuild());

        cache.invalidate();
        assert!(cache.take_rebuild());
        assert!(!cache.take_rebuild());
    }

    #[test]
    fn resize_invalidates_but_same_size_does_not() {
        let mut cache = RasterCache::new();
        cache.observe_size(120, 400);
        assert!(cache.take_rebuild());

        cache.observe_size(120, 400);
        assert!(!cache.take_rebuild());

        cache.observe_size(120, 500);
        assert!(cache.take_rebuild());
    }
}
