//! A scrollable overlay surface over one layout.
//!
//! The view owns the placement pass, a viewport into the laid-out content, the
//! current selection and the cached chrome bitmap. Live previews are only
//! ever requested for items intersecting the viewport: leaving the viewport
//! stops a preview immediately, while (re)activation waits for the next paint.

use std::rc::Rc;

use tracing::{debug, trace};

use crate::common::collections::HashSet;
use crate::common::config::UiParams;
use crate::layout_engine::{
    GridLayoutSystem, ItemId, LayoutItem, LayoutMetrics, LayoutSystem, LayoutSystemKind,
    ListLayoutSystem, Step,
};
use crate::model::context::SwitcherContext;
use crate::model::window::{GroupKey, MonitorId, WindowRef};
use crate::sys::geometry::{Point, Rect, Size};
use crate::sys::surface::{Canvas, HostSurface, PaintContext};
use crate::ui::{DirtyRegion, Key};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum LayoutStrategy {
    Grid,
    List,
}

impl LayoutStrategy {
    fn system(self) -> LayoutSystemKind {
        match self {
            LayoutStrategy::Grid => GridLayoutSystem::default().into(),
            LayoutStrategy::List => ListLayoutSystem::default().into(),
        }
    }

    fn metrics(self, ui: &UiParams) -> LayoutMetrics {
        match self {
            LayoutStrategy::Grid => ui.grid_metrics(),
            LayoutStrategy::List => ui.list_metrics(),
        }
    }
}

pub struct ThumbnailView<H: HostSurface> {
    surface: Option<H>,
    strategy: LayoutStrategy,
    visible: bool,
    keep_showing: bool,
    monitor: MonitorId,
    /// Screen rectangle of the content area, border excluded.
    frame: Rect,
    /// Part of the content currently on screen, in content coordinates.
    viewport: Rect,
    layout: Option<LayoutSystemKind>,
    selected: Option<ItemId>,
    bitmap: Option<H::Bitmap>,
    dirty: DirtyRegion,
    thumbnails_stale: bool,
    ui: Rc<UiParams>,
    /// Groups that get a stacked shadow behind their item.
    stacked: HashSet<GroupKey>,
}

impl<H: HostSurface> ThumbnailView<H> {
    pub fn new(strategy: LayoutStrategy) -> Self {
        Self {
            surface: None,
            strategy,
            visible: false,
            keep_showing: false,
            monitor: MonitorId::new(0),
            frame: Rect::ZERO,
            viewport: Rect::ZERO,
            layout: None,
            selected: None,
            bitmap: None,
            dirty: DirtyRegion::new(),
            thumbnails_stale: false,
            ui: Rc::new(UiParams::default()),
            stacked: HashSet::default(),
        }
    }

    pub fn attach_surface(&mut self, surface: H) {
        self.hide();
        self.bitmap = None;
        self.surface = Some(surface);
    }

    pub fn surface(&self) -> Option<&H> { self.surface.as_ref() }

    pub fn strategy(&self) -> LayoutStrategy { self.strategy }

    pub fn is_visible(&self) -> bool { self.visible }

    pub fn keep_showing(&self) -> bool { self.keep_showing }

    pub fn set_keep_showing(&mut self, keep: bool) { self.keep_showing = keep; }

    pub fn monitor(&self) -> MonitorId { self.monitor }

    pub fn frame(&self) -> Rect { self.frame }

    pub fn viewport(&self) -> Rect { self.viewport }

    pub fn layout(&self) -> Option<&LayoutSystemKind> { self.layout.as_ref() }

    pub fn content_rect(&self) -> Rect {
        self.layout.as_ref().map_or(Rect::ZERO, LayoutSystem::content_rect)
    }

    pub fn selected(&self) -> Option<ItemId> { self.selected }

    pub fn item(&self, id: ItemId) -> Option<&LayoutItem> { self.layout.as_ref()?.item(id) }

    pub fn selected_item(&self) -> Option<&LayoutItem> { self.item(self.selected?) }

    pub fn selected_window(&self) -> Option<WindowRef> {
        self.selected_item().map(|item| item.window().clone())
    }

    pub fn is_stacked(&self, item: &LayoutItem) -> bool {
        self.stacked.contains(item.window().group_key())
    }

    pub fn dirty_region(&self) -> &DirtyRegion { &self.dirty }

    pub fn thumbnails_stale(&self) -> bool { self.thumbnails_stale }

    pub fn bitmap(&self) -> Option<&H::Bitmap> { self.bitmap.as_ref() }

    pub fn ui(&self) -> &UiParams { &self.ui }

    /// A viewport at the content origin the size of the frame.
    pub fn full_view(&self) -> Rect { Rect::new(Point::default(), self.frame.size) }

    /// Translates a point on the surface into content coordinates.
    pub fn content_point(&self, point: Point) -> Point {
        Point::new(point.x + self.viewport.min_x(), point.y + self.viewport.min_y())
    }

    /// First half of `show`. Returns false when there is nothing to do.
    pub(crate) fn begin_show(&mut self, ctx: &SwitcherContext, keep: bool) -> bool {
        if self.surface.is_none() || self.visible {
            return false;
        }
        self.keep_showing = keep;
        self.monitor = ctx.monitor;
        self.ui = ctx.ui.clone();
        true
    }

    pub(crate) fn finish_show(&mut self) {
        self.update_bitmap(true);
        self.update_view(self.full_view());
        if let Some(surface) = self.surface.as_mut() {
            // The host draws a one pixel border around the content.
            surface.set_frame(self.frame.inflate(1.0, 1.0));
            surface.set_opacity(self.ui.background_alpha);
            surface.set_visible(true);
            surface.focus();
        }
        self.visible = true;
        self.request_repaint();
        debug!(
            strategy = %self.strategy,
            frame = ?self.frame,
            items = self.layout.as_ref().map_or(0, LayoutSystem::len),
            "view shown"
        );
    }

    /// Stops every live preview and releases the bitmap. Safe to call at any time.
    pub fn hide(&mut self) {
        if self.surface.is_none() || !self.visible {
            return;
        }
        self.update_view(Rect::ZERO);
        if let Some(surface) = self.surface.as_mut() {
            surface.set_visible(false);
        }
        self.bitmap = None;
        self.visible = false;
        debug!(strategy = %self.strategy, "view hidden");
    }

    /// Replaces the whole placement with `windows` and selects the first item.
    pub(crate) fn populate(
        &mut self,
        ctx: &SwitcherContext,
        width_limit: f64,
        windows: impl IntoIterator<Item = WindowRef>,
        stacked: HashSet<GroupKey>,
    ) {
        self.update_view(Rect::ZERO);
        self.monitor = ctx.monitor;
        self.ui = ctx.ui.clone();
        let metrics = self.strategy.metrics(&self.ui);
        let layout = self.layout.get_or_insert_with(|| self.strategy.system());
        layout.reinitialize(width_limit, metrics);
        for window in windows {
            layout.add_item(window);
        }
        self.selected = layout.item_at(0);
        layout.align_items();
        self.stacked = stacked;
        self.dirty.make_infinite();
        trace!(strategy = %self.strategy, items = layout.len(), content = ?layout.content_rect(), "layout populated");
    }

    pub(crate) fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
        if self.visible
            && let Some(surface) = self.surface.as_mut()
        {
            surface.set_frame(frame.inflate(1.0, 1.0));
        }
    }

    pub(crate) fn drop_bitmap(&mut self) { self.bitmap = None; }

    /// Moves the viewport, stopping previews of items that scroll out of it.
    pub fn update_view(&mut self, next: Rect) {
        let Some(layout) = self.layout.as_ref() else {
            return;
        };
        if self.viewport == next {
            return;
        }
        self.thumbnails_stale = true;

        let current = layout.intersect_items(&self.viewport);
        let next_items = if next.is_empty() {
            Vec::new()
        } else {
            layout.intersect_items(&next)
        };
        if let Some(surface) = self.surface.as_ref().map(HostSurface::id) {
            for &id in current.iter().filter(|id| !next_items.contains(id)) {
                if let Some(item) = layout.item(id) {
                    item.window().deactivate_preview(surface);
                }
            }
        }
        self.viewport = if next.is_empty() { Rect::ZERO } else { next };
        trace!(viewport = ?self.viewport, "viewport moved");
    }

    /// Selects `id`, scrolling it into view. Returns whether the selection changed.
    pub fn set_selected(&mut self, id: Option<ItemId>) -> bool {
        let Some(id) = id else {
            return false;
        };
        if self.selected == Some(id) {
            return false;
        }
        let Some(layout) = self.layout.as_ref() else {
            return false;
        };
        let Some(rect) = layout.item(id).map(LayoutItem::rect) else {
            return false;
        };

        let margin = self.ui.selection_margin();
        if let Some(prev) = self.selected.and_then(|prev| layout.item(prev)) {
            self.dirty.xor(prev.rect().inflate(margin, margin));
        }
        self.dirty.xor(rect.inflate(margin, margin));
        self.selected = Some(id);

        if !self.viewport.contains_rect(&rect) {
            let content_height = layout.content_rect().height();
            let v_margin = self.ui.item_v_margin;
            let mut next = self.viewport;
            if rect.min_y() < next.min_y() {
                next.origin.y = (rect.min_y() - v_margin).max(0.0);
            } else if rect.max_y() > next.max_y() {
                next.origin.y = (rect.max_y() + v_margin - next.height())
                    .min(content_height - next.height())
                    .max(0.0);
            }
            self.update_view(next);
        }

        self.update_bitmap(false);
        self.request_repaint();
        true
    }

    pub fn select_step(&mut self, step: Step) -> bool {
        let Some(layout) = self.layout.as_ref() else {
            return false;
        };
        let next = match (self.selected, step) {
            (Some(id), Step::Next) => layout.next_item(id),
            (Some(id), Step::Prev) => layout.prev_item(id),
            (None, _) => layout.item_at(0),
        };
        self.set_selected(next)
    }

    pub fn select_next(&mut self) -> bool { self.select_step(Step::Next) }

    pub fn select_prev(&mut self) -> bool { self.select_step(Step::Prev) }

    pub fn request_repaint(&mut self) {
        if !self.visible {
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.request_repaint();
        }
    }

    /// Redraws the dirty part of the chrome bitmap, or all of it.
    pub fn update_bitmap(&mut self, redraw_all: bool) {
        let Self {
            surface,
            layout,
            bitmap,
            dirty,
            ui,
            stacked,
            selected,
            frame,
            ..
        } = self;
        let (Some(surface), Some(layout)) = (surface.as_mut(), layout.as_ref()) else {
            return;
        };
        let content = layout.content_rect();
        let required = Size::new(
            content.width().max(frame.width()),
            content.height().max(frame.height()),
        );
        if required.width <= 0.0 || required.height <= 0.0 {
            return;
        }

        let mut redraw_all = redraw_all;
        let fits = bitmap.as_ref().is_some_and(|b| {
            let size = b.size();
            size.width >= required.width && size.height >= required.height
        });
        if !fits {
            trace!(?required, "creating bitmap");
            *bitmap = Some(surface.create_bitmap(required));
            redraw_all = true;
        }
        let Some(canvas) = bitmap.as_mut() else {
            return;
        };
        if redraw_all {
            dirty.make_infinite();
        }

        let clip = Rect::new(Point::default(), canvas.size());
        let Some(bounds) = dirty.bounds(clip) else {
            return;
        };
        for rect in dirty.rects_within(clip) {
            canvas.fill_rect(rect, ui.background_color);
        }

        let items: Vec<&LayoutItem> = layout
            .intersect_items(&bounds)
            .into_iter()
            .filter_map(|id| layout.item(id))
            .filter(|item| dirty.is_visible(&item.rect()))
            .collect();
        for item in items.iter().filter(|item| stacked.contains(item.window().group_key())) {
            let shadow = item.rect().offset(ui.shadow_offset, ui.shadow_offset);
            canvas.fill_rect(shadow, ui.shadow_color);
            let cover = Rect::new(
                shadow.origin,
                Size::new(shadow.width() - ui.shadow_inset, shadow.height() - ui.shadow_inset),
            );
            canvas.fill_rect(cover, ui.background_color);
        }
        for item in &items {
            item.draw_info(canvas, ui);
        }

        if let Some(item) = selected.and_then(|id| layout.item(id))
            && dirty.is_visible(&item.rect())
        {
            let margin = ui.select_frame_margin;
            canvas.stroke_rect(
                item.rect().inflate(margin, margin),
                ui.select_frame_color,
                ui.select_frame_width,
            );
        }
        dirty.make_empty();
    }

    /// Paint callback: pushes stale preview geometry, then blits the viewport.
    pub fn handle_paint<P>(&mut self, paint: &mut P)
    where
        P: PaintContext<H::Bitmap> + ?Sized,
    {
        let (Some(surface), Some(layout)) = (self.surface.as_ref(), self.layout.as_ref()) else {
            return;
        };
        if self.thumbnails_stale {
            let surface_id = surface.id();
            let dx = -self.viewport.min_x() + 1.0;
            let dy = -self.viewport.min_y() + 1.0;
            for id in layout.intersect_items(&self.viewport) {
                let Some(item) = layout.item(id) else {
                    continue;
                };
                let dest = item.thumbnail_rect().offset(dx, dy);
                if let Err(err) = item.window().activate_preview(surface_id, dest) {
                    debug!(%err, title = item.window().title(), "live preview unavailable");
                }
            }
            self.thumbnails_stale = false;
        }
        if let Some(bitmap) = self.bitmap.as_ref() {
            let source = Rect::new(self.viewport.origin, self.frame.size);
            paint.blit(bitmap, source, Point::default());
        }
    }

    /// Selects the item under `point` (surface coordinates). Returns whether the
    /// selection changed.
    pub fn handle_click(&mut self, point: Point) -> bool {
        let content_point = self.content_point(point);
        let hit = self.layout.as_ref().and_then(|layout| layout.item_from_point(content_point));
        match hit {
            Some(id) if self.selected != Some(id) => self.set_selected(Some(id)),
            _ => false,
        }
    }

    /// Scrolls by `delta_notches` wheel notches; positive scrolls up.
    pub fn handle_wheel(&mut self, delta_notches: f64) {
        let content = self.content_rect();
        if self.viewport.is_empty() || self.viewport.height() >= content.height() {
            return;
        }
        let mut next =
            self.viewport.offset(0.0, -delta_notches * self.ui.scroll_pixels_per_notch);
        if next.min_y() < 0.0 {
            next.origin.y = 0.0;
        }
        if next.max_y() > content.max_y() {
            next.origin.y = content.max_y() - next.height();
        }
        self.update_view(next);
        self.request_repaint();
    }

    /// Whether releasing `key` should commit the current selection.
    pub fn key_commits(&self, key: Key) -> bool {
        !self.keep_showing && key == Key::Modifier && self.selected.is_some()
    }
}
