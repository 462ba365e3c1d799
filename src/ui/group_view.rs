use tracing::instrument;

use crate::common::collections::HashSet;
use crate::layout_engine::{LayoutSystem, Step};
use crate::model::context::SwitcherContext;
use crate::model::window::{GroupKey, WindowRef};
use crate::sys::geometry::{Point, Rect};
use crate::sys::surface::{HostSurface, PaintContext};
use crate::ui::thumbnail_view::{LayoutStrategy, ThumbnailView};
use crate::ui::{Key, SwitcherAction};

/// Grid of one representative window per group on the current monitor.
pub struct GroupView<H: HostSurface> {
    view: ThumbnailView<H>,
}

impl<H: HostSurface> Default for GroupView<H> {
    fn default() -> Self { Self::new() }
}

impl<H: HostSurface> GroupView<H> {
    pub fn new() -> Self {
        Self {
            view: ThumbnailView::new(LayoutStrategy::Grid),
        }
    }

    pub fn with_surface(surface: H) -> Self {
        let mut this = Self::new();
        this.view.attach_surface(surface);
        this
    }

    pub fn view(&self) -> &ThumbnailView<H> { &self.view }

    pub(crate) fn view_mut(&mut self) -> &mut ThumbnailView<H> { &mut self.view }

    pub fn is_visible(&self) -> bool { self.view.is_visible() }

    pub fn selected_group(&self) -> Option<GroupKey> {
        self.view.selected_item().map(|item| item.window().group_key().clone())
    }

    pub fn show(&mut self, ctx: &SwitcherContext, keep: bool) -> bool {
        if !self.view.begin_show(ctx, keep) {
            return false;
        }
        self.initialize_layout(ctx);
        self.view.finish_show();
        true
    }

    pub fn hide(&mut self) { self.view.hide(); }

    fn initialize_layout(&mut self, ctx: &SwitcherContext) {
        let limit = ctx.ui.group_window_limit(ctx.work_area);
        let mut stacked = HashSet::default();
        let mut representatives: Vec<WindowRef> = Vec::new();
        for (key, _) in ctx.groups.iter() {
            let mut on_monitor = ctx.groups.windows_on(key, ctx.monitor);
            if let Some(first) = on_monitor.next() {
                representatives.push(first.clone());
                if on_monitor.next().is_some() {
                    stacked.insert(key.clone());
                }
            }
        }
        self.view.populate(ctx, limit.width(), representatives, stacked);

        let content = self.view.content_rect();
        if content.is_empty() {
            self.view.set_frame(Rect::ZERO);
            return;
        }
        let height = content.height().min(limit.height());
        self.view.set_frame(Rect::from_xywh(
            limit.min_x() + (limit.width() - content.width()) / 2.0,
            limit.min_y() + (limit.height() - height) / 2.0,
            content.width(),
            height,
        ));
    }

    /// Callers must point the list at the new group afterwards.
    pub(crate) fn select_step(&mut self, step: Step) -> bool { self.view.select_step(step) }

    fn selected_is_stacked(&self) -> bool {
        self.view.selected_item().is_some_and(|item| self.view.is_stacked(item))
    }

    /// Stacked groups defer to the list view's selection.
    pub fn activate_selected(&self) -> Option<SwitcherAction> {
        if self.selected_is_stacked() {
            return Some(SwitcherAction::FocusListSelection);
        }
        self.view.selected_window().map(SwitcherAction::FocusWindow)
    }

    #[instrument(skip(self))]
    pub fn handle_click(&mut self, point: Point) -> Option<SwitcherAction> {
        self.view.handle_click(point);
        if self.view.selected().is_some() && !self.selected_is_stacked() {
            return self.activate_selected();
        }
        None
    }

    #[instrument(skip(self))]
    pub fn handle_right_click(&mut self, point: Point) -> Option<SwitcherAction> {
        let hit = self
            .view
            .layout()
            .and_then(|layout| layout.item_from_point(self.view.content_point(point)))?;
        self.view.set_selected(Some(hit));
        Some(SwitcherAction::FocusListSelection)
    }

    /// The wheel over the selected group cycles that group's windows instead of
    /// scrolling. `point` is in surface coordinates.
    #[instrument(skip(self))]
    pub fn handle_wheel(&mut self, delta_notches: f64, point: Point) -> Option<SwitcherAction> {
        if let Some(item) = self.view.selected_item() {
            let viewport = self.view.viewport();
            let on_screen = item.rect().offset(-viewport.min_x(), -viewport.min_y());
            if on_screen.contains_point(point) {
                let step = if delta_notches > 0.0 { Step::Prev } else { Step::Next };
                return Some(SwitcherAction::StepList(step));
            }
        }
        self.view.handle_wheel(delta_notches);
        None
    }

    pub fn handle_key_up(&mut self, key: Key) -> Option<SwitcherAction> {
        if self.view.key_commits(key) {
            return self.activate_selected();
        }
        None
    }

    pub fn handle_paint<P: PaintContext<H::Bitmap> + ?Sized>(&mut self, paint: &mut P) {
        self.view.handle_paint(paint);
    }
}
