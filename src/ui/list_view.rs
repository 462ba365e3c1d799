use tracing::{debug, instrument};

use crate::common::collections::HashSet;
use crate::layout_engine::Step;
use crate::model::context::SwitcherContext;
use crate::model::window::GroupKey;
use crate::sys::geometry::Point;
use crate::sys::surface::{HostSurface, PaintContext};
use crate::ui::thumbnail_view::{LayoutStrategy, ThumbnailView};
use crate::ui::{Key, SwitcherAction};

/// Column of every window of one group on the current monitor.
pub struct ListView<H: HostSurface> {
    view: ThumbnailView<H>,
    group: Option<GroupKey>,
}

impl<H: HostSurface> Default for ListView<H> {
    fn default() -> Self { Self::new() }
}

impl<H: HostSurface> ListView<H> {
    pub fn new() -> Self {
        Self {
            view: ThumbnailView::new(LayoutStrategy::List),
            group: None,
        }
    }

    pub fn with_surface(surface: H) -> Self {
        let mut this = Self::new();
        this.view.attach_surface(surface);
        this
    }

    pub fn view(&self) -> &ThumbnailView<H> { &self.view }

    pub fn view_mut(&mut self) -> &mut ThumbnailView<H> { &mut self.view }

    pub fn is_visible(&self) -> bool { self.view.is_visible() }

    pub fn group(&self) -> Option<&GroupKey> { self.group.as_ref() }

    /// Switches to another group, relaying out (and redrawing if shown).
    #[instrument(skip(self, ctx))]
    pub fn set_group(&mut self, group: GroupKey, ctx: &SwitcherContext) {
        if self.group.as_ref() == Some(&group) {
            return;
        }
        self.group = Some(group);
        self.initialize_layout(ctx);
        self.view.drop_bitmap();
        if self.view.is_visible() {
            self.view.update_bitmap(true);
            self.view.request_repaint();
        }
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
        let frame = ctx.ui.list_window_limit(ctx.work_area);
        let windows: Vec<_> = match &self.group {
            Some(group) => ctx.groups.windows_on(group, ctx.monitor).cloned().collect(),
            None => Vec::new(),
        };
        debug!(group = ?self.group, windows = windows.len(), "list layout");
        self.view.set_frame(frame);
        self.view.populate(ctx, frame.width(), windows, HashSet::default());
        if self.view.is_visible() {
            self.view.update_view(self.view.full_view());
        }
    }

    pub fn select_step(&mut self, step: Step) -> bool { self.view.select_step(step) }

    pub fn activate_selected(&self) -> Option<SwitcherAction> {
        self.view.selected_window().map(SwitcherAction::FocusWindow)
    }

    /// Selects the clicked item and activates it.
    #[instrument(skip(self))]
    pub fn handle_click(&mut self, point: Point) -> Option<SwitcherAction> {
        // Resolve before selecting: the selection may scroll the viewport.
        let content_point = self.view.content_point(point);
        self.view.handle_click(point);
        let hit = self
            .view
            .selected_item()
            .is_some_and(|item| item.rect().contains_point(content_point));
        if hit { self.activate_selected() } else { None }
    }

    pub fn handle_wheel(&mut self, delta_notches: f64) { self.view.handle_wheel(delta_notches); }

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

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::common::config::UiParams;
    use crate::layout_engine::LayoutSystem;
    use crate::model::window::{MonitorId, WindowGroups, WindowProxy};
    use crate::sys::geometry::Rect;
    use crate::sys::headless::{HeadlessSurface, SurfaceOp};
    use crate::sys::surface::SurfaceId;
    use crate::ui::testing::{self, FakeWindow};

    fn windows() -> Vec<Rc<FakeWindow>> {
        let mut windows = testing::windows("editor", 3);
        windows.push(FakeWindow::new("editor far", "editor", 1600.0, 900.0).on_monitor(2).build());
        windows.extend(testing::windows("shell", 1));
        windows
    }

    fn titles(list: &ListView<HeadlessSurface>) -> Vec<String> {
        let layout = list.view().layout().unwrap();
        layout
            .ids()
            .iter()
            .map(|&id| layout.item(id).unwrap().window().title().to_string())
            .collect()
    }

    #[test]
    fn lists_the_group_members_on_the_monitor() {
        let windows = windows();
        let ctx = testing::context(&windows);
        let mut list = ListView::with_surface(HeadlessSurface::new(SurfaceId::new(2)));
        list.set_group(GroupKey::new("editor"), &ctx);
        assert!(list.show(&ctx, false));
        assert_eq!(titles(&list), vec!["editor 0", "editor 1", "editor 2"]);
        assert_eq!(list.view().frame(), Rect::from_xywh(1500.0, 0.0, 420.0, 1080.0));
        assert_eq!(list.view().viewport(), Rect::from_xywh(0.0, 0.0, 420.0, 1080.0));
    }

    #[test]
    fn switching_groups_relays_out_and_redraws() {
        let windows = windows();
        let ctx = testing::context(&windows);
        let mut list = ListView::with_surface(HeadlessSurface::new(SurfaceId::new(2)));
        list.set_group(GroupKey::new("editor"), &ctx);
        list.show(&ctx, false);
        let repaints = list.view().surface().unwrap().repaint_requests();

        list.set_group(GroupKey::new("editor"), &ctx);
        assert_eq!(list.view().surface().unwrap().repaint_requests(), repaints);

        list.set_group(GroupKey::new("shell"), &ctx);
        assert_eq!(titles(&list), vec!["shell 0"]);
        assert_eq!(list.view().surface().unwrap().repaint_requests(), repaints + 1);
        let creates = list
            .view()
            .surface()
            .unwrap()
            .ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::CreateBitmap(_)))
            .count();
        assert_eq!(creates, 2);
        // Every old preview in the viewport was stopped once when the layout was replaced.
        for window in &windows[..3] {
            assert_eq!(window.deactivations(), 1, "{}", window.title());
        }
        assert_eq!(windows[3].deactivations(), 0);
        assert_eq!(windows[4].deactivations(), 0);
    }

    #[test]
    fn click_activates_the_clicked_window() {
        let windows = windows();
        let ctx = testing::context(&windows);
        let mut list = ListView::with_surface(HeadlessSurface::new(SurfaceId::new(2)));
        list.set_group(GroupKey::new("editor"), &ctx);
        list.show(&ctx, false);
        let layout = list.view().layout().unwrap();
        let second = layout.item(layout.item_at(1).unwrap()).unwrap().rect();

        match list.handle_click(Point::new(second.min_x() + 1.0, second.min_y() + 1.0)) {
            Some(SwitcherAction::FocusWindow(w)) => assert_eq!(w.title(), "editor 1"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(list.handle_click(Point::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn click_on_a_partly_visible_item_activates_it() {
        let windows = windows();
        let short = Rect::from_xywh(0.0, 0.0, 1920.0, 400.0);
        let ctx = SwitcherContext::new(
            MonitorId::new(0),
            short,
            WindowGroups::from_windows(testing::refs(&windows), false),
            UiParams::default(),
        );
        let mut list = ListView::with_surface(HeadlessSurface::new(SurfaceId::new(2)));
        list.set_group(GroupKey::new("editor"), &ctx);
        list.show(&ctx, false);
        let layout = list.view().layout().unwrap();
        let second = layout.item(layout.item_at(1).unwrap()).unwrap().rect();
        assert!(second.min_y() < 390.0 && second.max_y() > 400.0);

        match list.handle_click(Point::new(second.min_x() + 5.0, 390.0)) {
            Some(SwitcherAction::FocusWindow(w)) => assert_eq!(w.title(), "editor 1"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(list.view().viewport().min_y() > 0.0);
    }

    #[test]
    fn modifier_release_focuses_the_selection() {
        let windows = windows();
        let ctx = testing::context(&windows);
        let mut list = ListView::with_surface(HeadlessSurface::new(SurfaceId::new(2)));
        list.set_group(GroupKey::new("editor"), &ctx);
        list.show(&ctx, false);
        list.select_step(Step::Prev);
        match list.handle_key_up(Key::Modifier) {
            Some(SwitcherAction::FocusWindow(w)) => assert_eq!(w.title(), "editor 2"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_group_is_an_empty_list() {
        let windows = windows();
        let ctx = testing::context(&windows);
        let mut list = ListView::with_surface(HeadlessSurface::new(SurfaceId::new(2)));
        list.set_group(GroupKey::new("nobody"), &ctx);
        list.show(&ctx, false);
        assert!(list.view().layout().unwrap().is_empty());
        assert!(list.activate_selected().is_none());
        list.handle_wheel(-3.0);
        assert_eq!(list.view().viewport().min_y(), 0.0);
    }
}
