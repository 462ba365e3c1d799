//! Coordinates the group grid and the window list.
//!
//! Hotkeys and pointer input arrive as [`Event`]s; the actor routes them to the
//! right view and performs whatever [`SwitcherAction`] comes back.

use tracing::{debug, instrument};

use crate::actor;
use crate::layout_engine::Step;
use crate::model::context::SwitcherContext;
use crate::model::window::GroupKey;
use crate::sys::geometry::Point;
use crate::sys::surface::{HostSurface, PaintContext};
use crate::ui::{GroupView, Key, ListView, SwitcherAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Group,
    List,
}

#[derive(Debug)]
pub enum Event {
    /// Cycle through groups, opening the switcher if needed.
    SwitchGroup(Step),
    /// Cycle through the windows of `group`, opening its list if needed.
    SwitchWindow { step: Step, group: GroupKey },
    /// Reopen the switcher on the next or previous monitor.
    SwitchMonitor(Step),
    KeepShowing,
    ModifierReleased,
    /// Pointer positions are in surface coordinates of `target`.
    Click { target: Target, point: Point },
    RightClick { point: Point },
    Wheel { target: Target, delta: f64, point: Point },
    FocusLost,
    ContextChanged(SwitcherContext),
}

pub type Sender = actor::Sender<Event>;
pub type Receiver = actor::Receiver<Event>;

pub struct SwitcherActor<H: HostSurface> {
    ctx: SwitcherContext,
    group: GroupView<H>,
    list: ListView<H>,
    rx: Receiver,
}

impl<H: HostSurface> SwitcherActor<H> {
    pub fn new(ctx: SwitcherContext, group_surface: H, list_surface: H, rx: Receiver) -> Self {
        Self {
            ctx,
            group: GroupView::with_surface(group_surface),
            list: ListView::with_surface(list_surface),
            rx,
        }
    }

    pub fn context(&self) -> &SwitcherContext { &self.ctx }

    pub fn group_view(&self) -> &GroupView<H> { &self.group }

    pub fn list_view(&self) -> &ListView<H> { &self.list }

    pub async fn run(mut self) {
        while let Some((span, event)) = self.rx.recv().await {
            let _guard = span.enter();
            self.handle_event(event);
        }
    }

    #[instrument(skip(self))]
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::SwitchGroup(step) => self.switch_group(step),
            Event::SwitchWindow { step, group } => self.switch_window(step, group),
            Event::SwitchMonitor(step) => self.switch_monitor(step),
            Event::KeepShowing => self.keep_showing(),
            Event::ModifierReleased => self.key_up(Key::Modifier),
            Event::Click { target: Target::Group, point } => {
                let action = self.group.handle_click(point);
                self.sync_list();
                self.perform(action);
            }
            Event::Click { target: Target::List, point } => {
                let action = self.list.handle_click(point);
                self.perform(action);
            }
            Event::RightClick { point } => {
                let action = self.group.handle_right_click(point);
                self.sync_list();
                self.perform(action);
            }
            Event::Wheel { target: Target::Group, delta, point } => {
                let action = self.group.handle_wheel(delta, point);
                self.perform(action);
            }
            Event::Wheel { target: Target::List, delta, .. } => self.list.handle_wheel(delta),
            Event::FocusLost => self.hide_all(),
            Event::ContextChanged(ctx) => {
                self.hide_all();
                self.ctx = ctx;
            }
        }
    }

    /// Called from the host's paint callback for `target`'s surface.
    pub fn paint<P: PaintContext<H::Bitmap> + ?Sized>(&mut self, target: Target, paint: &mut P) {
        match target {
            Target::Group => self.group.handle_paint(paint),
            Target::List => self.list.handle_paint(paint),
        }
    }

    fn switch_group(&mut self, step: Step) {
        if !self.group.is_visible() {
            self.group.show(&self.ctx, false);
        }
        self.group.select_step(step);
        self.sync_list();
    }

    fn switch_window(&mut self, step: Step, group: GroupKey) {
        if !self.list.is_visible() {
            self.list.set_group(group, &self.ctx);
            self.list.show(&self.ctx, false);
        }
        self.list.select_step(step);
    }

    fn switch_monitor(&mut self, step: Step) {
        if self.ctx.monitors.len() <= 1 {
            return;
        }
        self.hide_all();
        if !self.ctx.step_monitor(step) {
            return;
        }
        debug!(monitor = self.ctx.monitor.get(), "switched monitor");
        self.group.show(&self.ctx, false);
        self.sync_list();
    }

    fn keep_showing(&mut self) {
        if !self.group.is_visible() && !self.list.is_visible() {
            self.group.show(&self.ctx, true);
            self.sync_list();
        }
        for view in [self.group.view_mut(), self.list.view_mut()] {
            if view.is_visible() {
                view.set_keep_showing(true);
            }
        }
    }

    fn key_up(&mut self, key: Key) {
        let mut action = None;
        if self.group.is_visible() {
            action = self.group.handle_key_up(key);
        }
        if action.is_none() && self.list.is_visible() {
            action = self.list.handle_key_up(key);
        }
        self.perform(action);
    }

    /// Points the list at the group selected in the grid, opening it beside the grid.
    fn sync_list(&mut self) {
        if !self.group.is_visible() {
            return;
        }
        let Some(key) = self.group.selected_group() else {
            return;
        };
        self.list.set_group(key, &self.ctx);
        if !self.list.is_visible() {
            let keep = self.group.view().keep_showing();
            self.list.show(&self.ctx, keep);
        }
    }

    fn perform(&mut self, action: Option<SwitcherAction>) {
        let Some(action) = action else { return };
        debug!(?action, "perform");
        match action {
            SwitcherAction::FocusWindow(window) => {
                self.hide_all();
                window.activate();
            }
            SwitcherAction::FocusListSelection => {
                let next = self.list.activate_selected();
                self.perform(next);
            }
            SwitcherAction::StepList(step) => {
                self.list.select_step(step);
            }
        }
    }

    fn hide_all(&mut self) {
        self.group.hide();
        self.list.hide();
    }
}
