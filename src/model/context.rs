use std::rc::Rc;

use crate::common::config::UiParams;
use crate::layout_engine::Step;
use crate::model::window::{MonitorId, WindowGroups};
use crate::sys::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Monitor {
    pub id: MonitorId,
    /// Usable area in screen coordinates.
    pub work_area: Rect,
}

/// Application state a view reads while it lays itself out.
///
/// Captured when the switcher is invoked and handed to every `show` so views
/// never reach for ambient globals.
#[derive(Debug, Clone)]
pub struct SwitcherContext {
    pub monitor: MonitorId,
    /// Usable area of `monitor` in screen coordinates.
    pub work_area: Rect,
    /// Every monitor in cycling order; includes `monitor`.
    pub monitors: Rc<[Monitor]>,
    pub groups: Rc<WindowGroups>,
    pub ui: Rc<UiParams>,
}

impl SwitcherContext {
    pub fn new(monitor: MonitorId, work_area: Rect, groups: WindowGroups, ui: UiParams) -> Self {
        Self {
            monitor,
            work_area,
            monitors: Rc::new([Monitor { id: monitor, work_area }]),
            groups: Rc::new(groups),
            ui: Rc::new(ui),
        }
    }

    /// Replaces the monitor list. The current monitor is added at the end if missing.
    pub fn with_monitors(mut self, monitors: impl IntoIterator<Item = Monitor>) -> Self {
        let mut monitors: Vec<Monitor> = monitors.into_iter().collect();
        let current = monitors.iter().find(|m| m.id == self.monitor).map(|m| m.work_area);
        match current {
            Some(work_area) => self.work_area = work_area,
            None => monitors.push(Monitor {
                id: self.monitor,
                work_area: self.work_area,
            }),
        }
        self.monitors = monitors.into();
        self
    }

    /// Moves to the next or previous monitor, wrapping around. Returns false
    /// when there is nowhere else to go.
    pub fn step_monitor(&mut self, step: Step) -> bool {
        let len = self.monitors.len();
        let Some(index) = self.monitors.iter().position(|m| m.id == self.monitor) else {
            return false;
        };
        if len <= 1 {
            return false;
        }
        let next = match step {
            Step::Next => (index + 1) % len,
            Step::Prev => (index + len - 1) % len,
        };
        let Monitor { id, work_area } = self.monitors[next];
        self.monitor = id;
        self.work_area = work_area;
        true
    }
}
