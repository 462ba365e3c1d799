use std::cell::RefCell;
use std::rc::Rc;

use crate::common::config::UiParams;
use crate::model::context::SwitcherContext;
use crate::model::window::{GroupKey, MonitorId, PreviewError, WindowGroups, WindowProxy, WindowRef};
use crate::sys::geometry::{Rect, Size};
use crate::sys::surface::{IconId, SurfaceId};

pub const WORK_AREA: Rect = Rect::from_xywh(0.0, 0.0, 1920.0, 1080.0);

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ActivatePreview(SurfaceId, Rect),
    DeactivatePreview(SurfaceId),
    Activate,
}

/// A window that records every call the engine makes on it.
#[derive(Debug)]
pub struct FakeWindow {
    title: String,
    group: GroupKey,
    monitor: MonitorId,
    size: Size,
    icon: Option<IconId>,
    minimized: bool,
    fail_previews: bool,
    calls: RefCell<Vec<Call>>,
}

impl FakeWindow {
    pub fn new(title: impl Into<String>, group: &str, width: f64, height: f64) -> FakeWindow {
        FakeWindow {
            title: title.into(),
            group: GroupKey::new(group),
            monitor: MonitorId::new(0),
            size: Size::new(width, height),
            icon: None,
            minimized: false,
            fail_previews: false,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_icon(mut self, icon: IconId) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn on_monitor(mut self, monitor: u32) -> Self {
        self.monitor = MonitorId::new(monitor);
        self
    }

    pub fn minimized(mut self) -> Self {
        self.minimized = true;
        self
    }

    pub fn failing_previews(mut self) -> Self {
        self.fail_previews = true;
        self
    }

    pub fn build(self) -> Rc<FakeWindow> { Rc::new(self) }

    pub fn calls(&self) -> Vec<Call> { self.calls.borrow().clone() }

    pub fn take_calls(&self) -> Vec<Call> { self.calls.take() }

    pub fn deactivations(&self) -> usize {
        self.calls.borrow().iter().filter(|c| matches!(c, Call::DeactivatePreview(_))).count()
    }

    pub fn activations(&self) -> Vec<Rect> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::ActivatePreview(_, rect) => Some(*rect),
                _ => None,
            })
            .collect()
    }

    pub fn focused(&self) -> bool { self.calls.borrow().contains(&Call::Activate) }
}

impl WindowProxy for FakeWindow {
    fn natural_size(&self) -> Size { self.size }

    fn icon(&self) -> Option<IconId> { self.icon }

    fn title(&self) -> &str { &self.title }

    fn group_key(&self) -> &GroupKey { &self.group }

    fn monitor(&self) -> MonitorId { self.monitor }

    fn is_minimized(&self) -> bool { self.minimized }

    fn activate_preview(&self, surface: SurfaceId, dest: Rect) -> Result<(), PreviewError> {
        if self.fail_previews {
            return Err(PreviewError::Exhausted { limit: 0 });
        }
        self.calls.borrow_mut().push(Call::ActivatePreview(surface, dest));
        Ok(())
    }

    fn deactivate_preview(&self, surface: SurfaceId) {
        self.calls.borrow_mut().push(Call::DeactivatePreview(surface));
    }

    fn activate(&self) { self.calls.borrow_mut().push(Call::Activate); }
}

pub fn refs(windows: &[Rc<FakeWindow>]) -> Vec<WindowRef> {
    windows.iter().map(|w| w.clone() as WindowRef).collect()
}

pub fn context(windows: &[Rc<FakeWindow>]) -> SwitcherContext {
    context_with(windows, UiParams::default())
}

pub fn context_with(windows: &[Rc<FakeWindow>], ui: UiParams) -> SwitcherContext {
    SwitcherContext::new(
        MonitorId::new(0),
        WORK_AREA,
        WindowGroups::from_windows(refs(windows), false),
        ui,
    )
}

/// `count` 16:9 windows in `group`.
pub fn windows(group: &str, count: usize) -> Vec<Rc<FakeWindow>> {
    (0..count)
        .map(|i| FakeWindow::new(format!("{group} {i}"), group, 1600.0, 900.0).build())
        .collect()
}
