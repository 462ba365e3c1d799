//! Windows described in a JSON file instead of enumerated from a live desktop.

use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::common::collections::HashMap;
use crate::model::context::Monitor;
use crate::model::window::{GroupKey, MonitorId, PreviewError, WindowGroups, WindowProxy, WindowRef};
use crate::sys::geometry::{Rect, Size};
use crate::sys::surface::{IconId, SurfaceId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowData {
    pub title: String,
    pub group: GroupKey,
    #[serde(default)]
    pub monitor: u32,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub icon: Option<u64>,
    #[serde(default)]
    pub minimized: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonitorData {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<MonitorData> for Monitor {
    fn from(m: MonitorData) -> Monitor {
        Monitor {
            id: MonitorId::new(m.id),
            work_area: Rect::from_xywh(m.x, m.y, m.width, m.height),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotData {
    /// Work areas in cycling order. May be omitted for a single monitor.
    #[serde(default)]
    pub monitors: Vec<MonitorData>,
    pub windows: Vec<WindowData>,
}

/// A window proxy backed by [`WindowData`] that remembers where it was asked
/// to composite itself.
#[derive(Debug)]
pub struct SnapshotWindow {
    data: WindowData,
    group: GroupKey,
    previews: RefCell<HashMap<SurfaceId, Rect>>,
    focused: Cell<bool>,
}

impl SnapshotWindow {
    pub fn new(data: WindowData) -> SnapshotWindow {
        SnapshotWindow {
            group: data.group.clone(),
            data,
            previews: RefCell::default(),
            focused: Cell::new(false),
        }
    }

    pub fn data(&self) -> &WindowData { &self.data }

    /// Live previews sorted by surface.
    pub fn previews(&self) -> Vec<(SurfaceId, Rect)> {
        let mut previews: Vec<_> = self.previews.borrow().iter().map(|(&s, &r)| (s, r)).collect();
        previews.sort_by_key(|(surface, _)| *surface);
        previews
    }

    pub fn is_focused(&self) -> bool { self.focused.get() }
}

impl WindowProxy for SnapshotWindow {
    fn natural_size(&self) -> Size { Size::new(self.data.width, self.data.height) }

    fn icon(&self) -> Option<IconId> { self.data.icon.map(IconId::new) }

    fn title(&self) -> &str { &self.data.title }

    fn group_key(&self) -> &GroupKey { &self.group }

    fn monitor(&self) -> MonitorId { MonitorId::new(self.data.monitor) }

    fn is_minimized(&self) -> bool { self.data.minimized }

    fn activate_preview(&self, surface: SurfaceId, dest: Rect) -> Result<(), PreviewError> {
        if self.data.width <= 0.0 || self.data.height <= 0.0 {
            return Err(PreviewError::SourceGone);
        }
        self.previews.borrow_mut().insert(surface, dest);
        Ok(())
    }

    fn deactivate_preview(&self, surface: SurfaceId) { self.previews.borrow_mut().remove(&surface); }

    fn activate(&self) { self.focused.set(true); }
}

#[derive(Debug, Default)]
pub struct Snapshot {
    monitors: Vec<Monitor>,
    windows: Vec<Rc<SnapshotWindow>>,
}

impl Snapshot {
    pub fn read(path: &Path) -> anyhow::Result<Snapshot> {
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("reading window snapshot {}", path.display()))?;
        Snapshot::parse(&buf).with_context(|| format!("parsing window snapshot {}", path.display()))
    }

    pub fn parse(buf: &str) -> anyhow::Result<Snapshot> {
        let data: SnapshotData = serde_json::from_str(buf)?;
        Ok(Snapshot::from_data(data))
    }

    pub fn from_data(data: SnapshotData) -> Snapshot {
        Snapshot {
            monitors: data.monitors.into_iter().map(Monitor::from).collect(),
            windows: data.windows.into_iter().map(|w| Rc::new(SnapshotWindow::new(w))).collect(),
        }
    }

    pub fn monitors(&self) -> &[Monitor] { &self.monitors }

    pub fn windows(&self) -> &[Rc<SnapshotWindow>] { &self.windows }

    pub fn groups(&self, ignore_minimized: bool) -> WindowGroups {
        WindowGroups::from_windows(
            self.windows.iter().map(|w| w.clone() as WindowRef),
            ignore_minimized,
        )
    }
}
