use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::common::collections::HashMap;
use crate::sys::geometry::{Rect, Size};
use crate::sys::surface::{IconId, SurfaceId};

/// Identifies the process group a window belongs to (the executable path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn new(key: impl Into<String>) -> GroupKey { GroupKey(key.into()) }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct MonitorId(u32);

impl MonitorId {
    pub const fn new(id: u32) -> MonitorId { MonitorId(id) }

    pub fn get(&self) -> u32 { self.0 }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PreviewError {
    #[error("compositor refused preview registration: {0}")]
    Refused(String),
    #[error("live preview limit of {limit} reached")]
    Exhausted { limit: usize },
    #[error("source window no longer exists")]
    SourceGone,
}

/// Stand-in for one live application window.
///
/// Implementations are owned by the window enumeration side; the layout engine
/// only holds shared handles and never mutates them.
pub trait WindowProxy {
    /// Size of the real window; only its aspect ratio matters for layout.
    fn natural_size(&self) -> Size;

    fn icon(&self) -> Option<IconId>;

    fn title(&self) -> &str;

    fn group_key(&self) -> &GroupKey;

    fn monitor(&self) -> MonitorId;

    fn is_minimized(&self) -> bool { false }

    /// Starts (or moves) live compositing of this window into `dest` on `surface`.
    fn activate_preview(&self, surface: SurfaceId, dest: Rect) -> Result<(), PreviewError>;

    /// Stops compositing into `surface`. Must be a no-op if nothing is active.
    fn deactivate_preview(&self, surface: SurfaceId);

    /// Brings the real window to the foreground.
    fn activate(&self);
}

pub type WindowRef = Rc<dyn WindowProxy>;

impl fmt::Debug for dyn WindowProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WindowProxy")
            .field("title", &self.title())
            .field("group", self.group_key())
            .field("monitor", &self.monitor())
            .finish()
    }
}

/// Ordered window groups, each an ordered list of windows sharing a [`GroupKey`].
#[derive(Default, Clone)]
pub struct WindowGroups {
    groups: Vec<(GroupKey, Vec<WindowRef>)>,
    index: HashMap<GroupKey, usize>,
}

impl WindowGroups {
    /// Groups `windows` by key, keeping first-seen order for groups and members.
    pub fn from_windows(
        windows: impl IntoIterator<Item = WindowRef>,
        ignore_minimized: bool,
    ) -> WindowGroups {
        let mut this = WindowGroups::default();
        for window in windows {
            if ignore_minimized && window.is_minimized() {
                continue;
            }
            let key = window.group_key().clone();
            match this.index.get(&key) {
                Some(&idx) => this.groups[idx].1.push(window),
                None => {
                    this.index.insert(key.clone(), this.groups.len());
                    this.groups.push((key, vec![window]));
                }
            }
        }
        this
    }

    pub fn len(&self) -> usize { self.groups.len() }

    pub fn is_empty(&self) -> bool { self.groups.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, &[WindowRef])> {
        self.groups.iter().map(|(key, windows)| (key, windows.as_slice()))
    }

    pub fn windows_in(&self, key: &GroupKey) -> &[WindowRef] {
        match self.index.get(key) {
            Some(&idx) => &self.groups[idx].1,
            None => &[],
        }
    }

    pub fn windows_on<'a>(
        &'a self,
        key: &GroupKey,
        monitor: MonitorId,
    ) -> impl Iterator<Item = &'a WindowRef> + 'a {
        self.windows_in(key).iter().filter(move |w| w.monitor() == monitor)
    }
}

impl fmt::Debug for WindowGroups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.groups.iter().map(|(key, windows)| (key, windows.len())))
            .finish()
    }
}
