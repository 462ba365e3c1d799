pub mod context;
pub mod snapshot;
pub mod window;

pub use context::{Monitor, SwitcherContext};
pub use window::{GroupKey, MonitorId, PreviewError, WindowGroups, WindowProxy, WindowRef};
