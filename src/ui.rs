pub mod dirty_region;
pub mod group_view;
pub mod list_view;
#[cfg(test)]
pub(crate) mod testing;
pub mod thumbnail_view;

pub use dirty_region::DirtyRegion;
pub use group_view::GroupView;
pub use list_view::ListView;
pub use thumbnail_view::ThumbnailView;

use crate::layout_engine::Step;
use crate::model::window::WindowRef;

/// What a view asks its owner to do in response to input.
#[derive(Debug, Clone)]
pub enum SwitcherAction {
    /// Bring this window to the foreground and close the switcher.
    FocusWindow(WindowRef),
    /// Activate whatever the list view currently has selected.
    FocusListSelection,
    StepList(Step),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// The modifier held while switching; releasing it commits the selection.
    Modifier,
    Other(u32),
}
