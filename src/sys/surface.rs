//! The seam between the engine and whatever owns real windows and pixels.
//!
//! A host creates the overlay surface, hands out offscreen bitmaps the engine
//! draws chrome into, and calls back with a [`PaintContext`] once a repaint it
//! was asked for is due.

use serde::{Deserialize, Serialize};

use crate::sys::geometry::{Point, Rect, Size};

/// Identity of one overlay surface; live previews are registered against it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct SurfaceId(u64);

impl SurfaceId {
    pub const fn new(id: u64) -> SurfaceId { SurfaceId(id) }

    pub fn get(&self) -> u64 { self.0 }
}

/// Opaque handle to an icon image owned by the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct IconId(u64);

impl IconId {
    pub const fn new(id: u64) -> IconId { IconId(id) }

    pub fn get(&self) -> u64 { self.0 }
}

/// 0xAARRGGBB
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xFFFF_FFFF);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
}

/// Drawing operations the engine needs for its static chrome.
pub trait Canvas {
    fn size(&self) -> Size;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);

    fn draw_icon(&mut self, icon: IconId, rect: Rect);

    /// Single line, vertically centered, truncated with an ellipsis to fit `rect`.
    fn draw_text(&mut self, text: &str, rect: Rect, font: &FontSpec, color: Color);
}

/// Handed to the engine during a paint callback.
pub trait PaintContext<B> {
    /// Copies `source` (in bitmap coordinates) of `bitmap` to `dest` on screen.
    fn blit(&mut self, bitmap: &B, source: Rect, dest: Point);
}

pub trait HostSurface {
    type Bitmap: Canvas;

    fn id(&self) -> SurfaceId;

    fn create_bitmap(&mut self, size: Size) -> Self::Bitmap;

    /// Screen rectangle of the overlay window, border included.
    fn set_frame(&mut self, frame: Rect);

    fn set_visible(&mut self, visible: bool);

    /// Opacity of the whole overlay window in `[0, 1]`.
    fn set_opacity(&mut self, alpha: f64);

    fn focus(&mut self);

    /// Marks the whole surface invalid and asks for a paint callback.
    fn request_repaint(&mut self);
}
