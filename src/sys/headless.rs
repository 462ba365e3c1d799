//! An in-memory host that records what the engine asks of it.

use crate::sys::geometry::{Point, Rect, Size};
use crate::sys::surface::{Canvas, Color, FontSpec, HostSurface, IconId, PaintContext, SurfaceId};

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    CreateBitmap(Size),
    SetFrame(Rect),
    SetVisible(bool),
    SetOpacity(f64),
    Focus,
    RequestRepaint,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill(Rect, Color),
    Stroke(Rect, Color, f64),
    Icon(IconId, Rect),
    Text(String, Rect),
}

#[derive(Debug, Default)]
pub struct HeadlessBitmap {
    size: Size,
    pub ops: Vec<DrawOp>,
}

impl HeadlessBitmap {
    pub fn new(size: Size) -> Self { Self { size, ops: Vec::new() } }

    pub fn take_ops(&mut self) -> Vec<DrawOp> { std::mem::take(&mut self.ops) }
}

impl Canvas for HeadlessBitmap {
    fn size(&self) -> Size { self.size }

    fn fill_rect(&mut self, rect: Rect, color: Color) { self.ops.push(DrawOp::Fill(rect, color)); }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.ops.push(DrawOp::Stroke(rect, color, width));
    }

    fn draw_icon(&mut self, icon: IconId, rect: Rect) { self.ops.push(DrawOp::Icon(icon, rect)); }

    fn draw_text(&mut self, text: &str, rect: Rect, _font: &FontSpec, _color: Color) {
        self.ops.push(DrawOp::Text(text.to_string(), rect));
    }
}

#[derive(Debug)]
pub struct HeadlessSurface {
    id: SurfaceId,
    frame: Rect,
    visible: bool,
    pub ops: Vec<SurfaceOp>,
}

impl HeadlessSurface {
    pub fn new(id: SurfaceId) -> Self {
        Self {
            id,
            frame: Rect::ZERO,
            visible: false,
            ops: Vec::new(),
        }
    }

    pub fn frame(&self) -> Rect { self.frame }

    pub fn is_visible(&self) -> bool { self.visible }

    pub fn repaint_requests(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, SurfaceOp::RequestRepaint)).count()
    }
}

impl HostSurface for HeadlessSurface {
    type Bitmap = HeadlessBitmap;

    fn id(&self) -> SurfaceId { self.id }

    fn create_bitmap(&mut self, size: Size) -> HeadlessBitmap {
        self.ops.push(SurfaceOp::CreateBitmap(size));
        HeadlessBitmap::new(size)
    }

    fn set_frame(&mut self, frame: Rect) {
        self.frame = frame;
        self.ops.push(SurfaceOp::SetFrame(frame));
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.ops.push(SurfaceOp::SetVisible(visible));
    }

    fn set_opacity(&mut self, alpha: f64) { self.ops.push(SurfaceOp::SetOpacity(alpha)); }

    fn focus(&mut self) { self.ops.push(SurfaceOp::Focus); }

    fn request_repaint(&mut self) { self.ops.push(SurfaceOp::RequestRepaint); }
}

/// Paint target that only remembers which bitmap regions were copied where.
#[derive(Debug, Default)]
pub struct HeadlessPaint {
    pub blits: Vec<(Rect, Point)>,
}

impl PaintContext<HeadlessBitmap> for HeadlessPaint {
    fn blit(&mut self, _bitmap: &HeadlessBitmap, source: Rect, dest: Point) {
        self.blits.push((source, dest));
    }
}
