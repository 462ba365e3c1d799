use crate::common::config::UiParams;
use crate::model::window::WindowRef;
use crate::sys::geometry::{Point, Rect, Size};
use crate::sys::surface::Canvas;

/// Fits a `width`×`height` image into `width_limit`×(`height_limit` - `bar_height`)
/// keeping its aspect ratio. The returned height includes the bar again.
pub fn scaled_size(
    width: f64,
    height: f64,
    width_limit: f64,
    height_limit: f64,
    bar_height: f64,
) -> Size {
    let box_height = height_limit - bar_height;
    if width / height > width_limit / box_height {
        Size::new(width_limit, width_limit * height / width + bar_height)
    } else {
        Size::new(box_height * width / height, height_limit)
    }
}

/// Natural size of `window`, or the box's own shape when the window reports none.
pub(crate) fn natural_size(window: &WindowRef, width_limit: f64, box_height: f64) -> Size {
    let size = window.natural_size();
    if size.width > 0.0 && size.height > 0.0 {
        size
    } else {
        Size::new(width_limit, box_height)
    }
}

/// One placed window: the full cell, the live preview area below the title bar
/// and the icon square inside the bar.
#[derive(Debug, Clone)]
pub struct LayoutItem {
    window: WindowRef,
    index: usize,
    rect: Rect,
    thumbnail_rect: Rect,
    icon_rect: Rect,
}

impl LayoutItem {
    pub(crate) fn new(
        window: WindowRef,
        index: usize,
        rect: Rect,
        bar_height: f64,
        icon_margin: f64,
    ) -> LayoutItem {
        let natural = natural_size(&window, rect.width(), rect.height() - bar_height);
        let fitted = scaled_size(
            natural.width,
            natural.height,
            rect.width(),
            rect.height(),
            bar_height,
        );
        let thumb_w = fitted.width;
        let thumb_h = fitted.height - bar_height;
        let thumbnail_rect = Rect::from_xywh(
            rect.min_x() + (rect.width() - thumb_w) / 2.0,
            rect.min_y() + bar_height,
            thumb_w,
            thumb_h,
        );
        let icon_side = (bar_height - icon_margin * 2.0).max(0.0);
        let icon_rect = Rect::from_xywh(
            rect.min_x() + icon_margin,
            rect.min_y() + icon_margin,
            icon_side,
            icon_side,
        );
        LayoutItem {
            window,
            index,
            rect,
            thumbnail_rect,
            icon_rect,
        }
    }

    pub fn window(&self) -> &WindowRef { &self.window }

    /// Position in navigation order.
    pub fn index(&self) -> usize { self.index }

    pub fn rect(&self) -> Rect { self.rect }

    pub fn thumbnail_rect(&self) -> Rect { self.thumbnail_rect }

    pub fn icon_rect(&self) -> Rect { self.icon_rect }

    /// Moves the item so its cell starts at `origin`.
    pub fn set_position(&mut self, origin: Point) {
        let dx = origin.x - self.rect.origin.x;
        let dy = origin.y - self.rect.origin.y;
        self.rect = self.rect.offset(dx, dy);
        self.thumbnail_rect = self.thumbnail_rect.offset(dx, dy);
        self.icon_rect = self.icon_rect.offset(dx, dy);
    }

    fn title_rect(&self, icon_margin: f64) -> Rect {
        let icon = self.icon_rect;
        Rect::from_xywh(
            icon.max_x() + icon_margin * 2.0,
            icon.min_y(),
            (self.rect.width() - icon.width() - icon_margin * 3.0).max(0.0),
            icon.height(),
        )
    }

    /// Paints the static chrome. Live preview pixels are composited by the host.
    pub fn draw_info<C: Canvas + ?Sized>(&self, canvas: &mut C, ui: &UiParams) {
        canvas.fill_rect(self.rect, ui.item_color);
        if let Some(icon) = self.window.icon() {
            canvas.draw_icon(icon, self.icon_rect);
        }
        canvas.draw_text(
            self.window.title(),
            self.title_rect(ui.icon_margin),
            &ui.font,
            ui.title_color,
        );
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::sys::headless::{DrawOp, HeadlessBitmap};
    use crate::sys::surface::IconId;
    use crate::ui::testing::FakeWindow;

    const EPS: f64 = 1e-9;

    #[test]
    fn scaled_size_preserves_aspect_ratio() {
        let sizes = [1.0, 3.0, 16.0, 90.0, 640.0, 1920.0];
        let limits = [(240.0, 120.0, 30.0), (360.0, 180.0, 45.0), (50.0, 500.0, 1.0)];
        for &w in &sizes {
            for &h in &sizes {
                for &(wl, hl, bar) in &limits {
                    let s = scaled_size(w, h, wl, hl, bar);
                    let ratio = s.width / (s.height - bar);
                    assert!((ratio - w / h).abs() < 1e-6 * (w / h), "{w}x{h} in {wl}x{hl}");
                    assert!(s.height >= bar);
                    assert!(s.width <= wl + EPS);
                    assert!(s.height <= hl + EPS);
                }
            }
        }
    }

    #[test]
    fn wide_source_is_width_limited() {
        assert_eq!(scaled_size(1000.0, 100.0, 240.0, 120.0, 30.0), Size::new(240.0, 54.0));
        assert_eq!(scaled_size(1600.0, 900.0, 240.0, 120.0, 30.0), Size::new(160.0, 120.0));
    }

    #[test]
    fn thumbnail_sits_below_the_bar_and_keeps_ratio() {
        let window = FakeWindow::new("a", "app", 1600.0, 900.0).build();
        // A cell widened past its fitted width by a minimum width clamp.
        let rect = Rect::from_xywh(30.0, 30.0, 200.0, 120.0);
        let item = LayoutItem::new(window, 0, rect, 30.0, 5.0);
        assert_eq!(item.thumbnail_rect(), Rect::from_xywh(50.0, 60.0, 160.0, 90.0));
        assert_eq!(item.icon_rect(), Rect::from_xywh(35.0, 35.0, 20.0, 20.0));
        assert!(rect.contains_rect(&item.thumbnail_rect()));
    }

    #[test]
    fn zero_sized_window_fills_the_box() {
        let window = FakeWindow::new("a", "app", 0.0, 0.0).build();
        let rect = Rect::from_xywh(0.0, 0.0, 240.0, 120.0);
        let item = LayoutItem::new(window, 0, rect, 30.0, 5.0);
        assert_eq!(item.thumbnail_rect(), Rect::from_xywh(0.0, 30.0, 240.0, 90.0));
    }

    #[test]
    fn set_position_translates_every_rect() {
        let window = FakeWindow::new("a", "app", 1600.0, 900.0).build();
        let mut item = LayoutItem::new(window, 0, Rect::from_xywh(30.0, 30.0, 160.0, 120.0), 30.0, 5.0);
        let thumb = item.thumbnail_rect();
        let icon = item.icon_rect();
        item.set_position(Point::new(70.0, 10.0));
        assert_eq!(item.rect(), Rect::from_xywh(70.0, 10.0, 160.0, 120.0));
        assert_eq!(item.thumbnail_rect(), thumb.offset(40.0, -20.0));
        assert_eq!(item.icon_rect(), icon.offset(40.0, -20.0));
    }

    #[test]
    fn draw_info_paints_background_icon_and_title() {
        let window = FakeWindow::new("Editor", "app", 1600.0, 900.0)
            .with_icon(IconId::new(7))
            .build();
        let ui = UiParams::default();
        let item = LayoutItem::new(window, 0, Rect::from_xywh(30.0, 30.0, 160.0, 120.0), 30.0, 5.0);
        let mut bitmap = HeadlessBitmap::new(Size::new(400.0, 400.0));
        item.draw_info(&mut bitmap, &ui);
        assert_eq!(
            bitmap.take_ops(),
            vec![
                DrawOp::Fill(item.rect(), ui.item_color),
                DrawOp::Icon(IconId::new(7), item.icon_rect()),
                DrawOp::Text("Editor".to_string(), Rect::from_xywh(65.0, 35.0, 125.0, 20.0)),
            ]
        );
    }
}
