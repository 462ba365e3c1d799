use super::{ItemId, ItemStore, LayoutSystem};
use crate::layout_engine::item::natural_size;
use crate::layout_engine::{LayoutItem, LayoutMetrics, scaled_size};
use crate::model::window::WindowRef;
use crate::sys::geometry::{Point, Rect, Size};

/// One column of items, each centered against the list's maximum item width.
#[derive(Debug, Clone, Default)]
pub struct ListLayoutSystem {
    store: ItemStore,
    content: Rect,
}

impl LayoutSystem for ListLayoutSystem {
    fn reinitialize(&mut self, width_limit: f64, metrics: LayoutMetrics) {
        self.store.reset(width_limit, metrics);
        self.content = Rect::ZERO;
    }

    fn add_item(&mut self, window: WindowRef) -> ItemId {
        let metrics = self.store.metrics;
        let cell = metrics.cell;
        let natural = natural_size(
            &window,
            cell.item_max_width,
            cell.item_max_height - cell.bar_height,
        );
        let size = scaled_size(
            natural.width,
            natural.height,
            cell.item_max_width,
            cell.item_max_height,
            cell.bar_height,
        );
        let width = size.width.max(cell.item_min_width);
        let top = match self.store.last_rect() {
            Some(last) => last.max_y() + metrics.item_v_margin,
            None => cell.edge_v_margin,
        };
        let rect = Rect::new(Point::new(cell.edge_h_margin, top), Size::new(width, size.height));
        self.store.push(window, rect)
    }

    fn align_items(&mut self) {
        let cell = self.store.metrics.cell;
        for index in 0..self.store.order.len() {
            let id = self.store.order[index];
            let rect = self.store.rect(id);
            let dx = cell.edge_h_margin + (cell.item_max_width - rect.width()) / 2.0 - rect.min_x();
            self.store.translate(id, dx);
        }
        self.content = match self.store.last_rect() {
            Some(last) => Rect::from_xywh(
                0.0,
                0.0,
                cell.item_max_width + cell.edge_h_margin * 2.0,
                last.max_y() + cell.edge_v_margin,
            ),
            None => Rect::ZERO,
        };
    }

    fn content_rect(&self) -> Rect { self.content }

    fn len(&self) -> usize { self.store.order.len() }

    fn item(&self, id: ItemId) -> Option<&LayoutItem> { self.store.get(id) }

    fn ids(&self) -> &[ItemId] { &self.store.order }

    fn item_at(&self, index: usize) -> Option<ItemId> { self.store.item_at(index) }

    fn intersect_items(&self, rect: &Rect) -> Vec<ItemId> {
        if rect.is_empty() {
            return Vec::new();
        }
        let order = &self.store.order;
        let first = order.partition_point(|&id| self.store.rect(id).max_y() <= rect.min_y());
        order[first..]
            .iter()
            .copied()
            .take_while(|&id| self.store.rect(id).min_y() < rect.max_y())
            .filter(|&id| self.store.rect(id).intersects(rect))
            .collect()
    }

    fn next_item(&self, id: ItemId) -> Option<ItemId> { self.store.step(id, true) }

    fn prev_item(&self, id: ItemId) -> Option<ItemId> { self.store.step(id, false) }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::common::config::UiParams;
    use crate::ui::testing::FakeWindow;

    fn list(sizes: &[(f64, f64)]) -> ListLayoutSystem {
        let mut list = ListLayoutSystem::default();
        list.reinitialize(420.0, UiParams::default().list_metrics());
        for (i, &(w, h)) in sizes.iter().enumerate() {
            list.add_item(FakeWindow::new(&format!("w{i}"), "app", w, h).build());
        }
        list.align_items();
        list
    }

    #[test]
    fn items_stack_and_center_in_one_column() {
        let list = list(&[(1600.0, 900.0), (100.0, 900.0), (3200.0, 900.0)]);
        let rects: Vec<Rect> = list.ids().iter().map(|&id| list.item(id).unwrap().rect()).collect();
        assert_eq!(
            rects,
            vec![
                Rect::from_xywh(90.0, 30.0, 240.0, 180.0),
                Rect::from_xywh(165.0, 240.0, 90.0, 180.0),
                Rect::from_xywh(30.0, 450.0, 360.0, 146.25),
            ]
        );
        assert_eq!(list.content_rect(), Rect::from_xywh(0.0, 0.0, 420.0, 626.25));
    }

    #[test]
    fn window_queries_return_only_visible_items() {
        let list = list(&[(1600.0, 900.0); 4]);
        let ids = list.ids().to_vec();
        assert_eq!(list.intersect_items(&Rect::from_xywh(0.0, 0.0, 420.0, 420.0)), ids[..2].to_vec());
        assert_eq!(list.intersect_items(&Rect::from_xywh(0.0, 200.0, 420.0, 300.0)), ids[..3].to_vec());
        assert_eq!(list.item_from_point(Point::new(100.0, 455.0)), Some(ids[2]));
        assert_eq!(list.item_from_point(Point::new(20.0, 455.0)), None);
    }
}
