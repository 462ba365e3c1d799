use super::{ItemId, ItemStore, LayoutSystem};
use crate::layout_engine::item::natural_size;
use crate::layout_engine::{LayoutItem, LayoutMetrics, scaled_size};
use crate::model::window::WindowRef;
use crate::sys::geometry::{Point, Rect, Size};

/// Items `start..end` of the navigation order share one row.
#[derive(Debug, Clone, Copy)]
struct Row {
    start: usize,
    end: usize,
    top: f64,
    height: f64,
}

impl Row {
    fn bottom(&self) -> f64 { self.top + self.height }
}

/// Flowed rows, each horizontally centered against the widest one.
#[derive(Debug, Clone, Default)]
pub struct GridLayoutSystem {
    store: ItemStore,
    rows: Vec<Row>,
    widest: f64,
    content: Rect,
}

impl LayoutSystem for GridLayoutSystem {
    fn reinitialize(&mut self, width_limit: f64, metrics: LayoutMetrics) {
        self.store.reset(width_limit, metrics);
        self.rows.clear();
        self.widest = 0.0;
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
        let index = self.store.order.len();
        let right_limit = self.store.width_limit - cell.edge_h_margin;

        let origin = match (self.rows.last_mut(), self.store.last_rect()) {
            (Some(row), Some(last)) if last.max_x() + metrics.item_h_margin + width <= right_limit => {
                row.end = index + 1;
                row.height = row.height.max(size.height);
                Point::new(last.max_x() + metrics.item_h_margin, row.top)
            }
            (row, _) => {
                let top = row.map_or(cell.edge_v_margin, |row| row.bottom() + metrics.item_v_margin);
                self.rows.push(Row {
                    start: index,
                    end: index + 1,
                    top,
                    height: size.height,
                });
                Point::new(cell.edge_h_margin, top)
            }
        };

        self.widest = self.widest.max(origin.x + width - cell.edge_h_margin);
        self.store.push(window, Rect::new(origin, Size::new(width, size.height)))
    }

    fn align_items(&mut self) {
        let edge_h = self.store.metrics.cell.edge_h_margin;
        for row in &self.rows {
            let (Some(&first), Some(&last)) =
                (self.store.order.get(row.start), self.store.order.get(row.end - 1))
            else {
                continue;
            };
            let left = self.store.rect(first).min_x();
            let span = self.store.rect(last).max_x() - left;
            let dx = edge_h + (self.widest - span) / 2.0 - left;
            for index in row.start..row.end {
                let id = self.store.order[index];
                self.store.translate(id, dx);
            }
        }
        self.content = match self.rows.last() {
            Some(row) => Rect::from_xywh(
                0.0,
                0.0,
                self.widest + edge_h * 2.0,
                row.bottom() + self.store.metrics.cell.edge_v_margin,
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
        let first_row = self.rows.partition_point(|row| row.bottom() <= rect.min_y());
        let mut hits = Vec::new();
        for row in &self.rows[first_row..] {
            if row.top >= rect.max_y() {
                break;
            }
            hits.extend(
                self.store.order[row.start..row.end]
                    .iter()
                    .copied()
                    .filter(|&id| self.store.rect(id).intersects(rect)),
            );
        }
        hits
    }

    fn next_item(&self, id: ItemId) -> Option<ItemId> { self.store.step(id, true) }

    fn prev_item(&self, id: ItemId) -> Option<ItemId> { self.store.step(id, false) }
}
