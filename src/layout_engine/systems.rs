use enum_dispatch::enum_dispatch;
use slotmap::{SlotMap, new_key_type};

use crate::layout_engine::{LayoutItem, LayoutMetrics};
use crate::model::window::WindowRef;
use crate::sys::geometry::{Point, Rect};

mod grid;
mod list;

pub use grid::GridLayoutSystem;
pub use list::ListLayoutSystem;

new_key_type! {
    /// Handle to an item of the current placement pass.
    pub struct ItemId;
}

/// Placement and spatial queries shared by the grid and list strategies.
///
/// A pass is `reinitialize`, then any number of `add_item`, then `align_items`.
/// Queries on an empty system return nothing rather than failing.
#[enum_dispatch]
pub trait LayoutSystem {
    /// Drops every item (invalidating all outstanding [`ItemId`]s) and starts a new pass.
    fn reinitialize(&mut self, width_limit: f64, metrics: LayoutMetrics);

    fn add_item(&mut self, window: WindowRef) -> ItemId;

    fn align_items(&mut self);

    /// Bounding box of every item plus edge margins, anchored at the origin.
    fn content_rect(&self) -> Rect;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool { self.len() == 0 }

    fn item(&self, id: ItemId) -> Option<&LayoutItem>;

    /// Items in navigation order.
    fn ids(&self) -> &[ItemId];

    fn item_at(&self, index: usize) -> Option<ItemId>;

    /// Items whose cell strictly overlaps `rect`, in navigation order.
    fn intersect_items(&self, rect: &Rect) -> Vec<ItemId>;

    fn item_from_point(&self, point: Point) -> Option<ItemId> {
        self.intersect_items(&Rect::from_xywh(point.x, point.y, 1.0, 1.0))
            .first()
            .copied()
    }

    fn next_item(&self, id: ItemId) -> Option<ItemId>;

    fn prev_item(&self, id: ItemId) -> Option<ItemId>;
}

#[enum_dispatch(LayoutSystem)]
#[derive(Debug, Clone)]
pub enum LayoutSystemKind {
    Grid(GridLayoutSystem),
    List(ListLayoutSystem),
}

/// Item arena plus navigation order, owned by each strategy.
#[derive(Debug, Clone, Default)]
struct ItemStore {
    items: SlotMap<ItemId, LayoutItem>,
    order: Vec<ItemId>,
    width_limit: f64,
    metrics: LayoutMetrics,
}

impl ItemStore {
    fn reset(&mut self, width_limit: f64, metrics: LayoutMetrics) {
        // Clearing bumps slot versions, so old handles never alias new items.
        self.items.clear();
        self.order.clear();
        self.width_limit = width_limit;
        self.metrics = metrics;
    }

    fn push(&mut self, window: WindowRef, rect: Rect) -> ItemId {
        let item = LayoutItem::new(
            window,
            self.order.len(),
            rect,
            self.metrics.cell.bar_height,
            self.metrics.icon_margin,
        );
        let id = self.items.insert(item);
        self.order.push(id);
        id
    }

    fn get(&self, id: ItemId) -> Option<&LayoutItem> { self.items.get(id) }

    fn rect(&self, id: ItemId) -> Rect { self.items.get(id).map(LayoutItem::rect).unwrap_or_default() }

    fn last_rect(&self) -> Option<Rect> { self.order.last().map(|&id| self.rect(id)) }

    fn translate(&mut self, id: ItemId, dx: f64) {
        if let Some(item) = self.items.get_mut(id) {
            let origin = item.rect().origin;
            item.set_position(Point::new(origin.x + dx, origin.y));
        }
    }

    fn item_at(&self, index: usize) -> Option<ItemId> { self.order.get(index).copied() }

    fn step(&self, id: ItemId, forward: bool) -> Option<ItemId> {
        let index = self.items.get(id)?.index();
        let len = self.order.len();
        let next = if forward { (index + 1) % len } else { (index + len - 1) % len };
        self.item_at(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::UiParams;
    use crate::ui::testing::FakeWindow;

    fn filled(mut system: LayoutSystemKind, widths: &[f64]) -> LayoutSystemKind {
        let ui = UiParams::default();
        let metrics = match system {
            LayoutSystemKind::Grid(_) => ui.grid_metrics(),
            LayoutSystemKind::List(_) => ui.list_metrics(),
        };
        system.reinitialize(800.0, metrics);
        for (i, &w) in widths.iter().enumerate() {
            system.add_item(FakeWindow::new(&format!("w{i}"), "app", w, 900.0).build());
        }
        system.align_items();
        system
    }

    fn both(widths: &[f64]) -> [LayoutSystemKind; 2] {
        [
            filled(GridLayoutSystem::default().into(), widths),
            filled(ListLayoutSystem::default().into(), widths),
        ]
    }

    #[test]
    fn empty_systems_answer_nothing() {
        for system in both(&[]) {
            assert!(system.is_empty());
            assert_eq!(system.content_rect(), Rect::ZERO);
            assert_eq!(system.item_at(0), None);
            assert_eq!(system.item_from_point(Point::new(40.0, 40.0)), None);
            assert!(system.intersect_items(&Rect::from_xywh(0.0, 0.0, 1e6, 1e6)).is_empty());
        }
    }

    #[test]
    fn navigation_round_trips() {
        for system in both(&[1600.0, 400.0, 1200.0, 2000.0, 900.0, 1600.0, 300.0]) {
            let n = system.len();
            for &start in system.ids() {
                let mut fwd = start;
                let mut back = start;
                for _ in 0..n {
                    fwd = system.next_item(fwd).unwrap();
                    back = system.prev_item(back).unwrap();
                }
                assert_eq!(fwd, start);
                assert_eq!(back, start);
                let there = system.next_item(start).unwrap();
                assert_ne!(there, start);
                assert_eq!(system.prev_item(there), Some(start));
            }
        }
    }

    #[test]
    fn single_item_navigates_to_itself() {
        for system in both(&[1600.0]) {
            let only = system.item_at(0).unwrap();
            assert_eq!(system.next_item(only), Some(only));
            assert_eq!(system.prev_item(only), Some(only));
        }
    }

    #[test]
    fn stale_handles_resolve_to_nothing() {
        let mut system = filled(GridLayoutSystem::default().into(), &[1600.0, 1600.0]);
        let first = system.item_at(0).unwrap();
        let old = system.item_at(1).unwrap();
        system.reinitialize(800.0, UiParams::default().grid_metrics());
        let fresh = system.add_item(FakeWindow::new("fresh", "app", 1600.0, 900.0).build());
        system.align_items();
        assert_ne!(fresh, first);
        assert!(system.item(first).is_none());
        assert!(system.item(old).is_none());
        assert_eq!(system.next_item(old), None);
        assert_eq!(system.item_at(1), None);
    }

    #[test]
    fn point_queries_hit_the_cell_under_the_point() {
        for system in both(&[1600.0, 1600.0, 1600.0]) {
            for &id in system.ids() {
                let rect = system.item(id).unwrap().rect();
                let center = Point::new(rect.min_x() + rect.width() / 2.0, rect.min_y() + 1.0);
                assert_eq!(system.item_from_point(center), Some(id));
            }
            assert_eq!(system.item_from_point(Point::new(1.0, 1.0)), None);
        }
    }
}
