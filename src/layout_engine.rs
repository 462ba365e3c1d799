pub mod item;
pub mod systems;

pub use item::{LayoutItem, scaled_size};
use serde::{Deserialize, Serialize};
pub use systems::{GridLayoutSystem, ItemId, LayoutSystem, LayoutSystemKind, ListLayoutSystem};

/// Cell limits and edge margins of one layout strategy, already DPI-scaled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CellParams {
    pub item_max_width: f64,
    pub item_min_width: f64,
    pub item_max_height: f64,
    pub bar_height: f64,
    pub edge_h_margin: f64,
    pub edge_v_margin: f64,
}

impl CellParams {
    pub fn scaled(&self, scale: f64) -> CellParams {
        CellParams {
            item_max_width: self.item_max_width * scale,
            item_min_width: self.item_min_width * scale,
            item_max_height: self.item_max_height * scale,
            bar_height: self.bar_height * scale,
            edge_h_margin: self.edge_h_margin * scale,
            edge_v_margin: self.edge_v_margin * scale,
        }
    }
}

/// Everything a layout system needs to place items.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutMetrics {
    pub cell: CellParams,
    pub item_h_margin: f64,
    pub item_v_margin: f64,
    pub icon_margin: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Step {
    Next,
    Prev,
}
