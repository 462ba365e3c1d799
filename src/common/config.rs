use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use crate::layout_engine::{CellParams, LayoutMetrics};
use crate::sys::geometry::Rect;
use crate::sys::surface::{Color, FontSpec};

pub fn config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("grouptab").join("grouptab.toml"))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub settings: Settings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ui: UiSettings,
    pub window_filter: WindowFilterSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub item_h_margin: f64,
    pub item_v_margin: f64,
    pub icon_margin: f64,
    pub grid: GridSettings,
    pub list: ListSettings,
    pub select_frame_margin: f64,
    pub select_frame_width: f64,
    pub colors: ColorSettings,
    pub font: FontSettings,
    /// Opacity of the overlay background, clamped to `[0.01, 1.0]`.
    pub background_alpha: f64,
    pub scroll_pixels_per_notch: f64,
    pub group_window_width_ratio: f64,
    pub group_window_height_ratio: f64,
    pub shadow_offset: f64,
    pub shadow_inset: f64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            item_h_margin: 30.0,
            item_v_margin: 30.0,
            icon_margin: 5.0,
            grid: GridSettings::default(),
            list: ListSettings::default(),
            select_frame_margin: 10.0,
            select_frame_width: 5.0,
            colors: ColorSettings::default(),
            font: FontSettings::default(),
            background_alpha: 0.8,
            scroll_pixels_per_notch: 40.0,
            group_window_width_ratio: 0.8,
            group_window_height_ratio: 0.8,
            shadow_offset: 10.0,
            shadow_inset: 7.0,
        }
    }
}

macro_rules! cell_settings {
    ($name:ident, $max_w:expr, $min_w:expr, $max_h:expr, $bar:expr) => {
        #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            pub item_max_width: f64,
            pub item_min_width: f64,
            pub item_max_height: f64,
            pub bar_height: f64,
            pub edge_h_margin: f64,
            pub edge_v_margin: f64,
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    item_max_width: $max_w,
                    item_min_width: $min_w,
                    item_max_height: $max_h,
                    bar_height: $bar,
                    edge_h_margin: 30.0,
                    edge_v_margin: 30.0,
                }
            }
        }

        impl $name {
            pub fn cell(&self) -> CellParams {
                CellParams {
                    item_max_width: self.item_max_width,
                    item_min_width: self.item_min_width,
                    item_max_height: self.item_max_height,
                    bar_height: self.bar_height,
                    edge_h_margin: self.edge_h_margin,
                    edge_v_margin: self.edge_v_margin,
                }
            }
        }
    };
}

cell_settings!(GridSettings, 240.0, 60.0, 120.0, 30.0);
cell_settings!(ListSettings, 360.0, 90.0, 180.0, 45.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    pub background: Color,
    pub item: Color,
    pub shadow: Color,
    pub select_frame: Color,
    pub title: Color,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            background: Color(0xFF80_8080),
            item: Color(0xFF27_2727),
            shadow: Color(0xFF40_4040),
            select_frame: Color(0xFF00_63B1),
            title: Color::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontSettings {
    pub family: String,
    pub size: f64,
}

impl Default for FontSettings {
    fn default() -> Self {
        Self {
            family: "Segoe UI".to_string(),
            size: 8.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowFilterSettings {
    pub ignore_minimized: bool,
}

impl Config {
    pub fn default_path() -> anyhow::Result<PathBuf> {
        config_file().context("could not determine the user config directory")
    }

    /// Reads the config at `path`. A missing file yields the defaults.
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Config::parse(&buf).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn parse(buf: &str) -> anyhow::Result<Config> {
        let mut config: Config = toml::from_str(buf)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }

    fn validate(&mut self) -> anyhow::Result<()> {
        let ui = &mut self.settings.ui;
        ui.background_alpha = ui.background_alpha.clamp(0.01, 1.0);
        for (name, cell) in [("grid", ui.grid.cell()), ("list", ui.list.cell())] {
            if cell.item_max_width <= 0.0 || cell.item_max_height <= cell.bar_height {
                bail!("{name}: item_max_width must be positive and item_max_height must exceed bar_height");
            }
            if cell.item_min_width > cell.item_max_width {
                bail!("{name}: item_min_width exceeds item_max_width");
            }
        }
        if ui.scroll_pixels_per_notch <= 0.0 {
            bail!("scroll_pixels_per_notch must be positive");
        }
        Ok(())
    }
}

/// [`UiSettings`] resolved for one monitor scale. Every length is in scaled pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct UiParams {
    pub scale: f64,
    pub grid: CellParams,
    pub list: CellParams,
    pub item_h_margin: f64,
    pub item_v_margin: f64,
    pub icon_margin: f64,
    pub select_frame_margin: f64,
    pub select_frame_width: f64,
    pub background_color: Color,
    pub item_color: Color,
    pub shadow_color: Color,
    pub select_frame_color: Color,
    pub title_color: Color,
    pub font: FontSpec,
    pub background_alpha: f64,
    pub scroll_pixels_per_notch: f64,
    pub group_window_width_ratio: f64,
    pub group_window_height_ratio: f64,
    pub shadow_offset: f64,
    pub shadow_inset: f64,
}

impl UiParams {
    pub fn new(ui: &UiSettings, scale: f64) -> UiParams {
        UiParams {
            scale,
            grid: ui.grid.cell().scaled(scale),
            list: ui.list.cell().scaled(scale),
            item_h_margin: ui.item_h_margin * scale,
            item_v_margin: ui.item_v_margin * scale,
            icon_margin: ui.icon_margin * scale,
            select_frame_margin: ui.select_frame_margin * scale,
            select_frame_width: ui.select_frame_width * scale,
            background_color: ui.colors.background,
            item_color: ui.colors.item,
            shadow_color: ui.colors.shadow,
            select_frame_color: ui.colors.select_frame,
            title_color: ui.colors.title,
            font: FontSpec {
                family: ui.font.family.clone(),
                size: ui.font.size * scale,
            },
            background_alpha: ui.background_alpha.clamp(0.01, 1.0),
            scroll_pixels_per_notch: ui.scroll_pixels_per_notch * scale,
            group_window_width_ratio: ui.group_window_width_ratio,
            group_window_height_ratio: ui.group_window_height_ratio,
            shadow_offset: ui.shadow_offset * scale,
            shadow_inset: ui.shadow_inset * scale,
        }
    }

    pub fn grid_metrics(&self) -> LayoutMetrics { self.metrics(self.grid) }

    pub fn list_metrics(&self) -> LayoutMetrics { self.metrics(self.list) }

    fn metrics(&self, cell: CellParams) -> LayoutMetrics {
        LayoutMetrics {
            cell,
            item_h_margin: self.item_h_margin,
            item_v_margin: self.item_v_margin,
            icon_margin: self.icon_margin,
        }
    }

    /// Inflation around an item rect that covers its selection frame stroke.
    pub fn selection_margin(&self) -> f64 {
        self.select_frame_margin + self.select_frame_width / 2.0 + 1.0
    }

    pub fn list_window_width(&self) -> f64 { self.item_h_margin * 2.0 + self.list.item_max_width }

    /// Area the group window may occupy: the work area left of the list column,
    /// shrunk by the window ratios and centered.
    pub fn group_window_limit(&self, work_area: Rect) -> Rect {
        let avail_w = (work_area.width() - self.list_window_width()).max(0.0);
        let min_w = self.grid.item_max_width + self.grid.edge_h_margin * 2.0;
        let min_h = self.grid.item_max_height + self.grid.edge_v_margin * 2.0;
        let w = (avail_w * self.group_window_width_ratio).max(min_w);
        let h = (work_area.height() * self.group_window_height_ratio).max(min_h);
        Rect::from_xywh(
            work_area.min_x() + (avail_w - w) / 2.0,
            work_area.min_y() + (work_area.height() - h) / 2.0,
            w,
            h,
        )
    }

    pub fn list_window_limit(&self, work_area: Rect) -> Rect {
        let w = self.list_window_width();
        Rect::from_xywh(work_area.max_x() - w, work_area.min_y(), w, work_area.height())
    }
}

impl Default for UiParams {
    fn default() -> Self { UiParams::new(&UiSettings::default(), 1.0) }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::read(&dir.path().join("grouptab.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_tables_keep_per_strategy_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grouptab.toml");
        std::fs::write(
            &path,
            r#"
            [settings.ui]
            background_alpha = 0.0
            [settings.ui.list]
            item_min_width = 120.0
            [settings.window_filter]
            ignore_minimized = true
            "#,
        )
        .unwrap();
        let config = Config::read(&path).unwrap();
        let ui = &config.settings.ui;
        assert_eq!(ui.background_alpha, 0.01);
        assert_eq!(ui.list.item_min_width, 120.0);
        assert_eq!(ui.list.item_max_width, 360.0);
        assert_eq!(ui.grid, GridSettings::default());
        assert!(config.settings.window_filter.ignore_minimized);
    }

    #[test]
    fn invalid_toml_is_an_error() {
        assert!(Config::parse("settings = 3").is_err());
        assert!(Config::parse("[settings.ui.grid]\nitem_max_height = 10.0").is_err());
    }

    #[test]
    fn toml_round_trips_defaults() {
        let text = Config::default().to_toml().unwrap();
        assert_eq!(Config::parse(&text).unwrap(), Config::default());
    }

    #[test]
    fn params_scale_lengths_but_not_colors() {
        let params = UiParams::new(&UiSettings::default(), 2.0);
        assert_eq!(params.grid.item_max_width, 480.0);
        assert_eq!(params.list.bar_height, 90.0);
        assert_eq!(params.scroll_pixels_per_notch, 80.0);
        assert_eq!(params.item_color, Color(0xFF27_2727));
        assert_eq!(params.selection_margin(), 20.0 + 5.0 + 1.0);
    }

    #[test]
    fn window_limits_split_the_work_area() {
        let params = UiParams::default();
        let work = Rect::from_xywh(0.0, 0.0, 1920.0, 1080.0);
        let list = params.list_window_limit(work);
        assert_eq!(list, Rect::from_xywh(1500.0, 0.0, 420.0, 1080.0));
        let group = params.group_window_limit(work);
        assert_eq!(group.width(), 1500.0 * 0.8);
        assert_eq!(group.min_x(), 150.0);
        assert_eq!(group.height(), 1080.0 * 0.8);
        assert!(!group.intersects(&list));
    }
}
