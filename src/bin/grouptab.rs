use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use grouptab::actor::{self, switcher::{Event, SwitcherActor, Target}};
use grouptab::common::config::{Config, UiParams};
use grouptab::common::log;
use grouptab::layout_engine::{LayoutSystem, Step};
use grouptab::model::snapshot::Snapshot;
use grouptab::model::{MonitorId, SwitcherContext};
use grouptab::sys::geometry::{Point, Rect, Size};
use grouptab::sys::headless::{HeadlessPaint, HeadlessSurface};
use grouptab::sys::surface::{HostSurface, SurfaceId};
use grouptab::ui::ThumbnailView;
use serde::Serialize;
use tracing::debug;

const GROUP_SURFACE: SurfaceId = SurfaceId::new(1);
const LIST_SURFACE: SurfaceId = SurfaceId::new(2);

#[derive(Parser)]
#[command(version, about = "Lay out the group switcher for a window snapshot")]
struct Cli {
    #[arg(short, long)]
    verbose: bool,

    /// Config file (defaults to the user config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the switcher headlessly and print the resulting layout as JSON.
    Layout {
        /// JSON file with a `windows` array.
        #[arg(long)]
        windows: PathBuf,
        /// Work area of `--monitor` when the snapshot lists no monitors.
        #[arg(long, default_value = "1920x1080", value_parser = parse_size)]
        work_area: Size,
        #[arg(long, default_value_t = 1.0)]
        scale: f64,
        #[arg(long, default_value_t = 0)]
        monitor: u32,
        /// Number of times to advance the group selection after opening.
        #[arg(long, default_value_t = 0)]
        steps: usize,
    },
    /// Print the effective configuration.
    Config,
}

fn parse_size(s: &str) -> Result<Size, String> {
    let (w, h) = s.split_once('x').ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w: f64 = w.trim().parse().map_err(|e| format!("width: {e}"))?;
    let h: f64 = h.trim().parse().map_err(|e| format!("height: {e}"))?;
    if w <= 0.0 || h <= 0.0 {
        return Err("work area must be positive".into());
    }
    Ok(Size::new(w, h))
}

#[derive(Serialize)]
struct Report {
    group: ViewReport,
    list: ViewReport,
    previews: Vec<PreviewReport>,
}

#[derive(Serialize)]
struct ViewReport {
    visible: bool,
    frame: Rect,
    viewport: Rect,
    content: Rect,
    selected: Option<String>,
    items: Vec<ItemReport>,
}

#[derive(Serialize)]
struct ItemReport {
    title: String,
    group: String,
    rect: Rect,
    thumbnail: Rect,
}

#[derive(Serialize)]
struct PreviewReport {
    title: String,
    surface: u64,
    dest: Rect,
}

fn view_report<H: HostSurface>(view: &ThumbnailView<H>) -> ViewReport {
    let items = view
        .layout()
        .map(|layout| {
            layout
                .ids()
                .iter()
                .filter_map(|&id| layout.item(id))
                .map(|item| ItemReport {
                    title: item.window().title().to_string(),
                    group: item.window().group_key().to_string(),
                    rect: item.rect(),
                    thumbnail: item.thumbnail_rect(),
                })
                .collect()
        })
        .unwrap_or_default();
    ViewReport {
        visible: view.is_visible(),
        frame: view.frame(),
        viewport: view.viewport(),
        content: view.content_rect(),
        selected: view.selected_window().map(|w| w.title().to_string()),
        items,
    }
}

fn layout(
    config: &Config,
    snapshot: &Snapshot,
    work_area: Size,
    scale: f64,
    monitor: u32,
    steps: usize,
) -> Report {
    let ctx = SwitcherContext::new(
        MonitorId::new(monitor),
        Rect::new(Point::default(), work_area),
        snapshot.groups(config.settings.window_filter.ignore_minimized),
        UiParams::new(&config.settings.ui, scale),
    );
    let ctx = match snapshot.monitors() {
        [] => ctx,
        monitors => ctx.with_monitors(monitors.iter().copied()),
    };
    debug!(groups = ctx.groups.len(), "snapshot loaded");
    let (_tx, rx) = actor::channel();
    let mut switcher = SwitcherActor::new(
        ctx,
        HeadlessSurface::new(GROUP_SURFACE),
        HeadlessSurface::new(LIST_SURFACE),
        rx,
    );
    switcher.handle_event(Event::KeepShowing);
    for _ in 0..steps {
        switcher.handle_event(Event::SwitchGroup(Step::Next));
    }
    switcher.paint(Target::Group, &mut HeadlessPaint::default());
    switcher.paint(Target::List, &mut HeadlessPaint::default());

    let previews = snapshot
        .windows()
        .iter()
        .flat_map(|window| {
            window.previews().into_iter().map(|(surface, dest)| PreviewReport {
                title: window.data().title.clone(),
                surface: surface.get(),
                dest,
            })
        })
        .collect();
    Report {
        group: view_report(switcher.group_view().view()),
        list: view_report(switcher.list_view().view()),
        previews,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    log::init(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::read(&config_path)?;

    match cli.command {
        Command::Config => print!("{}", config.to_toml()?),
        Command::Layout { windows, work_area, scale, monitor, steps } => {
            let snapshot = Snapshot::read(&windows)?;
            let report = layout(&config, &snapshot, work_area, scale, monitor, steps);
            let json = serde_json::to_string_pretty(&report).context("serializing layout report")?;
            println!("{json}");
        }
    }
    Ok(())
}
