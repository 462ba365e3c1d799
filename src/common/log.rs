use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_tree::HierarchicalLayer;

pub const LOG_ENV: &str = "GROUPTAB_LOG";

/// Installs the global subscriber. `GROUPTAB_LOG` overrides the default level.
pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let tree = HierarchicalLayer::default()
        .with_writer(std::io::stderr)
        .with_indent_lines(true)
        .with_targets(true);
    // A subscriber may already be installed (tests, embedding hosts).
    let _ = tracing_subscriber::registry().with(filter).with(tree).try_init();
}
