//! Subscriber setup for the driver.
//!
//! `RUST_LOG` selects what is recorded, e.g. `RUST_LOG=pyx_eval=trace`
//! logs every machine step. `--verbose` switches to an indented tree of
//! spans and raises the default filter to `debug`.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tracing_tree::HierarchicalLayer;

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber. Later calls do nothing.
pub fn init(verbose: bool) {
    TRACING_INIT.call_once(|| {
        let default = if verbose { "pyx_eval=debug,pyx_parse=debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

        let tree = verbose.then(|| {
            HierarchicalLayer::new(2)
                .with_targets(true)
                .with_bracketed_fields(true)
        });
        let flat = (!verbose).then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
        });

        tracing_subscriber::registry()
            .with(filter)
            .with(tree)
            .with(flat)
            .init();
    });
}
