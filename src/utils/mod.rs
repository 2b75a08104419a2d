pub mod build_info;
pub mod paths;
pub mod time;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Installs the global fmt subscriber, honouring `RUST_LOG` on top of `fee_ledger=info`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "fee_ledger=info".parse() {
            filter = filter.add_directive(directive);
        }

        // A subscriber installed by the host application wins.
        let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
    });
}
