#![doc(test(attr(deny(warnings))))]

//! Fee Ledger tracks per-person fee lists: who has paid, what came in and
//! went out, and the totals that follow. The ledger persists as one JSON
//! document locally and can be mirrored to a remote store.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod export;
pub mod storage;
pub mod sync;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!(
            build = %utils::build_info::current().summary(),
            "Fee Ledger tracing initialized."
        );
    });
}
