//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter without module
//! targets. `RUST_LOG` wins over the configured level when set.
//!
//! ## What Gets Traced
//!
//! - **Lifecycle**: store actor start/shutdown with entity counts, snapshot load/save
//! - **Sessions**: `Thread started` / `Thread ended`, busy rejections, cancellations
//! - **Forms**: every rejected field, with the offending value
//! - **Store mutations**: item/user/transaction changes with ids
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle only
//! RUST_LOG=info cargo run
//!
//! # Include request payloads and form traffic
//! RUST_LOG=debug cargo run
//!
//! # Log to a file instead of stderr
//! HARDWARE_STORE_LOG_FILE=store.log cargo run
//! ```
//!
//! A session at `info` looks like:
//!
//! ```text
//! INFO Thread started workflow="create transaction" session=3
//! INFO User chose create transaction workflow="create transaction"
//! WARN Validation failed: Please enter a positive integer quantity less than or equal to the remaining stock. title=New Transaction field="Quantity" value=11
//! INFO Transaction committed item=A1B2C quantity=3 size=1
//! INFO Thread ended workflow="create transaction" session=3
//! ```

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

pub fn setup_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact();

    let mut open_failure = None;
    let file = config.log_file.as_ref().and_then(|path| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| open_failure = Some((path.clone(), e)))
            .ok()
    });

    // Already installed (e.g. by a test harness) is fine.
    let _ = match file {
        Some(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    if let Some((path, error)) = open_failure {
        warn!(path = %path.display(), %error, "Could not open log file, logging to stderr");
    }
}
