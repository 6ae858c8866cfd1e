use std::io;

use tracing_subscriber::EnvFilter;

/// Crates whose level follows `-v`/`-q`; everything else stays at `warn`.
const CRATES: &[&str] =
    &["dinoscrape", "dino_config", "dino_extract", "dino_fetch", "dino_icons", "dino_records", "dino_storage"];

/// Log level chosen on the command line.
pub fn level(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

/// Filter directives for [`level`].
pub fn directives(level: &str) -> String {
    let mut directives = String::from("warn");
    for name in CRATES {
        directives.push_str(&format!(",{name}={level}"));
    }
    directives
}

/// Installs the global subscriber, writing to stderr. `RUST_LOG`, when set
/// and valid, takes precedence over the command line.
pub fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(level(verbose, quiet))));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}
