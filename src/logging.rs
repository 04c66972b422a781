use crate::error::Result;
use std::fs::OpenOptions;
use std::path::Path;

pub const LOG_FILE: &str = "lostfound.log";

/// Routes `log` output to a file in `dir`; the terminal belongs to the UI.
/// `RUST_LOG` wins over `default_level`.
pub fn init_file_logger(dir: &Path, default_level: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    let env = env_logger::Env::default().default_filter_or(default_level.to_string());
    // A second init (tests, restarts) keeps the first logger.
    let _ = env_logger::Builder::from_env(env)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
    Ok(())
}
