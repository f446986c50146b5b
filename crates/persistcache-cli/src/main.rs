//! persistcache - inspect and edit a persistcache snapshot file from the
//! command line.

mod args;
mod commands;
mod format;
mod logging;
mod settings;

use std::io;

use anyhow::Result;
use persistcache_core::CacheManager;
use tracing::{debug, info};

use args::{parse_args, Command, USAGE};
use settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = logging::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    if invocation.command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let settings = Settings::resolve(invocation.file)?;
    info!(path = %settings.cache_file.display(), "Opening cache");

    let cache = CacheManager::new(settings.cache_config());
    let result = commands::run(&cache, &invocation.command, &mut io::stdout().lock());

    if invocation.command.is_mutating() {
        debug!("Flushing changes");
    }
    cache.close().await;

    result
}
