use std::env;
use std::sync::Arc;

use dotenvy::dotenv;

use tracedesk::DEFAULT_DIRECTORY_URL;
use tracedesk::directory::HttpDirectory;
use tracedesk::tui;

fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let directory_url = env::var("DIRECTORY_URL").unwrap_or(DEFAULT_DIRECTORY_URL.to_string());

    let directory = match HttpDirectory::new(&directory_url) {
        Ok(directory) => Arc::new(directory),
        Err(e) => {
            log::error!("Failed to build the directory client: {e}");
            std::process::exit(1);
        }
    };

    // Logged before the terminal enters raw mode; later log lines go to
    // stderr and are best captured with `2>tracedesk.log`.
    log::info!("Using product directory at {directory_url}");

    tui::run(directory)
}
