#![windows_subsystem = "windows"]

use anyhow::Result;
use multisig_interface::{config::Config, gui, route::Route};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    // Optional start page: `/multisig/<address>` or a bare address
    let route = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<Route>()?,
        None => Route::Home,
    };

    let config = Config::from_env();
    gui::launch(config, route)?;

    Ok(())
}
