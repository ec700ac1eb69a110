use anyhow::Context;
use chaos_game::{run, Config};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::default();
    log::info!(
        "starting {} ({}x{}, cap {} points)",
        config.title,
        config.window_width,
        config.window_height,
        config.max_points
    );

    // blocks until the window is closed
    run(config).context("chaos game could not start")
}
