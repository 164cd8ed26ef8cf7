use anyhow::Result;
use clap::Parser;
use winit::event_loop::EventLoop;

use glyphgrid::cli::CliArgs;
use glyphgrid::config::AppConfig;
use glyphgrid::runtime::App;
use glyphgrid::theme::Theme;

fn main() -> Result<()> {
    // Keep the guard alive so buffered log lines flush on exit
    let _log_guard = glyphgrid::tracing::init();

    let args = CliArgs::parse();
    let config = AppConfig::load();
    let theme = Theme::load();
    let startup = args.into_startup(&config);
    tracing::info!(?startup, "Starting glyphgrid");

    let event_loop = EventLoop::new()?;
    let mut app = App::new(startup, config, theme);
    event_loop.run_app(&mut app)?;
    Ok(())
}
