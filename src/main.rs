use clap::Parser;
use winit::event_loop::EventLoop;

use orbit_viewer::app::App;
use orbit_viewer::cli::Cli;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli.model);
    event_loop.run_app(&mut app)?;

    Ok(())
}
