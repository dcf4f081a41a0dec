use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info};
use snaaake::config::SessionConfig;
use snaaake::input::{Command, InputHandler};
use snaaake::renderer;
use snaaake::session::Session;
use snaaake::terminal_runtime::{install_panic_hook, TerminalGuard};

/// Frame pacing for input polling and timer updates.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(version, about = "Grid snake in the terminal")]
struct Cli {
    /// Config file to read instead of the per-user default.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Grid height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Apples kept on the board.
    #[arg(long)]
    apples: Option<usize>,

    /// Milliseconds per simulation tick.
    #[arg(long = "step-ms")]
    step_ms: Option<u64>,

    /// Most ticks a late frame may fire; 0 removes the cap.
    #[arg(long = "max-catch-up")]
    max_catch_up: Option<u32>,

    /// Seed for apple placement.
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn apply_to(&self, config: &mut SessionConfig) {
        if let Some(width) = self.width {
            config.grid.width = width;
        }
        if let Some(height) = self.height {
            config.grid.height = height;
        }
        if let Some(apples) = self.apples {
            config.apples = apples;
        }
        if let Some(step_ms) = self.step_ms {
            config.step_ms = step_ms;
        }
        if let Some(max_catch_up) = self.max_catch_up {
            config.max_ticks_per_frame = max_catch_up;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => SessionConfig::load_from_path(path),
        None => SessionConfig::load(),
    };
    let mut config = loaded.map_err(|error| {
        error!("{error}");
        io::Error::new(io::ErrorKind::InvalidInput, error)
    })?;
    cli.apply_to(&mut config);

    // Validation happens before raw mode so errors print normally.
    let session = Session::new(&config)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;

    install_panic_hook();
    run(session)
}

fn run(mut session: Session) -> io::Result<()> {
    let mut guard = TerminalGuard::enter()?;
    let mut input = InputHandler;
    let started = Instant::now();
    let mut resized = false;

    loop {
        if session.take_dirty() || std::mem::take(&mut resized) {
            let status = session.status();
            guard
                .terminal_mut()
                .draw(|frame| renderer::render(frame, session.context(), status))?;
        }

        match input.poll_input(FRAME_INTERVAL)? {
            Some(Command::Quit) => break,
            Some(Command::Redraw) => resized = true,
            Some(Command::Send(event)) => {
                session.send(event);
            }
            None => {}
        }

        let now_ms = started.elapsed().as_secs_f64() * 1000.0;
        session.frame(now_ms);
    }

    info!("quit with status {}", session.status());
    Ok(())
}
