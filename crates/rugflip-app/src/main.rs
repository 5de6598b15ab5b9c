use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use rugflip_app::config::AppConfig;
use rugflip_app::console::{self, ConsoleInput, HELP};
use rugflip_app::state::AppState;

fn main() -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        save_dir = %config.save_dir.display(),
        seed = config.seed,
        poll_ms = config.poll_interval.as_millis() as u64,
        "Starting RUGFLIP"
    );

    let app = AppState::launch(config)?;
    println!("{HELP}");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match console::parse_line(&line) {
            Ok(ConsoleInput::Command(command)) => app.send(command)?,
            Ok(ConsoleInput::Status) => match app.snapshot() {
                Some(snapshot) => print!("{}", console::render_status(&snapshot)),
                None => println!("Game loop is still starting"),
            },
            Ok(ConsoleInput::Json) => match app.snapshot() {
                Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
                None => println!("Game loop is still starting"),
            },
            Ok(ConsoleInput::Help) => println!("{HELP}"),
            Ok(ConsoleInput::Quit) => break,
            Err(err) => println!("{err}"),
        }
        stdout.flush()?;
    }

    let final_state = app.shutdown()?;
    tracing::info!(market_cap = final_state.market_cap, "Goodbye");
    Ok(())
}
