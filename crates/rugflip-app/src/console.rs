//! Line-based console: parses player input and renders the status panel.

use std::fmt::Write as _;

use thiserror::Error;

use rugflip_core::commands::PlayerCommand;
use rugflip_core::constants::UPGRADE_CATALOG;
use rugflip_core::enums::GamePhase;
use rugflip_core::format::format_amount;
use rugflip_core::state::GameStateSnapshot;
use rugflip_core::types::ObstacleId;

pub const HELP: &str = "\
Commands:
  start            begin playing
  click | c        tap the main button
  buy <id|1-4>     buy one level of an upgrade
  hit <id>         dismiss an obstacle before it lands
  info             show or hide the instructions
  status | s       print the current state
  json             print the current state as JSON
  reset            wipe all progress
  help | ?         show this help
  quit | q         save and exit";

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleInput {
    Command(PlayerCommand),
    Status,
    Json,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("empty input")]
    Empty,
    #[error("unknown command `{0}` (type `help`)")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("`{0}` is not an obstacle id")]
    BadObstacleId(String),
    #[error("no upgrade in slot {0}")]
    BadUpgradeSlot(usize),
}

/// Parse a console line into an input.
pub fn parse_line(line: &str) -> Result<ConsoleInput, InputError> {
    let mut words = line.split_whitespace();
    let verb = words.next().ok_or(InputError::Empty)?.to_ascii_lowercase();
    let arg = words.next();

    let command = match verb.as_str() {
        "start" => PlayerCommand::StartGame,
        "click" | "c" => PlayerCommand::ClickMain,
        "reset" => PlayerCommand::ResetGame,
        "info" | "instructions" => PlayerCommand::ToggleInstructions,
        "buy" | "b" => {
            let arg = arg.ok_or(InputError::MissingArgument("buy"))?;
            PlayerCommand::BuyUpgrade {
                upgrade_id: resolve_upgrade(arg)?,
            }
        }
        "hit" | "h" => {
            let arg = arg.ok_or(InputError::MissingArgument("hit"))?;
            let obstacle_id = arg
                .trim_start_matches('#')
                .parse::<ObstacleId>()
                .map_err(|_| InputError::BadObstacleId(arg.to_string()))?;
            PlayerCommand::ClickObstacle { obstacle_id }
        }
        "status" | "s" => return Ok(ConsoleInput::Status),
        "json" => return Ok(ConsoleInput::Json),
        "help" | "?" => return Ok(ConsoleInput::Help),
        "quit" | "exit" | "q" => return Ok(ConsoleInput::Quit),
        _ => return Err(InputError::Unknown(verb)),
    };

    Ok(ConsoleInput::Command(command))
}

/// Slot numbers follow the shop order; anything else passes through as an id.
fn resolve_upgrade(arg: &str) -> Result<String, InputError> {
    match arg.parse::<usize>() {
        Ok(slot) => UPGRADE_CATALOG
            .get(slot.wrapping_sub(1))
            .map(|def| def.id.to_string())
            .ok_or(InputError::BadUpgradeSlot(slot)),
        Err(_) => Ok(arg.to_ascii_lowercase()),
    }
}

/// Render the status panel for a snapshot.
pub fn render_status(snapshot: &GameStateSnapshot) -> String {
    let mut out = String::new();

    let headline = match snapshot.phase {
        GamePhase::NotStarted => "Not started (type `start`)",
        GamePhase::Playing => "Playing",
        GamePhase::Won => "YOU WIN! Type `reset` to play again",
        GamePhase::Lost => "RUGGED. Type `reset` to play again",
    };
    let _ = writeln!(out, "== RUGFLIP == {headline}");
    let _ = writeln!(
        out,
        "Market cap ${} / ${} ({:.2}%)",
        format_amount(snapshot.market_cap),
        format_amount(snapshot.target_market_cap),
        snapshot.progress_percent
    );
    let _ = writeln!(
        out,
        "Clicks {}  |  ${} per click  |  ${}/sec",
        snapshot.click_count,
        format_amount(snapshot.click_value),
        format_amount(snapshot.passive_income_per_sec)
    );

    let _ = writeln!(out, "Upgrades:");
    for (slot, upgrade) in snapshot.upgrades.iter().enumerate() {
        let cost = upgrade
            .cost
            .map_or_else(|| "--".to_string(), |c| format!("${}", format_amount(c)));
        let marker = if upgrade.affordable { "*" } else { " " };
        let _ = writeln!(
            out,
            " {marker}{}. {:<16} lvl {:<3} next {:<10} +${}/sec each",
            slot + 1,
            upgrade.name,
            upgrade.level,
            cost,
            format_amount(upgrade.income_per_level)
        );
    }

    if !snapshot.obstacles.is_empty() {
        let _ = writeln!(out, "Obstacles:");
        for obstacle in &snapshot.obstacles {
            let _ = writeln!(
                out,
                "  #{} {:?} -{}% in {:.1}s",
                obstacle.id,
                obstacle.kind,
                obstacle.damage_percent,
                obstacle.remaining_ms as f64 / 1000.0
            );
        }
    }

    if snapshot.show_instructions {
        let _ = writeln!(
            out,
            "Click to pump the market cap to ${}. Buy upgrades for passive income. \
             Hit obstacles before they expire or lose a share of your market cap.",
            format_amount(snapshot.target_market_cap)
        );
    }

    out
}
