//! Replay driver
//!
//! Loads a fight fixture (one JSON fight object or an array of them),
//! replays it against the selected era's rules, and prints either the
//! augmented events as JSON lines or the final threat standings.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;

use aggro_core::{
    ActorKey, AugmentedEvent, Fight, GameVersion, ReplayError, ThreatStandings, config_for,
    replay_fights,
};

#[derive(Parser)]
#[command(version, about = "Replay combat-log fights and compute threat")]
struct Cli {
    /// Fight fixture file (JSON)
    path: PathBuf,

    /// Rule era: classic or tbc
    #[arg(short = 'g', long, default_value = "classic")]
    game_version: String,

    /// Print final standings per enemy instead of augmented events
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let version: GameVersion = cli.game_version.parse().map_err(|e| format!("{e}"))?;
    let fights = load_fights(&cli.path)?;
    let config = config_for(version);
    let results = replay_fights(config, &fights);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for (fight, events) in fights.iter().zip(&results) {
        if cli.summary {
            print_summary(&mut out, fight, events).map_err(|e| e.to_string())?;
        } else {
            for event in events {
                let line = serde_json::to_string(event).map_err(|e| e.to_string())?;
                writeln!(out, "{line}").map_err(|e| e.to_string())?;
            }
        }
    }
    Ok(())
}

fn load_fights(path: &Path) -> Result<Vec<Fight>, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let fights = match serde_json::from_str::<Vec<Fight>>(&text) {
        Ok(fights) => fights,
        Err(_) => serde_json::from_str::<Fight>(&text)
            .map(|f| vec![f])
            .map_err(|e| format!("invalid fight fixture {}: {e}", path.display()))?,
    };
    for fight in &fights {
        if fight.events.is_empty() {
            return Err(format!("fight {} ({}): {}", fight.id, fight.name, ReplayError::EmptyFight));
        }
    }
    Ok(fights)
}

fn print_summary(
    out: &mut impl Write,
    fight: &Fight,
    events: &[AugmentedEvent],
) -> std::io::Result<()> {
    let standings = ThreatStandings::from_events(events);
    writeln!(out, "== fight {} ({}) ==", fight.id, fight.name)?;
    for enemy in standings.enemies() {
        writeln!(out, "{}", enemy_label(fight, enemy))?;
        for (actor, threat) in standings.standings_for(enemy) {
            writeln!(out, "  {:<24} {:>12.1}", actor_label(fight, actor), threat)?;
        }
    }
    Ok(())
}

fn enemy_label(fight: &Fight, enemy: ActorKey) -> String {
    let name = fight
        .enemies
        .iter()
        .find(|e| e.id == enemy.id && e.instance == enemy.instance)
        .map(|e| e.name.as_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("unknown enemy");
    if enemy.instance != 0 {
        format!("{name} ({}#{})", enemy.id, enemy.instance)
    } else {
        format!("{name} ({})", enemy.id)
    }
}

fn actor_label(fight: &Fight, actor: ActorKey) -> String {
    let name = fight
        .friendlies
        .iter()
        .find(|a| a.id == actor.id)
        .map(|a| a.name.as_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("unknown");
    if actor.instance != 0 {
        format!("{name}#{}", actor.instance)
    } else {
        name.to_string()
    }
}
