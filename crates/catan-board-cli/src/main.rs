//! Replays a board scenario and prints the resulting score table.

use anyhow::Context;
use catan_board::{Board, PlayerColor, ResourceHand, Scenario, VictoryPoints};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Scenario path from the first argument, then the environment
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("CATAN_SCENARIO").ok());

    let scenario = match &path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading scenario {}", path))?;
            Scenario::from_json(&text).with_context(|| format!("parsing scenario {}", path))?
        }
        None => Scenario::default(),
    };

    info!(
        scenario = path.as_deref().unwrap_or("default"),
        actions = scenario.actions.len(),
        "Replaying scenario"
    );

    let (board, events) = scenario.run()?;
    for event in &events {
        info!(?event, "Board event");
    }

    println!("{}", serde_json::to_string_pretty(&report(&board))?);
    Ok(())
}

/// Final state of a replayed scenario
#[derive(Debug, Serialize)]
struct Report {
    longest_road: Option<PlayerColor>,
    largest_army: Option<PlayerColor>,
    players: Vec<PlayerReport>,
}

#[derive(Debug, Serialize)]
struct PlayerReport {
    player: PlayerColor,
    total: u32,
    points: VictoryPoints,
    resources: ResourceHand,
    longest_road: u32,
}

fn report(board: &Board) -> Report {
    let players = board
        .scoreboard()
        .into_iter()
        .map(|(color, points)| PlayerReport {
            player: color,
            total: points.total(),
            points,
            resources: board.resource_counts(color).unwrap_or_default(),
            longest_road: board.longest_road(color),
        })
        .collect();

    Report {
        longest_road: board.longest_road_holder(),
        largest_army: board.largest_army_holder(),
        players,
    }
}
