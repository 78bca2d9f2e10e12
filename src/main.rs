//! Headless 2048 host (default binary).
//!
//! Owns a single game and serves it over the JSON control adapter. All
//! commands are applied on this thread in arrival order.

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use twenty48::adapter::{handle_inbound, Adapter};
use twenty48::core::api::{new_game, new_game_seeded, EngineHandle};
use twenty48::types::GameStatus;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Seeded game if `TWENTY48_SEED` is set, entropy-seeded otherwise.
fn game_from_env() -> Result<EngineHandle> {
    match std::env::var("TWENTY48_SEED") {
        Ok(raw) => {
            let seed = raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("TWENTY48_SEED is not a u64: {:?}", raw))?;
            Ok(new_game_seeded(seed))
        }
        Err(_) => Ok(new_game()),
    }
}

fn main() -> Result<()> {
    init_tracing();

    let mut game = game_from_env()?;
    info!(seed = game.seed(), "game started");

    let Some(mut adapter) = Adapter::start_from_env()? else {
        warn!("nothing to host with the adapter disabled; exiting");
        return Ok(());
    };

    let mut out_seq = 0u64;
    let mut last_status = game.status();

    while let Some(cmd) = adapter.recv_blocking() {
        for msg in handle_inbound(&mut game, &cmd, &mut out_seq) {
            adapter.send(msg);
        }

        let status = game.status();
        if status != last_status {
            match status {
                GameStatus::Terminal => info!(
                    episode_id = game.episode_id(),
                    score = game.score(),
                    max_tile = game.max_tile(),
                    moves = game.move_count(),
                    "game over"
                ),
                GameStatus::Playing => info!(episode_id = game.episode_id(), "new episode"),
            }
            last_status = status;
        }
    }

    info!("adapter shut down");
    Ok(())
}
