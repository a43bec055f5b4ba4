//! Space Duel - headless match runner
//!
//! Plays one match between two seats driven by seeded noise input,
//! then saves the result and prints the leaderboard.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use space_duel::app::{MatchRunner, RunOutcome, SimContext};
use space_duel::config::Config;
use space_duel::game::{MatchSetup, PlayerSlot};
use space_duel::input::NoiseInput;
use space_duel::store::writer::DEFAULT_QUEUE_CAPACITY;
use space_duel::store::{
    JsonFileStore, MatchStore, RecordWriter, Settings, DEFAULT_LEADERBOARD_LIMIT,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    info!("Starting Space Duel");
    info!(
        arena = %format!("{}x{}", config.arena_width, config.arena_height),
        fps = config.fps,
        map = config.map.as_deref().unwrap_or("open"),
        "Runner configured"
    );

    let ctx = SimContext::from_config(&config)?;

    let store = JsonFileStore::open(&config.records_path)
        .with_context(|| format!("opening {}", config.records_path.display()))?;
    let store: Arc<dyn MatchStore> = Arc::new(store);

    let settings = match store.load_settings()? {
        Some(settings) => settings,
        None => {
            let defaults = Settings::default();
            store.save_settings(&defaults)?;
            defaults
        }
    };
    info!(
        input_mode = ?settings.input_mode,
        volume = settings.volume,
        known_players = store.players()?.len(),
        "Settings loaded"
    );

    let mut players = Vec::with_capacity(2);
    for (name, class_id) in config.player_names.iter().zip(&config.player_classes) {
        let record = store.register_player(name)?;
        players.push(PlayerSlot::new(record.id, name.as_str(), class_id.as_str()));
    }
    let players: [PlayerSlot; 2] = players
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected exactly two seats"))?;

    let setup = MatchSetup {
        players,
        map: config.map.clone(),
    };
    let runner = MatchRunner::new(&ctx, setup, NoiseInput::new(config.demo_seed), config.fps)?;

    let (writer, writer_task) = RecordWriter::spawn(store.clone(), DEFAULT_QUEUE_CAPACITY);

    match runner.run(shutdown_signal()).await {
        RunOutcome::Finished(record) => {
            if let Err(e) = writer.submit(record) {
                warn!(error = %e, "Match record not queued");
            }
        }
        RunOutcome::Aborted => info!("Match discarded, nothing saved"),
    }

    // Let the writer drain before reading the leaderboard back
    drop(writer);
    writer_task.await?;

    for (rank, row) in store.leaderboard(DEFAULT_LEADERBOARD_LIMIT)?.iter().enumerate() {
        info!(
            rank = rank + 1,
            name = %row.name,
            games = row.total_games,
            wins = row.total_wins,
            win_rate = row.win_rate,
            best_score = row.best_score,
            "Leaderboard"
        );
    }

    info!("Shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, aborting match");
        }
        _ = terminate => {
            info!("Received terminate signal, aborting match");
        }
    }
}
