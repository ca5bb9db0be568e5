use dice_battle::prefab_teams::get_prefab_team;
use dice_battle::{
    spawn_battle, BattleConfig, BattleEngineError, BattleResult, BattleState, MoveCatalog,
    RandomDice, Side, TurnController, TurnOutcome,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> BattleResult<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => BattleConfig::load(Path::new(&path))?,
        None => BattleConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    let catalog = match &config.catalog_path {
        Some(path) => MoveCatalog::load_from_path(path)?,
        None => MoveCatalog::builtin()?,
    };
    tracing::info!(moves = catalog.len(), "move catalog loaded");

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let dice = RandomDice::new(StdRng::from_rng(&mut rng));

    let player_team = get_prefab_team("ember_team")
        .ok_or_else(|| BattleEngineError::Setup("unknown team ember_team".to_string()))?;
    let opponent_team = get_prefab_team("tide_team")
        .ok_or_else(|| BattleEngineError::Setup("unknown team tide_team".to_string()))?;

    let first_turn = if rng.random_bool(0.5) {
        Side::Player
    } else {
        Side::Opponent
    };
    println!("{} vs {}", player_team.name, opponent_team.name);
    println!("{} moves first.", first_turn);

    let state = BattleState::new(
        player_team.lineup(),
        opponent_team.lineup(),
        first_turn,
        &mut rng,
    );
    let controller = TurnController::new(Arc::new(catalog), Arc::new(dice));
    let (handle, worker) = spawn_battle(
        state,
        controller,
        StdRng::from_rng(&mut rng),
        config.command_buffer,
    );

    for turn_number in 1..=config.max_turns {
        let snapshot = handle.snapshot().await?;
        if snapshot.is_finished() {
            break;
        }
        println!("\n=== Turn {} ({}) ===", turn_number, snapshot.turn);
        match handle.run_turn(snapshot.turn, None).await? {
            TurnOutcome::Resolved(state) => {
                for line in &state.last_turn_messages {
                    println!("  {}", line);
                }
                print_actives(&state);
            }
            TurnOutcome::Ignored(reason) => {
                tracing::warn!(?reason, "turn request ignored");
            }
        }
    }

    let final_state = handle.snapshot().await?;
    match final_state.outcome() {
        Some(outcome) => {
            match outcome.winner {
                Some(side) => println!("\n{} wins!", side),
                None => println!("\nDraw!"),
            }
            for record in outcome.player.iter().chain(outcome.opponent.iter()) {
                println!(
                    "  {}: {} HP{}",
                    record.id,
                    record.health,
                    if record.fainted { " (fainted)" } else { "" }
                );
            }
            if config.print_outcome_json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
        }
        None => println!("\nBattle stopped after {} turns.", config.max_turns),
    }

    drop(handle);
    worker.await.map_err(BattleEngineError::WorkerJoin)?;
    Ok(())
}

fn print_actives(state: &BattleState) {
    for side in Side::BOTH {
        if let Some(active) = state.active(side) {
            println!(
                "  [{}] {} {}/{} HP",
                side, active.name, active.health, active.max_health
            );
        }
    }
}
