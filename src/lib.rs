// In: src/lib.rs

//! Dice Battle Engine
//!
//! A turn-based battle simulator for two teams of up to three combatants.
//! Moves are picked by a die roll over a fixed per-battle permutation of each
//! combatant's loadout, then resolved by pure state transitions. An async
//! controller sequences the dice throws around those transitions.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod combatant;
pub mod config;
pub mod errors;
pub mod move_data;
pub mod prefab_teams;
pub mod side;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{EffectKind, ElementType, MoveData, StatusEffect};

// --- From this crate's modules (`src/`) ---

// Pure battle transitions and state.
pub use battle::engine::{
    end_turn, prepare_start_of_turn, resolve_skipped_turn, resolve_turn, TurnAction,
};
pub use battle::gate::{
    apply_pre_move_gate_result, get_pre_move_gate, GateKind, GateResolution, GateResult,
    PreMoveGate,
};
pub use battle::state::{
    BattleEvent, BattleOutcome, BattleState, BattleStatus, CombatantRecord, EventBus,
};

// Turn orchestration.
pub use battle::dice::{DiceRoller, RandomDice, ScriptedDice};
pub use battle::runner::{spawn_battle, BattleHandle, BattleWorker};
pub use battle::turn_orchestrator::{IgnoreReason, TurnController, TurnOutcome, TurnRequest};

// Core runtime types for a battle.
pub use combatant::{Combatant, RosterEntry, StatusBlock};
pub use side::{Side, SideState};

pub use config::BattleConfig;
pub use move_data::MoveCatalog;

// Crate-specific error and result types.
pub use errors::{
    BattleEngineError, BattleResult, ConfigError, MoveDataError, MoveDataResult, RollError,
};
