//! Sleep and paralysis checks that run before a combatant's move executes.

use crate::battle::engine::revalidate_active;
use crate::battle::state::{BattleEvent, BattleState, EventBus};
use crate::side::Side;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateKind {
    Sleep,
    Paralyse,
}

/// An ailment that must be rolled against before the active combatant may move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreMoveGate {
    pub kind: GateKind,
    pub remaining: u8,
}

/// The outcome of a gate check roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateResult {
    pub side: Side,
    pub kind: GateKind,
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GateResolution {
    pub state: BattleState,
    pub messages: Vec<String>,
}

/// Sleep is checked before paralysis; at most one gate applies per turn.
pub fn get_pre_move_gate(state: &BattleState, side: Side) -> Option<PreMoveGate> {
    let active = state.active(side).filter(|c| c.is_alive())?;
    if active.status.sleep > 0 {
        Some(PreMoveGate {
            kind: GateKind::Sleep,
            remaining: active.status.sleep,
        })
    } else if active.status.paralyse > 0 {
        Some(PreMoveGate {
            kind: GateKind::Paralyse,
            remaining: active.status.paralyse,
        })
    } else {
        None
    }
}

/// Consume a gate check.
///
/// Waking up clears sleep entirely, but a failed sleep check leaves the
/// counter where it was. Paralysis loses one point whatever the outcome.
pub fn apply_pre_move_gate_result(state: &BattleState, result: GateResult) -> GateResolution {
    let mut next = state.clone();
    let mut bus = EventBus::new();

    if let Some(active) = next.side_mut(result.side).active_mut() {
        let combatant = active.name.clone();
        match (result.kind, result.success) {
            (GateKind::Sleep, true) => {
                if active.status.sleep > 0 {
                    active.status.sleep = 0;
                    bus.push(BattleEvent::WokeUp { combatant });
                }
            }
            (GateKind::Sleep, false) => {
                bus.push(BattleEvent::StillAsleep { combatant });
            }
            (GateKind::Paralyse, success) => {
                active.status.paralyse = active.status.paralyse.saturating_sub(1);
                if success {
                    bus.push(BattleEvent::FoughtThroughParalysis { combatant });
                } else {
                    bus.push(BattleEvent::FullyParalysed { combatant });
                }
            }
        }
    }

    revalidate_active(&mut next, result.side, &mut bus);

    GateResolution {
        state: next,
        messages: bus.messages(),
    }
}
