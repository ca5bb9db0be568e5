use crate::battle::dice::DiceRoller;
use crate::battle::engine::{
    end_turn, prepare_start_of_turn, resolve_skipped_turn, resolve_turn, TurnAction,
};
use crate::battle::gate::{apply_pre_move_gate_result, get_pre_move_gate, GateKind, GateResult};
use crate::battle::state::{BattleEvent, BattleState, EventBus};
use crate::combatant::MOVE_SLOTS;
use crate::errors::BattleResult;
use crate::move_data::MoveCatalog;
use crate::side::Side;
use rand::rngs::StdRng;
use schema::{EffectKind, MoveData};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// A request to play the turn of `side`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    pub side: Side,
    /// Debug override for the move-selection die.
    pub forced_slot: Option<u8>,
}

impl TurnRequest {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            forced_slot: None,
        }
    }

    pub fn forced(side: Side, slot: u8) -> Self {
        Self {
            side,
            forced_slot: Some(slot),
        }
    }
}

/// Why a turn request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnoreReason {
    /// Another turn is still being played.
    Busy,
    /// It is not this side's turn.
    WrongTurn,
    /// The battle is already over.
    Finished,
    /// The turn was cancelled before it could be committed.
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Resolved(Box<BattleState>),
    Ignored(IgnoreReason),
}

impl TurnOutcome {
    pub fn state(&self) -> Option<&BattleState> {
        match self {
            TurnOutcome::Resolved(state) => Some(state),
            TurnOutcome::Ignored(_) => None,
        }
    }
}

/// Sequences the dice throws of one turn around the pure resolver.
///
/// Throws happen strictly in order (selection, gate, bonus, recoil) and each
/// is only made when the previous ones call for it. The controller never
/// mutates the state it is given; a failed throw leaves the caller's state as
/// it was.
#[derive(Clone)]
pub struct TurnController {
    catalog: Arc<MoveCatalog>,
    dice: Arc<dyn DiceRoller>,
}

impl TurnController {
    pub fn new(catalog: Arc<MoveCatalog>, dice: Arc<dyn DiceRoller>) -> Self {
        Self { catalog, dice }
    }

    pub fn catalog(&self) -> &MoveCatalog {
        &self.catalog
    }

    /// Play one full turn for `request.side` starting from `state`.
    ///
    /// `rng` only picks confusion faces for the side that acts next.
    pub async fn play_turn(
        &self,
        state: &BattleState,
        request: TurnRequest,
        mut rng: StdRng,
    ) -> BattleResult<TurnOutcome> {
        if state.is_finished() {
            return Ok(TurnOutcome::Ignored(IgnoreReason::Finished));
        }
        if state.turn != request.side {
            return Ok(TurnOutcome::Ignored(IgnoreReason::WrongTurn));
        }

        let side = request.side;
        let state = prepare_start_of_turn(state, &mut rng);
        let Some(attacker) = state.active(side).filter(|c| c.is_alive()) else {
            warn!(%side, "no combatant able to act; skipping turn");
            let next = resolve_skipped_turn(&state, Vec::new());
            return Ok(TurnOutcome::Resolved(Box::new(end_turn(&next, &mut rng))));
        };
        let attacker_name = attacker.name.clone();

        let face = self.select_face(request).await?;
        debug!(%side, combatant = %attacker_name, face, "move selection roll");
        let mut pre = EventBus::new();
        pre.push(BattleEvent::DieRolled {
            combatant: attacker_name.clone(),
            face,
        });

        let move_name = attacker.move_in_slot(face).map(str::to_owned);
        let cancelled_by_confusion = attacker.is_slot_confused(face);

        let Some(move_name) = move_name else {
            let mut messages = pre.messages();
            let mut state = state;
            if let Some(gate) = get_pre_move_gate(&state, side) {
                let resolution = apply_pre_move_gate_result(
                    &state,
                    GateResult {
                        side,
                        kind: gate.kind,
                        success: false,
                    },
                );
                state = resolution.state;
                messages.extend(resolution.messages);
            }
            messages.extend(
                BattleEvent::LockedSlot {
                    combatant: attacker_name,
                    slot: face,
                }
                .format(),
            );
            let action = TurnAction {
                attacker: side,
                move_data: None,
                selected_slot: Some(face),
                pre_messages: messages,
            };
            let next = resolve_turn(&state, action, &mut rng);
            return Ok(TurnOutcome::Resolved(Box::new(end_turn(&next, &mut rng))));
        };

        let mut messages = pre.messages();
        let mut state = state;
        if let Some(gate) = get_pre_move_gate(&state, side) {
            let success = match gate.kind {
                GateKind::Sleep => self.dice.one_or_six_check().await?,
                GateKind::Paralyse => self.dice.even_check().await?,
            };
            debug!(%side, kind = ?gate.kind, remaining = gate.remaining, success, "gate check");
            let resolution = apply_pre_move_gate_result(
                &state,
                GateResult {
                    side,
                    kind: gate.kind,
                    success,
                },
            );
            state = resolution.state;
            messages.extend(resolution.messages);
            if !success {
                let next = resolve_skipped_turn(&state, messages);
                return Ok(TurnOutcome::Resolved(Box::new(end_turn(&next, &mut rng))));
            }
        }

        let mut move_data = self.catalog.get(&move_name).cloned();
        let mut bonus_events = EventBus::new();
        match move_data.as_mut() {
            None => {
                warn!(move_name = %move_name, "move missing from catalog");
                bonus_events.push(BattleEvent::MoveFailed {
                    combatant: attacker_name.clone(),
                    move_name,
                });
            }
            Some(move_data) if !cancelled_by_confusion => {
                self.roll_bonus_damage(move_data, &attacker_name, &mut bonus_events)
                    .await?;
                self.roll_recoil_avoidance(move_data, &attacker_name, &mut bonus_events)
                    .await?;
            }
            Some(_) => {}
        }
        messages.extend(bonus_events.messages());

        let action = TurnAction {
            attacker: side,
            move_data,
            selected_slot: Some(face),
            pre_messages: messages,
        };
        let next = resolve_turn(&state, action, &mut rng);
        Ok(TurnOutcome::Resolved(Box::new(end_turn(&next, &mut rng))))
    }

    async fn select_face(&self, request: TurnRequest) -> BattleResult<u8> {
        match request.forced_slot {
            Some(slot) if (1..=MOVE_SLOTS as u8).contains(&slot) => Ok(slot),
            Some(slot) => {
                warn!(slot, "forced slot out of range; rolling instead");
                Ok(self.dice.uniform_roll(1, MOVE_SLOTS as u8).await?)
            }
            None => Ok(self.dice.uniform_roll(1, MOVE_SLOTS as u8).await?),
        }
    }

    /// Each roll-again effect gets its own throw; a hit adds `strength x 10`
    /// damage to this use of the move only.
    async fn roll_bonus_damage(
        &self,
        move_data: &mut MoveData,
        attacker_name: &str,
        bus: &mut EventBus,
    ) -> BattleResult<()> {
        let roll_again: Vec<(EffectKind, u8)> = move_data
            .status_effects
            .iter()
            .filter(|e| e.effect.is_roll_again())
            .map(|e| (e.effect, e.strength))
            .collect();

        for (effect, strength) in roll_again {
            let success = match effect {
                EffectKind::RollAgainEven => self.dice.even_check().await?,
                _ => self.dice.one_or_six_check().await?,
            };
            let bonus = u16::from(strength) * 10;
            debug!(?effect, success, bonus, "bonus damage roll");
            if success {
                move_data.damage = move_data.damage.saturating_add(bonus);
            }
            bus.push(BattleEvent::BonusRoll {
                combatant: attacker_name.to_string(),
                effect,
                success,
                bonus,
            });
        }
        Ok(())
    }

    /// Stamp each avoidable recoil effect with the result of an even check.
    async fn roll_recoil_avoidance(
        &self,
        move_data: &mut MoveData,
        attacker_name: &str,
        bus: &mut EventBus,
    ) -> BattleResult<()> {
        for effect in move_data
            .status_effects
            .iter_mut()
            .filter(|e| e.effect == EffectKind::AvoidableRecoil)
        {
            let avoided = self.dice.even_check().await?;
            debug!(avoided, "recoil avoidance roll");
            effect.avoided = avoided;
            bus.push(BattleEvent::RecoilRoll {
                combatant: attacker_name.to_string(),
                avoided,
            });
        }
        Ok(())
    }
}
