use crate::battle::state::{BattleEvent, BattleState, BattleStatus, EventBus};
use crate::battle::status_effects::{
    apply_heal, apply_on_hit_effects, apply_recoil, apply_sleep_self, clear_confuse_after_turn,
    ensure_confuse_slots_for_turn, tick_damage_over_time,
};
use crate::side::Side;
use rand::Rng;
use schema::MoveData;

/// Flat damage a combatant takes when it rolls one of its confused faces.
pub const CONFUSION_SELF_DAMAGE: i32 = 20;
/// Extra damage when a damaging move's type matches the defender's weakness.
pub const WEAKNESS_BONUS: i32 = 10;

/// One attacker action, as handed to the resolver by the turn controller.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnAction {
    pub attacker: Side,
    /// `None` for a locked slot or a move that could not be looked up.
    pub move_data: Option<MoveData>,
    /// Die face the move was selected with.
    pub selected_slot: Option<u8>,
    /// Lines produced before resolution (rolls, gate checks, bonus rolls).
    pub pre_messages: Vec<String>,
}

/// Pick confused faces for whoever is about to act. Safe to call repeatedly.
pub fn prepare_start_of_turn<R: Rng + ?Sized>(state: &BattleState, rng: &mut R) -> BattleState {
    let mut next = state.clone();
    let turn = next.turn;
    if let Some(active) = next.side_mut(turn).active_mut() {
        ensure_confuse_slots_for_turn(active, rng);
    }
    next
}

/// Hand the turn to the other side and prepare its start of turn.
/// A finished battle is returned unchanged.
pub fn end_turn<R: Rng + ?Sized>(state: &BattleState, rng: &mut R) -> BattleState {
    if state.is_finished() {
        return state.clone();
    }
    let mut next = state.clone();
    next.turn = next.turn.opponent();
    prepare_start_of_turn(&next, rng)
}

/// Main entry point for resolving one attacker action.
///
/// Order of resolution:
/// 1. confusion faces are prepared (no-op if already done)
/// 2. a confused face cancels the move and costs the attacker 20 HP
/// 3. if that knocked the attacker out, skip straight to the end of turn
/// 4. heal and self-sleep on the attacker
/// 5. damage (plus weakness bonus) and on-hit statuses on the defender
/// 6. recoil on the attacker
/// 7. burn/poison ticks for both active combatants
/// 8. the attacker's confusion expires
/// 9. fainted actives are switched out
/// 10. win detection
pub fn resolve_turn<R: Rng + ?Sized>(
    state: &BattleState,
    action: TurnAction,
    rng: &mut R,
) -> BattleState {
    let mut next = state.clone();
    let mut bus = EventBus::new();
    let attacker_side = action.attacker;
    let defender_side = attacker_side.opponent();
    let attacker_index = next.side(attacker_side).active_index;
    let mut move_data = action.move_data;

    if let Some(attacker) = next.side_mut(attacker_side).active_mut() {
        ensure_confuse_slots_for_turn(attacker, rng);
    }

    let confused = match (action.selected_slot, next.active(attacker_side)) {
        (Some(slot), Some(attacker)) => attacker.is_alive() && attacker.is_slot_confused(slot),
        _ => false,
    };
    if confused {
        move_data = None;
        let mut knocked_out = false;
        if let Some(attacker) = next.side_mut(attacker_side).active_mut() {
            knocked_out = attacker.take_damage(CONFUSION_SELF_DAMAGE);
            bus.push(BattleEvent::ConfusionSelfHit {
                combatant: attacker.name.clone(),
                damage: CONFUSION_SELF_DAMAGE,
            });
            if knocked_out {
                bus.push(BattleEvent::CombatantFainted {
                    side: attacker_side,
                    combatant: attacker.name.clone(),
                });
            }
        }
        if knocked_out {
            revalidate_active(&mut next, attacker_side, &mut bus);
            run_end_of_turn_ticks(&mut next, attacker_side, &mut bus);
            clear_attacker_confusion(&mut next, attacker_side, attacker_index);
            revalidate_all(&mut next, attacker_side, &mut bus);
            finalize_battle(&mut next, &mut bus);
            return with_messages(next, action.pre_messages, bus);
        }
    }

    if let Some(move_data) = &move_data {
        if let Some(attacker) = next.side_mut(attacker_side).active_mut() {
            bus.push(BattleEvent::MoveUsed {
                combatant: attacker.name.clone(),
                move_name: move_data.name.clone(),
            });
            if attacker.is_alive() {
                apply_heal(attacker, move_data, &mut bus);
                apply_sleep_self(attacker, move_data, &mut bus);
            }
        }

        if let Some(defender) = next
            .side_mut(defender_side)
            .active_mut()
            .filter(|c| c.is_alive())
        {
            let mut damage = i32::from(move_data.damage);
            if damage > 0 && defender.weakness == Some(move_data.move_type) {
                damage += WEAKNESS_BONUS;
                bus.push(BattleEvent::WeaknessBonus {
                    target: defender.name.clone(),
                    bonus: WEAKNESS_BONUS,
                });
            }
            let mut knocked_out = false;
            if damage > 0 {
                knocked_out = defender.take_damage(damage);
                bus.push(BattleEvent::DamageDealt {
                    target: defender.name.clone(),
                    damage,
                    remaining_hp: defender.health,
                });
            }
            if knocked_out {
                bus.push(BattleEvent::CombatantFainted {
                    side: defender_side,
                    combatant: defender.name.clone(),
                });
            } else {
                apply_on_hit_effects(defender, move_data, &mut bus);
            }
        }

        if let Some(attacker) = next.side_mut(attacker_side).active_mut() {
            if apply_recoil(attacker, move_data, &mut bus) {
                bus.push(BattleEvent::CombatantFainted {
                    side: attacker_side,
                    combatant: attacker.name.clone(),
                });
            }
        }
    }

    run_end_of_turn_ticks(&mut next, attacker_side, &mut bus);
    clear_attacker_confusion(&mut next, attacker_side, attacker_index);
    revalidate_all(&mut next, attacker_side, &mut bus);
    finalize_battle(&mut next, &mut bus);
    with_messages(next, action.pre_messages, bus)
}

/// Resolve a turn whose move never executed (failed sleep or paralysis check).
/// The side whose turn it is loses its confusion window and burn/poison still tick.
pub fn resolve_skipped_turn(state: &BattleState, messages: Vec<String>) -> BattleState {
    let mut next = state.clone();
    let mut bus = EventBus::new();
    let attacker_side = next.turn;
    let attacker_index = next.side(attacker_side).active_index;

    clear_attacker_confusion(&mut next, attacker_side, attacker_index);
    run_end_of_turn_ticks(&mut next, attacker_side, &mut bus);
    revalidate_all(&mut next, attacker_side, &mut bus);
    finalize_battle(&mut next, &mut bus);
    with_messages(next, messages, bus)
}

/// Switch a side off a fainted active combatant, logging the replacement.
pub(crate) fn revalidate_active(state: &mut BattleState, side: Side, bus: &mut EventBus) {
    let side_state = state.side_mut(side);
    if let Some(index) = side_state.validate_active_index() {
        bus.push(BattleEvent::CombatantSwitched {
            side,
            combatant: side_state.team[index].name.clone(),
        });
    }
}

fn revalidate_all(state: &mut BattleState, attacker_side: Side, bus: &mut EventBus) {
    revalidate_active(state, attacker_side, bus);
    revalidate_active(state, attacker_side.opponent(), bus);
}

/// Burn and poison tick on both active combatants, attacker first.
fn run_end_of_turn_ticks(state: &mut BattleState, attacker_side: Side, bus: &mut EventBus) {
    for side in [attacker_side, attacker_side.opponent()] {
        if let Some(active) = state.side_mut(side).active_mut() {
            if tick_damage_over_time(active, bus) {
                bus.push(BattleEvent::CombatantFainted {
                    side,
                    combatant: active.name.clone(),
                });
            }
        }
    }
}

fn clear_attacker_confusion(state: &mut BattleState, side: Side, index: usize) {
    if let Some(attacker) = state.side_mut(side).team.get_mut(index) {
        clear_confuse_after_turn(attacker);
    }
}

fn finalize_battle(state: &mut BattleState, bus: &mut EventBus) {
    if state.is_finished() {
        return;
    }
    let player_out = state.player.all_fainted();
    let opponent_out = state.opponent.all_fainted();
    let winner = match (player_out, opponent_out) {
        (false, false) => return,
        (true, true) => None,
        (true, false) => Some(Side::Opponent),
        (false, true) => Some(Side::Player),
    };
    state.status = BattleStatus::Finished;
    state.winner = winner;
    tracing::info!(?winner, "battle finished");
    bus.push(BattleEvent::BattleEnded { winner });
}

fn with_messages(mut state: BattleState, pre_messages: Vec<String>, bus: EventBus) -> BattleState {
    let mut messages = pre_messages;
    messages.extend(bus.messages());
    state.last_turn_messages = messages;
    state
}
