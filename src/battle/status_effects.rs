//! Stacking status effects: applying them from moves, ticking them at the end
//! of a turn, and the one-turn confusion window.
//!
//! Everything here mutates a single [`Combatant`] that the caller has already
//! cloned out of the previous state, and reports what happened on an [`EventBus`].

use crate::battle::state::{BattleEvent, EventBus};
use crate::combatant::Combatant;
use rand::seq::IndexedRandom;
use rand::Rng;
use schema::{EffectKind, MoveData};

/// Heal, recoil and roll-again effects scale their strength by this factor.
pub const STRENGTH_MULTIPLIER: i32 = 10;
/// Damage taken per end-of-turn tick of burn or poison.
pub const DOT_DAMAGE_PER_TICK: i32 = 5;

/// Restore `strength x 10` HP for every Heal effect on the move, capped at max health.
pub fn apply_heal(attacker: &mut Combatant, move_data: &MoveData, bus: &mut EventBus) {
    let total = move_data.total_strength(EffectKind::Heal) as i32 * STRENGTH_MULTIPLIER;
    if total == 0 {
        return;
    }
    let amount = attacker.heal(total);
    bus.push(BattleEvent::Healed {
        target: attacker.name.clone(),
        amount,
        new_hp: attacker.health,
    });
}

/// Moves like Rest put their user to sleep.
pub fn apply_sleep_self(attacker: &mut Combatant, move_data: &MoveData, bus: &mut EventBus) {
    let turns = move_data.total_strength(EffectKind::SleepSelf);
    if turns == 0 {
        return;
    }
    let turns = u8::try_from(turns).unwrap_or(u8::MAX);
    attacker.status.sleep = attacker.status.sleep.saturating_add(turns);
    bus.push(BattleEvent::FellAsleep {
        target: attacker.name.clone(),
        turns: attacker.status.sleep,
    });
}

/// Stack every on-hit status of the move onto the defender, in declaration order.
///
/// Burn and poison are flagged as just applied so the end-of-turn tick of the
/// same turn skips them.
pub fn apply_on_hit_effects(defender: &mut Combatant, move_data: &MoveData, bus: &mut EventBus) {
    for effect in &move_data.status_effects {
        let strength = effect.strength;
        if strength == 0 || !effect.effect.is_on_hit() {
            continue;
        }
        let status = &mut defender.status;
        match effect.effect {
            EffectKind::Burn => {
                status.burn = status.burn.saturating_add(strength);
                status.burn_just_applied = true;
            }
            EffectKind::Poison => {
                status.poison = status.poison.saturating_add(strength);
                status.poison_just_applied = true;
            }
            EffectKind::Sleep => status.sleep = status.sleep.saturating_add(strength),
            EffectKind::Paralyse => status.paralyse = status.paralyse.saturating_add(strength),
            EffectKind::Confuse => {
                status.confuse_pending = status.confuse_pending.saturating_add(strength)
            }
            EffectKind::Heal
            | EffectKind::Recoil
            | EffectKind::AvoidableRecoil
            | EffectKind::SleepSelf
            | EffectKind::RollAgainEven
            | EffectKind::RollAgainOneOrSix => continue,
        }
        bus.push(BattleEvent::StatusApplied {
            target: defender.name.clone(),
            status: effect.effect,
            strength,
        });
    }
}

/// Apply recoil to the attacker. Avoidable recoil is skipped when its `avoided`
/// flag was stamped. Returns true if the recoil made the attacker faint.
pub fn apply_recoil(attacker: &mut Combatant, move_data: &MoveData, bus: &mut EventBus) -> bool {
    let mut fainted = false;
    for effect in &move_data.status_effects {
        match effect.effect {
            EffectKind::Recoil => {}
            EffectKind::AvoidableRecoil if effect.avoided => {
                bus.push(BattleEvent::RecoilAvoided {
                    target: attacker.name.clone(),
                });
                continue;
            }
            EffectKind::AvoidableRecoil => {}
            _ => continue,
        }
        let damage = i32::from(effect.strength) * STRENGTH_MULTIPLIER;
        if damage == 0 {
            continue;
        }
        fainted |= attacker.take_damage(damage);
        bus.push(BattleEvent::RecoilDamage {
            target: attacker.name.clone(),
            damage,
        });
    }
    fainted
}

/// One end-of-turn tick of burn and poison. Returns true if the tick made the
/// combatant faint.
///
/// A status applied this turn does not tick: its just-applied flag is cleared
/// instead and damage resumes on the next tick.
pub fn tick_damage_over_time(combatant: &mut Combatant, bus: &mut EventBus) -> bool {
    let mut fainted = false;
    for kind in [EffectKind::Burn, EffectKind::Poison] {
        if !combatant.is_alive() {
            break;
        }
        let (counter, just_applied) = match kind {
            EffectKind::Burn => (
                &mut combatant.status.burn,
                &mut combatant.status.burn_just_applied,
            ),
            _ => (
                &mut combatant.status.poison,
                &mut combatant.status.poison_just_applied,
            ),
        };
        if *just_applied {
            *just_applied = false;
            if *counter > 0 {
                bus.push(BattleEvent::StatusTickSuppressed {
                    target: combatant.name.clone(),
                    status: kind,
                });
            }
            continue;
        }
        if *counter == 0 {
            continue;
        }
        *counter -= 1;
        fainted |= combatant.take_damage(DOT_DAMAGE_PER_TICK);
        bus.push(BattleEvent::StatusDamage {
            target: combatant.name.clone(),
            status: kind,
            damage: DOT_DAMAGE_PER_TICK,
            remaining_hp: combatant.health,
        });
    }
    fainted
}

/// Pick the die faces that confusion cancels this turn.
///
/// No-op unless confusion is pending and no faces have been picked yet. Only
/// unlocked faces are eligible, and faces are distinct. Pending confusion
/// beyond the number of unlocked faces is dropped, so the pending count always
/// matches the faces picked.
pub fn ensure_confuse_slots_for_turn<R: Rng + ?Sized>(combatant: &mut Combatant, rng: &mut R) {
    let pending = usize::from(combatant.status.confuse_pending);
    if pending == 0 || !combatant.status.confuse_slots.is_empty() {
        return;
    }
    let open = combatant.open_slots();
    let mut picked: Vec<u8> = open.choose_multiple(rng, pending).copied().collect();
    picked.sort_unstable();
    combatant.status.confuse_pending = u8::try_from(picked.len()).unwrap_or(u8::MAX);
    combatant.status.confuse_slots = picked;
}

/// Confusion lasts exactly one of the combatant's own turns.
pub fn clear_confuse_after_turn(combatant: &mut Combatant) {
    combatant.status.confuse_pending = 0;
    combatant.status.confuse_slots.clear();
}
