use crate::battle::status_effects::ensure_confuse_slots_for_turn;
use crate::combatant::{Combatant, RosterEntry, StatusBlock};
use crate::side::{Side, SideState};
use rand::Rng;
use schema::EffectKind;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleStatus {
    InProgress,
    Finished,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Turn start
    DieRolled {
        combatant: String,
        face: u8,
    },
    LockedSlot {
        combatant: String,
        slot: u8,
    },

    // Pre-move gates
    WokeUp {
        combatant: String,
    },
    StillAsleep {
        combatant: String,
    },
    FoughtThroughParalysis {
        combatant: String,
    },
    FullyParalysed {
        combatant: String,
    },

    // Bonus rolls
    BonusRoll {
        combatant: String,
        effect: EffectKind,
        success: bool,
        bonus: u16,
    },
    RecoilRoll {
        combatant: String,
        avoided: bool,
    },

    // Move execution
    MoveUsed {
        combatant: String,
        move_name: String,
    },
    MoveFailed {
        combatant: String,
        move_name: String,
    },
    ConfusionSelfHit {
        combatant: String,
        damage: i32,
    },
    WeaknessBonus {
        target: String,
        bonus: i32,
    },
    DamageDealt {
        target: String,
        damage: i32,
        remaining_hp: i32,
    },
    Healed {
        target: String,
        amount: i32,
        new_hp: i32,
    },
    FellAsleep {
        target: String,
        turns: u8,
    },
    StatusApplied {
        target: String,
        status: EffectKind,
        strength: u8,
    },
    RecoilDamage {
        target: String,
        damage: i32,
    },
    RecoilAvoided {
        target: String,
    },

    // End of turn
    StatusDamage {
        target: String,
        status: EffectKind,
        damage: i32,
        remaining_hp: i32,
    },
    StatusTickSuppressed {
        target: String,
        status: EffectKind,
    },

    // Team changes
    CombatantFainted {
        side: Side,
        combatant: String,
    },
    CombatantSwitched {
        side: Side,
        combatant: String,
    },

    // Battle end
    BattleEnded {
        winner: Option<Side>,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable line.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self) -> Option<String> {
        match self {
            // === Turn Start ===
            BattleEvent::DieRolled { combatant, face } => {
                Some(format!("{} rolled a {}.", combatant, face))
            }
            BattleEvent::LockedSlot { combatant, slot } => Some(format!(
                "{} selected a locked slot ({}). Nothing happened.",
                combatant, slot
            )),

            // === Gates ===
            BattleEvent::WokeUp { combatant } => Some(format!("{} woke up!", combatant)),
            BattleEvent::StillAsleep { combatant } => {
                Some(format!("{} is asleep and cannot move.", combatant))
            }
            BattleEvent::FoughtThroughParalysis { combatant } => {
                Some(format!("{} fought through paralysis!", combatant))
            }
            BattleEvent::FullyParalysed { combatant } => {
                Some(format!("{} is paralysed and cannot move.", combatant))
            }

            // === Bonus Rolls ===
            BattleEvent::BonusRoll {
                combatant,
                success,
                bonus,
                ..
            } => {
                if *success {
                    Some(format!("{} rolled again for +{} damage!", combatant, bonus))
                } else {
                    Some(format!("{}'s extra roll came up empty.", combatant))
                }
            }
            BattleEvent::RecoilRoll { .. } => {
                None // Silent - the recoil outcome is reported when the move resolves
            }

            // === Move Execution ===
            BattleEvent::MoveUsed {
                combatant,
                move_name,
            } => Some(format!("{} used {}!", combatant, move_name)),
            BattleEvent::MoveFailed {
                combatant,
                move_name,
            } => Some(format!(
                "{} tried to use {}, but it failed!",
                combatant, move_name
            )),
            BattleEvent::ConfusionSelfHit { combatant, damage } => Some(format!(
                "{} hurt itself in confusion! ({} damage)",
                combatant, damage
            )),
            BattleEvent::WeaknessBonus { target, bonus } => Some(format!(
                "It hit {}'s weakness! (+{} damage)",
                target, bonus
            )),
            BattleEvent::DamageDealt { target, damage, .. } => {
                Some(format!("{} took {} damage!", target, damage))
            }
            BattleEvent::Healed { target, amount, .. } => {
                Some(format!("{} recovered {} HP!", target, amount))
            }
            BattleEvent::FellAsleep { target, turns } => {
                Some(format!("{} fell asleep! ({} turns)", target, turns))
            }
            BattleEvent::StatusApplied {
                target,
                status,
                strength,
            } => Some(format!(
                "{} {}",
                target,
                Self::format_status_applied(*status, *strength)
            )),
            BattleEvent::RecoilDamage { target, damage } => {
                Some(format!("{} is hit with recoil! ({} damage)", target, damage))
            }
            BattleEvent::RecoilAvoided { target } => {
                Some(format!("{} avoided the recoil!", target))
            }

            // === End Of Turn ===
            BattleEvent::StatusDamage {
                target,
                status,
                damage,
                ..
            } => Some(format!(
                "{} is hurt by its {}! ({} damage)",
                target,
                Self::format_status_name(*status),
                damage
            )),
            BattleEvent::StatusTickSuppressed { .. } => None,

            // === Team Changes ===
            BattleEvent::CombatantFainted { combatant, .. } => {
                Some(format!("{} fainted!", combatant))
            }
            BattleEvent::CombatantSwitched { side, combatant } => {
                Some(format!("{} sent out {}!", side, combatant))
            }

            // === Battle End ===
            BattleEvent::BattleEnded { winner } => match winner {
                Some(side) => Some(format!("{} has won the battle!", side)),
                None => Some("The battle ended in a draw!".to_string()),
            },
        }
    }

    fn format_status_name(status: EffectKind) -> &'static str {
        match status {
            EffectKind::Burn => "burn",
            EffectKind::Poison => "poison",
            EffectKind::Sleep | EffectKind::SleepSelf => "sleep",
            EffectKind::Paralyse => "paralysis",
            EffectKind::Confuse => "confusion",
            EffectKind::Heal
            | EffectKind::Recoil
            | EffectKind::AvoidableRecoil
            | EffectKind::RollAgainEven
            | EffectKind::RollAgainOneOrSix => "effect",
        }
    }

    fn format_status_applied(status: EffectKind, strength: u8) -> String {
        match status {
            EffectKind::Burn => format!("was burned! (burn +{})", strength),
            EffectKind::Poison => format!("was poisoned! (poison +{})", strength),
            EffectKind::Sleep | EffectKind::SleepSelf => {
                format!("fell asleep! (sleep +{})", strength)
            }
            EffectKind::Paralyse => format!("is paralysed! (paralysis +{})", strength),
            EffectKind::Confuse => format!("became confused! (confusion +{})", strength),
            _ => format!("was affected by {}!", status),
        }
    }
}

/// Event bus for collecting the events of one transition in generation order.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        tracing::trace!(?event, "battle event");
        self.events.push(event);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Formatted lines for every non-silent event, in order.
    pub fn messages(&self) -> Vec<String> {
        self.events.iter().filter_map(BattleEvent::format).collect()
    }

    /// Return true if the event bus contains no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Return the number of events in the bus.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl std::fmt::Display for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// What the host writes back to its permanent roster after a battle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantRecord {
    pub id: String,
    pub health: i32,
    pub fainted: bool,
    pub status: StatusBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub winner: Option<Side>,
    pub player: Vec<CombatantRecord>,
    pub opponent: Vec<CombatantRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleState {
    pub status: BattleStatus,
    pub winner: Option<Side>,
    pub last_turn_messages: Vec<String>,
    pub turn: Side,
    pub player: SideState,
    pub opponent: SideState,
}

impl BattleState {
    /// Build a battle from two ordered lineups. Each combatant's move loadout is
    /// shuffled into its six die slots exactly once here.
    pub fn new<R: Rng + ?Sized>(
        player_lineup: Vec<RosterEntry>,
        opponent_lineup: Vec<RosterEntry>,
        first_turn: Side,
        rng: &mut R,
    ) -> Self {
        let player = player_lineup
            .into_iter()
            .map(|entry| Combatant::from_roster(entry, rng))
            .collect();
        let opponent = opponent_lineup
            .into_iter()
            .map(|entry| Combatant::from_roster(entry, rng))
            .collect();

        let mut state =
            Self::from_sides(SideState::new(player), SideState::new(opponent), first_turn);
        if let Some(active) = state.side_mut(first_turn).active_mut() {
            ensure_confuse_slots_for_turn(active, rng);
        }
        state
    }

    /// Build a battle from already prepared sides, without shuffling.
    pub fn from_sides(player: SideState, opponent: SideState, first_turn: Side) -> Self {
        let mut state = Self {
            status: BattleStatus::InProgress,
            winner: None,
            last_turn_messages: Vec::new(),
            turn: first_turn,
            player,
            opponent,
        };
        for side in Side::BOTH {
            state.side_mut(side).validate_active_index();
        }
        state
    }

    pub fn side(&self, side: Side) -> &SideState {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideState {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }

    pub fn active(&self, side: Side) -> Option<&Combatant> {
        self.side(side).active()
    }

    pub fn is_finished(&self) -> bool {
        self.status == BattleStatus::Finished
    }

    /// Final roster data once the battle is over.
    pub fn outcome(&self) -> Option<BattleOutcome> {
        if !self.is_finished() {
            return None;
        }
        let records = |side: &SideState| {
            side.team
                .iter()
                .map(|c| CombatantRecord {
                    id: c.id.clone(),
                    health: c.health,
                    fainted: c.fainted,
                    status: c.status.clone(),
                })
                .collect()
        };
        Some(BattleOutcome {
            winner: self.winner,
            player: records(&self.player),
            opponent: records(&self.opponent),
        })
    }
}
