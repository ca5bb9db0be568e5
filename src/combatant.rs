use rand::seq::SliceRandom;
use rand::Rng;
use schema::ElementType;
use serde::{Deserialize, Serialize};

/// Number of move slots on the battle die.
pub const MOVE_SLOTS: usize = 6;

/// Stacking status counters for one combatant.
///
/// Every counter is a number of remaining turns (or ticks). `confuse_slots`
/// holds die faces (1-6) that cancel the combatant's move this turn; it is
/// filled at the start of the combatant's own turn from `confuse_pending`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBlock {
    pub burn: u8,
    pub poison: u8,
    pub sleep: u8,
    pub paralyse: u8,
    pub confuse_pending: u8,
    pub confuse_slots: Vec<u8>,
    pub burn_just_applied: bool,
    pub poison_just_applied: bool,
}

impl StatusBlock {
    pub fn is_clear(&self) -> bool {
        *self == StatusBlock::default()
    }
}

/// A combatant as supplied by the host before the battle starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub level: u8,
    pub element_type: ElementType,
    pub weakness: Option<ElementType>,
    pub health: i32,
    pub max_health: i32,
    /// Move loadout; at most six names are used.
    pub moves: Vec<String>,
    /// Status carried in from outside the battle, if any.
    pub status: Option<StatusBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub level: u8,
    pub element_type: ElementType,
    pub weakness: Option<ElementType>,
    pub health: i32,
    pub max_health: i32,
    pub fainted: bool,
    /// Fixed permutation of the loadout for the whole battle; `None` is a locked slot.
    /// Index 0 is die face 1.
    pub battle_moves: [Option<String>; MOVE_SLOTS],
    pub status: StatusBlock,
}

impl Combatant {
    /// Build a combatant for battle, padding the loadout to six slots and
    /// shuffling it once.
    pub fn from_roster<R: Rng + ?Sized>(entry: RosterEntry, rng: &mut R) -> Self {
        let mut battle_moves: [Option<String>; MOVE_SLOTS] = Default::default();
        for (slot, name) in entry.moves.into_iter().take(MOVE_SLOTS).enumerate() {
            battle_moves[slot] = Some(name);
        }
        battle_moves.shuffle(rng);

        let mut combatant = Self {
            id: entry.id,
            name: entry.name,
            level: entry.level,
            element_type: entry.element_type,
            weakness: entry.weakness,
            health: entry.health,
            max_health: entry.max_health.max(0),
            fainted: false,
            battle_moves,
            status: entry.status.unwrap_or_default(),
        };
        combatant.normalize_health();
        combatant
    }

    pub fn is_alive(&self) -> bool {
        !self.fainted && self.health > 0
    }

    /// Clamp health into `[0, max_health]` and re-derive `fainted`.
    pub fn normalize_health(&mut self) {
        self.health = self.health.clamp(0, self.max_health);
        self.fainted = self.health <= 0;
    }

    /// Apply damage. Returns true if this damage caused the combatant to faint.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.is_alive();
        self.health -= amount.max(0);
        self.normalize_health();
        was_alive && self.fainted
    }

    /// Restore health up to `max_health`. Returns the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        if self.fainted {
            return 0;
        }
        let before = self.health;
        self.health = (self.health + amount.max(0)).min(self.max_health);
        self.normalize_health();
        self.health - before
    }

    /// Move name on the given die face (1-6). `None` for locked or out-of-range faces.
    pub fn move_in_slot(&self, slot: u8) -> Option<&str> {
        let index = usize::from(slot).checked_sub(1)?;
        self.battle_moves.get(index)?.as_deref()
    }

    /// Die faces that hold a move.
    pub fn open_slots(&self) -> Vec<u8> {
        (1..=MOVE_SLOTS as u8)
            .filter(|slot| self.move_in_slot(*slot).is_some())
            .collect()
    }

    pub fn is_slot_confused(&self, slot: u8) -> bool {
        self.status.confuse_slots.contains(&slot)
    }
}
