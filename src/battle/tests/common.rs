use crate::battle::dice::{DiceRoller, ScriptedDice};
use crate::battle::state::BattleState;
use crate::battle::turn_orchestrator::TurnController;
use crate::combatant::{Combatant, StatusBlock, MOVE_SLOTS};
use crate::move_data::MoveCatalog;
use crate::side::{Side, SideState};
use rand::rngs::StdRng;
use rand::SeedableRng;
use schema::{EffectKind, ElementType, MoveData, StatusEffect};
use std::sync::Arc;

/// A builder for creating test combatants with common defaults.
///
/// Moves are placed in die slots in the order given, so tests know exactly
/// which face selects which move.
///
/// # Example
/// ```ignore
/// let combatant = TestCombatantBuilder::new("Cinder")
///     .with_type(ElementType::Fire)
///     .with_moves(&["Flame"])
///     .with_hp(50)
///     .build();
/// ```
pub struct TestCombatantBuilder {
    name: String,
    element_type: ElementType,
    weakness: Option<ElementType>,
    health: Option<i32>,
    max_health: i32,
    slots: [Option<String>; MOVE_SLOTS],
    status: StatusBlock,
}

impl TestCombatantBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            element_type: ElementType::Normal,
            weakness: None,
            health: None,
            max_health: 100,
            slots: Default::default(),
            status: StatusBlock::default(),
        }
    }

    pub fn with_type(mut self, element_type: ElementType) -> Self {
        self.element_type = element_type;
        self
    }

    pub fn with_weakness(mut self, weakness: ElementType) -> Self {
        self.weakness = Some(weakness);
        self
    }

    /// Sets the current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: i32) -> Self {
        self.health = Some(hp);
        self
    }

    pub fn with_max_hp(mut self, max_hp: i32) -> Self {
        self.max_health = max_hp;
        self
    }

    /// Fill slots 1, 2, ... with the given moves; the rest stay locked.
    pub fn with_moves(mut self, moves: &[&str]) -> Self {
        self.slots = Default::default();
        for (i, name) in moves.iter().take(MOVE_SLOTS).enumerate() {
            self.slots[i] = Some(name.to_string());
        }
        self
    }

    /// Put a move on a specific die face (1-6).
    pub fn with_slot(mut self, slot: u8, name: &str) -> Self {
        self.slots[usize::from(slot) - 1] = Some(name.to_string());
        self
    }

    pub fn with_status(mut self, status: StatusBlock) -> Self {
        self.status = status;
        self
    }

    pub fn build(self) -> Combatant {
        let mut combatant = Combatant {
            id: self.name.to_lowercase(),
            name: self.name,
            level: 10,
            element_type: self.element_type,
            weakness: self.weakness,
            health: self.health.unwrap_or(self.max_health),
            max_health: self.max_health,
            fainted: false,
            battle_moves: self.slots,
            status: self.status,
        };
        combatant.normalize_health();
        combatant
    }
}

/// Creates a battle between the given teams with the player to move first.
pub fn create_test_battle(player: Vec<Combatant>, opponent: Vec<Combatant>) -> BattleState {
    BattleState::from_sides(SideState::new(player), SideState::new(opponent), Side::Player)
}

/// Creates a standard 1v1 battle with the player to move first.
pub fn create_duel(player: Combatant, opponent: Combatant) -> BattleState {
    create_test_battle(vec![player], vec![opponent])
}

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}

pub fn test_move(
    name: &str,
    move_type: ElementType,
    damage: u16,
    effects: &[(EffectKind, u8)],
) -> MoveData {
    MoveData {
        name: name.to_string(),
        move_type,
        damage,
        status_effects: effects
            .iter()
            .map(|(effect, strength)| StatusEffect::new(*effect, *strength))
            .collect(),
    }
}

pub fn test_catalog(moves: Vec<MoveData>) -> Arc<MoveCatalog> {
    match MoveCatalog::new(moves) {
        Ok(catalog) => Arc::new(catalog),
        Err(err) => panic!("Failed to build test catalog: {}", err),
    }
}

/// A controller over `moves` whose dice replay `faces`. The dice are returned
/// too so tests can check how many throws were consumed.
pub fn scripted_controller(
    moves: Vec<MoveData>,
    faces: Vec<u8>,
) -> (TurnController, Arc<ScriptedDice>) {
    let dice = Arc::new(ScriptedDice::new(faces));
    let roller: Arc<dyn DiceRoller> = dice.clone();
    (TurnController::new(test_catalog(moves), roller), dice)
}

pub fn status(f: impl FnOnce(&mut StatusBlock)) -> StatusBlock {
    let mut block = StatusBlock::default();
    f(&mut block);
    block
}
