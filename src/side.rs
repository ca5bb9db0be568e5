use crate::combatant::Combatant;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two sides of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    pub const BOTH: [Side; 2] = [Side::Player, Side::Opponent];
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "Player"),
            Side::Opponent => write!(f, "Opponent"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideState {
    pub team: Vec<Combatant>,
    pub active_index: usize,
}

impl SideState {
    pub fn new(team: Vec<Combatant>) -> Self {
        Self {
            team,
            active_index: 0,
        }
    }

    /// Get the currently active combatant
    pub fn active(&self) -> Option<&Combatant> {
        self.team.get(self.active_index)
    }

    /// Get the currently active combatant mutably
    pub fn active_mut(&mut self) -> Option<&mut Combatant> {
        self.team.get_mut(self.active_index)
    }

    pub fn has_alive(&self) -> bool {
        self.team.iter().any(Combatant::is_alive)
    }

    /// True when no team member can fight. An empty team counts as wiped.
    pub fn all_fainted(&self) -> bool {
        !self.has_alive()
    }

    /// Next alive teammate after the active one, wrapping to index 0.
    pub fn next_alive_index(&self) -> Option<usize> {
        let len = self.team.len();
        (1..=len)
            .map(|offset| (self.active_index + offset) % len)
            .find(|&index| self.team[index].is_alive())
    }

    /// Move the active pointer off a fainted (or missing) combatant.
    ///
    /// Returns the new index when a switch happened. The pointer is left alone
    /// when the active combatant is fine or when nobody is left to send out.
    pub fn validate_active_index(&mut self) -> Option<usize> {
        if self.active().is_some_and(Combatant::is_alive) {
            return None;
        }
        if self.team.is_empty() {
            return None;
        }
        let next = if self.active_index >= self.team.len() {
            self.team.iter().position(Combatant::is_alive)?
        } else {
            self.next_alive_index()?
        };
        self.active_index = next;
        Some(next)
    }
}
