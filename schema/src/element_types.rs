use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Elemental type carried by combatants and moves.
///
/// Type matchups are a single weakness per combatant: a move whose type equals
/// the defender's weakness deals bonus damage. There is no effectiveness chart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum ElementType {
    Normal,
    Fire,
    Water,
    Grass,
    Electric,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
}
