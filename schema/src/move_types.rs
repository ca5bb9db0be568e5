use crate::element_types::ElementType;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Every effect a move can carry.
///
/// The serialized tags keep the short names used by the content files
/// (`SELF`, `RASELF`, `SleepSELF`, `RAE`, `RAM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum EffectKind {
    // Applied to the defender on hit
    Burn,
    Poison,
    Sleep,
    Paralyse,
    Confuse,

    // Applied to the user
    Heal,
    #[serde(rename = "SELF")]
    #[strum(serialize = "SELF")]
    Recoil,
    #[serde(rename = "RASELF")]
    #[strum(serialize = "RASELF")]
    AvoidableRecoil,
    #[serde(rename = "SleepSELF")]
    #[strum(serialize = "SleepSELF")]
    SleepSelf,

    // Bonus damage re-rolls
    #[serde(rename = "RAE")]
    #[strum(serialize = "RAE")]
    RollAgainEven,
    #[serde(rename = "RAM")]
    #[strum(serialize = "RAM")]
    RollAgainOneOrSix,
}

impl EffectKind {
    /// Effects that land on the defender when the move connects.
    pub fn is_on_hit(self) -> bool {
        matches!(
            self,
            EffectKind::Burn
                | EffectKind::Poison
                | EffectKind::Sleep
                | EffectKind::Paralyse
                | EffectKind::Confuse
        )
    }

    /// Effects resolved by an extra roll before the move resolves.
    pub fn is_roll_again(self) -> bool {
        matches!(self, EffectKind::RollAgainEven | EffectKind::RollAgainOneOrSix)
    }
}

/// A single effect entry on a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub effect: EffectKind,
    pub strength: u8,
    /// Only meaningful for `AvoidableRecoil`; stamped by the turn controller
    /// after the avoidance roll.
    #[serde(default)]
    pub avoided: bool,
}

impl StatusEffect {
    pub fn new(effect: EffectKind, strength: u8) -> Self {
        Self {
            effect,
            strength,
            avoided: false,
        }
    }
}

/// Static definition of a move as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveData {
    pub name: String,
    pub move_type: ElementType,
    pub damage: u16,
    #[serde(default)]
    pub status_effects: Vec<StatusEffect>,
}

impl MoveData {
    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.status_effects.iter().any(|e| e.effect == kind)
    }

    /// Iterates the effects of one kind, in declaration order.
    pub fn effects_of(&self, kind: EffectKind) -> impl Iterator<Item = &StatusEffect> {
        self.status_effects.iter().filter(move |e| e.effect == kind)
    }

    /// Sum of `strength` across every effect of the given kind.
    pub fn total_strength(&self, kind: EffectKind) -> u32 {
        self.effects_of(kind).map(|e| u32::from(e.strength)).sum()
    }
}
