use crate::combatant::RosterEntry;
use schema::ElementType;
use serde::{Deserialize, Serialize};

/// A predefined lineup for demo battles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefabTeam {
    pub id: String,
    pub name: String,
    pub description: String,
    pub members: Vec<PrefabCombatant>,
}

/// A predefined combatant configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefabCombatant {
    pub name: String,
    pub level: u8,
    pub element_type: ElementType,
    pub weakness: Option<ElementType>,
    pub max_health: i32,
    pub moves: Vec<String>,
}

impl PrefabTeam {
    /// Roster entries at full health, ids prefixed with the team id.
    pub fn lineup(&self) -> Vec<RosterEntry> {
        self.members
            .iter()
            .enumerate()
            .map(|(i, member)| RosterEntry {
                id: format!("{}-{}", self.id, i),
                name: member.name.clone(),
                level: member.level,
                element_type: member.element_type,
                weakness: member.weakness,
                health: member.max_health,
                max_health: member.max_health,
                moves: member.moves.clone(),
                status: None,
            })
            .collect()
    }
}

fn member(
    name: &str,
    level: u8,
    element_type: ElementType,
    weakness: ElementType,
    max_health: i32,
    moves: &[&str],
) -> PrefabCombatant {
    PrefabCombatant {
        name: name.to_string(),
        level,
        element_type,
        weakness: Some(weakness),
        max_health,
        moves: moves.iter().map(|m| m.to_string()).collect(),
    }
}

/// Get all available prefab teams for demo battles
pub fn get_prefab_teams() -> Vec<PrefabTeam> {
    vec![
        PrefabTeam {
            id: "ember_team".to_string(),
            name: "Ember Team".to_string(),
            description: "Burn pressure backed by a sturdy sleeper".to_string(),
            members: vec![
                member(
                    "Cinderpup",
                    12,
                    ElementType::Fire,
                    ElementType::Water,
                    90,
                    &["Ember", "Flamethrower", "Tackle", "Take Down"],
                ),
                member(
                    "Voltmouse",
                    11,
                    ElementType::Electric,
                    ElementType::Ground,
                    80,
                    &["Thunder Shock", "Thunder Wave", "Fury Swipes"],
                ),
                member(
                    "Boulderback",
                    13,
                    ElementType::Rock,
                    ElementType::Grass,
                    110,
                    &["Rock Slide", "Earthquake", "Rest", "Body Slam", "Double-Edge"],
                ),
            ],
        },
        PrefabTeam {
            id: "tide_team".to_string(),
            name: "Tide Team".to_string(),
            description: "Status tricks and heavy water hits".to_string(),
            members: vec![
                member(
                    "Ripplefin",
                    12,
                    ElementType::Water,
                    ElementType::Electric,
                    90,
                    &["Water Gun", "Hydro Pump", "Ice Beam"],
                ),
                member(
                    "Mossling",
                    11,
                    ElementType::Grass,
                    ElementType::Fire,
                    85,
                    &["Vine Whip", "Giga Drain", "Sleep Powder", "Poison Sting"],
                ),
                member(
                    "Wispveil",
                    13,
                    ElementType::Ghost,
                    ElementType::Psychic,
                    75,
                    &["Confuse Ray", "Psybeam", "Toxic", "Wing Attack", "Submission"],
                ),
            ],
        },
    ]
}

/// Get a specific prefab team by ID
pub fn get_prefab_team(team_id: &str) -> Option<PrefabTeam> {
    get_prefab_teams().into_iter().find(|team| team.id == team_id)
}
