use crate::errors::{MoveDataError, MoveDataResult};
use schema::MoveData;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

static BUILTIN_MOVES: &str = include_str!("../data/moves.ron");

/// Name-keyed lookup table of move definitions.
#[derive(Debug, Clone, Default)]
pub struct MoveCatalog {
    moves: HashMap<String, MoveData>,
}

impl MoveCatalog {
    pub fn new(moves: impl IntoIterator<Item = MoveData>) -> MoveDataResult<Self> {
        let mut map = HashMap::new();
        for move_data in moves {
            if map.contains_key(&move_data.name) {
                return Err(MoveDataError::DuplicateMove(move_data.name));
            }
            map.insert(move_data.name.clone(), move_data);
        }
        Ok(Self { moves: map })
    }

    /// Parse a catalog from a RON list of move definitions.
    pub fn from_ron_str(source: &str) -> MoveDataResult<Self> {
        let moves: Vec<MoveData> = ron::from_str(source)?;
        Self::new(moves)
    }

    pub fn load_from_path(path: &Path) -> MoveDataResult<Self> {
        let source = fs::read_to_string(path).map_err(|source| MoveDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> MoveDataResult<Self> {
        Self::from_ron_str(BUILTIN_MOVES)
    }

    pub fn get(&self, name: &str) -> Option<&MoveData> {
        self.moves.get(name)
    }

    pub fn require(&self, name: &str) -> MoveDataResult<&MoveData> {
        self.get(name)
            .ok_or_else(|| MoveDataError::MoveNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.moves.keys().map(String::as_str)
    }
}
