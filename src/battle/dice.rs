//! Asynchronous abstraction over the physical die.
//!
//! Every random decision the turn controller needs is a die throw made
//! through [`DiceRoller`], so a battle can be driven by a UI, a seeded RNG, or
//! a fixed script in tests.

use crate::errors::RollError;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

#[async_trait]
pub trait DiceRoller: Send + Sync {
    /// A uniform throw in `min..=max`.
    async fn uniform_roll(&self, min: u8, max: u8) -> Result<u8, RollError>;

    /// A d6 throw that succeeds on an even face.
    async fn even_check(&self) -> Result<bool, RollError>;

    /// A d6 throw that succeeds on a 1 or a 6.
    async fn one_or_six_check(&self) -> Result<bool, RollError>;
}

pub fn is_even_face(face: u8) -> bool {
    face % 2 == 0
}

pub fn is_one_or_six(face: u8) -> bool {
    face == 1 || face == 6
}

/// RNG-backed dice.
#[derive(Debug)]
pub struct RandomDice {
    rng: Mutex<StdRng>,
}

impl RandomDice {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    fn throw(&self, min: u8, max: u8) -> Result<u8, RollError> {
        if min > max {
            return Err(RollError::InvalidRange { min, max });
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(rng.random_range(min..=max))
    }
}

#[async_trait]
impl DiceRoller for RandomDice {
    async fn uniform_roll(&self, min: u8, max: u8) -> Result<u8, RollError> {
        self.throw(min, max)
    }

    async fn even_check(&self) -> Result<bool, RollError> {
        self.throw(1, 6).map(is_even_face)
    }

    async fn one_or_six_check(&self) -> Result<bool, RollError> {
        self.throw(1, 6).map(is_one_or_six)
    }
}

/// Dice that replay a fixed list of faces, one per throw.
///
/// A face of 0 is a rejected throw. Running out of faces is an error rather
/// than a panic so tests can exercise the failed-roll path.
#[derive(Debug, Default)]
pub struct ScriptedDice {
    faces: Mutex<VecDeque<u8>>,
}

impl ScriptedDice {
    /// Face value that makes a throw fail with [`RollError::Rejected`].
    pub const REJECT: u8 = 0;

    pub fn new(faces: Vec<u8>) -> Self {
        Self {
            faces: Mutex::new(faces.into()),
        }
    }

    /// Number of throws not yet consumed.
    pub fn remaining(&self) -> usize {
        self.faces
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn next_face(&self, reason: &str) -> Result<u8, RollError> {
        let face = self
            .faces
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| RollError::Exhausted(reason.to_string()))?;
        tracing::debug!(face, reason, "scripted die consumed");
        if face == Self::REJECT {
            return Err(RollError::Rejected(reason.to_string()));
        }
        Ok(face)
    }
}

#[async_trait]
impl DiceRoller for ScriptedDice {
    async fn uniform_roll(&self, min: u8, max: u8) -> Result<u8, RollError> {
        if min > max {
            return Err(RollError::InvalidRange { min, max });
        }
        let face = self.next_face("uniform roll")?;
        if !(min..=max).contains(&face) {
            return Err(RollError::Rejected(format!(
                "scripted face {} outside {}..={}",
                face, min, max
            )));
        }
        Ok(face)
    }

    async fn even_check(&self) -> Result<bool, RollError> {
        self.next_face("even check").map(is_even_face)
    }

    async fn one_or_six_check(&self) -> Result<bool, RollError> {
        self.next_face("one-or-six check").map(is_one_or_six)
    }
}
