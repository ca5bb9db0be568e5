// Dice Battle Schema - Shared type definitions
// This crate contains the static-content types (element types, move effects,
// move definitions) shared between the battle engine and its content files.

pub use element_types::*;
pub use move_types::*;

pub mod element_types;
pub mod move_types;
