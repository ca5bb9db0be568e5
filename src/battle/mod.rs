pub mod dice;
pub mod engine;
pub mod gate;
pub mod runner;
pub mod state;
pub mod status_effects;
pub mod turn_orchestrator;

#[cfg(test)]
mod tests;
