pub mod action_stack;
pub mod ai;
pub mod calculators;
pub mod events;
pub mod provider;
pub mod rng;
pub mod runner;
pub mod state;
pub mod turn_orchestrator;

#[cfg(test)]
mod tests;
