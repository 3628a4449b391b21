//! Reference games built on the rule contract.
//!
//! - `bandit`: one decision, known win probabilities
//! - `dice_race`: push-your-luck track race for 1-4 players

pub mod bandit;
pub mod dice_race;
