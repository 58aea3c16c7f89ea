//! Combat: types, stats, moves, damage, and the battle state machine

pub mod damage;
pub mod moves;
pub mod simulator;
pub mod stats;
pub mod types;

pub use moves::{Category, Move, MoveSpec};
pub use simulator::{simulate, BattleEvent, BattleOutcome};
pub use stats::{Combatant, Stats};
pub use types::{effectiveness, Element, Side};
