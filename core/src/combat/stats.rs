//! Combatant stat and type generation
//!
//! Types and base stats derive from the combatant's seed string so the same
//! seed names the same fighter across jobs. Moves come from the asset
//! backend (or the placeholder roll) and are re-balanced in `moves`.

use super::moves::Move;
use super::types::Element;
use crate::rng::stat_rng;
use rand::seq::SliceRandom;
use rand::Rng;

pub const HP_MIN: i32 = 180;
pub const HP_MAX: i32 = 320;
pub const STAT_MIN: i32 = 55;
pub const STAT_MAX: i32 = 140;

/// Six base stats. All values within the documented bounds.
#[derive(Debug, Clone, Copy)]
pub struct Stats {
    pub hp: i32,
    pub atk: i32,
    pub def: i32,
    pub sp_atk: i32,
    pub sp_def: i32,
    pub speed: i32,
}

/// A generated combatant. Immutable after creation except `current_hp`,
/// which the battle simulator mutates and clamps to `[0, stats.hp]`.
#[derive(Debug, Clone)]
pub struct Combatant {
    pub name: String,
    /// 1-2 elements, ordered, distinct.
    pub elements: Vec<Element>,
    pub stats: Stats,
    pub moves: [Move; 2],
    pub current_hp: i32,
}

impl Combatant {
    pub fn new(name: String, elements: Vec<Element>, stats: Stats, moves: [Move; 2]) -> Combatant {
        debug_assert!(!elements.is_empty() && elements.len() <= 2);
        Combatant {
            name,
            elements,
            stats,
            moves,
            current_hp: stats.hp,
        }
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    /// Apply damage, clamping at zero.
    pub fn take_damage(&mut self, amount: i32) {
        self.current_hp = (self.current_hp - amount).clamp(0, self.stats.hp);
    }
}

/// Derive 1-2 ordered distinct elements from the seed string.
pub fn derive_elements(seed: &str) -> Vec<Element> {
    let mut rng = stat_rng(seed);
    let mut pool = Element::ALL.to_vec();
    pool.shuffle(&mut rng);
    let count = if rng.random_range(0..100) < 40 { 2 } else { 1 };
    pool.truncate(count);
    pool
}

/// Derive six base stats from the seed string.
pub fn derive_stats(seed: &str) -> Stats {
    // Separate stream from the element roll so adding elements later does
    // not shift every stat.
    let mut rng = stat_rng(&format!("{seed}/stats"));
    Stats {
        hp: rng.random_range(HP_MIN..=HP_MAX),
        atk: rng.random_range(STAT_MIN..=STAT_MAX),
        def: rng.random_range(STAT_MIN..=STAT_MAX),
        sp_atk: rng.random_range(STAT_MIN..=STAT_MAX),
        sp_def: rng.random_range(STAT_MIN..=STAT_MAX),
        speed: rng.random_range(STAT_MIN..=STAT_MAX),
    }
}
