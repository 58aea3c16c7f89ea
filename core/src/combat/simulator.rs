//! Battle simulator
//!
//! A strictly sequential state machine: `Intro -> Duel -> Resolution ->
//! Victory`. Output is an ordered event log consumed exactly once by the
//! animation sequencer. The simulator performs no I/O; malformed move data
//! is a caller precondition violation, not something recovered here.

use super::damage::damage;
use super::moves::Category;
use super::stats::Combatant;
use super::types::Side;
use crate::error::{JobError, JobResult};
use rand::Rng;
use rand_pcg::Pcg32;
use tracing::debug;

/// One combat event, strictly ordered by emission.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleEvent {
    /// The side's sprite has walked on screen.
    EntranceDone(Side),
    /// The side's stat reveal (camera zoom) has played.
    RevealDone(Side),
    /// One attack attempt was resolved. `damage` is `Some` iff `hit`.
    AttackResolved {
        attacker: Side,
        move_index: usize,
        hit: bool,
        damage: Option<i32>,
    },
    /// The side's HP reached zero. Terminal for that side.
    Fainted(Side),
}

/// Result of a full simulation.
#[derive(Debug, Clone)]
pub struct BattleOutcome {
    pub events: Vec<BattleEvent>,
    pub winner: Side,
    pub turns: u32,
}

/// Internal phase marker for the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Intro,
    Duel,
    Resolution,
    Victory,
}

/// Run a full battle, mutating `sides[..].current_hp` along the way.
///
/// The initial attacker is the higher-speed side; a tie goes to side A.
/// The attacker alternates every iteration regardless of hit or miss, and
/// the winner is decided the instant either HP reaches zero.
///
/// `max_turns` is a defensive bound: termination is only probabilistically
/// guaranteed by the accuracy floor of 50 and the minimum damage of 1, so
/// crossing the cap returns [`JobError::BattleStalled`] instead of spinning.
pub fn simulate(
    sides: &mut [Combatant; 2],
    max_turns: u32,
    level: i32,
    rng: &mut Pcg32,
) -> JobResult<BattleOutcome> {
    let mut events = Vec::new();
    let mut phase = Phase::Intro;
    debug!(?phase, "phase transition");

    // Intro: sequential per-side reveal, no HP change.
    for side in [Side::A, Side::B] {
        events.push(BattleEvent::EntranceDone(side));
        events.push(BattleEvent::RevealDone(side));
    }
    phase = Phase::Duel;
    debug!(?phase, "phase transition");

    let mut attacker = if sides[1].stats.speed > sides[0].stats.speed {
        Side::B
    } else {
        Side::A
    };
    debug!(first = ?attacker, "duel start");

    let mut turns = 0u32;
    let winner = loop {
        if turns >= max_turns {
            return Err(JobError::BattleStalled(max_turns));
        }
        turns += 1;

        let defender = attacker.opponent();
        let move_index = rng.random_range(0..2usize);
        let mv = sides[attacker.index()].moves[move_index].clone();

        let roll: f64 = rng.random_range(0.0..=100.0);
        let hit = roll <= mv.accuracy as f64;

        let dealt = if hit {
            let (atk, def) = match mv.category {
                Category::Physical => (
                    sides[attacker.index()].stats.atk,
                    sides[defender.index()].stats.def,
                ),
                Category::Special => (
                    sides[attacker.index()].stats.sp_atk,
                    sides[defender.index()].stats.sp_def,
                ),
            };
            let factor: f64 = rng.random_range(0.85..=1.0);
            let dmg = damage(
                level,
                mv.power,
                atk,
                def,
                mv.element,
                &sides[attacker.index()].elements,
                &sides[defender.index()].elements,
                factor,
            );
            sides[defender.index()].take_damage(dmg);
            Some(dmg)
        } else {
            None
        };

        debug!(
            turn = turns,
            side = ?attacker,
            mv = %mv.name,
            hit,
            damage = ?dealt,
            defender_hp = sides[defender.index()].current_hp,
            "attack resolved"
        );
        events.push(BattleEvent::AttackResolved {
            attacker,
            move_index,
            hit,
            damage: dealt,
        });

        if sides[defender.index()].is_fainted() {
            phase = Phase::Resolution;
            debug!(?phase, "phase transition");
            events.push(BattleEvent::Fainted(defender));
            break attacker;
        }
        attacker = defender;
    };

    phase = Phase::Victory;
    debug!(?phase, ?winner, turns, "battle over");

    Ok(BattleOutcome {
        events,
        winner,
        turns,
    })
}
