//! Move data and generation

use super::types::Element;
use rand::Rng;
use serde::Deserialize;

/// Damage category: which stat pair the damage formula uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Physical,
    Special,
}

pub const POWER_MIN: i32 = 20;
pub const POWER_MAX: i32 = 150;
pub const ACCURACY_MIN: i32 = 50;
pub const ACCURACY_MAX: i32 = 100;

/// A combat move. Immutable after generation.
#[derive(Debug, Clone)]
pub struct Move {
    pub name: String,
    pub element: Element,
    pub category: Category,
    /// Base power, within [20, 150].
    pub power: i32,
    /// Hit chance in percent, within [50, 100], already re-balanced
    /// against power.
    pub accuracy: i32,
}

/// Raw move fields as delivered by the asset backend's structured payload.
/// Validated and re-balanced into a [`Move`] before use.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveSpec {
    pub name: String,
    pub element: Element,
    pub category: Category,
    pub power: i32,
    pub accuracy: i32,
}

/// Accuracy target implied by a move's power: power 20 maps to 100,
/// power 150 maps to 50, linear in between.
fn power_accuracy_target(power: i32) -> f32 {
    let t = (power - POWER_MIN) as f32 / (POWER_MAX - POWER_MIN) as f32;
    100.0 - 50.0 * t
}

/// Blend a rolled accuracy against the power-derived target so high-power
/// moves trend toward lower accuracy. Applied exactly once per move.
fn rebalance_accuracy(accuracy: i32, power: i32) -> i32 {
    let blended = 0.65 * accuracy as f32 + 0.35 * power_accuracy_target(power);
    (blended.round() as i32).clamp(ACCURACY_MIN, ACCURACY_MAX)
}

impl Move {
    /// Build a move from backend-supplied fields, clamping power into range
    /// and re-balancing accuracy once.
    pub fn from_spec(spec: MoveSpec) -> Move {
        let power = spec.power.clamp(POWER_MIN, POWER_MAX);
        let accuracy = rebalance_accuracy(spec.accuracy.clamp(ACCURACY_MIN, ACCURACY_MAX), power);
        Move {
            name: spec.name,
            element: spec.element,
            category: spec.category,
            power,
            accuracy,
        }
    }

    /// Roll a move from scratch (placeholder backend path).
    pub fn roll(name: String, element: Element, rng: &mut impl Rng) -> Move {
        let power = rng.random_range(POWER_MIN..=POWER_MAX);
        let accuracy = rng.random_range(ACCURACY_MIN..=ACCURACY_MAX);
        let category = if rng.random_range(0..2) == 0 {
            Category::Physical
        } else {
            Category::Special
        };
        Move {
            name,
            element,
            category,
            power,
            accuracy: rebalance_accuracy(accuracy, power),
        }
    }
}
