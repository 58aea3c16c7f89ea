//! Elemental types and the effectiveness chart

use serde::{Deserialize, Serialize};

/// The two duel sides. Side A stands on the left and faces right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Index into `[Combatant; 2]` arrays.
    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

/// Elemental type of a combatant or move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Normal,
    Fire,
    Water,
    Grass,
    Electric,
    Ice,
    Rock,
    Ghost,
}

impl Element {
    pub const ALL: [Element; 8] = [
        Element::Normal,
        Element::Fire,
        Element::Water,
        Element::Grass,
        Element::Electric,
        Element::Ice,
        Element::Rock,
        Element::Ghost,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Element::Normal => "Normal",
            Element::Fire => "Fire",
            Element::Water => "Water",
            Element::Grass => "Grass",
            Element::Electric => "Electric",
            Element::Ice => "Ice",
            Element::Rock => "Rock",
            Element::Ghost => "Ghost",
        }
    }

    /// RGBA accent color used for effect sprites and bar tinting.
    pub fn color(self) -> [u8; 4] {
        match self {
            Element::Normal => [200, 198, 182, 255],
            Element::Fire => [238, 107, 44, 255],
            Element::Water => [66, 138, 237, 255],
            Element::Grass => [92, 186, 84, 255],
            Element::Electric => [247, 208, 56, 255],
            Element::Ice => [142, 212, 226, 255],
            Element::Rock => [176, 152, 92, 255],
            Element::Ghost => [116, 92, 158, 255],
        }
    }
}

/// Attack-type x defense-type factors that differ from the default 1.0.
/// Factors are restricted to 0, 0.5, or 2 so dual-type products stay in
/// {0, 0.25, 0.5, 1, 2, 4}.
const CHART: &[(Element, Element, f64)] = &[
    (Element::Fire, Element::Grass, 2.0),
    (Element::Fire, Element::Ice, 2.0),
    (Element::Fire, Element::Water, 0.5),
    (Element::Fire, Element::Rock, 0.5),
    (Element::Fire, Element::Fire, 0.5),
    (Element::Water, Element::Fire, 2.0),
    (Element::Water, Element::Rock, 2.0),
    (Element::Water, Element::Grass, 0.5),
    (Element::Water, Element::Water, 0.5),
    (Element::Grass, Element::Water, 2.0),
    (Element::Grass, Element::Rock, 2.0),
    (Element::Grass, Element::Fire, 0.5),
    (Element::Grass, Element::Grass, 0.5),
    (Element::Electric, Element::Water, 2.0),
    (Element::Electric, Element::Grass, 0.5),
    (Element::Electric, Element::Electric, 0.5),
    (Element::Electric, Element::Rock, 0.0),
    (Element::Ice, Element::Grass, 2.0),
    (Element::Ice, Element::Fire, 0.5),
    (Element::Ice, Element::Water, 0.5),
    (Element::Ice, Element::Ice, 0.5),
    (Element::Rock, Element::Fire, 2.0),
    (Element::Rock, Element::Ice, 2.0),
    (Element::Ghost, Element::Ghost, 2.0),
    (Element::Ghost, Element::Normal, 0.0),
    (Element::Normal, Element::Rock, 0.5),
    (Element::Normal, Element::Ghost, 0.0),
];

/// Factor for a single attack-type vs defense-type pair.
fn pair_factor(attack: Element, defense: Element) -> f64 {
    CHART
        .iter()
        .find(|(a, d, _)| *a == attack && *d == defense)
        .map(|(_, _, f)| *f)
        .unwrap_or(1.0)
}

/// Combined effectiveness of `attack` against a defender's 1-2 types.
///
/// The per-type factors multiply, so dual-type results are one of
/// {0, 0.25, 0.5, 1, 2, 4}.
pub fn effectiveness(defender_types: &[Element], attack: Element) -> f64 {
    defender_types
        .iter()
        .map(|&d| pair_factor(attack, d))
        .product()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_type_factors_match_the_chart() {
        assert_eq!(effectiveness(&[Element::Grass], Element::Fire), 2.0);
        assert_eq!(effectiveness(&[Element::Water], Element::Fire), 0.5);
        assert_eq!(effectiveness(&[Element::Rock], Element::Electric), 0.0);
        assert_eq!(effectiveness(&[Element::Normal], Element::Fire), 1.0);
    }

    #[test]
    fn dual_type_factors_multiply() {
        // Fire vs Grass/Ice: 2 * 2 = 4
        assert_eq!(
            effectiveness(&[Element::Grass, Element::Ice], Element::Fire),
            4.0
        );
        // Fire vs Water/Rock: 0.5 * 0.5 = 0.25
        assert_eq!(
            effectiveness(&[Element::Water, Element::Rock], Element::Fire),
            0.25
        );
        // Electric vs Rock/anything is an immunity
        assert_eq!(
            effectiveness(&[Element::Rock, Element::Water], Element::Electric),
            0.0
        );
    }

    #[test]
    fn all_pairs_stay_in_the_closed_factor_set() {
        let allowed = [0.0, 0.25, 0.5, 1.0, 2.0, 4.0];
        for atk in Element::ALL {
            for d0 in Element::ALL {
                let e = effectiveness(&[d0], atk);
                assert!(allowed.contains(&e), "{atk:?} vs {d0:?} gave {e}");
                for d1 in Element::ALL {
                    if d0 == d1 {
                        continue;
                    }
                    let e = effectiveness(&[d0, d1], atk);
                    assert!(allowed.contains(&e), "{atk:?} vs {d0:?}/{d1:?} gave {e}");
                }
            }
        }
    }
}
