//! Job PRNG construction
//!
//! Every random decision in a job (stat rolls, combat rolls, audio
//! synthesis) draws from one explicit PCG stream derived here. There is no
//! ambient global random source: with a fixed entropy word the entire job is
//! reproducible from its seed strings.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use xxhash_rust::xxh3::xxh3_64;

/// Build the job PRNG from the two combatant seed strings plus a
/// caller-supplied entropy word.
///
/// Callers that want reproducible jobs pass a fixed `entropy`; the CLI
/// passes a fresh random word so consecutive runs differ.
pub fn job_rng(seed_a: &str, seed_b: &str, entropy: u64) -> Pcg32 {
    let mut key = Vec::with_capacity(seed_a.len() + seed_b.len() + 1);
    key.extend_from_slice(seed_a.as_bytes());
    key.push(0x1f); // separator so ("ab","c") != ("a","bc")
    key.extend_from_slice(seed_b.as_bytes());
    Pcg32::seed_from_u64(xxh3_64(&key) ^ entropy)
}

/// Derive a per-combatant stat stream from a single seed string.
///
/// Stat and type generation is keyed to the seed alone so a combatant's
/// identity is stable across jobs that reuse the seed.
pub fn stat_rng(seed: &str) -> Pcg32 {
    Pcg32::seed_from_u64(xxh3_64(seed.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn stat_rng_is_stable_for_a_seed() {
        let a: u64 = stat_rng("ember-fox").random();
        let b: u64 = stat_rng("ember-fox").random();
        assert_eq!(a, b);
    }

    #[test]
    fn seed_concatenation_is_not_ambiguous() {
        let mut x = job_rng("ab", "c", 0);
        let mut y = job_rng("a", "bc", 0);
        assert_ne!(x.random::<u64>(), y.random::<u64>());
    }

    #[test]
    fn entropy_word_perturbs_the_stream() {
        let mut x = job_rng("a", "b", 1);
        let mut y = job_rng("a", "b", 2);
        assert_ne!(x.random::<u64>(), y.random::<u64>());
    }
}
