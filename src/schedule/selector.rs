use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// How players with equal game counts are ordered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Alphabetical by name
    #[default]
    ByName,
    /// Shuffled by an RNG seeded once per regeneration
    Seeded(u64),
}

/// Picks four players per court from the shared pool of a slot, fewest games first.
///
/// One selector lives for exactly one build, so a seeded tie-break yields the
/// same sequence of shuffles every time the same roster is rebuilt.
pub struct FairAssignmentSelector {
    rng: Option<ChaCha8Rng>,
}

impl FairAssignmentSelector {
    pub fn new(tie_break: TieBreak) -> Self {
        let rng = match tie_break {
            TieBreak::ByName => None,
            TieBreak::Seeded(seed) => Some(ChaCha8Rng::seed_from_u64(seed)),
        };
        Self { rng }
    }

    /// Seats four players from `pool`, or returns `None` (leaving the pool
    /// untouched) when fewer than four remain.
    ///
    /// Chosen players are removed from `pool` and their counters in
    /// `games_played` are incremented. The returned order is the fairness
    /// order, so the two least-played players form team A.
    pub fn select(&mut self, pool: &mut Vec<String>, games_played: &mut BTreeMap<String, u32>) -> Option<[String; 4]> {
        if pool.len() < 4 {
            return None;
        }

        let mut ordered: Vec<&String> = pool.iter().collect();
        match &mut self.rng {
            None => ordered.sort(),
            Some(rng) => ordered.shuffle(rng),
        }
        // Stable, so the tie-break order above survives within equal counts
        ordered.sort_by_key(|name| games_played.get(*name).copied().unwrap_or(0));

        let chosen: [String; 4] = [
            ordered[0].clone(),
            ordered[1].clone(),
            ordered[2].clone(),
            ordered[3].clone(),
        ];

        pool.retain(|name| !chosen.contains(name));
        for name in &chosen {
            *games_played.entry(name.clone()).or_insert(0) += 1;
        }

        Some(chosen)
    }
}
