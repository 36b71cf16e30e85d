//! Standings from completed matches.
//!
//! Everything here is recomputed from the full match list on every call;
//! nothing is updated incrementally.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::schedule::Match;

pub const WIN_POINTS: u32 = 3;
pub const DRAW_POINTS: u32 = 1;
pub const LOSS_POINTS: u32 = 0;

/// Denominator used for `win_rate`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinRateBasis {
    /// wins / games played (headline ranking)
    #[default]
    Games,
    /// wins / (wins + losses), draws ignored (detailed admin view)
    Decided,
}

/// A finished match. Players 0 and 1 are team A, 2 and 3 team B;
/// empty names mark missing players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub players: [String; 4],
    pub score: [u32; 2],
}

impl MatchResult {
    pub fn new(team_a: [&str; 2], team_b: [&str; 2], score: [u32; 2]) -> Self {
        Self {
            players: [team_a[0], team_a[1], team_b[0], team_b[1]].map(str::to_string),
            score,
        }
    }

    /// Named players of team 0 or 1
    pub fn team(&self, team: usize) -> Vec<&str> {
        self.players[team * 2..team * 2 + 2]
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect()
    }
}

impl From<&Match> for MatchResult {
    fn from(m: &Match) -> Self {
        Self {
            players: m.players.clone().map(Option::unwrap_or_default),
            score: m.score,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Record {
    wins: u32,
    draws: u32,
    losses: u32,
    points_for: u32,
    points_against: u32,
}

impl Record {
    fn add(&mut self, scored: u32, conceded: u32) {
        match scored.cmp(&conceded) {
            Ordering::Greater => self.wins += 1,
            Ordering::Equal => self.draws += 1,
            Ordering::Less => self.losses += 1,
        }
        self.points_for += scored;
        self.points_against += conceded;
    }

    fn games(&self) -> u32 {
        self.wins + self.draws + self.losses
    }

    fn points(&self) -> u32 {
        self.wins * WIN_POINTS + self.draws * DRAW_POINTS + self.losses * LOSS_POINTS
    }

    fn margin(&self) -> i64 {
        i64::from(self.points_for) - i64::from(self.points_against)
    }

    fn win_rate(&self, basis: WinRateBasis) -> f64 {
        let denominator = match basis {
            WinRateBasis::Games => self.games(),
            WinRateBasis::Decided => self.wins + self.losses,
        };
        ratio(self.wins, denominator)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub games_played: u32,
    pub points: u32,
    pub win_rate: f64,
    pub points_for: u32,
    pub points_against: u32,
    pub margin: i64,
}

impl PlayerStats {
    fn from_record(name: String, record: &Record, basis: WinRateBasis) -> Self {
        Self {
            name,
            wins: record.wins,
            draws: record.draws,
            losses: record.losses,
            games_played: record.games(),
            points: record.points(),
            win_rate: record.win_rate(basis),
            points_for: record.points_for,
            points_against: record.points_against,
            margin: record.margin(),
        }
    }

    pub fn win_rate_over_games(&self) -> f64 {
        ratio(self.wins, self.games_played)
    }

    pub fn win_rate_over_decided(&self) -> f64 {
        ratio(self.wins, self.wins + self.losses)
    }
}

/// How a two-player team performs together; `players` is sorted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairStats {
    pub players: (String, String),
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub games_played: u32,
    pub points: u32,
    pub win_rate: f64,
    pub points_for: u32,
    pub points_against: u32,
    pub margin: i64,
}

impl PairStats {
    fn from_record(players: (String, String), record: &Record, basis: WinRateBasis) -> Self {
        Self {
            players,
            wins: record.wins,
            draws: record.draws,
            losses: record.losses,
            games_played: record.games(),
            points: record.points(),
            win_rate: record.win_rate(basis),
            points_for: record.points_for,
            points_against: record.points_against,
            margin: record.margin(),
        }
    }
}

fn ratio(wins: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        f64::from(wins) / f64::from(denominator)
    }
}

/// Records keyed by identity, remembering first-appearance order
struct Ledger<K> {
    order: Vec<(K, Record)>,
    index: HashMap<K, usize>,
}

impl<K: Clone + Eq + Hash> Ledger<K> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn add(&mut self, key: K, scored: u32, conceded: u32) {
        let position = match self.index.get(&key) {
            Some(&position) => position,
            None => {
                self.index.insert(key.clone(), self.order.len());
                self.order.push((key, Record::default()));
                self.order.len() - 1
            }
        };
        self.order[position].1.add(scored, conceded);
    }
}

/// Points desc, then win rate desc, then margin desc; stable otherwise
fn ranking(a: (u32, f64, i64), b: (u32, f64, i64)) -> Ordering {
    b.0.cmp(&a.0)
        .then_with(|| b.1.total_cmp(&a.1))
        .then_with(|| b.2.cmp(&a.2))
}

pub fn compute_stats(matches: &[MatchResult], basis: WinRateBasis) -> Vec<PlayerStats> {
    let mut ledger = Ledger::new();
    for m in matches {
        for team in 0..2 {
            let (scored, conceded) = (m.score[team], m.score[1 - team]);
            for name in m.team(team) {
                ledger.add(name.to_string(), scored, conceded);
            }
        }
    }

    let mut stats: Vec<PlayerStats> = ledger
        .order
        .into_iter()
        .map(|(name, record)| PlayerStats::from_record(name, &record, basis))
        .collect();
    stats.sort_by(|a, b| ranking((a.points, a.win_rate, a.margin), (b.points, b.win_rate, b.margin)));
    stats
}

fn pair_key(first: &str, second: &str) -> (String, String) {
    if first <= second {
        (first.to_string(), second.to_string())
    } else {
        (second.to_string(), first.to_string())
    }
}

pub fn compute_pair_stats(matches: &[MatchResult], basis: WinRateBasis) -> Vec<PairStats> {
    let mut ledger = Ledger::new();
    for m in matches {
        for team in 0..2 {
            // only complete teams form a pair
            if let [first, second] = m.team(team).as_slice() {
                if first != second {
                    ledger.add(pair_key(first, second), m.score[team], m.score[1 - team]);
                }
            }
        }
    }

    let mut stats: Vec<PairStats> = ledger
        .order
        .into_iter()
        .map(|(players, record)| PairStats::from_record(players, &record, basis))
        .collect();
    stats.sort_by(|a, b| ranking((a.points, a.win_rate, a.margin), (b.points, b.win_rate, b.margin)));
    stats
}

/// Record of one pair, regardless of argument order
pub fn pair_stats_for(matches: &[MatchResult], a: &str, b: &str, basis: WinRateBasis) -> Option<PairStats> {
    let key = pair_key(a.trim(), b.trim());
    compute_pair_stats(matches, basis)
        .into_iter()
        .find(|stats| stats.players == key)
}
