use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MetaFormat;

pub type LeaderId = String;

/// Outcome of a single directional match, seen from `leader_id`'s side.
///
/// The numeric values are significant: `score()` divides them by two to get
/// the actual score used by the Elo update (0.0 / 0.5 / 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    Lose = 0,
    Draw = 1,
    Win = 2,
}

#[derive(Debug, Error)]
#[error("Invalid match result value: {0}")]
pub struct InvalidMatchResult(pub i64);

impl MatchResult {
    pub fn score(&self) -> f64 {
        (*self as i64) as f64 / 2.0
    }

    /// The result of the same physical match seen from the other side.
    pub fn opposite(&self) -> MatchResult {
        match self {
            MatchResult::Win => MatchResult::Lose,
            MatchResult::Lose => MatchResult::Win,
            MatchResult::Draw => MatchResult::Draw,
        }
    }
}

impl TryFrom<i64> for MatchResult {
    type Error = InvalidMatchResult;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MatchResult::Lose),
            1 => Ok(MatchResult::Draw),
            2 => Ok(MatchResult::Win),
            other => Err(InvalidMatchResult(other)),
        }
    }
}

/// One directional row of a physical match. Every physical match produces
/// exactly two rows sharing a `match_id`, each the inverse of the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub match_id: String,
    pub leader_id: LeaderId,
    pub opponent_id: LeaderId,
    pub result: MatchResult,
    pub meta_format: MetaFormat,
    pub official: bool,
    pub match_timestamp: NaiveDateTime,
}

/// Aggregated win/lose/draw counts of one leader against one opponent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupSummary {
    pub opponent_id: LeaderId,
    #[serde(default)]
    pub num_matches: Option<u32>,
    pub score_win: u32,
    pub score_lose: u32,
    pub score_draw: u32,
}

impl MatchupSummary {
    pub fn total_matches(&self) -> u32 {
        self.score_win + self.score_lose + self.score_draw
    }
}

/// All aggregated matchups of one leader within one meta format, as stored
/// in the local dataset files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderMatchups {
    pub leader_id: LeaderId,
    pub meta_format: MetaFormat,
    #[serde(default = "default_official")]
    pub official: bool,
    pub matchups: Vec<MatchupSummary>,
}

// Aggregated matchup sources track sanctioned tournament play.
fn default_official() -> bool {
    true
}

/// Final rating snapshot for one (leader, meta format, officiality) partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderElo {
    pub leader_id: LeaderId,
    pub meta_format: MetaFormat,
    pub only_official: bool,
    pub elo: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_scores_map_to_elo_actual_scores() {
        assert_eq!(MatchResult::Lose.score(), 0.0);
        assert_eq!(MatchResult::Draw.score(), 0.5);
        assert_eq!(MatchResult::Win.score(), 1.0);
    }

    #[test]
    fn opposite_results_are_complementary() {
        assert_eq!(MatchResult::Win.opposite(), MatchResult::Lose);
        assert_eq!(MatchResult::Lose.opposite(), MatchResult::Win);
        assert_eq!(MatchResult::Draw.opposite(), MatchResult::Draw);
    }

    #[test]
    fn rejects_unknown_result_values() {
        assert!(MatchResult::try_from(3).is_err());
        assert_eq!(MatchResult::try_from(2).unwrap(), MatchResult::Win);
    }
}
