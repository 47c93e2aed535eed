use std::collections::HashMap;

use crate::config::EloSettings;
use crate::domain::{LeaderId, Match};
use crate::errors::PipelineError;

use super::elo::{calculate_new_elo, k_factor};

/// Per-partition rating state: leader id to current Elo. Created fresh for
/// every (meta format, officiality) partition and discarded after the
/// snapshot is taken, so nothing can leak across partitions.
pub struct RatingState {
    starting_elo: i32,
    ratings: HashMap<LeaderId, i32>,
}

impl RatingState {
    pub fn new(starting_elo: i32) -> Self {
        Self {
            starting_elo,
            ratings: HashMap::new(),
        }
    }

    /// Current rating of a leader; unseen leaders enter at the starting Elo.
    pub fn rating(&mut self, leader_id: &str) -> i32 {
        *self
            .ratings
            .entry(leader_id.to_string())
            .or_insert(self.starting_elo)
    }

    fn set(&mut self, leader_id: &str, elo: i32) {
        self.ratings.insert(leader_id.to_string(), elo);
    }

    pub fn into_ratings(self) -> HashMap<LeaderId, i32> {
        self.ratings
    }
}

/// Applies the Elo recurrence to all matches of one partition.
pub struct EloCalculator {
    state: RatingState,
}

impl EloCalculator {
    pub fn new(settings: &EloSettings) -> Self {
        Self {
            state: RatingState::new(settings.starting_elo),
        }
    }

    /// Processes the partition's matches in timestamp order.
    ///
    /// Rows are grouped by match id and groups are ordered by
    /// `(timestamp, match_id)`; the id tiebreak makes the order total, so
    /// repeated runs over the same rows produce identical ratings.
    pub fn process<'a, I>(&mut self, matches: I) -> Result<(), PipelineError>
    where
        I: IntoIterator<Item = &'a Match>,
    {
        for (match_id, rows) in ordered_match_groups(matches) {
            self.apply_match(match_id, &rows)?;
        }
        Ok(())
    }

    /// Updates both sides of one physical match. Both deltas are computed
    /// from the pre-update ratings, each side's K-factor from its own
    /// pre-update rating.
    fn apply_match(&mut self, match_id: &str, rows: &[&Match]) -> Result<(), PipelineError> {
        let [first, second] = validate_match_pair(match_id, rows)?;

        let first_elo = self.state.rating(&first.leader_id);
        let second_elo = self.state.rating(&second.leader_id);

        let first_delta =
            calculate_new_elo(first_elo, second_elo, first.result, k_factor(first_elo))
                - first_elo;
        let second_delta =
            calculate_new_elo(second_elo, first_elo, second.result, k_factor(second_elo))
                - second_elo;

        if first.leader_id == second.leader_id {
            // Mirror match: both rows move the same state entry, so the
            // deltas combine and the match nets to (roughly) zero.
            self.state
                .set(&first.leader_id, first_elo + first_delta + second_delta);
        } else {
            self.state.set(&first.leader_id, first_elo + first_delta);
            self.state.set(&second.leader_id, second_elo + second_delta);
        }
        Ok(())
    }

    pub fn into_ratings(self) -> HashMap<LeaderId, i32> {
        self.state.into_ratings()
    }
}

fn ordered_match_groups<'a, I>(matches: I) -> Vec<(&'a str, Vec<&'a Match>)>
where
    I: IntoIterator<Item = &'a Match>,
{
    let mut groups: HashMap<&str, Vec<&Match>> = HashMap::new();
    for row in matches {
        groups.entry(row.match_id.as_str()).or_default().push(row);
    }

    let mut ordered: Vec<(&str, Vec<&Match>)> = groups.into_iter().collect();
    ordered.sort_by(|(id_a, rows_a), (id_b, rows_b)| {
        (group_timestamp(rows_a), *id_a).cmp(&(group_timestamp(rows_b), *id_b))
    });
    ordered
}

fn group_timestamp(rows: &[&Match]) -> chrono::NaiveDateTime {
    rows.iter()
        .map(|row| row.match_timestamp)
        .min()
        .expect("group contains at least one row")
}

/// A match id must resolve to exactly two rows that mirror each other.
/// Anything else is upstream data corruption and aborts the partition.
fn validate_match_pair<'a>(
    match_id: &str,
    rows: &[&'a Match],
) -> Result<[&'a Match; 2], PipelineError> {
    let [first, second] = rows else {
        return Err(PipelineError::DataIntegrity {
            match_id: match_id.to_string(),
            details: format!("expected 2 rows, found {}", rows.len()),
        });
    };

    let mirrored = first.leader_id == second.opponent_id
        && first.opponent_id == second.leader_id;
    if !mirrored {
        return Err(PipelineError::DataIntegrity {
            match_id: match_id.to_string(),
            details: "rows do not reference the same two leaders".to_string(),
        });
    }

    if first.result.opposite() != second.result {
        return Err(PipelineError::DataIntegrity {
            match_id: match_id.to_string(),
            details: format!(
                "non-complementary results {:?} and {:?}",
                first.result, second.result
            ),
        });
    }

    Ok([*first, *second])
}
