use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use uuid::Uuid;

use crate::config::MetaFormat;
use crate::domain::models::{LeaderId, LeaderMatchups, Match, MatchResult, MatchupSummary};
use crate::errors::PipelineError;

// Jitter bounds for synthetic timestamps. Aggregate sources carry no
// per-match times, so matches are spread around the meta's approximate
// tournament start. The resulting intra-meta order is arbitrary; it only
// has to exist so the Elo recurrence can run sequentially.
const JITTER_DAYS: i64 = 10;
const JITTER_HOURS: i64 = 12;
const JITTER_MINUTES: i64 = 60;

/// A single directional match occurrence, before it is linked with the
/// complementary row from the opponent's perspective.
#[derive(Debug, Clone)]
pub struct MatchEvent {
    pub leader_id: LeaderId,
    pub opponent_id: LeaderId,
    pub result: MatchResult,
    pub meta_format: MetaFormat,
    pub official: bool,
    pub timestamp: NaiveDateTime,
}

/// Expands one leader's aggregated matchups into individual match events:
/// one event per win, per loss and per draw, all from the leader's side.
pub fn expand_matchups(doc: &LeaderMatchups, rng: &mut impl Rng) -> Vec<MatchEvent> {
    let mut events = Vec::new();

    for matchup in &doc.matchups {
        events.extend(expand_matchup(doc, matchup, rng));
    }

    events
}

fn expand_matchup(
    doc: &LeaderMatchups,
    matchup: &MatchupSummary,
    rng: &mut impl Rng,
) -> Vec<MatchEvent> {
    let counts = [
        (MatchResult::Win, matchup.score_win),
        (MatchResult::Lose, matchup.score_lose),
        (MatchResult::Draw, matchup.score_draw),
    ];

    let mut events = Vec::with_capacity(matchup.total_matches() as usize);

    for (result, count) in counts {
        for _ in 0..count {
            events.push(MatchEvent {
                leader_id: doc.leader_id.clone(),
                opponent_id: matchup.opponent_id.clone(),
                result,
                meta_format: doc.meta_format,
                official: doc.official,
                timestamp: synthetic_timestamp(doc.meta_format, rng),
            });
        }
    }

    events
}

fn synthetic_timestamp(meta_format: MetaFormat, rng: &mut impl Rng) -> NaiveDateTime {
    let base = meta_format.approximate_tournament_start();
    let jitter = Duration::days(rng.random_range(-JITTER_DAYS..=JITTER_DAYS))
        + Duration::hours(rng.random_range(-JITTER_HOURS..=JITTER_HOURS))
        + Duration::minutes(rng.random_range(-JITTER_MINUTES..=JITTER_MINUTES));
    base + jitter
}

/// Links each event with the complementary event from the opponent's
/// perspective and emits both directional rows under a shared match id.
///
/// A's wins against B pair with B's losses against A, draws pair with
/// draws. Clean aggregate data is symmetric, so every event must find a
/// partner; leftovers mean the two leaders' counts disagree and the batch
/// is aborted.
pub fn pair_events(events: Vec<MatchEvent>) -> Result<Vec<Match>, PipelineError> {
    let mut groups: HashMap<PairKey, Vec<MatchEvent>> = HashMap::new();
    for event in events {
        groups.entry(PairKey::for_event(&event)).or_default().push(event);
    }

    let mut matches = Vec::new();
    for (key, group) in groups {
        matches.extend(pair_group(&key, group)?);
    }

    Ok(matches)
}

/// Unordered leader pair within one (meta format, officiality) scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PairKey {
    first: LeaderId,
    second: LeaderId,
    meta_format: MetaFormat,
    official: bool,
}

impl PairKey {
    fn for_event(event: &MatchEvent) -> Self {
        let (first, second) = if event.leader_id <= event.opponent_id {
            (event.leader_id.clone(), event.opponent_id.clone())
        } else {
            (event.opponent_id.clone(), event.leader_id.clone())
        };
        Self {
            first,
            second,
            meta_format: event.meta_format,
            official: event.official,
        }
    }

    fn is_mirror(&self) -> bool {
        self.first == self.second
    }
}

fn pair_group(key: &PairKey, group: Vec<MatchEvent>) -> Result<Vec<Match>, PipelineError> {
    if key.is_mirror() {
        return pair_mirror_group(key, group);
    }

    let (side_a, side_b): (Vec<_>, Vec<_>) = group
        .into_iter()
        .partition(|event| event.leader_id == key.first);

    let mut a_by_result = split_by_result(side_a);
    let mut b_by_result = split_by_result(side_b);

    let mut matches = Vec::new();
    let mut unpaired = 0;

    for (a_result, b_result) in [
        (MatchResult::Win, MatchResult::Lose),
        (MatchResult::Lose, MatchResult::Win),
        (MatchResult::Draw, MatchResult::Draw),
    ] {
        let a_events = a_by_result.remove(&a_result).unwrap_or_default();
        let b_events = b_by_result.remove(&b_result).unwrap_or_default();
        unpaired += a_events.len().abs_diff(b_events.len());

        for (a, b) in a_events.into_iter().zip(b_events) {
            matches.extend(link_pair(a, b));
        }
    }

    if unpaired > 0 {
        return Err(PipelineError::AsymmetricMatchup {
            leader_id: key.first.clone(),
            opponent_id: key.second.clone(),
            unpaired,
        });
    }

    Ok(matches)
}

/// Mirror matchups (a leader against itself) carry both perspectives in the
/// same document: wins pair with losses, draws pair among themselves.
fn pair_mirror_group(key: &PairKey, group: Vec<MatchEvent>) -> Result<Vec<Match>, PipelineError> {
    let mut by_result = split_by_result(group);

    let wins = by_result.remove(&MatchResult::Win).unwrap_or_default();
    let losses = by_result.remove(&MatchResult::Lose).unwrap_or_default();
    let draws = by_result.remove(&MatchResult::Draw).unwrap_or_default();

    let mut unpaired = wins.len().abs_diff(losses.len());
    unpaired += draws.len() % 2;

    if unpaired > 0 {
        return Err(PipelineError::AsymmetricMatchup {
            leader_id: key.first.clone(),
            opponent_id: key.second.clone(),
            unpaired,
        });
    }

    let mut matches = Vec::new();
    for (win, loss) in wins.into_iter().zip(losses) {
        matches.extend(link_pair(win, loss));
    }

    let mut draws = draws.into_iter();
    while let (Some(a), Some(b)) = (draws.next(), draws.next()) {
        matches.extend(link_pair(a, b));
    }

    Ok(matches)
}

fn split_by_result(events: Vec<MatchEvent>) -> HashMap<MatchResult, Vec<MatchEvent>> {
    let mut by_result: HashMap<MatchResult, Vec<MatchEvent>> = HashMap::new();
    for event in events {
        by_result.entry(event.result).or_default().push(event);
    }
    by_result
}

fn link_pair(a: MatchEvent, b: MatchEvent) -> [Match; 2] {
    let match_id = Uuid::new_v4().simple().to_string();
    // Both rows describe the same physical match, so they share a timestamp.
    let timestamp = a.timestamp.min(b.timestamp);

    [
        build_row(&match_id, timestamp, a),
        build_row(&match_id, timestamp, b),
    ]
}

fn build_row(match_id: &str, timestamp: NaiveDateTime, event: MatchEvent) -> Match {
    Match {
        match_id: match_id.to_string(),
        leader_id: event.leader_id,
        opponent_id: event.opponent_id,
        result: event.result,
        meta_format: event.meta_format,
        official: event.official,
        match_timestamp: timestamp,
    }
}
