use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::info;

use crate::config::{EloSettings, MetaFormat};
use crate::domain::{LeaderElo, Match};
use crate::errors::PipelineError;

use super::calculator::EloCalculator;

/// Runs the Elo calculator once per (meta format, officiality) partition
/// and assembles the final rating rows.
///
/// Each meta format yields up to two partitions: `only_official=true` over
/// the official rows alone, and `only_official=false` over all rows (a
/// superset, not a disjoint split). Every partition starts from a fresh
/// rating state; nothing carries over between meta formats.
pub fn calculate_leader_elos(
    matches: &[Match],
    only_official_filter: Option<bool>,
    settings: &EloSettings,
) -> Result<Vec<LeaderElo>, PipelineError> {
    // BTreeMap keeps meta formats in ascending release order.
    let mut by_meta: BTreeMap<MetaFormat, Vec<&Match>> = BTreeMap::new();
    for row in matches {
        by_meta.entry(row.meta_format).or_default().push(row);
    }

    let mut leader_elos = Vec::new();

    for (meta_format, meta_matches) in by_meta {
        for only_official in partition_flags(only_official_filter) {
            let partition: Vec<&Match> = if only_official {
                meta_matches
                    .iter()
                    .copied()
                    .filter(|row| row.official)
                    .collect()
            } else {
                meta_matches.clone()
            };

            // A meta without matching rows (e.g. no official matches at
            // all) emits nothing rather than a zero-leader placeholder.
            if partition.is_empty() {
                continue;
            }

            info!(
                "Rating partition {} (only_official={}): {} rows",
                meta_format,
                only_official,
                partition.len()
            );
            leader_elos.extend(rate_partition(
                meta_format,
                only_official,
                &partition,
                settings,
            )?);
        }
    }

    Ok(leader_elos)
}

fn partition_flags(only_official_filter: Option<bool>) -> Vec<bool> {
    match only_official_filter {
        Some(flag) => vec![flag],
        None => vec![true, false],
    }
}

fn rate_partition(
    meta_format: MetaFormat,
    only_official: bool,
    partition: &[&Match],
    settings: &EloSettings,
) -> Result<Vec<LeaderElo>, PipelineError> {
    let mut calculator = EloCalculator::new(settings);
    calculator.process(partition.iter().copied())?;

    let (start_date, end_date) = date_range(partition);

    let mut ratings: Vec<_> = calculator.into_ratings().into_iter().collect();
    ratings.sort();

    Ok(ratings
        .into_iter()
        .map(|(leader_id, elo)| LeaderElo {
            leader_id,
            meta_format,
            only_official,
            elo,
            start_date,
            end_date,
        })
        .collect())
}

fn date_range(partition: &[&Match]) -> (NaiveDate, NaiveDate) {
    let dates = partition.iter().map(|row| row.match_timestamp.date());
    let start = dates.clone().min().expect("partition is never empty");
    let end = dates.max().expect("partition is never empty");
    (start, end)
}
