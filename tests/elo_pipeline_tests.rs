use chrono::Duration;
use rand::SeedableRng;
use rand::rngs::StdRng;

use op_leader_ranking::config::{EloSettings, MetaFormat};
use op_leader_ranking::database::{self, DbPool};
use op_leader_ranking::domain::{
    LeaderElo, LeaderMatchups, Match, MatchResult, MatchupSummary, expand_matchups, pair_events,
};
use op_leader_ranking::rating;

fn matchup(opponent_id: &str, win: u32, lose: u32, draw: u32) -> MatchupSummary {
    MatchupSummary {
        opponent_id: opponent_id.to_string(),
        num_matches: Some(win + lose + draw),
        score_win: win,
        score_lose: lose,
        score_draw: draw,
    }
}

fn doc(
    leader_id: &str,
    meta_format: MetaFormat,
    matchups: Vec<MatchupSummary>,
) -> LeaderMatchups {
    LeaderMatchups {
        leader_id: leader_id.to_string(),
        meta_format,
        official: true,
        matchups,
    }
}

/// Symmetric pair of documents: A 3-1-0 against B in the given meta.
fn meta_docs(meta_format: MetaFormat) -> Vec<LeaderMatchups> {
    vec![
        doc("OP01-001", meta_format, vec![matchup("OP01-002", 3, 1, 0)]),
        doc("OP01-002", meta_format, vec![matchup("OP01-001", 1, 3, 0)]),
    ]
}

fn expand_docs(docs: &[LeaderMatchups], seed: u64) -> Vec<Match> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut events = Vec::new();
    for doc in docs {
        events.extend(expand_matchups(doc, &mut rng));
    }
    pair_events(events).unwrap()
}

fn fresh_pool() -> DbPool {
    let pool = database::create_memory_pool().unwrap();
    let mut conn = database::get_connection(&pool).unwrap();
    database::setup::ensure_schema(&mut conn).unwrap();
    pool
}

#[test]
fn matches_survive_a_store_round_trip() {
    let pool = fresh_pool();
    let mut conn = database::get_connection(&pool).unwrap();

    let matches = expand_docs(&meta_docs(MetaFormat::OP01), 1);
    for row in &matches {
        database::matches::insert_match(&mut conn, row).unwrap();
    }

    let stored = database::matches::list_all(&mut conn).unwrap();
    assert_eq!(stored.len(), matches.len());

    let wins = stored
        .iter()
        .filter(|row| row.leader_id == "OP01-001" && row.result == MatchResult::Win)
        .count();
    assert_eq!(wins, 3);
    assert!(stored.iter().all(|row| row.official));
    assert_eq!(
        database::matches::distinct_meta_formats(&mut conn).unwrap(),
        vec![MetaFormat::OP01]
    );
}

#[test]
fn full_pipeline_produces_both_partitions() {
    let pool = fresh_pool();
    let mut conn = database::get_connection(&pool).unwrap();

    let matches = expand_docs(&meta_docs(MetaFormat::OP01), 2);
    database::matches::replace_for_meta_formats(&mut conn, &[MetaFormat::OP01], &matches)
        .unwrap();

    let stored = database::matches::list_by_meta_formats(&mut conn, &[MetaFormat::OP01]).unwrap();
    let leader_elos =
        rating::calculate_leader_elos(&stored, None, &EloSettings::default()).unwrap();

    // Two leaders, two partitions each (all docs are official, so both
    // partitions see the same rows here).
    assert_eq!(leader_elos.len(), 4);

    database::leader_elos::replace_for_meta_formats(
        &mut conn,
        &[MetaFormat::OP01],
        None,
        &leader_elos,
    )
    .unwrap();

    let published =
        database::leader_elos::list_by_partition(&mut conn, MetaFormat::OP01, true).unwrap();
    assert_eq!(published.len(), 2);
    // Strongest first, and the 3-1 leader ends above the starting Elo.
    assert_eq!(published[0].leader_id, "OP01-001");
    assert!(published[0].elo > 1000);
    assert!(published[1].elo < 1000);
}

#[test]
fn recomputation_is_deterministic_for_stored_rows() {
    let pool = fresh_pool();
    let mut conn = database::get_connection(&pool).unwrap();

    let matches = expand_docs(&meta_docs(MetaFormat::OP01), 3);
    database::matches::replace_for_meta_formats(&mut conn, &[MetaFormat::OP01], &matches)
        .unwrap();

    let stored = database::matches::list_all(&mut conn).unwrap();
    let first = rating::calculate_leader_elos(&stored, None, &EloSettings::default()).unwrap();
    let second = rating::calculate_leader_elos(&stored, None, &EloSettings::default()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn replacing_one_meta_format_leaves_others_untouched() {
    let pool = fresh_pool();
    let mut conn = database::get_connection(&pool).unwrap();

    let op01 = expand_docs(&meta_docs(MetaFormat::OP01), 4);
    let op02 = expand_docs(&meta_docs(MetaFormat::OP02), 5);
    database::matches::replace_for_meta_formats(&mut conn, &[MetaFormat::OP01], &op01).unwrap();
    database::matches::replace_for_meta_formats(&mut conn, &[MetaFormat::OP02], &op02).unwrap();

    let stored = database::matches::list_all(&mut conn).unwrap();
    let leader_elos =
        rating::calculate_leader_elos(&stored, None, &EloSettings::default()).unwrap();
    database::leader_elos::replace_for_meta_formats(
        &mut conn,
        &[MetaFormat::OP01, MetaFormat::OP02],
        None,
        &leader_elos,
    )
    .unwrap();

    let op02_before: Vec<LeaderElo> =
        database::leader_elos::list_by_partition(&mut conn, MetaFormat::OP02, true).unwrap();

    // Recompute OP01 only, from different source data.
    let changed_docs = vec![
        doc("OP01-001", MetaFormat::OP01, vec![matchup("OP01-002", 0, 5, 0)]),
        doc("OP01-002", MetaFormat::OP01, vec![matchup("OP01-001", 5, 0, 0)]),
    ];
    let changed = expand_docs(&changed_docs, 6);
    database::matches::replace_for_meta_formats(&mut conn, &[MetaFormat::OP01], &changed)
        .unwrap();

    let op01_rows =
        database::matches::list_by_meta_formats(&mut conn, &[MetaFormat::OP01]).unwrap();
    let op01_elos =
        rating::calculate_leader_elos(&op01_rows, None, &EloSettings::default()).unwrap();
    database::leader_elos::replace_for_meta_formats(
        &mut conn,
        &[MetaFormat::OP01],
        None,
        &op01_elos,
    )
    .unwrap();

    let op02_after =
        database::leader_elos::list_by_partition(&mut conn, MetaFormat::OP02, true).unwrap();
    assert_eq!(op02_before, op02_after);

    // And OP01 actually changed direction.
    let op01_published =
        database::leader_elos::list_by_partition(&mut conn, MetaFormat::OP01, true).unwrap();
    assert_eq!(op01_published[0].leader_id, "OP01-002");
}

#[test]
fn official_only_partition_can_be_replaced_in_isolation() {
    let pool = fresh_pool();
    let mut conn = database::get_connection(&pool).unwrap();

    let start = MetaFormat::OP01.approximate_tournament_start();
    let snapshot = |elo: i32, only_official: bool| LeaderElo {
        leader_id: "OP01-001".to_string(),
        meta_format: MetaFormat::OP01,
        only_official,
        elo,
        start_date: start.date(),
        end_date: (start + Duration::days(3)).date(),
    };

    database::leader_elos::replace_for_meta_formats(
        &mut conn,
        &[MetaFormat::OP01],
        None,
        &[snapshot(1016, true), snapshot(990, false)],
    )
    .unwrap();

    // Replace only the official partition.
    database::leader_elos::replace_for_meta_formats(
        &mut conn,
        &[MetaFormat::OP01],
        Some(true),
        &[snapshot(1032, true)],
    )
    .unwrap();

    let official =
        database::leader_elos::list_by_partition(&mut conn, MetaFormat::OP01, true).unwrap();
    let all = database::leader_elos::list_by_partition(&mut conn, MetaFormat::OP01, false)
        .unwrap();
    assert_eq!(official[0].elo, 1032);
    assert_eq!(all[0].elo, 990);
}
