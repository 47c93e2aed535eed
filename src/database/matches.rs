use anyhow::{Context, Result};
use rusqlite::types::Type;
use rusqlite::params;

use crate::config::MetaFormat;
use crate::domain::{Match, MatchResult};

use super::connection::DbConn;

const MATCH_COLUMNS: &str =
    "match_id, leader_id, opponent_id, result, meta_format, official, match_timestamp";

pub fn insert_match(conn: &mut DbConn, row: &Match) -> Result<()> {
    let sql = format!("INSERT INTO matches ({MATCH_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)");

    conn.execute(
        &sql,
        params![
            row.match_id,
            row.leader_id,
            row.opponent_id,
            row.result as i64,
            row.meta_format.as_str(),
            row.official,
            row.match_timestamp,
        ],
    )
    .context("Failed to insert match")?;

    Ok(())
}

pub fn list_all(conn: &mut DbConn) -> Result<Vec<Match>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches ORDER BY match_timestamp");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_by_meta_formats(
    conn: &mut DbConn,
    meta_formats: &[MetaFormat],
) -> Result<Vec<Match>> {
    if meta_formats.is_empty() {
        return list_all(conn);
    }

    let placeholders = placeholders(meta_formats.len());
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE meta_format IN ({placeholders}) ORDER BY match_timestamp"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(
            rusqlite::params_from_iter(meta_formats.iter().map(|m| m.as_str())),
            parse_match_row,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Replaces all match rows of the given meta formats in one transaction.
/// Readers never observe a half-imported meta.
pub fn replace_for_meta_formats(
    conn: &mut DbConn,
    meta_formats: &[MetaFormat],
    rows: &[Match],
) -> Result<()> {
    if meta_formats.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;

    let placeholders = placeholders(meta_formats.len());
    let delete_sql = format!("DELETE FROM matches WHERE meta_format IN ({placeholders})");
    tx.execute(
        &delete_sql,
        rusqlite::params_from_iter(meta_formats.iter().map(|m| m.as_str())),
    )
    .context("Failed to delete existing matches")?;

    {
        let insert_sql =
            format!("INSERT INTO matches ({MATCH_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)");
        let mut stmt = tx.prepare(&insert_sql)?;
        for row in rows {
            stmt.execute(params![
                row.match_id,
                row.leader_id,
                row.opponent_id,
                row.result as i64,
                row.meta_format.as_str(),
                row.official,
                row.match_timestamp,
            ])
            .context("Failed to insert match")?;
        }
    }

    tx.commit().context("Failed to commit match replacement")
}

pub fn distinct_meta_formats(conn: &mut DbConn) -> Result<Vec<MetaFormat>> {
    let sql = "SELECT DISTINCT meta_format FROM matches";

    let mut stmt = conn.prepare(sql)?;
    let mut metas = stmt
        .query_map([], |row| {
            let raw: String = row.get(0)?;
            parse_meta_format(0, &raw)
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    metas.sort();
    Ok(metas)
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    let result_raw: i64 = row.get(3)?;
    let result = MatchResult::try_from(result_raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Integer, Box::new(e)))?;

    let meta_raw: String = row.get(4)?;
    let meta_format = parse_meta_format(4, &meta_raw)?;

    Ok(Match {
        match_id: row.get(0)?,
        leader_id: row.get(1)?,
        opponent_id: row.get(2)?,
        result,
        meta_format,
        official: row.get(5)?,
        match_timestamp: row.get(6)?,
    })
}

fn parse_meta_format(column: usize, raw: &str) -> rusqlite::Result<MetaFormat> {
    raw.parse::<MetaFormat>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
