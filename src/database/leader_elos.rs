use anyhow::{Context, Result};
use rusqlite::types::Type;
use rusqlite::params;

use crate::config::MetaFormat;
use crate::domain::LeaderElo;

use super::connection::DbConn;

const ELO_COLUMNS: &str = "leader_id, meta_format, only_official, elo, start_date, end_date";

/// Replaces the rating snapshot of the given meta formats in one
/// transaction. A failed run rolls back and leaves the previously
/// published snapshot untouched. When `only_official` is set, only that
/// officiality partition is replaced.
pub fn replace_for_meta_formats(
    conn: &mut DbConn,
    meta_formats: &[MetaFormat],
    only_official: Option<bool>,
    rows: &[LeaderElo],
) -> Result<()> {
    let tx = conn.transaction()?;

    for meta_format in meta_formats {
        match only_official {
            Some(flag) => tx.execute(
                "DELETE FROM leader_elos WHERE meta_format = ?1 AND only_official = ?2",
                params![meta_format.as_str(), flag],
            ),
            None => tx.execute(
                "DELETE FROM leader_elos WHERE meta_format = ?1",
                params![meta_format.as_str()],
            ),
        }
        .context("Failed to delete existing leader elos")?;
    }

    {
        let insert_sql =
            format!("INSERT INTO leader_elos ({ELO_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)");
        let mut stmt = tx.prepare(&insert_sql)?;
        for row in rows {
            stmt.execute(params![
                row.leader_id,
                row.meta_format.as_str(),
                row.only_official,
                row.elo,
                row.start_date,
                row.end_date,
            ])
            .context("Failed to insert leader elo")?;
        }
    }

    tx.commit().context("Failed to commit leader elo replacement")
}

/// Read path used by the leaderboard: one partition, strongest leader first.
pub fn list_by_partition(
    conn: &mut DbConn,
    meta_format: MetaFormat,
    only_official: bool,
) -> Result<Vec<LeaderElo>> {
    let sql = format!(
        "SELECT {ELO_COLUMNS} FROM leader_elos WHERE meta_format = ?1 AND only_official = ?2 ORDER BY elo DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(
            params![meta_format.as_str(), only_official],
            parse_leader_elo_row,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_leader_elo_row(row: &rusqlite::Row) -> rusqlite::Result<LeaderElo> {
    let meta_raw: String = row.get(1)?;
    let meta_format = meta_raw
        .parse::<MetaFormat>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;

    Ok(LeaderElo {
        leader_id: row.get(0)?,
        meta_format,
        only_official: row.get(2)?,
        elo: row.get(3)?,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
    })
}
