use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::config::{AppConfig, MetaFormat};
use crate::database::{self, DbPool};
use crate::domain::{LeaderElo, Match};
use crate::errors::PipelineError;
use crate::rating;

use super::etl::EtlJob;

/// Recomputes leader Elo ratings from the stored match rows (or a
/// pre-materialized dataset) and publishes the snapshot atomically.
pub struct EloProcessingJob {
    config: AppConfig,
    meta_formats: Vec<MetaFormat>,
    matches_source_path: Option<PathBuf>,
    only_official_filter: Option<bool>,
    affected_meta_formats: Vec<MetaFormat>,
    pool: DbPool,
}

impl EloProcessingJob {
    pub fn new(
        config: AppConfig,
        meta_formats: Vec<MetaFormat>,
        matches_source_path: Option<PathBuf>,
        only_official_filter: Option<bool>,
    ) -> Result<Self> {
        let pool = database::create_pool(&config.storage.database_path)?;
        let mut conn = database::get_connection(&pool)?;
        database::setup::ensure_schema(&mut conn)?;

        Ok(Self {
            config,
            meta_formats,
            matches_source_path,
            only_official_filter,
            affected_meta_formats: Vec::new(),
            pool,
        })
    }

    fn extract_from_file(&self, path: &Path) -> Result<Vec<Match>> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read match dataset {}", path.display()))?;
        let mut matches: Vec<Match> = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse match dataset {}", path.display()))?;

        if !self.meta_formats.is_empty() {
            matches.retain(|row| self.meta_formats.contains(&row.meta_format));
        }
        Ok(matches)
    }

    fn extract_from_db(&self) -> Result<Vec<Match>> {
        let mut conn = database::get_connection(&self.pool)?;
        database::matches::list_by_meta_formats(&mut conn, &self.meta_formats)
    }
}

impl EtlJob for EloProcessingJob {
    type Extracted = Vec<Match>;
    type Transformed = Vec<LeaderElo>;

    fn extract(&mut self) -> Result<Self::Extracted> {
        info!("=== Starting Elo Processing ===\n");

        let matches = match &self.matches_source_path {
            Some(path) => self.extract_from_file(path)?,
            None => self.extract_from_db()?,
        };

        info!("  → Extracted {} match rows\n", matches.len());
        Ok(matches)
    }

    fn validate(&self, matches: &Self::Extracted) -> Result<()> {
        let present: BTreeSet<MetaFormat> =
            matches.iter().map(|row| row.meta_format).collect();

        for requested in &self.meta_formats {
            if !present.contains(requested) {
                return Err(PipelineError::MissingCoverage(*requested).into());
            }
        }
        Ok(())
    }

    fn transform(&mut self, matches: Self::Extracted) -> Result<Self::Transformed> {
        self.affected_meta_formats = affected_meta_formats(&self.meta_formats, &matches);

        let leader_elos = rating::calculate_leader_elos(
            &matches,
            self.only_official_filter,
            &self.config.elo,
        )?;

        info!("  → Computed {} leader rating rows\n", leader_elos.len());
        Ok(leader_elos)
    }

    fn load(&mut self, leader_elos: Self::Transformed) -> Result<()> {
        let mut conn = database::get_connection(&self.pool)?;
        database::leader_elos::replace_for_meta_formats(
            &mut conn,
            &self.affected_meta_formats,
            self.only_official_filter,
            &leader_elos,
        )?;

        info!(
            "  → Published snapshot for {} meta format(s)",
            self.affected_meta_formats.len()
        );
        info!("=== Processing Complete ===");
        Ok(())
    }
}

fn affected_meta_formats(requested: &[MetaFormat], matches: &[Match]) -> Vec<MetaFormat> {
    if !requested.is_empty() {
        return requested.to_vec();
    }
    let present: BTreeSet<MetaFormat> = matches.iter().map(|row| row.meta_format).collect();
    present.into_iter().collect()
}
