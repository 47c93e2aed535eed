use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use crate::config::{AppConfig, MetaFormat};
use crate::database::{self, DbPool};
use crate::domain::{self, LeaderMatchups, Match};
use crate::errors::PipelineError;

use super::etl::EtlJob;

/// Imports aggregated matchup documents: expands them into individual
/// paired match rows and replaces the affected meta formats in the store.
pub struct MatchImportJob {
    data_dir: PathBuf,
    meta_formats: Vec<MetaFormat>,
    affected_meta_formats: Vec<MetaFormat>,
    pool: DbPool,
}

impl MatchImportJob {
    pub fn new(
        config: &AppConfig,
        data_dir: PathBuf,
        meta_formats: Vec<MetaFormat>,
    ) -> Result<Self> {
        let pool = database::create_pool(&config.storage.database_path)?;
        let mut conn = database::get_connection(&pool)?;
        database::setup::ensure_schema(&mut conn)?;

        Ok(Self {
            data_dir,
            meta_formats,
            affected_meta_formats: Vec::new(),
            pool,
        })
    }
}

impl EtlJob for MatchImportJob {
    type Extracted = Vec<LeaderMatchups>;
    type Transformed = Vec<Match>;

    fn extract(&mut self) -> Result<Self::Extracted> {
        info!("=== Starting Match Import ===\n");

        let mut docs = read_matchup_files(&self.data_dir)?;
        if !self.meta_formats.is_empty() {
            docs.retain(|doc| self.meta_formats.contains(&doc.meta_format));
        }

        info!("  → Loaded {} matchup documents\n", docs.len());
        Ok(docs)
    }

    fn validate(&self, docs: &Self::Extracted) -> Result<()> {
        let present: BTreeSet<MetaFormat> = docs.iter().map(|doc| doc.meta_format).collect();

        for requested in &self.meta_formats {
            if !present.contains(requested) {
                return Err(PipelineError::MissingCoverage(*requested).into());
            }
        }
        Ok(())
    }

    fn transform(&mut self, docs: Self::Extracted) -> Result<Self::Transformed> {
        self.affected_meta_formats = affected_meta_formats(&self.meta_formats, &docs);

        let mut rng = rand::rng();
        let mut events = Vec::new();
        for doc in &docs {
            events.extend(domain::expand_matchups(doc, &mut rng));
        }
        info!("  → Expanded to {} individual match events", events.len());

        let matches = domain::pair_events(events)?;
        info!("  → Paired into {} directional match rows\n", matches.len());
        Ok(matches)
    }

    fn load(&mut self, matches: Self::Transformed) -> Result<()> {
        let mut conn = database::get_connection(&self.pool)?;
        database::matches::replace_for_meta_formats(
            &mut conn,
            &self.affected_meta_formats,
            &matches,
        )?;

        info!(
            "  → Replaced matches for {} meta format(s)",
            self.affected_meta_formats.len()
        );
        info!("=== Import Complete ===");
        Ok(())
    }
}

fn affected_meta_formats(
    requested: &[MetaFormat],
    docs: &[LeaderMatchups],
) -> Vec<MetaFormat> {
    if !requested.is_empty() {
        return requested.to_vec();
    }
    let present: BTreeSet<MetaFormat> = docs.iter().map(|doc| doc.meta_format).collect();
    present.into_iter().collect()
}

/// Reads every `*.json` matchup document in the data directory.
pub fn read_matchup_files(data_dir: &Path) -> Result<Vec<LeaderMatchups>> {
    let entries = fs::read_dir(data_dir)
        .with_context(|| format!("Failed to read data directory {}", data_dir.display()))?;

    let mut docs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.extension().is_none_or(|ext| !ext.eq_ignore_ascii_case("json")) {
            continue;
        }

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let doc: LeaderMatchups = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse matchup document {}", path.display()))?;
        docs.push(doc);
    }

    Ok(docs)
}
