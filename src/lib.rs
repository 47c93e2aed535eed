pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod rating;
pub mod services;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

use crate::cli::Command;
use crate::config::MetaFormat;
use crate::config::settings::AppConfig;
use crate::services::etl::EtlJob;
use crate::services::import::MatchImportJob;
use crate::services::processing::EloProcessingJob;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_import(data_dir: PathBuf, meta_formats: &[String]) -> Result<()> {
    let config = AppConfig::new();
    let meta_formats = parse_meta_formats(meta_formats)?;
    let mut job = MatchImportJob::new(&config, data_dir, meta_formats)?;
    job.run()
}

pub fn handle_process(
    meta_formats: &[String],
    matches_path: Option<PathBuf>,
    only_official: Option<bool>,
) -> Result<()> {
    let config = AppConfig::new();
    let meta_formats = parse_meta_formats(meta_formats)?;
    let mut job = EloProcessingJob::new(config, meta_formats, matches_path, only_official)?;
    job.run()
}

fn parse_meta_formats(raw: &[String]) -> Result<Vec<MetaFormat>> {
    raw.iter()
        .map(|value| value.parse::<MetaFormat>().map_err(anyhow::Error::from))
        .collect()
}
