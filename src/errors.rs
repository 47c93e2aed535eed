use thiserror::Error;

use crate::config::MetaFormat;

/// Fatal data problems inside the rating pipeline. Anything else (file I/O,
/// database access) propagates as `anyhow` errors with context attached at
/// the call site.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A match id does not resolve to exactly two complementary rows.
    /// Indicates corrupted upstream data; the affected partition must not
    /// produce any output.
    #[error("Data integrity violation for match {match_id}: {details}")]
    DataIntegrity { match_id: String, details: String },

    /// The aggregated counts of two leaders disagree, so some expanded
    /// events cannot be linked with a complementary row. Same class of
    /// failure as `DataIntegrity`, caught before match ids exist.
    #[error(
        "Asymmetric match counts between {leader_id} and {opponent_id}: \
         {unpaired} events without a complementary row"
    )]
    AsymmetricMatchup {
        leader_id: String,
        opponent_id: String,
        unpaired: usize,
    },

    /// A meta format was requested for recomputation but the source data
    /// contains no rows for it.
    #[error("No match data found for requested meta format {0}")]
    MissingCoverage(MetaFormat),
}
