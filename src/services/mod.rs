pub mod etl;
pub mod import;
pub mod processing;

pub use etl::EtlJob;
pub use import::MatchImportJob;
pub use processing::EloProcessingJob;
