pub mod meta_formats;
pub mod settings;

pub use meta_formats::MetaFormat;
pub use settings::{AppConfig, EloSettings, StorageSettings};
