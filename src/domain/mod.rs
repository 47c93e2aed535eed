pub mod expansion;
pub mod models;

pub use expansion::{MatchEvent, expand_matchups, pair_events};
pub use models::*;
