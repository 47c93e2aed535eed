pub mod aggregator;
pub mod calculator;
pub mod elo;

pub use aggregator::calculate_leader_elos;
pub use calculator::{EloCalculator, RatingState};
pub use elo::{calculate_new_elo, k_factor};
