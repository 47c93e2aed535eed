use crate::domain::MatchResult;

// K-factor bands modeled on FIDE chess ratings: the higher a leader
// climbs, the smaller the per-match swing.
const K_BAND_PROVISIONAL: i32 = 32; // below 1500
const K_BAND_INTERMEDIATE: i32 = 20; // 1500..2400
const K_BAND_STRONG: i32 = 10; // 2400..3000
const K_BAND_ELITE: i32 = 5; // 3000 and above

/// Selects the K-factor from a leader's current (pre-update) rating.
pub fn k_factor(rating: i32) -> i32 {
    if rating < 1500 {
        K_BAND_PROVISIONAL
    } else if rating < 2400 {
        K_BAND_INTERMEDIATE
    } else if rating < 3000 {
        K_BAND_STRONG
    } else {
        K_BAND_ELITE
    }
}

/// Computes a leader's new Elo rating from the pre-update ratings of both
/// sides and the match result.
///
/// `expected = 1 / (1 + 10^((opponent - current) / 400))`, the actual score
/// is 0, 0.5 or 1. The float result is rounded half away from zero
/// (`f64::round`), which keeps repeated runs bit-identical.
pub fn calculate_new_elo(
    current_elo: i32,
    opponent_elo: i32,
    result: MatchResult,
    k_factor: i32,
) -> i32 {
    let actual_score = result.score();
    let expected_score =
        1.0 / (1.0 + 10f64.powf(f64::from(opponent_elo - current_elo) / 400.0));

    let new_elo = f64::from(current_elo) + f64::from(k_factor) * (actual_score - expected_score);
    new_elo.round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1000, 32)]
    #[case(1499, 32)]
    #[case(1500, 20)]
    #[case(2399, 20)]
    #[case(2400, 10)]
    #[case(2999, 10)]
    #[case(3000, 5)]
    #[case(3500, 5)]
    fn k_factor_bands(#[case] rating: i32, #[case] expected_k: i32) {
        assert_eq!(k_factor(rating), expected_k);
    }

    #[test]
    fn evenly_matched_win_moves_half_the_k_factor() {
        assert_eq!(calculate_new_elo(1000, 1000, MatchResult::Win, 32), 1016);
        assert_eq!(calculate_new_elo(1000, 1000, MatchResult::Lose, 32), 984);
    }

    #[test]
    fn evenly_matched_draw_does_not_move_the_rating() {
        assert_eq!(calculate_new_elo(1000, 1000, MatchResult::Draw, 32), 1000);
        assert_eq!(calculate_new_elo(2500, 2500, MatchResult::Draw, 10), 2500);
    }

    #[test]
    fn equal_k_deltas_are_symmetric() {
        let new_a = calculate_new_elo(1100, 900, MatchResult::Lose, 32);
        let new_b = calculate_new_elo(900, 1100, MatchResult::Win, 32);
        // Independent rounding can shift each side by at most one point.
        let delta_a = new_a - 1100;
        let delta_b = new_b - 900;
        assert!((delta_a + delta_b).abs() <= 1, "deltas {delta_a} and {delta_b}");
    }

    #[test]
    fn delta_scales_with_the_k_factor() {
        // Same expected/actual scores, K=32 vs K=10 (band of a 1400 vs a
        // 2500 leader): deltas relate as the K ratio.
        let delta_low = calculate_new_elo(1400, 1400, MatchResult::Win, k_factor(1400)) - 1400;
        let delta_high = calculate_new_elo(2500, 2500, MatchResult::Win, k_factor(2500)) - 2500;
        assert_eq!(delta_low, 16);
        assert_eq!(delta_high, 5);
    }

    #[test]
    fn underdog_gains_more_than_the_favorite_would() {
        let underdog_gain = calculate_new_elo(1000, 1400, MatchResult::Win, 32) - 1000;
        let favorite_gain = calculate_new_elo(1400, 1000, MatchResult::Win, 32) - 1400;
        assert!(underdog_gain > favorite_gain);
    }
}
