//! American odds math.
//!
//! Pure conversions between a book's American odds line, implied win
//! probability, and expected value. No side effects, fully deterministic;
//! everything downstream (analyzer, ranker, ledger) builds on these.

/// Implied win probability of an American odds line, assuming zero
/// book margin.
///
/// Positive odds (underdog pricing): `100 / (odds + 100)`, in (0, 0.5).
/// Non-positive odds (favorite pricing): `|odds| / (|odds| + 100)`,
/// in (0.5, 1). A zero line never appears on a real market and falls
/// through to favorite pricing by convention.
pub fn implied_probability(american_odds: i32) -> f64 {
    if american_odds > 0 {
        100.0 / (american_odds as f64 + 100.0)
    } else {
        let abs = american_odds.unsigned_abs() as f64;
        abs / (abs + 100.0)
    }
}

/// Payout per unit staked (excluding the returned stake) at the given
/// American odds line.
pub fn win_return(american_odds: i32) -> f64 {
    if american_odds > 0 {
        american_odds as f64 / 100.0
    } else {
        100.0 / american_odds.unsigned_abs() as f64
    }
}

/// Expected profit per unit staked, at a given true win probability,
/// under the given odds.
pub fn expected_value(true_probability: f64, american_odds: i32) -> f64 {
    true_probability * win_return(american_odds) - (1.0 - true_probability)
}

/// Render an American odds line with its sign, e.g. "+150" / "-180".
pub fn signed_odds(american_odds: i32) -> String {
    if american_odds > 0 {
        format!("+{american_odds}")
    } else {
        format!("{american_odds}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implied_probability_underdog() {
        // +150 → 100 / 250 = 0.4
        assert!((implied_probability(150) - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_implied_probability_favorite() {
        // -180 → 180 / 280 ≈ 0.6429
        assert!((implied_probability(-180) - 180.0 / 280.0).abs() < 1e-12);
        assert!((implied_probability(-180) - 0.6429).abs() < 1e-4);
    }

    #[test]
    fn test_implied_probability_ranges() {
        for odds in [101, 150, 250, 500, 10_000] {
            let p = implied_probability(odds);
            assert!(p > 0.0 && p < 0.5, "+{odds} gave {p}");
        }
        for odds in [-101, -150, -250, -500, -10_000] {
            let p = implied_probability(odds);
            assert!(p > 0.5 && p < 1.0, "{odds} gave {p}");
        }
    }

    #[test]
    fn test_implied_probability_even_line() {
        // ±100 is the even-money boundary on both conventions.
        assert!((implied_probability(100) - 0.5).abs() < 1e-12);
        assert!((implied_probability(-100) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_win_return() {
        assert!((win_return(150) - 1.5).abs() < 1e-12);
        assert!((win_return(-180) - 100.0 / 180.0).abs() < 1e-12);
        assert!((win_return(100) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_expected_value_known_scenario() {
        // 0.65 * (100/180) - 0.35 ≈ 0.0111
        let ev = expected_value(0.65, -180);
        assert!((ev - (0.65 * (100.0 / 180.0) - 0.35)).abs() < 1e-12);
        assert!((ev - 0.0111).abs() < 1e-4);
    }

    #[test]
    fn test_expected_value_fair_line() {
        // Betting at exactly the implied probability has zero EV.
        for odds in [-250, -180, -110, 100, 120, 200] {
            let ev = expected_value(implied_probability(odds), odds);
            assert!(ev.abs() < 1e-12, "{odds} gave EV {ev}");
        }
    }

    #[test]
    fn test_expected_value_monotonic_in_probability() {
        for odds in [-220, -110, 135, 240] {
            let mut prev = expected_value(0.05, odds);
            for step in 1..=18 {
                let p = 0.05 + step as f64 * 0.05;
                let ev = expected_value(p, odds);
                assert!(ev > prev, "EV not increasing at p={p} odds={odds}");
                prev = ev;
            }
        }
    }

    #[test]
    fn test_signed_odds() {
        assert_eq!(signed_odds(150), "+150");
        assert_eq!(signed_odds(-180), "-180");
        assert_eq!(signed_odds(0), "0");
    }
}
