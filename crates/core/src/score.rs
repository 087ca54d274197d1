use serde::{Deserialize, Serialize};

/// One mutation of the running hand score. Chips stay integral; mult is a
/// float until the final multiply.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Effect {
    AddChips(i64),
    AddMult(f64),
    TimesMult(f64),
    TimesChips(f64),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Score {
    pub chips: i64,
    pub mult: f64,
}

impl Score {
    pub fn new(chips: i64, mult: f64) -> Self {
        Self { chips, mult }
    }

    pub fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::AddChips(value) => self.chips += value,
            Effect::AddMult(value) => self.mult += value,
            Effect::TimesMult(value) => self.mult *= value,
            Effect::TimesChips(value) => {
                self.chips = (self.chips as f64 * value).round() as i64;
            }
        }
    }

    /// Mult carried to 9 decimal places, applied once right before the
    /// final multiply so float noise cannot leak into the hand score.
    pub fn rounded_mult(&self) -> f64 {
        (self.mult * 1e9).round() / 1e9
    }

    /// Final hand score. Plasma-style balancing averages chips and mult
    /// and squares; the square exceeds i64 at high antes, hence i128.
    pub fn hand_total(&self, balanced: bool) -> i128 {
        let mult = self.rounded_mult();
        if balanced {
            let half = ((self.chips as f64 + mult) / 2.0).floor();
            (half * half).floor() as i128
        } else {
            (self.chips as f64 * mult).floor() as i128
        }
    }
}

/// Trace entry recorded for every `Effect` applied while scoring a hand.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreStep {
    pub source: String,
    pub effect: Effect,
    pub before: Score,
    pub after: Score,
}

/// Scores below 1e11 print as plain digits, everything above in
/// three-digit scientific notation.
pub fn format_score(value: i128) -> String {
    const PLAIN_LIMIT: i128 = 100_000_000_000;
    if value.abs() < PLAIN_LIMIT {
        value.to_string()
    } else {
        format!("{:.3e}", value as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_keeps_chips_integral() {
        let mut score = Score::new(100, 2.0);
        score.apply(Effect::AddChips(30));
        score.apply(Effect::AddMult(4.0));
        score.apply(Effect::TimesMult(1.5));
        score.apply(Effect::TimesChips(1.5));
        assert_eq!(score.chips, 195);
        assert!((score.mult - 9.0).abs() < 1e-12);
    }

    #[test]
    fn mult_rounds_to_nine_decimals() {
        let score = Score::new(10, 0.1 + 0.2);
        assert_eq!(score.rounded_mult(), 0.3);
        let noisy = Score::new(10, 1.000000000_4);
        assert_eq!(noisy.rounded_mult(), 1.0);
        assert_eq!(noisy.hand_total(false), 10);
    }

    #[test]
    fn balanced_total_squares_the_average() {
        let score = Score::new(10, 4.0);
        assert_eq!(score.hand_total(false), 40);
        assert_eq!(score.hand_total(true), 49);
    }

    #[test]
    fn big_balanced_total_formats_scientific() {
        let score = Score::new(208_199_999_999, 1.0);
        let total = score.hand_total(true);
        assert_eq!(format_score(total), "1.084e22");
    }

    #[test]
    fn small_scores_format_plain() {
        assert_eq!(format_score(0), "0");
        assert_eq!(format_score(312), "312");
        assert_eq!(format_score(99_999_999_999), "99999999999");
        assert_eq!(format_score(100_000_000_000), "1.000e11");
    }
}
