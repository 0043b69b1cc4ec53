use crate::error::PredictionError;
use serde::Serialize;

/// Scores at or above this value are classified as a full bin.
pub const DECISION_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BinLabel {
    Full,
    Empty,
}

impl BinLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinLabel::Full => "full",
            BinLabel::Empty => "empty",
        }
    }
}

impl std::fmt::Display for BinLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    pub label: BinLabel,
    /// Always within `[0.5, 1.0]`.
    pub confidence: f32,
    pub raw_score: f32,
}

impl Verdict {
    pub fn from_score(raw_score: f32) -> Result<Self, PredictionError> {
        if !(0.0..=1.0).contains(&raw_score) {
            return Err(PredictionError::InvalidScore(raw_score));
        }

        let (label, confidence) = if raw_score >= DECISION_THRESHOLD {
            (BinLabel::Full, raw_score)
        } else {
            (BinLabel::Empty, 1. - raw_score)
        };

        Ok(Self {
            label,
            confidence,
            raw_score,
        })
    }

    pub fn confidence_percent(&self) -> f32 {
        self.confidence * 100.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_bin() {
        let verdict = Verdict::from_score(0.82).unwrap();
        assert_eq!(verdict.label, BinLabel::Full);
        assert_eq!(verdict.confidence, 0.82);
        assert!((verdict.confidence_percent() - 82.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_bin() {
        let verdict = Verdict::from_score(0.10).unwrap();
        assert_eq!(verdict.label, BinLabel::Empty);
        assert!((verdict.confidence - 0.90).abs() < 1e-6);
        assert_eq!(verdict.raw_score, 0.10);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let verdict = Verdict::from_score(0.5).unwrap();
        assert_eq!(verdict.label, BinLabel::Full);
        assert_eq!(verdict.confidence, 0.5);
    }

    #[test]
    fn test_label_and_confidence_over_score_range() {
        for step in 0..=1000 {
            let score = step as f32 / 1000.;
            let verdict = Verdict::from_score(score).unwrap();

            assert_eq!(verdict.label == BinLabel::Full, score >= 0.5);
            assert!((0.5..=1.0).contains(&verdict.confidence));
            if score >= 0.5 {
                assert_eq!(verdict.confidence, score);
            } else {
                assert_eq!(verdict.confidence, 1. - score);
            }
        }
    }

    #[test]
    fn test_rejects_out_of_range_scores() {
        assert!(matches!(
            Verdict::from_score(1.2),
            Err(PredictionError::InvalidScore(_))
        ));
        assert!(Verdict::from_score(-0.1).is_err());
        assert!(Verdict::from_score(f32::NAN).is_err());
    }
}
