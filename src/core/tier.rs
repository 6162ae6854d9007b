use serde::{Deserialize, Serialize};
use std::fmt;

/// Credibility tier derived from the overall score.
///
/// Each tier is inclusive at its lower bound: `>= 70` is trusted,
/// `>= 50` is suspicious, anything lower is untrusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTier {
    Untrusted,
    Suspicious,
    Trusted,
}

impl StatusTier {
    pub const TRUSTED_MIN: i32 = 70;
    pub const SUSPICIOUS_MIN: i32 = 50;

    pub const fn from_score(score: i32) -> Self {
        if score >= Self::TRUSTED_MIN {
            StatusTier::Trusted
        } else if score >= Self::SUSPICIOUS_MIN {
            StatusTier::Suspicious
        } else {
            StatusTier::Untrusted
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            StatusTier::Trusted => "trusted",
            StatusTier::Suspicious => "suspicious",
            StatusTier::Untrusted => "untrusted",
        }
    }
}

impl fmt::Display for StatusTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clamps a producer-supplied percentage into `0..=100`.
pub fn clamp_percent(value: i32) -> u8 {
    value.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_score_respects_inclusive_lower_bounds() {
        assert_eq!(StatusTier::from_score(100), StatusTier::Trusted);
        assert_eq!(StatusTier::from_score(70), StatusTier::Trusted);
        assert_eq!(StatusTier::from_score(69), StatusTier::Suspicious);
        assert_eq!(StatusTier::from_score(50), StatusTier::Suspicious);
        assert_eq!(StatusTier::from_score(49), StatusTier::Untrusted);
        assert_eq!(StatusTier::from_score(0), StatusTier::Untrusted);
    }

    #[test]
    fn from_score_handles_out_of_range_scores() {
        assert_eq!(StatusTier::from_score(150), StatusTier::Trusted);
        assert_eq!(StatusTier::from_score(-5), StatusTier::Untrusted);
    }

    #[test]
    fn clamp_percent_bounds() {
        assert_eq!(clamp_percent(-1), 0);
        assert_eq!(clamp_percent(42), 42);
        assert_eq!(clamp_percent(101), 100);
    }
}
