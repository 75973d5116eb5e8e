use super::weights::Weights;
use crate::error::MatchError;

/// Attainable raw-score range for a set of weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBounds {
    pub min: i64,
    pub max: i64,
}

impl ScoreBounds {
    pub fn of(weights: &Weights) -> Self {
        Self {
            min: weights.min_total(),
            max: weights.max_total(),
        }
    }

    /// Maps a raw score onto [0, 1]. Fails when the range is empty.
    pub fn normalize(&self, raw: i64) -> Result<f32, MatchError> {
        if self.max == self.min {
            return Err(MatchError::DegenerateWeights {
                min: self.min,
                max: self.max,
            });
        }
        let span = (self.max - self.min) as f64;
        let ratio = (raw - self.min) as f64 / span;
        Ok(ratio.clamp(0.0, 1.0) as f32)
    }
}
