//! Size normalization.
//!
//! Maps arbitrary "importance" values onto a narrow band of visual sizes by
//! linear interpolation between the observed minimum and maximum, so a single
//! outlier cannot dwarf the rest of the graph.

/// Target band for normalized sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRange {
    pub min: f32,
    pub max: f32,
}

impl SizeRange {
    pub fn new(min: f32, max: f32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Rounded center of the band.
    pub fn midpoint(&self) -> f32 {
        ((self.min + self.max) / 2.0).round().clamp(self.min, self.max)
    }

    /// Map `value` from the observed `[lo, hi]` into this band.
    ///
    /// When `lo == hi` every value maps to the midpoint.
    pub fn normalize(&self, value: f64, lo: f64, hi: f64) -> f32 {
        if hi <= lo {
            return self.midpoint();
        }
        let t = ((value - lo) / (hi - lo)) as f32;
        (self.min + t * (self.max - self.min))
            .round()
            .clamp(self.min, self.max)
    }
}

/// Normalize every raw size into `[range_min, range_max]`.
///
/// Results are whole pixel values. Equal inputs (including a single input)
/// all receive the midpoint of the range.
pub fn normalize_sizes(raw: &[f64], range_min: f32, range_max: f32) -> Vec<f32> {
    let range = SizeRange::new(range_min, range_max);
    let (lo, hi) = raw
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    raw.iter().map(|&v| range.normalize(v, lo, hi)).collect()
}
