use std::fmt;

use crate::error::{FuzzyError, Result};
use crate::math::{interp, interp_at};

/// A piecewise-linear membership curve over a non-decreasing sequence of knots.
///
/// Outside `[knots[0], knots[last]]` the curve is held flat at the end values. Repeated
/// knots are allowed and encode a vertical jump.
#[derive(Clone, Debug, PartialEq)]
pub struct MembershipFunction {
    knots: Vec<f64>,
    values: Vec<f64>,
}

impl MembershipFunction {
    pub fn new(knots: Vec<f64>, values: Vec<f64>) -> Result<Self> {
        if knots.len() != values.len() {
            return Err(FuzzyError::InvalidShape {
                reason: format!("{} knots but {} membership values", knots.len(), values.len()),
            });
        }
        if knots.is_empty() {
            return Err(FuzzyError::InvalidShape {
                reason: "at least one knot is required".into(),
            });
        }
        if let Some(k) = knots.iter().find(|k| !k.is_finite()) {
            return Err(FuzzyError::InvalidShape {
                reason: format!("knot {k} is not finite"),
            });
        }
        if let Some(v) = values.iter().find(|v| !(0. ..=1.).contains(*v)) {
            return Err(FuzzyError::InvalidShape {
                reason: format!("membership value {v} lies outside [0, 1]"),
            });
        }
        if let Some(w) = knots.windows(2).find(|w| w[0] > w[1]) {
            return Err(FuzzyError::InvalidShape {
                reason: format!("knots decrease from {} to {}", w[0], w[1]),
            });
        }

        Ok(Self { knots, values })
    }

    /// Builds a curve from `(knot, membership)` pairs.
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self> {
        let (knots, values) = points.iter().copied().unzip();

        Self::new(knots, values)
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.knots.iter().copied().zip(self.values.iter().copied())
    }

    /// The knot span `(first, last)`.
    pub fn span(&self) -> (f64, f64) {
        // Non-empty by construction
        (self.knots[0], self.knots[self.knots.len() - 1])
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        interp_at(x, &self.knots, &self.values)
    }

    pub fn evaluate_over(&self, xs: &[f64]) -> Vec<f64> {
        interp(xs, &self.knots, &self.values)
    }
}

impl fmt::Display for MembershipFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, (knot, membership)) in self.points().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "({knot:?}, {membership:?})")?;
        }
        f.write_str("]")
    }
}
