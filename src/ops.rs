use std::fmt;
use std::str::FromStr;

use num::Float;

use crate::error::FuzzyError;

/// And/Or operator method for combining the degrees of the propositions
/// in a fuzzy rule premise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AntecedentOp {
    /// AND_MIN
    Min,
    /// AND_PROD
    Prod,
    /// AND_BOUNDED_PRODUCT
    BoundedProd,
    /// OR_MAX
    Max,
    /// OR_PROBABILISTIC_SUM
    ProbOr,
    /// OR_BOUNDED_SUM
    BoundedSum,
}

impl AntecedentOp {
    pub const ALL: [Self; 6] = [
        Self::Min,
        Self::Prod,
        Self::BoundedProd,
        Self::Max,
        Self::ProbOr,
        Self::BoundedSum,
    ];

    /// Whether the operator belongs to the AND (T-norm) family.
    pub fn is_conjunction(self) -> bool {
        matches!(self, Self::Min | Self::Prod | Self::BoundedProd)
    }

    /// Pairwise application over two equally long sequences.
    pub fn call<F: Float>(
        self,
        u: impl IntoIterator<Item = F>,
        v: impl IntoIterator<Item = F>,
    ) -> impl Iterator<Item = F> {
        u.into_iter().zip(v).map(move |(u, v)| self.apply(u, v))
    }

    fn apply<F: Float>(self, u: F, v: F) -> F {
        match self {
            Self::Min => F::min(u, v),
            Self::Prod => u * v,
            Self::BoundedProd => F::max(F::zero(), u + v - F::one()),
            Self::Max => F::max(u, v),
            Self::ProbOr => u + v - u * v,
            Self::BoundedSum => F::min(F::one(), u + v),
        }
    }

    /// Reduces a whole set of degrees by folding the binary operator over them, so any
    /// number of degrees in `[0, 1]` reduces to a value in `[0, 1]` and a single degree
    /// reduces to itself.
    ///
    /// An empty set reduces to zero.
    pub fn reduce<F: Float>(self, degrees: impl IntoIterator<Item = F>) -> F {
        let mut iter = degrees.into_iter();

        let Some(first) = iter.next() else {
            return F::zero();
        };

        iter.fold(first, |acc, d| self.apply(acc, d))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Min => "AND_MIN",
            Self::Prod => "AND_PROD",
            Self::BoundedProd => "AND_BOUNDED_PRODUCT",
            Self::Max => "OR_MAX",
            Self::ProbOr => "OR_PROBABILISTIC_SUM",
            Self::BoundedSum => "OR_BOUNDED_SUM",
        }
    }
}

impl fmt::Display for AntecedentOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AntecedentOp {
    type Err = FuzzyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FuzzyError::UnsupportedOperator(s.to_owned()))
    }
}

/// Implication operator method for shaping the consequence membership by the
/// premise activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImplicationOp {
    /// Mamdani clipping
    Min,
    /// Larsen scaling
    Prod,
}

impl ImplicationOp {
    pub const ALL: [Self; 2] = [Self::Min, Self::Prod];

    pub fn call<F: Float>(self, activation: F, membership: impl IntoIterator<Item = F>) -> impl Iterator<Item = F> {
        membership.into_iter().map(move |m| match self {
            Self::Min => F::min(activation, m),
            Self::Prod => activation * m,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Min => "MIN",
            Self::Prod => "PROD",
        }
    }
}

impl fmt::Display for ImplicationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ImplicationOp {
    type Err = FuzzyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FuzzyError::UnsupportedOperator(s.to_owned()))
    }
}
