use thiserror::Error;

/// Everything that can go wrong while building or querying variables and rules.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FuzzyError {
    #[error("invalid membership function shape: {reason}")]
    InvalidShape { reason: String },

    #[error("invalid variable domain: {reason}")]
    InvalidDomain { reason: String },

    #[error(
        "membership function `{name}` spans [{knot_min}, {knot_max}] which falls outside the domain [{v_min}, {v_max}]"
    )]
    DomainMismatch {
        name: String,
        knot_min: f64,
        knot_max: f64,
        v_min: f64,
        v_max: f64,
    },

    #[error("expected {expected} value names but {found} were given")]
    NameCountMismatch { expected: usize, found: usize },

    #[error("invalid transitions: {reason}")]
    InvalidTransitions { reason: String },

    #[error("value name `{0}` is defined more than once")]
    DuplicateValue(String),

    #[error("variable `{variable}` has no value named `{value}`")]
    UnknownValue { variable: String, value: String },

    #[error("clause refers to a variable that is not registered")]
    UnknownVariable,

    #[error("input for variable `{variable}` is NaN")]
    NanInput { variable: String },

    #[error("a rule needs at least one antecedent clause")]
    EmptyAntecedent,

    #[error("unsupported operator `{0}`")]
    UnsupportedOperator(String),
}

pub type Result<T, E = FuzzyError> = std::result::Result<T, E>;
