//! Piecewise-linear membership functions, linguistic variables and single fuzzy rule
//! evaluation.
//!
//! ```
//! use fuzzy_rule::{AntecedentOp, FuzzyRule, ImplicationOp, Inputs, LinguisticVariable, Variables};
//!
//! let mut vars = Variables::new();
//! let speed = vars.add(LinguisticVariable::trapezoid(
//!     "Speed",
//!     0.,
//!     120.,
//!     vec![20., 40., 60., 80.],
//!     ["slow", "normal", "fast"],
//!     1.,
//! )?);
//! let brake = vars.add(LinguisticVariable::trapezoid("Brake", 0., 10., vec![2., 8.], ["soft", "hard"], 1.)?);
//!
//! let mut rule = FuzzyRule::new(&vars, [speed.is("fast")], brake.is("hard"), AntecedentOp::Min, ImplicationOp::Min)?;
//! let mut inputs = Inputs::new();
//! inputs.add("Speed", 70.);
//!
//! assert_eq!(rule.compute_antecedent_activation(&mut vars, &inputs)?, 0.5);
//! assert_eq!(rule.compute_consequent_activation(&vars)?.len(), 10);
//! # Ok::<(), fuzzy_rule::FuzzyError>(())
//! ```

mod arange;
mod dsl;
mod error;
mod inputs;
mod math;
mod membership;
mod ops;
mod rules;
mod variable;

pub use dsl::Clause;
pub use error::{FuzzyError, Result};
pub use inputs::Inputs;
pub use membership::MembershipFunction;
pub use ops::{AntecedentOp, ImplicationOp};
pub use rules::{FuzzyRule, RuleDisplay};
pub use variable::{
    LinguisticVariable, ValueNames, VariableKey, VariableShape, Variables, DEFAULT_RESOLUTION, MAX_DOMAIN_SAMPLES,
};
