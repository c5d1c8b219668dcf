use std::fmt;

use tracing::{debug, trace};

use crate::dsl::Clause;
use crate::error::{FuzzyError, Result};
use crate::inputs::Inputs;
use crate::ops::{AntecedentOp, ImplicationOp};
use crate::variable::Variables;

/// One `IF ... THEN ...` rule over variables held in a [`Variables`] registry.
///
/// The activations are caches: each compute call overwrites them and nothing else is kept.
#[derive(Clone, Debug)]
pub struct FuzzyRule {
    antecedent: Vec<Clause>,
    consequent: Clause,
    antecedent_op: AntecedentOp,
    implication_op: ImplicationOp,
    antecedent_activation: f64,
    consequent_activation: Vec<f64>,
}

impl FuzzyRule {
    pub fn new(
        vars: &Variables,
        antecedent: impl IntoIterator<Item = Clause>,
        consequent: Clause,
        antecedent_op: AntecedentOp,
        implication_op: ImplicationOp,
    ) -> Result<Self> {
        let antecedent: Vec<Clause> = antecedent.into_iter().collect();

        if antecedent.is_empty() {
            return Err(FuzzyError::EmptyAntecedent);
        }

        for clause in antecedent.iter().chain(Some(&consequent)) {
            check_clause(vars, clause)?;
        }

        let consequent_activation = vec![0.; vars[consequent.variable].domain().len()];

        Ok(Self {
            antecedent,
            consequent,
            antecedent_op,
            implication_op,
            antecedent_activation: 0.,
            consequent_activation,
        })
    }

    /// Like [`FuzzyRule::new`] with the operators given by name, e.g. `"AND_MIN"` and `"PROD"`.
    pub fn parse_ops(
        vars: &Variables,
        antecedent: impl IntoIterator<Item = Clause>,
        consequent: Clause,
        antecedent_op: &str,
        implication_op: &str,
    ) -> Result<Self> {
        Self::new(
            vars,
            antecedent,
            consequent,
            antecedent_op.parse()?,
            implication_op.parse()?,
        )
    }

    pub fn antecedent(&self) -> &[Clause] {
        &self.antecedent
    }

    pub fn consequent(&self) -> &Clause {
        &self.consequent
    }

    pub fn antecedent_op(&self) -> AntecedentOp {
        self.antecedent_op
    }

    pub fn implication_op(&self) -> ImplicationOp {
        self.implication_op
    }

    pub fn antecedent_activation(&self) -> f64 {
        self.antecedent_activation
    }

    pub fn consequent_activation(&self) -> &[f64] {
        &self.consequent_activation
    }

    /// Fuzzifies every antecedent variable that has an input and combines the clause degrees
    /// with the antecedent operator.
    ///
    /// Clauses whose variable is missing from `inputs` are skipped. If none has an input the
    /// activation is zero. Every clause is checked before any variable is fuzzified, so a
    /// failed call leaves the variables' cached results untouched.
    pub fn compute_antecedent_activation(&mut self, vars: &mut Variables, inputs: &Inputs) -> Result<f64> {
        let mut present = Vec::with_capacity(self.antecedent.len());

        for clause in &self.antecedent {
            check_clause(vars, clause)?;

            let name = vars[clause.variable].name();
            let Some(input) = inputs.get(name) else {
                trace!(variable = %name, "no input, skipping clause");
                continue;
            };

            if input.is_nan() {
                return Err(FuzzyError::NanInput {
                    variable: name.to_owned(),
                });
            }

            present.push((clause, input));
        }

        let mut degrees = Vec::with_capacity(present.len());

        for (clause, input) in present {
            let memberships = vars[clause.variable].fuzzify(input);

            // Checked above
            degrees.push(memberships.get(&clause.value).copied().unwrap_or_default());
        }

        self.antecedent_activation = self.antecedent_op.reduce(degrees.iter().copied());

        debug!(
            op = %self.antecedent_op,
            clauses = degrees.len(),
            activation = self.antecedent_activation,
            "computed antecedent activation"
        );

        Ok(self.antecedent_activation)
    }

    /// Shapes the consequent membership over its variable's domain by the current antecedent
    /// activation. Before any antecedent computation that activation is zero, which yields an
    /// all-zero curve.
    pub fn compute_consequent_activation(&mut self, vars: &Variables) -> Result<&[f64]> {
        let var = vars.get(self.consequent.variable).ok_or(FuzzyError::UnknownVariable)?;
        let membership = var.membership_of(&self.consequent.value)?;

        self.consequent_activation = self
            .implication_op
            .call(self.antecedent_activation, membership)
            .collect();

        debug!(
            op = %self.implication_op,
            activation = self.antecedent_activation,
            samples = self.consequent_activation.len(),
            "computed consequent activation"
        );

        Ok(&self.consequent_activation)
    }

    /// Renders the rule as `IF var IS value AND ... THEN var IS value`, resolving variable
    /// names through `vars`.
    pub fn display<'a>(&'a self, vars: &'a Variables) -> RuleDisplay<'a> {
        RuleDisplay { rule: self, vars }
    }
}

fn check_clause(vars: &Variables, clause: &Clause) -> Result<()> {
    let var = vars.get(clause.variable).ok_or(FuzzyError::UnknownVariable)?;

    if !var.contains(&clause.value) {
        return Err(FuzzyError::UnknownValue {
            variable: var.name().to_owned(),
            value: clause.value.clone(),
        });
    }

    Ok(())
}

pub struct RuleDisplay<'a> {
    rule: &'a FuzzyRule,
    vars: &'a Variables,
}

impl RuleDisplay<'_> {
    fn clause(&self, f: &mut fmt::Formatter<'_>, clause: &Clause) -> fmt::Result {
        let name = self.vars.get(clause.variable).map_or("?", |v| v.name());

        write!(f, "{name} IS {}", clause.value)
    }
}

impl fmt::Display for RuleDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let connective = if self.rule.antecedent_op.is_conjunction() {
            "AND"
        } else {
            "OR"
        };

        f.write_str("IF ")?;
        for (i, clause) in self.rule.antecedent.iter().enumerate() {
            if i > 0 {
                write!(f, " {connective} ")?;
            }
            self.clause(f, clause)?;
        }
        f.write_str(" THEN ")?;
        self.clause(f, &self.rule.consequent)?;
        write!(f, " (activation: {:?})", self.rule.antecedent_activation)
    }
}
