use std::fmt;
use std::ops::{Index, IndexMut};

use indexmap::IndexMap;
use slotmap::{new_key_type, SlotMap};
use tracing::{debug, trace};

use crate::arange::Arange;
use crate::error::{FuzzyError, Result};
use crate::membership::MembershipFunction;

/// Sampling step used when a variable is built without an explicit resolution.
pub const DEFAULT_RESOLUTION: f64 = 0.1;

/// Upper bound on the number of domain samples a variable may have.
pub const MAX_DOMAIN_SAMPLES: usize = 1 << 24;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// Registry of linguistic variables. Rules refer into it by `VariableKey` and never own
/// the variables themselves.
#[derive(Default)]
pub struct Variables(pub(crate) SlotMap<VariableKey, LinguisticVariable>);

impl Variables {
    pub fn new() -> Self {
        Self(SlotMap::with_key())
    }

    pub fn add(&mut self, variable: LinguisticVariable) -> VariableKey {
        self.0.insert(variable)
    }

    pub fn get(&self, key: VariableKey) -> Option<&LinguisticVariable> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: VariableKey) -> Option<&mut LinguisticVariable> {
        self.0.get_mut(key)
    }

    /// Rules still holding the key will fail with `UnknownVariable`.
    pub fn remove(&mut self, key: VariableKey) -> Option<LinguisticVariable> {
        self.0.remove(key)
    }

    /// Looks a variable up by name. Names are not required to be unique; the first match wins.
    pub fn find(&self, name: &str) -> Option<VariableKey> {
        self.0.iter().find(|(_, var)| var.name == name).map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariableKey, &LinguisticVariable)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<VariableKey> for Variables {
    type Output = LinguisticVariable;

    fn index(&self, key: VariableKey) -> &Self::Output {
        &self.0[key]
    }
}

impl IndexMut<VariableKey> for Variables {
    fn index_mut(&mut self, key: VariableKey) -> &mut Self::Output {
        &mut self.0[key]
    }
}

/// How the value names of a variable are chosen.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueNames {
    /// One explicit name per value, in order
    List(Vec<String>),
    /// Names generated as `{stem}level_0`, `{stem}level_1`, ...
    Stem(String),
}

impl ValueNames {
    fn resolve(self, count: usize) -> Result<Vec<String>> {
        match self {
            Self::List(names) if names.len() != count => Err(FuzzyError::NameCountMismatch {
                expected: count,
                found: names.len(),
            }),
            Self::List(names) => Ok(names),
            Self::Stem(stem) => Ok((0..count).map(|i| format!("{stem}level_{i}")).collect()),
        }
    }
}

impl From<&str> for ValueNames {
    fn from(stem: &str) -> Self {
        Self::Stem(stem.to_owned())
    }
}

impl From<String> for ValueNames {
    fn from(stem: String) -> Self {
        Self::Stem(stem)
    }
}

impl From<Vec<String>> for ValueNames {
    fn from(names: Vec<String>) -> Self {
        Self::List(names)
    }
}

impl From<Vec<&str>> for ValueNames {
    fn from(names: Vec<&str>) -> Self {
        Self::List(names.into_iter().map(str::to_owned).collect())
    }
}

impl From<&[&str]> for ValueNames {
    fn from(names: &[&str]) -> Self {
        Self::List(names.iter().map(|n| (*n).to_owned()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ValueNames {
    fn from(names: [&str; N]) -> Self {
        Self::List(names.iter().map(|n| (*n).to_owned()).collect())
    }
}

/// The two ways a variable's membership functions come about.
#[derive(Clone, Debug, PartialEq)]
pub enum VariableShape {
    /// Caller-supplied curves of any shape
    Free,
    /// Open trapezoids at the ends and closed trapezoids in between, derived from
    /// consecutive pairs of transition points
    Trapezoid { transitions: Vec<f64> },
}

/// A named numeric axis sampled at a fixed resolution, holding named membership functions.
#[derive(Clone, Debug)]
pub struct LinguisticVariable {
    name: String,
    v_min: f64,
    v_max: f64,
    resolution: f64,
    domain: Vec<f64>,
    shape: VariableShape,
    values: IndexMap<String, MembershipFunction>,
    last_input: Option<f64>,
    last_memberships: IndexMap<String, f64>,
}

impl LinguisticVariable {
    /// Builds a variable from arbitrary membership functions, one per name.
    ///
    /// If the resolution is not provided, it defaults to [`DEFAULT_RESOLUTION`].
    pub fn free(
        name: impl Into<String>,
        v_min: f64,
        v_max: f64,
        functions: Vec<MembershipFunction>,
        names: impl Into<ValueNames>,
        resolution: impl Into<Option<f64>>,
    ) -> Result<Self> {
        let name = name.into();
        let resolution = resolution.into().unwrap_or(DEFAULT_RESOLUTION);

        check_domain(v_min, v_max, resolution)?;

        let names = names.into().resolve(functions.len())?;

        for (value_name, function) in names.iter().zip(&functions) {
            let (knot_min, knot_max) = function.span();

            if knot_min < v_min || knot_max > v_max {
                return Err(FuzzyError::DomainMismatch {
                    name: value_name.clone(),
                    knot_min,
                    knot_max,
                    v_min,
                    v_max,
                });
            }
        }

        Self::assemble(name, v_min, v_max, resolution, VariableShape::Free, names, functions)
    }

    /// Builds a variable whose `k + 1` values are trapezoids derived from `2k` transition
    /// points. The first value falls over `t0..t1`, the last rises over `t(2k-2)..t(2k-1)`
    /// and every interior value `j` rises over `t(2j-2)..t(2j-1)` and falls over
    /// `t(2j)..t(2j+1)`, so neighbours share their transition points and the memberships
    /// sum to one across the domain.
    ///
    /// If the resolution is not provided, it defaults to [`DEFAULT_RESOLUTION`].
    pub fn trapezoid(
        name: impl Into<String>,
        v_min: f64,
        v_max: f64,
        transitions: Vec<f64>,
        names: impl Into<ValueNames>,
        resolution: impl Into<Option<f64>>,
    ) -> Result<Self> {
        let name = name.into();
        let resolution = resolution.into().unwrap_or(DEFAULT_RESOLUTION);

        check_domain(v_min, v_max, resolution)?;
        check_transitions(&transitions, v_min, v_max)?;

        let k = transitions.len() / 2;
        let names = names.into().resolve(k + 1)?;
        let t = &transitions;
        let functions = (0..=k)
            .map(|j| {
                if j == 0 {
                    MembershipFunction::new(vec![t[0], t[1]], vec![1., 0.])
                } else if j == k {
                    MembershipFunction::new(vec![t[2 * k - 2], t[2 * k - 1]], vec![0., 1.])
                } else {
                    MembershipFunction::new(
                        vec![t[2 * j - 2], t[2 * j - 1], t[2 * j], t[2 * j + 1]],
                        vec![0., 1., 1., 0.],
                    )
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Self::assemble(
            name,
            v_min,
            v_max,
            resolution,
            VariableShape::Trapezoid { transitions },
            names,
            functions,
        )
    }

    fn assemble(
        name: String,
        v_min: f64,
        v_max: f64,
        resolution: f64,
        shape: VariableShape,
        names: Vec<String>,
        functions: Vec<MembershipFunction>,
    ) -> Result<Self> {
        let mut values = IndexMap::with_capacity(functions.len());

        for (value_name, function) in names.into_iter().zip(functions) {
            if values.contains_key(&value_name) {
                return Err(FuzzyError::DuplicateValue(value_name));
            }
            values.insert(value_name, function);
        }

        let domain: Vec<f64> = Arange::new(v_min, v_max, resolution).collect();

        debug!(
            variable = %name,
            n_values = values.len(),
            n_samples = domain.len(),
            "built linguistic variable"
        );

        Ok(Self {
            name,
            v_min,
            v_max,
            resolution,
            domain,
            shape,
            values,
            last_input: None,
            last_memberships: IndexMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.v_min, self.v_max)
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn shape(&self) -> &VariableShape {
        &self.shape
    }

    /// The sampled domain, `v_min` up to but excluding `v_max`.
    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    pub fn value_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn values(&self) -> &IndexMap<String, MembershipFunction> {
        &self.values
    }

    pub fn get(&self, value: &str) -> Option<&MembershipFunction> {
        self.values.get(value)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains_key(value)
    }

    /// `None` until the variable has been fuzzified at least once.
    pub fn last_input(&self) -> Option<f64> {
        self.last_input
    }

    pub fn last_memberships(&self) -> &IndexMap<String, f64> {
        &self.last_memberships
    }

    /// Degree of membership of `x` in every value, cached as the latest fuzzification.
    pub fn fuzzify(&mut self, x: f64) -> &IndexMap<String, f64> {
        self.last_memberships = self
            .values
            .iter()
            .map(|(value, function)| (value.clone(), function.evaluate(x)))
            .collect();
        self.last_input = Some(x);

        trace!(variable = %self.name, input = x, memberships = ?self.last_memberships, "fuzzified");

        &self.last_memberships
    }

    /// The named value's membership sampled over the whole domain.
    pub fn membership_of(&self, value: &str) -> Result<Vec<f64>> {
        let function = self.values.get(value).ok_or_else(|| FuzzyError::UnknownValue {
            variable: self.name.clone(),
            value: value.to_owned(),
        })?;

        Ok(function.evaluate_over(&self.domain))
    }
}

impl fmt::Display for LinguisticVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{:?}, {:?})", self.name, self.v_min, self.v_max)?;
        for (value, function) in &self.values {
            writeln!(f, "  {value}: {function}")?;
        }
        if let Some(input) = self.last_input {
            write!(f, "  input {input:?} ->")?;
            for (value, degree) in &self.last_memberships {
                write!(f, " {value}={degree:?}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn check_domain(v_min: f64, v_max: f64, resolution: f64) -> Result<()> {
    if !v_min.is_finite() || !v_max.is_finite() {
        return Err(FuzzyError::InvalidDomain {
            reason: format!("bounds [{v_min}, {v_max}] must be finite"),
        });
    }
    if v_min >= v_max {
        return Err(FuzzyError::InvalidDomain {
            reason: format!("v_min {v_min} must be below v_max {v_max}"),
        });
    }
    if !resolution.is_finite() || resolution <= 0. {
        return Err(FuzzyError::InvalidDomain {
            reason: format!("resolution {resolution} must be positive"),
        });
    }
    // Negated so an infinite ratio is caught too
    if !((v_max - v_min) / resolution <= MAX_DOMAIN_SAMPLES as f64) {
        return Err(FuzzyError::InvalidDomain {
            reason: format!("resolution {resolution} gives more than {MAX_DOMAIN_SAMPLES} samples"),
        });
    }
    Ok(())
}

fn check_transitions(transitions: &[f64], v_min: f64, v_max: f64) -> Result<()> {
    if transitions.is_empty() || transitions.len() % 2 != 0 {
        return Err(FuzzyError::InvalidTransitions {
            reason: format!("expected a non-zero even count, got {}", transitions.len()),
        });
    }
    if let Some(t) = transitions.iter().find(|t| !(v_min..=v_max).contains(*t)) {
        return Err(FuzzyError::InvalidTransitions {
            reason: format!("{t} lies outside [{v_min}, {v_max}]"),
        });
    }
    if let Some(w) = transitions.windows(2).find(|w| w[0] > w[1]) {
        return Err(FuzzyError::InvalidTransitions {
            reason: format!("transitions decrease from {} to {}", w[0], w[1]),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speed() -> LinguisticVariable {
        LinguisticVariable::trapezoid("Speed", 0., 120., vec![20., 40., 60., 80.], ["slow", "normal", "fast"], 1.)
            .unwrap()
    }

    fn points(var: &LinguisticVariable, value: &str) -> Vec<(f64, f64)> {
        var.get(value).unwrap().points().collect()
    }

    #[test]
    fn test_trapezoid_shapes() {
        let speed = speed();

        assert_eq!(points(&speed, "slow"), vec![(20., 1.), (40., 0.)]);
        assert_eq!(points(&speed, "normal"), vec![(20., 0.), (40., 1.), (60., 1.), (80., 0.)]);
        assert_eq!(points(&speed, "fast"), vec![(60., 0.), (80., 1.)]);
        assert_eq!(speed.value_names().collect::<Vec<_>>(), vec!["slow", "normal", "fast"]);
    }

    #[test]
    fn test_fuzzify() {
        let mut speed = speed();

        assert_eq!(speed.last_input(), None);

        let memberships = speed.fuzzify(70.).clone();

        assert_eq!(memberships["slow"], 0.);
        assert_eq!(memberships["normal"], 0.5);
        assert_eq!(memberships["fast"], 0.5);
        assert_eq!(speed.last_input(), Some(70.));
        assert_eq!(speed.last_memberships(), &memberships);

        // Idempotent
        assert_eq!(speed.fuzzify(70.), &memberships);
    }

    #[test]
    fn test_zero_input_is_not_unset() {
        let mut speed = speed();

        speed.fuzzify(0.);

        assert_eq!(speed.last_input(), Some(0.));
        assert_eq!(speed.last_memberships()["slow"], 1.);
    }

    #[test]
    fn test_domain_is_right_open() {
        let speed = speed();

        assert_eq!(speed.domain().len(), 120);
        assert_eq!(speed.domain()[0], 0.);
        assert_eq!(*speed.domain().last().unwrap(), 119.);
    }

    #[test]
    fn test_membership_of() {
        let speed = speed();
        let fast = speed.membership_of("fast").unwrap();

        assert_eq!(fast.len(), speed.domain().len());
        assert_eq!(fast[0], 0.);
        assert_eq!(fast[70], 0.5);
        assert_eq!(fast[119], 1.);

        assert_eq!(
            speed.membership_of("warp"),
            Err(FuzzyError::UnknownValue {
                variable: "Speed".into(),
                value: "warp".into()
            })
        );
    }

    #[test]
    fn test_trapezoid_partition_of_unity() {
        let mut var = LinguisticVariable::trapezoid(
            "Level",
            0.,
            70.,
            vec![10., 20., 30., 40., 50., 60.],
            "",
            None,
        )
        .unwrap();

        assert_eq!(
            var.value_names().collect::<Vec<_>>(),
            vec!["level_0", "level_1", "level_2", "level_3"]
        );
        assert_eq!(points(&var, "level_1"), vec![(10., 0.), (20., 1.), (30., 1.), (40., 0.)]);
        assert_eq!(points(&var, "level_2"), vec![(30., 0.), (40., 1.), (50., 1.), (60., 0.)]);

        for x in [0., 5., 12.5, 20., 25., 33., 45., 57.5, 69.] {
            let total: f64 = var.fuzzify(x).values().sum();
            assert!((total - 1.).abs() < 1e-12, "memberships at {x} sum to {total}");
        }
    }

    #[test]
    fn test_single_pair_of_transitions() {
        let var = LinguisticVariable::trapezoid("Temp", 0., 10., vec![3., 7.], ["cold", "hot"], 1.).unwrap();

        assert_eq!(points(&var, "cold"), vec![(3., 1.), (7., 0.)]);
        assert_eq!(points(&var, "hot"), vec![(3., 0.), (7., 1.)]);
    }

    #[test]
    fn test_invalid_transitions() {
        let odd = LinguisticVariable::trapezoid("x", 0., 10., vec![1., 2., 3.], "x", 1.);
        let empty = LinguisticVariable::trapezoid("x", 0., 10., vec![], "x", 1.);
        let decreasing = LinguisticVariable::trapezoid("x", 0., 10., vec![4., 2.], "x", 1.);
        let outside = LinguisticVariable::trapezoid("x", 0., 10., vec![4., 12.], "x", 1.);

        for result in [odd, empty, decreasing, outside] {
            assert!(matches!(result, Err(FuzzyError::InvalidTransitions { .. })));
        }
    }

    #[test]
    fn test_trapezoid_name_count() {
        let result = LinguisticVariable::trapezoid("x", 0., 10., vec![2., 4.], ["a", "b", "c"], 1.);

        assert_eq!(
            result.unwrap_err(),
            FuzzyError::NameCountMismatch {
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn test_free_variable() {
        let low = MembershipFunction::from_points(&[(0., 1.), (5., 0.)]).unwrap();
        let high = MembershipFunction::from_points(&[(3., 0.), (8., 0.5), (10., 1.)]).unwrap();
        let mut var = LinguisticVariable::free("Pressure", 0., 10., vec![low, high], "p_", 0.5).unwrap();

        assert_eq!(var.shape(), &VariableShape::Free);
        assert_eq!(var.value_names().collect::<Vec<_>>(), vec!["p_level_0", "p_level_1"]);
        assert_eq!(var.domain().len(), 20);

        let memberships = var.fuzzify(9.);

        assert_eq!(memberships["p_level_0"], 0.);
        assert_eq!(memberships["p_level_1"], 0.75);
    }

    #[test]
    fn test_free_variable_domain_mismatch() {
        let wide = MembershipFunction::from_points(&[(-1., 1.), (5., 0.)]).unwrap();
        let err = LinguisticVariable::free("x", 0., 10., vec![wide], ["wide"], None).unwrap_err();

        assert!(matches!(err, FuzzyError::DomainMismatch { ref name, .. } if name == "wide"));
    }

    #[test]
    fn test_free_variable_name_count_mismatch() {
        let mf = MembershipFunction::from_points(&[(0., 1.), (5., 0.)]).unwrap();
        let err = LinguisticVariable::free("x", 0., 10., vec![mf], ["a", "b"], None).unwrap_err();

        assert_eq!(
            err,
            FuzzyError::NameCountMismatch {
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn test_duplicate_value_names() {
        let err = LinguisticVariable::trapezoid("x", 0., 10., vec![2., 4.], ["a", "a"], None).unwrap_err();

        assert_eq!(err, FuzzyError::DuplicateValue("a".into()));
    }

    #[test]
    fn test_invalid_domain() {
        assert!(matches!(
            LinguisticVariable::trapezoid("x", 10., 0., vec![2., 4.], "x", None),
            Err(FuzzyError::InvalidDomain { .. })
        ));
        assert!(matches!(
            LinguisticVariable::trapezoid("x", 0., 10., vec![2., 4.], "x", 0.),
            Err(FuzzyError::InvalidDomain { .. })
        ));
    }

    #[test]
    fn test_too_many_domain_samples() {
        assert!(matches!(
            LinguisticVariable::trapezoid("x", 0., 1e300, vec![2., 4.], "x", 1e-300),
            Err(FuzzyError::InvalidDomain { .. })
        ));
        assert!(matches!(
            LinguisticVariable::trapezoid("x", 0., 10., vec![2., 4.], "x", 1e-7),
            Err(FuzzyError::InvalidDomain { .. })
        ));
        assert!(LinguisticVariable::trapezoid("x", 0., 1., vec![0.2, 0.4], "x", 1e-6).is_ok());
    }

    #[test]
    fn test_display() {
        let mut speed = speed();
        let rendered = speed.to_string();

        assert!(rendered.contains("slow: [(20.0, 1.0), (40.0, 0.0)]"));
        assert!(rendered.contains("normal: [(20.0, 0.0), (40.0, 1.0), (60.0, 1.0), (80.0, 0.0)]"));
        assert!(rendered.contains("fast: [(60.0, 0.0), (80.0, 1.0)]"));
        assert!(!rendered.contains("input"));

        speed.fuzzify(70.);

        assert!(speed.to_string().contains("input 70.0 -> slow=0.0 normal=0.5 fast=0.5"));
    }

    #[test]
    fn test_registry_lookup() {
        let mut vars = Variables::new();
        let key = vars.add(speed());

        assert_eq!(vars.find("Speed"), Some(key));
        assert_eq!(vars.find("Distance"), None);
        assert_eq!(vars[key].name(), "Speed");

        vars[key].fuzzify(30.);

        assert_eq!(vars.get(key).and_then(|v| v.last_input()), Some(30.));
    }
}
