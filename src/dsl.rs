use crate::variable::VariableKey;

/// A single `variable IS value` proposition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Clause {
    pub(crate) variable: VariableKey,
    pub(crate) value: String,
}

impl Clause {
    pub fn new(variable: VariableKey, value: impl Into<String>) -> Self {
        Clause {
            variable,
            value: value.into(),
        }
    }

    pub fn variable(&self) -> VariableKey {
        self.variable
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl VariableKey {
    pub fn is(self, value: impl Into<String>) -> Clause {
        Clause::new(self, value)
    }
}
