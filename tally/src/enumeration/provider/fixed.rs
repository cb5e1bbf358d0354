use std::collections::BTreeSet;

use crate::core::Variable;
use crate::engine::ConstraintView;

use super::SplitVariableProvider;

/// Always splits on the same user-chosen variable set, regardless of the
/// candidates or the constraints.
#[derive(Clone)]
pub struct FixedSplitProvider {
    variables: BTreeSet<Variable>,
}

impl FixedSplitProvider {
    pub fn new(variables: impl IntoIterator<Item = Variable>) -> FixedSplitProvider {
        FixedSplitProvider {
            variables: variables.into_iter().collect(),
        }
    }
}

impl SplitVariableProvider for FixedSplitProvider {
    fn split_variables(
        &mut self,
        _constraints: &dyn ConstraintView,
        _candidates: &BTreeSet<Variable>,
    ) -> BTreeSet<Variable> {
        self.variables.clone()
    }

    fn clone_box(&self) -> Box<dyn SplitVariableProvider> {
        Box::new(self.clone())
    }
}
