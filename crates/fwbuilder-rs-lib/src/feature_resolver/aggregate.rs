use serde::{Serialize, Deserialize};

use super::DependencyGraph;
use super::SelectionState;

/// Tri-state summary shown for a category or the whole selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
	/// Nothing selected.
	#[default]
	Unselected,
	/// Every member selected.
	Selected,
	/// Some but not all members selected.
	Indeterminate,
}

impl Indicator {
	pub fn from_counts(selected: usize, total: usize) -> Self {
		if selected == 0 {
			Indicator::Unselected
		} else if selected >= total {
			Indicator::Selected
		} else {
			Indicator::Indeterminate
		}
	}
}

/// Indicators as of the last commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct Aggregates {
	pub global: Indicator,
	pub categories: Vec<Indicator>,
}

impl Aggregates {
	pub fn from_state(dep_graph: &DependencyGraph, state: &SelectionState) -> Self {
		let mut aggregates = Self {
			global: Indicator::Unselected,
			categories: vec![Indicator::Unselected; dep_graph.categories().len()],
		};
		aggregates.refresh(dep_graph, state, 0..dep_graph.categories().len());
		aggregates
	}

	/// Recomputes the global indicator and the given categories from the selection totals.
	pub fn refresh(&mut self, dep_graph: &DependencyGraph, state: &SelectionState, categories: impl IntoIterator<Item = usize>) {
		for c in categories {
			if let (Some(indicator), Some(category)) = (self.categories.get_mut(c), dep_graph.categories().get(c)) {
				*indicator = Indicator::from_counts(state.category_count(c), category.members.len());
			}
		}
		self.global = Indicator::from_counts(state.selected_count(), dep_graph.node_count());
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn indicator_boundaries() {
		assert_eq!(Indicator::from_counts(0, 3), Indicator::Unselected);
		assert_eq!(Indicator::from_counts(1, 3), Indicator::Indeterminate);
		assert_eq!(Indicator::from_counts(2, 3), Indicator::Indeterminate);
		assert_eq!(Indicator::from_counts(3, 3), Indicator::Selected);
		assert_eq!(Indicator::from_counts(0, 0), Indicator::Unselected);
	}
}
