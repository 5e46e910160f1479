use petgraph::prelude::*;

use super::DependencyGraph;

/// Which features are selected, with running totals for the aggregate indicators.
///
/// Totals are maintained by [`SelectionState::set`] and only rebuilt from scratch when a catalog is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
	selected: Vec<bool>,
	selected_count: usize,
	category_counts: Vec<usize>,
}

impl SelectionState {
	/// Creates an empty selection sized for `dep_graph`.
	pub fn new(dep_graph: &DependencyGraph) -> Self {
		Self {
			selected: vec![false; dep_graph.node_count()],
			selected_count: 0,
			category_counts: vec![0; dep_graph.categories().len()],
		}
	}

	pub fn is_selected(&self, i: NodeIndex) -> bool {
		self.selected.get(i.index()).copied().unwrap_or(false)
	}

	/// Sets the state of `i` returning whether it changed.
	pub fn set(&mut self, dep_graph: &DependencyGraph, i: NodeIndex, value: bool) -> bool {
		let Some(slot) = self.selected.get_mut(i.index()) else { return false };
		if *slot == value {
			return false;
		}
		*slot = value;

		let category = dep_graph.category_of(i);
		if value {
			self.selected_count += 1;
			self.category_counts[category] += 1;
		} else {
			self.selected_count -= 1;
			self.category_counts[category] -= 1;
		}
		true
	}

	/// Rebuilds the totals from the per feature states.
	pub fn recount(&mut self, dep_graph: &DependencyGraph) {
		self.selected_count = 0;
		self.category_counts = vec![0; dep_graph.categories().len()];
		for i in dep_graph.node_indices() {
			if self.is_selected(i) {
				self.selected_count += 1;
				self.category_counts[dep_graph.category_of(i)] += 1;
			}
		}
	}

	pub fn selected_count(&self) -> usize {
		self.selected_count
	}

	pub fn category_count(&self, category: usize) -> usize {
		self.category_counts.get(category).copied().unwrap_or(0)
	}

	pub fn selected(&self) -> impl Iterator<Item = NodeIndex> + '_ {
		self.selected.iter()
			.enumerate()
			.filter(|(_, s)| **s)
			.map(|(i, _)| NodeIndex::new(i))
	}

	/// Lists the changes needed to turn this selection into `target`, in node order.
	pub fn diff(&self, target: &SelectionState) -> Vec<(NodeIndex, bool)> {
		self.selected.iter()
			.zip(target.selected.iter())
			.enumerate()
			.filter(|(_, (current, wanted))| current != wanted)
			.map(|(i, (_, wanted))| (NodeIndex::new(i), *wanted))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::{Catalog, Feature};

	fn graph() -> DependencyGraph {
		DependencyGraph::from_catalog(&Catalog::new(None, [
			Feature::new("A", "x"),
			Feature::new("B", "x"),
			Feature::new("C", "y"),
		]))
	}

	#[test]
	fn counts_follow_changes() {
		let g = graph();
		let mut state = SelectionState::new(&g);
		let a = g.get_node_index("A").unwrap();
		let c = g.get_node_index("C").unwrap();

		assert!(state.set(&g, a, true));
		assert!(!state.set(&g, a, true));
		assert!(state.set(&g, c, true));
		assert_eq!(state.selected_count(), 2);
		assert_eq!(state.category_count(g.get_category_index("x").unwrap()), 1);

		assert!(state.set(&g, a, false));
		assert_eq!(state.selected_count(), 1);
		assert_eq!(state.category_count(g.get_category_index("x").unwrap()), 0);
	}

	#[test]
	fn recount_matches_incremental_totals() {
		let g = graph();
		let mut state = SelectionState::new(&g);
		for i in g.node_indices() {
			state.set(&g, i, true);
		}
		let incremental = state.clone();
		state.recount(&g);
		assert_eq!(state, incremental);
	}

	#[test]
	fn diff_lists_only_differences() {
		let g = graph();
		let a = g.get_node_index("A").unwrap();
		let b = g.get_node_index("B").unwrap();
		let mut current = SelectionState::new(&g);
		current.set(&g, a, true);
		let mut target = SelectionState::new(&g);
		target.set(&g, b, true);

		assert_eq!(current.diff(&target), [(a, false), (b, true)]);
		assert!(current.diff(&current).is_empty());
	}
}
