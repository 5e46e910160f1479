//! Walks used to propagate a single selection change across the graph.
//!
//! Neither walk changes the selection, they only report which features would need to change.

use std::collections::HashSet;
use petgraph::prelude::*;

use super::DependencyGraph;
use super::SelectionState;

impl DependencyGraph {
	/// Features that have to be selected for `src` to become selected, including `src`.
	///
	/// Already selected features end the walk, so selecting an already selected feature needs nothing.
	/// Returned in node order.
	pub fn enable_closure(&self, src: NodeIndex, state: &SelectionState) -> Vec<NodeIndex> {
		let mut closure = Vec::<NodeIndex>::new();
		let mut visited = HashSet::<NodeIndex>::new();
		let mut stack = vec![src];

		while let Some(i) = stack.pop() {
			if state.is_selected(i) || !visited.insert(i) {
				continue;
			}
			closure.push(i);
			stack.extend(self.dependencies(i).filter(|d| !visited.contains(d)));
		}

		closure.sort();
		closure
	}

	/// Selected features that transitively depend on `src`, not including `src`.
	///
	/// The walk only continues through selected features.
	/// Cycles terminate on the visited set, every member of a cycle ends up in the closure.
	/// Returned in node order.
	pub fn disable_closure(&self, src: NodeIndex, state: &SelectionState) -> Vec<NodeIndex> {
		let mut closure = Vec::<NodeIndex>::new();
		let mut visited = HashSet::<NodeIndex>::from([src]);
		let mut stack = vec![src];

		while let Some(i) = stack.pop() {
			for d in self.dependents(i) {
				if state.is_selected(d) && visited.insert(d) {
					closure.push(d);
					stack.push(d);
				}
			}
		}

		closure.sort();
		closure
	}
}
