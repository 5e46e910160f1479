//! Requests affecting many features at once.
//!
//! These never ask for confirmation and commit their whole effect as a single change.

use super::*;

impl FeatureSelector {
	/// Resets the selection to the catalog defaults, plus whatever those defaults depend on.
	pub fn apply_defaults(&mut self) -> SelectionStatus {
		if self.is_blocked("apply defaults") {
			return SelectionStatus::Blocked;
		}

		let mut target = SelectionState::new(&self.dep_graph);
		for i in self.dep_graph.node_indices() {
			if self.dep_graph.is_default(i) {
				for d in self.dep_graph.enable_closure(i, &target) {
					target.set(&self.dep_graph, d, true);
				}
			}
		}
		self.commit_towards(&target)
	}

	pub fn select_all(&mut self, selected: bool) -> SelectionStatus {
		if self.is_blocked("select all") {
			return SelectionStatus::Blocked;
		}

		let mut target = SelectionState::new(&self.dep_graph);
		if selected {
			for i in self.dep_graph.node_indices() {
				target.set(&self.dep_graph, i, true);
			}
		}
		self.commit_towards(&target)
	}

	/// Selects or deselects every member of a category.
	///
	/// The cascade still applies so features outside the category may change as well.
	pub fn select_category(&mut self, name: &str, selected: bool) -> SelectionStatus {
		if self.is_blocked("select category") {
			return SelectionStatus::Blocked;
		}

		let Some(c) = self.dep_graph.get_category_index(name) else {
			log::warn!("Request for unknown category `{}`, ignoring.", name);
			return SelectionStatus::UnknownCategory(name.to_string());
		};

		let mut target = self.state.clone();
		for &m in &self.dep_graph.categories()[c].members {
			if selected {
				for d in self.dep_graph.enable_closure(m, &target) {
					target.set(&self.dep_graph, d, true);
				}
			} else if target.is_selected(m) {
				for d in self.dep_graph.disable_closure(m, &target) {
					target.set(&self.dep_graph, d, false);
				}
				target.set(&self.dep_graph, m, false);
			}
		}
		self.commit_towards(&target)
	}

	/// Replaces the selection with exactly `ids`.
	///
	/// Dependencies are not added, a selection recorded against older dependency information is reproduced as is.
	/// Ids not in the catalog are skipped.
	pub fn hydrate<S: AsRef<str>>(&mut self, ids: impl IntoIterator<Item = S>) -> SelectionStatus {
		if self.is_blocked("hydrate") {
			return SelectionStatus::Blocked;
		}

		let mut target = SelectionState::new(&self.dep_graph);
		for id in ids {
			let id = id.as_ref();
			match self.dep_graph.get_node_index(id) {
				Some(i) => { target.set(&self.dep_graph, i, true); },
				None => log::warn!("Hydrating with unknown feature `{}`, skipping.", id),
			}
		}

		let status = self.commit_towards(&target);
		for (feature, dependency) in self.closure_violations() {
			log::debug!("Hydrated feature `{}` is missing its dependency `{}`", feature, dependency);
		}
		status
	}

	fn commit_towards(&mut self, target: &SelectionState) -> SelectionStatus {
		let changes = self.state.diff(target);
		if changes.is_empty() {
			return SelectionStatus::Unchanged;
		}
		SelectionStatus::Committed(self.commit(changes))
	}
}
