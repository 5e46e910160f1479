use petgraph::prelude::*;

use super::*;

/// Where a selection request came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
	/// A user clicking a single feature. Cascading disables need confirmation.
	User,
	/// Bulk or programmatic callers. Never asks for confirmation.
	Programmatic,
}

/// Features changed by a single commit, each list in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
	pub enabled: Vec<String>,
	pub disabled: Vec<String>,
}

impl ChangeSet {
	pub fn is_empty(&self) -> bool {
		self.enabled.is_empty() && self.disabled.is_empty()
	}
}

/// Outcome of a request made to a [`FeatureSelector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionStatus {
	/// The request was applied.
	Committed(ChangeSet),
	/// Everything was already in the requested state.
	Unchanged,
	/// Disabling would also disable dependents. Nothing has changed yet,
	/// answer with [`FeatureSelector::accept`] or [`FeatureSelector::reject`].
	ConfirmationRequired(ConfirmationInfo),
	/// A confirmation is still pending so the request was ignored.
	Blocked,
	UnknownFeature(String),
	UnknownCategory(String),
}

/// Called once after every commit with the selector in its new state.
pub type CommitObserver = Box<dyn FnMut(&FeatureSelector, &ChangeSet)>;

/// Keeps a feature selection consistent with a catalogs dependencies.
///
/// The selection is always upward closed: every selected feature has all of its dependencies selected.
/// The only exception is a selection replayed with [`FeatureSelector::hydrate`].
///
/// # Usage
/// 1. Create with [`FeatureSelector::new`] from a [`Catalog`](crate::catalog::Catalog).
/// 1. Seed it with [`FeatureSelector::apply_defaults`] or [`FeatureSelector::hydrate`].
/// 1. Forward user clicks with [`FeatureSelector::toggle`] using [`Origin::User`].
/// 1. When a toggle returns [`SelectionStatus::ConfirmationRequired`] show the affected features and call
/// [`FeatureSelector::accept`] or [`FeatureSelector::reject`].
/// 1. Read the result with [`FeatureSelector::selected_ids`] and the indicator accessors.
pub struct FeatureSelector {
	pub(super) dep_graph: DependencyGraph,
	pub(super) state: SelectionState,
	aggregates: Aggregates,
	pub(super) gate: ConfirmationGate,
	revision: u64,
	observer: Option<CommitObserver>,
}

impl std::fmt::Debug for FeatureSelector {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FeatureSelector")
			.field("dep_graph", &self.dep_graph)
			.field("state", &self.state)
			.field("gate", &self.gate)
			.field("revision", &self.revision)
			.finish_non_exhaustive()
	}
}

impl Default for FeatureSelector {
	fn default() -> Self {
		Self::new(&Catalog::default())
	}
}

impl FeatureSelector {
	/// Creates a selector with nothing selected.
	pub fn new(catalog: &Catalog) -> Self {
		let dep_graph = DependencyGraph::from_catalog(catalog);
		let state = SelectionState::new(&dep_graph);
		let aggregates = Aggregates::from_state(&dep_graph, &state);
		Self {
			dep_graph,
			state,
			aggregates,
			gate: Default::default(),
			revision: 0,
			observer: None,
		}
	}

	/// Replaces the catalog, dropping the current selection and any pending confirmation.
	///
	/// The commit observer is kept.
	pub fn load_catalog(&mut self, catalog: &Catalog) {
		if let Some(target) = catalog.target() {
			log::info!("Loading catalog for {}", target);
		}
		self.dep_graph = DependencyGraph::from_catalog(catalog);
		self.state = SelectionState::new(&self.dep_graph);
		self.state.recount(&self.dep_graph);
		self.aggregates = Aggregates::from_state(&self.dep_graph, &self.state);
		self.gate = Default::default();
		self.revision += 1;
	}

	pub fn set_commit_observer(&mut self, observer: impl FnMut(&FeatureSelector, &ChangeSet) + 'static) {
		self.observer = Some(Box::new(observer));
	}

	pub fn clear_commit_observer(&mut self) {
		self.observer = None;
	}

	/* Requests */

	/// Asks for a single feature to end up `selected`.
	///
	/// Selecting also selects everything the feature depends on.
	/// Deselecting also deselects every selected feature depending on it, when that set is not empty and
	/// `origin` is [`Origin::User`] nothing changes until the request is accepted.
	pub fn toggle(&mut self, id: &str, selected: bool, origin: Origin) -> SelectionStatus {
		if !self.gate.is_idle() {
			log::warn!("Ignoring request for `{}` while a confirmation is pending.", id);
			return SelectionStatus::Blocked;
		}

		let Some(i) = self.dep_graph.get_node_index(id) else {
			log::warn!("Request for unknown feature `{}`, ignoring.", id);
			return SelectionStatus::UnknownFeature(id.to_string());
		};

		if selected {
			let closure = self.dep_graph.enable_closure(i, &self.state);
			if closure.is_empty() {
				return SelectionStatus::Unchanged;
			}
			log::trace!("Selecting `{}` selects {} feature(s)", id, closure.len());
			SelectionStatus::Committed(self.commit(closure.into_iter().map(|d| (d, true))))
		} else {
			if !self.state.is_selected(i) {
				return SelectionStatus::Unchanged;
			}

			let affected = self.dep_graph.disable_closure(i, &self.state);
			if origin == Origin::User && !affected.is_empty() {
				let pending = PendingDisable { feature: i, affected };
				let info = self.confirmation_info(&pending);
				log::trace!("Deselecting `{}` needs confirmation, {} dependent(s) affected", id, info.affected.len());
				self.gate.hold(pending);
				return SelectionStatus::ConfirmationRequired(info);
			}

			log::trace!("Deselecting `{}` deselects {} dependent(s)", id, affected.len());
			SelectionStatus::Committed(self.commit(std::iter::once(i).chain(affected).map(|d| (d, false))))
		}
	}

	/// [`FeatureSelector::toggle`] from the user with any confirmation answered by `handler` straight away.
	pub fn toggle_with(&mut self, id: &str, selected: bool, handler: &mut impl ConfirmationHandler) -> SelectionStatus {
		match self.toggle(id, selected, Origin::User) {
			SelectionStatus::ConfirmationRequired(info) => match handler.on_confirmation_needed(&info) {
				Decision::Accept => self.accept(),
				Decision::Reject => self.reject(),
				Decision::Defer => SelectionStatus::ConfirmationRequired(info),
			},
			status => status,
		}
	}

	/// Commits the pending disable, the feature and all affected dependents are deselected together.
	pub fn accept(&mut self) -> SelectionStatus {
		let Some(pending) = self.gate.begin_commit() else {
			log::warn!("Accept called with no confirmation pending.");
			return SelectionStatus::Unchanged;
		};

		let set = self.commit(std::iter::once(pending.feature).chain(pending.affected).map(|d| (d, false)));
		self.gate.finish();
		SelectionStatus::Committed(set)
	}

	/// Drops the pending disable and explicitly leaves its feature selected.
	///
	/// Always commits, even if nothing changed, so views bound to the feature refresh.
	pub fn reject(&mut self) -> SelectionStatus {
		let Some(pending) = self.gate.cancel() else {
			log::warn!("Reject called with no confirmation pending.");
			return SelectionStatus::Unchanged;
		};

		SelectionStatus::Committed(self.commit(std::iter::once((pending.feature, true))))
	}

	/* Accessors */

	pub fn pending_confirmation(&self) -> Option<ConfirmationInfo> {
		self.gate.pending().map(|p| self.confirmation_info(p))
	}

	pub fn gate_state(&self) -> GateState {
		self.gate.state()
	}

	/// Unknown ids are never selected.
	pub fn is_selected(&self, id: &str) -> bool {
		self.dep_graph.get_node_index(id).map_or(false, |i| self.state.is_selected(i))
	}

	pub fn category_indicator(&self, name: &str) -> Option<Indicator> {
		let c = self.dep_graph.get_category_index(name)?;
		self.aggregates.categories.get(c).copied()
	}

	pub fn global_indicator(&self) -> Indicator {
		self.aggregates.global
	}

	/// Selected feature ids in catalog order.
	pub fn selected_ids(&self) -> Vec<String> {
		self.state.selected()
			.map(|i| self.dep_graph.get_node_identifier(i).to_string())
			.collect()
	}

	pub fn selected_count(&self) -> usize {
		self.state.selected_count()
	}

	pub fn feature_count(&self) -> usize {
		self.dep_graph.node_count()
	}

	pub fn category_names(&self) -> impl Iterator<Item = &str> {
		self.dep_graph.categories().iter().map(|c| c.name.as_str())
	}

	/// Number of commits made, also bumped when a catalog is loaded.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	/// Selected features that have an unselected dependency, as `(feature, dependency)` pairs.
	///
	/// Empty unless the selection was hydrated.
	pub fn closure_violations(&self) -> Vec<(String, String)> {
		let mut v = Vec::<(String, String)>::new();
		for i in self.state.selected() {
			let mut missing: Vec<NodeIndex> = self.dep_graph.dependencies(i).filter(|d| !self.state.is_selected(*d)).collect();
			missing.sort();
			for d in missing {
				v.push((self.dep_graph.get_node_identifier(i).to_string(), self.dep_graph.get_node_identifier(d).to_string()));
			}
		}
		v
	}

	/* Internals */

	fn confirmation_info(&self, pending: &PendingDisable) -> ConfirmationInfo {
		ConfirmationInfo {
			feature: self.dep_graph.get_node_identifier(pending.feature).to_string(),
			affected: pending.affected.iter().map(|i| self.dep_graph.get_node_identifier(*i).to_string()).collect(),
		}
	}

	/// Applies every change then refreshes the aggregates and notifies the observer once.
	pub(super) fn commit(&mut self, changes: impl IntoIterator<Item = (NodeIndex, bool)>) -> ChangeSet {
		let mut changes: Vec<_> = changes.into_iter().collect();
		changes.sort_by_key(|(i, _)| *i);

		let mut set = ChangeSet::default();
		let mut touched = Vec::<usize>::new();
		for (i, value) in changes {
			if !self.state.set(&self.dep_graph, i, value) {
				continue;
			}
			let c = self.dep_graph.category_of(i);
			if !touched.contains(&c) {
				touched.push(c);
			}
			let id = self.dep_graph.get_node_identifier(i).to_string();
			if value { set.enabled.push(id) } else { set.disabled.push(id) }
		}

		self.aggregates.refresh(&self.dep_graph, &self.state, touched);
		self.revision += 1;
		log::trace!("Commit {}: +{} -{}, {} of {} selected", self.revision, set.enabled.len(), set.disabled.len(), self.state.selected_count(), self.dep_graph.node_count());

		if let Some(mut observer) = self.observer.take() {
			observer(&*self, &set);
			self.observer = Some(observer);
		}
		set
	}

	pub(super) fn is_blocked(&self, request: &str) -> bool {
		if self.gate.is_idle() {
			false
		} else {
			log::warn!("Ignoring {} while a confirmation is pending.", request);
			true
		}
	}
}
