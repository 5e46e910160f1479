//! Holds a user initiated disable until the user decides whether the cascade should go ahead.

use petgraph::prelude::*;

/// Shown to the user when disabling a feature would also disable others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationInfo {
	/// The feature the user asked to disable.
	pub feature: String,
	/// Selected features that depend on `feature` and would be disabled with it.
	pub affected: Vec<String>,
}

/// Answer given by a [`ConfirmationHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
	/// Disable the feature and everything in [`ConfirmationInfo::affected`].
	Accept,
	/// Keep the feature selected.
	Reject,
	/// Leave the request pending, it must later be answered with
	/// [`FeatureSelector::accept`](super::FeatureSelector::accept) or [`FeatureSelector::reject`](super::FeatureSelector::reject).
	Defer,
}

/// Decides pending cascading disables.
pub trait ConfirmationHandler {
	fn on_confirmation_needed(&mut self, info: &ConfirmationInfo) -> Decision;
}

impl<F> ConfirmationHandler for F
where F: FnMut(&ConfirmationInfo) -> Decision
{
	fn on_confirmation_needed(&mut self, info: &ConfirmationInfo) -> Decision {
		self(info)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
	Idle,
	AwaitingConfirmation,
	/// A confirmed cascade is being applied.
	Committing,
}

#[derive(Debug, Clone)]
pub(super) struct PendingDisable {
	pub feature: NodeIndex,
	pub affected: Vec<NodeIndex>,
}

#[derive(Debug, Clone, Default)]
pub(super) enum ConfirmationGate {
	#[default]
	Idle,
	AwaitingConfirmation(PendingDisable),
	Committing,
}

impl ConfirmationGate {
	pub fn state(&self) -> GateState {
		match self {
			ConfirmationGate::Idle => GateState::Idle,
			ConfirmationGate::AwaitingConfirmation(_) => GateState::AwaitingConfirmation,
			ConfirmationGate::Committing => GateState::Committing,
		}
	}

	pub fn is_idle(&self) -> bool {
		matches!(self, ConfirmationGate::Idle)
	}

	pub fn pending(&self) -> Option<&PendingDisable> {
		if let ConfirmationGate::AwaitingConfirmation(p) = self { Some(p) } else { None }
	}

	/// Idle -> AwaitingConfirmation. Returns `false` if the gate was not idle.
	pub fn hold(&mut self, pending: PendingDisable) -> bool {
		if !self.is_idle() {
			return false;
		}
		*self = ConfirmationGate::AwaitingConfirmation(pending);
		true
	}

	/// AwaitingConfirmation -> Committing, handing back the held request.
	pub fn begin_commit(&mut self) -> Option<PendingDisable> {
		match std::mem::take(self) {
			ConfirmationGate::AwaitingConfirmation(p) => {
				*self = ConfirmationGate::Committing;
				Some(p)
			},
			other => {
				*self = other;
				None
			},
		}
	}

	/// AwaitingConfirmation -> Idle, handing back the held request.
	pub fn cancel(&mut self) -> Option<PendingDisable> {
		match std::mem::take(self) {
			ConfirmationGate::AwaitingConfirmation(p) => Some(p),
			other => {
				*self = other;
				None
			},
		}
	}

	/// Committing -> Idle.
	pub fn finish(&mut self) {
		if matches!(self, ConfirmationGate::Committing) {
			*self = ConfirmationGate::Idle;
		}
	}
}
