//! Keeps a users choice of build features consistent with the dependencies declared in a catalog.
//!
//! # Usage
//! 1. Create a [`FeatureSelector`] from a [`Catalog`].
//! 1. Seed it with [`FeatureSelector::apply_defaults()`], or [`FeatureSelector::hydrate()`] when rebuilding from a previous build.
//! 1. Pass user clicks to [`FeatureSelector::toggle()`] with [`Origin::User`]. Bulk actions use
//! [`FeatureSelector::select_all()`] and [`FeatureSelector::select_category()`].
//! 1. When [`SelectionStatus::ConfirmationRequired`] is returned show the [`ConfirmationInfo`] to the user
//! and answer with [`FeatureSelector::accept()`] or [`FeatureSelector::reject()`].
//! No other changes are accepted until then.
//! 1. [`FeatureSelector::selected_ids()`] gives the features to request the build with.
//!
//! # Cycles
//! Catalogs with dependency cycles are not supported but they are not rejected either.
//! Every walk over the graph terminates and the features on a cycle are selected and deselected together.

use crate::catalog::Catalog;

mod dependency_graph;
pub use dependency_graph::DependencyGraph;
mod selection;
pub use selection::SelectionState;
mod cascade;
mod aggregate;
pub use aggregate::Indicator;
use aggregate::Aggregates;
mod gate;
pub use gate::ConfirmationInfo;
pub use gate::ConfirmationHandler;
pub use gate::Decision;
pub use gate::GateState;
use gate::{ConfirmationGate, PendingDisable};
mod selector;
pub use selector::FeatureSelector;
pub use selector::SelectionStatus;
pub use selector::ChangeSet;
pub use selector::Origin;
pub use selector::CommitObserver;
mod bulk;
