//! Module for only DependencyGraph functions not related to the selection process.

use std::collections::HashMap;
use petgraph::prelude::*;

use crate::catalog::Catalog;

#[derive(Debug, Clone)]
pub struct NodeData {
	pub id: String,
	/// Index into [`DependencyGraph::categories`].
	pub category: usize,
	pub default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeData {
	/// The source feature requires the target feature to be selected.
	Depends,
}

#[derive(Debug, Clone)]
pub struct CategoryNode {
	pub name: String,
	pub members: Vec<NodeIndex>,
}

/// Indexed form of a [`Catalog`].
///
/// Edges point from a feature to each of its dependencies, so a features dependents are its incoming edges.
/// Node indices follow catalog order.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
	pub graph: DiGraph<NodeData, EdgeData>,
	ids: HashMap<String, NodeIndex>,
	categories: Vec<CategoryNode>,
	category_lookup: HashMap<String, usize>,
}

impl DependencyGraph {
	pub fn from_catalog(catalog: &Catalog) -> Self {
		let mut dep_graph = DependencyGraph::default();

		for category in catalog.categories() {
			dep_graph.get_or_add_category(&category.name);
		}

		for feature in catalog.features() {
			if dep_graph.ids.contains_key(&feature.id) {
				log::warn!("Duplicate feature id `{}` in catalog, ignoring later entry.", feature.id);
				continue;
			}
			let category = dep_graph.get_or_add_category(&feature.category.name);
			let i = dep_graph.graph.add_node(NodeData {
				id: feature.id.clone(),
				category,
				default: feature.default.enabled,
			});
			dep_graph.ids.insert(feature.id.clone(), i);
			dep_graph.categories[category].members.push(i);
		}

		for feature in catalog.features() {
			let Some(&src) = dep_graph.ids.get(&feature.id) else { continue };
			for dependency in &feature.dependencies {
				let Some(&target) = dep_graph.ids.get(dependency) else {
					log::warn!("Feature `{}` depends on `{}` which is not in the catalog, ignoring.", feature.id, dependency);
					continue;
				};
				if target == src {
					log::warn!("Feature `{}` depends on itself, ignoring.", feature.id);
					continue;
				}
				if dep_graph.graph.find_edge(src, target).is_none() {
					dep_graph.graph.add_edge(src, target, EdgeData::Depends);
				}
			}
		}

		log::trace!("Built dependency graph with {} features and {} edges", dep_graph.graph.node_count(), dep_graph.graph.edge_count());
		dep_graph
	}

	fn get_or_add_category(&mut self, name: &str) -> usize {
		if let Some(&c) = self.category_lookup.get(name) {
			return c;
		}
		self.categories.push(CategoryNode { name: name.to_string(), members: Default::default() });
		self.category_lookup.insert(name.to_string(), self.categories.len() - 1);
		self.categories.len() - 1
	}

	pub fn node_count(&self) -> usize {
		self.graph.node_count()
	}

	pub fn get_node_index(&self, id: &str) -> Option<NodeIndex> {
		self.ids.get(id).copied()
	}

	pub fn get_node_identifier(&self, src: NodeIndex) -> &str {
		&self.graph[src].id
	}

	pub fn category_of(&self, src: NodeIndex) -> usize {
		self.graph[src].category
	}

	pub fn is_default(&self, src: NodeIndex) -> bool {
		self.graph[src].default
	}

	/// Features `src` requires.
	pub fn dependencies(&self, src: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
		self.graph.neighbors_directed(src, Outgoing)
	}

	/// Features requiring `src`.
	pub fn dependents(&self, src: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
		self.graph.neighbors_directed(src, Incoming)
	}

	pub fn categories(&self) -> &[CategoryNode] {
		&self.categories
	}

	pub fn get_category_index(&self, name: &str) -> Option<usize> {
		self.category_lookup.get(name).copied()
	}

	pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
		self.graph.node_indices()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::Feature;

	fn ids<'a>(g: &'a DependencyGraph, it: impl Iterator<Item = NodeIndex>) -> Vec<&'a str> {
		let mut v: Vec<_> = it.map(|i| g.get_node_identifier(i)).collect();
		v.sort();
		v
	}

	#[test]
	fn dependents_are_reverse_of_dependencies() {
		let catalog = Catalog::new(None, [
			Feature::new("A", "x"),
			Feature::new("B", "x").with_dependencies(["A"]),
			Feature::new("C", "y").with_dependencies(["A", "B"]),
		]);
		let g = DependencyGraph::from_catalog(&catalog);
		let a = g.get_node_index("A").unwrap();
		let c = g.get_node_index("C").unwrap();

		assert_eq!(ids(&g, g.dependents(a)), ["B", "C"]);
		assert_eq!(ids(&g, g.dependencies(c)), ["A", "B"]);
		assert!(g.dependencies(a).next().is_none());
	}

	#[test]
	fn unknown_and_self_dependencies_are_dropped() {
		let catalog = Catalog::new(None, [
			Feature::new("A", "x").with_dependencies(["A", "MISSING"]),
			Feature::new("B", "x").with_dependencies(["A"]),
		]);
		let g = DependencyGraph::from_catalog(&catalog);

		assert_eq!(g.graph.edge_count(), 1);
		assert!(g.get_node_index("MISSING").is_none());
	}

	#[test]
	fn categories_are_indexed() {
		let catalog = Catalog::new(None, [
			Feature::new("A", "x"),
			Feature::new("B", "y"),
			Feature::new("C", "x"),
		]);
		let g = DependencyGraph::from_catalog(&catalog);
		let x = g.get_category_index("x").unwrap();

		assert_eq!(ids(&g, g.categories()[x].members.iter().copied()), ["A", "C"]);
		assert_eq!(g.category_of(g.get_node_index("B").unwrap()), g.get_category_index("y").unwrap());
		assert!(g.get_category_index("z").is_none());
	}
}
