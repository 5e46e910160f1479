//! # Feature catalog
//!
//! The list of optional build features available for one vehicle, version and board combination.
//!
//! A catalog is read only once loaded, when the user picks a different combination a new catalog is loaded in its place.

use std::collections::HashMap;
use serde::{Serialize, Deserialize};

mod import;
mod cache;
pub use cache::get_catalog_cache_path;

/// Identifies which build a catalog belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogTarget {
	pub vehicle_id: String,
	pub version_id: String,
	pub board_id: String,
}

impl std::fmt::Display for CatalogTarget {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}-{}-{}", self.vehicle_id, self.version_id, self.board_id)
	}
}

/// Where a features default state came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefaultSource {
	/// Board specific defaults published alongside the firmware artifacts.
	FirmwareServer,
	/// The fallback value from the build options in the source tree.
	BuildOptions,
	#[default]
	Unspecified,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDefault {
	pub enabled: bool,
	pub source: DefaultSource,
}

/// The category a feature record says it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
	pub name: String,
	pub description: Option<String>,
}

/// A single selectable build option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
	pub id: String,
	pub name: String,
	pub description: Option<String>,
	pub category: CategoryInfo,
	/// Every one of these must be selected for this feature to be valid.
	pub dependencies: Vec<String>,
	pub default: FeatureDefault,
	/// Preprocessor symbol toggled in the build for this feature.
	pub define: Option<String>,
}

impl Feature {
	/// Creates a feature with no dependencies that is off by default.
	pub fn new(id: impl Into<String>, category: impl Into<String>) -> Self {
		let id = id.into();
		Self {
			name: id.clone(),
			id,
			description: None,
			category: CategoryInfo { name: category.into(), description: None },
			dependencies: Default::default(),
			default: Default::default(),
			define: None,
		}
	}

	pub fn with_dependencies<S: Into<String>>(mut self, dependencies: impl IntoIterator<Item = S>) -> Self {
		for d in dependencies {
			let d = d.into();
			if !self.dependencies.contains(&d) {
				self.dependencies.push(d);
			}
		}
		self
	}

	pub fn with_default(mut self, enabled: bool) -> Self {
		self.default.enabled = enabled;
		self
	}

	pub fn with_define(mut self, define: impl Into<String>) -> Self {
		self.define = Some(define.into());
		self
	}
}

/// A named group of features shown together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
	pub name: String,
	pub description: Option<String>,
	/// Member feature ids in catalog order.
	pub features: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
	target: Option<CatalogTarget>,
	features: Vec<Feature>,
	categories: Vec<Category>,
}

impl Catalog {
	/// Builds a catalog from a list of features.
	///
	/// Categories are collected from the features in the order they first appear.
	/// If an id turns up more than once only the first feature with it is kept.
	pub fn new(target: Option<CatalogTarget>, features: impl IntoIterator<Item = Feature>) -> Self {
		let mut kept = Vec::<Feature>::new();
		let mut categories = Vec::<Category>::new();
		let mut category_lookup = HashMap::<String, usize>::new();
		let mut seen = std::collections::HashSet::<String>::new();

		for feature in features {
			if !seen.insert(feature.id.clone()) {
				log::warn!("Duplicate feature id `{}` in catalog, ignoring later entry.", feature.id);
				continue;
			}

			let c = *category_lookup.entry(feature.category.name.clone()).or_insert_with(|| {
				categories.push(Category {
					name: feature.category.name.clone(),
					description: feature.category.description.clone(),
					features: Default::default(),
				});
				categories.len() - 1
			});
			categories[c].features.push(feature.id.clone());
			kept.push(feature);
		}

		Self { target, features: kept, categories }
	}

	pub fn target(&self) -> Option<&CatalogTarget> {
		self.target.as_ref()
	}

	pub fn features(&self) -> &[Feature] {
		&self.features
	}

	pub fn categories(&self) -> &[Category] {
		&self.categories
	}

	pub fn get_feature(&self, id: &str) -> Option<&Feature> {
		self.features.iter().find(|f| f.id == id)
	}

	pub fn get_category(&self, name: &str) -> Option<&Category> {
		self.categories.iter().find(|c| c.name == name)
	}

	pub fn is_empty(&self) -> bool {
		self.features.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn categories_follow_first_appearance() {
		let catalog = Catalog::new(None, [
			Feature::new("GPS", "Sensors"),
			Feature::new("MAVLink", "Telemetry"),
			Feature::new("Airspeed", "Sensors"),
		]);

		let names: Vec<_> = catalog.categories().iter().map(|c| c.name.as_str()).collect();
		assert_eq!(names, ["Sensors", "Telemetry"]);
		assert_eq!(catalog.get_category("Sensors").unwrap().features, ["GPS", "Airspeed"]);
	}

	#[test]
	fn duplicate_ids_keep_first() {
		let catalog = Catalog::new(None, [
			Feature::new("GPS", "Sensors").with_default(true),
			Feature::new("GPS", "Other"),
		]);

		assert_eq!(catalog.features().len(), 1);
		assert!(catalog.get_feature("GPS").unwrap().default.enabled);
		assert!(catalog.get_category("Other").is_none());
	}

	#[test]
	fn with_dependencies_is_an_ordered_set() {
		let f = Feature::new("C", "x").with_dependencies(["B", "A", "B"]);
		assert_eq!(f.dependencies, ["B", "A"]);
	}
}
