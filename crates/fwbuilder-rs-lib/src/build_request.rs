//! Types exchanged with the build pipeline.
//!
//! A [`BuildRequest`] is sent to start a build, a [`BuildRecord`] describes a previous build
//! and is used to rebuild with the same features.

use std::collections::BTreeSet;
use serde::{Serialize, Deserialize};

use crate::catalog::{Catalog, CatalogTarget};
use crate::feature_resolver::FeatureSelector;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRequest {
	pub vehicle_id: String,
	pub version_id: String,
	pub board_id: String,
	/// Feature ids to enable.
	pub selected_features: Vec<String>,
}

impl BuildRequest {
	pub fn new(target: &CatalogTarget, selector: &FeatureSelector) -> Self {
		Self {
			vehicle_id: target.vehicle_id.clone(),
			version_id: target.version_id.clone(),
			board_id: target.board_id.clone(),
			selected_features: selector.selected_ids(),
		}
	}

	pub fn target(&self) -> CatalogTarget {
		CatalogTarget {
			vehicle_id: self.vehicle_id.clone(),
			version_id: self.version_id.clone(),
			board_id: self.board_id.clone(),
		}
	}
}

/// The parts of a finished or running build needed to build it again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
	pub build_id: String,
	pub target: CatalogTarget,
	pub selected_features: Vec<String>,
}

impl BuildRecord {
	/// Reads the build JSON returned by the builds API.
	///
	/// Only `build_id`, `vehicle.id`, `board.id`, `version.id` and `selected_features` are used.
	pub fn read_from_json(v: &serde_json::Value) -> crate::Result<Self> {
		use crate::Error::Parse;

		let get_nested_id = |key: &str| -> crate::Result<String> {
			v.get(key)
				.and_then(|o| o.get("id"))
				.and_then(|id| id.as_str())
				.map(str::to_string)
				.ok_or_else(|| Parse(format!("build record is missing `{}.id`", key)))
		};

		let build_id = v.get("build_id")
			.and_then(|id| id.as_str())
			.ok_or_else(|| Parse("build record is missing `build_id`".to_string()))?
			.to_string();

		let selected_features = match v.get("selected_features") {
			None | Some(serde_json::Value::Null) => Vec::new(),
			Some(serde_json::Value::Array(arr)) => {
				let mut features = Vec::<String>::with_capacity(arr.len());
				for f in arr {
					features.push(f.as_str().ok_or_else(|| Parse("selected features must be strings".to_string()))?.to_string());
				}
				features
			},
			Some(_) => return Err(Parse("`selected_features` must be a list".to_string())),
		};

		Ok(Self {
			target: CatalogTarget {
				vehicle_id: get_nested_id("vehicle")?,
				version_id: get_nested_id("version")?,
				board_id: get_nested_id("board")?,
			},
			build_id,
			selected_features,
		})
	}

	pub fn read_from_path(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let data = std::fs::read(path.as_ref())?;
		Self::read_from_json(&serde_json::from_slice(&data)?)
	}

	/// Seeds `selector` with this builds features.
	pub fn hydrate(&self, selector: &mut FeatureSelector) -> crate::feature_resolver::SelectionStatus {
		log::info!("Rebuilding from build {} with {} features", self.build_id, self.selected_features.len());
		selector.hydrate(&self.selected_features)
	}
}

fn is_valid_define(define: &str) -> bool {
	let re = regex::Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("define pattern is valid");
	re.is_match(define)
}

/// Renders the `extra_hwdef.dat` contents enabling exactly the selected features.
///
/// Every define known to the catalog is first undefined, then defined to `1` if its feature
/// is selected or `0` otherwise.
///
/// # Errors
/// - [`crate::Error::Validation`] if a define in the catalog is not a valid identifier.
pub fn extra_hwdef<S: AsRef<str>>(catalog: &Catalog, selected_ids: impl IntoIterator<Item = S>) -> crate::Result<String> {
	let mut all_defines = BTreeSet::<&str>::new();
	for feature in catalog.features() {
		match &feature.define {
			Some(define) => {
				if !is_valid_define(define) {
					return Err(crate::Error::Validation(format!("feature `{}` has invalid define `{}`", feature.id, define)));
				}
				all_defines.insert(define);
			},
			None => log::warn!("Feature `{}` has no define, it can't be toggled in the build.", feature.id),
		}
	}

	let mut enabled = BTreeSet::<&str>::new();
	for id in selected_ids {
		let id = id.as_ref();
		match catalog.get_feature(id) {
			Some(feature) => {
				if let Some(define) = &feature.define {
					enabled.insert(define);
				}
			},
			None => log::warn!("Selected feature `{}` not found in catalog, skipping.", id),
		}
	}

	let mut out = String::new();
	for define in &all_defines {
		out += &format!("undef {}\n", define);
	}
	for define in &enabled {
		out += &format!("define {} 1\n", define);
	}
	for define in all_defines.difference(&enabled) {
		out += &format!("define {} 0\n", define);
	}
	log::trace!("Generated extra hwdef with {} of {} defines enabled", enabled.len(), all_defines.len());
	Ok(out)
}
