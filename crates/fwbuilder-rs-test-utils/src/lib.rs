//! Various helper functions for testing
//!
//! functions in this module should use results and not use any panics to avoid confusion in callers

use fwbuilder_rs::catalog::{Catalog, Feature};

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
	#[error("library error: {0}")]
	Library(#[from] fwbuilder_rs::Error),
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
}

/// JSON of a catalog for a copter build on a single board.
pub const COPTER_CATALOG_JSON: &str = include_str!("../test-data/catalog-copter.json");

/// Reads [`COPTER_CATALOG_JSON`] with schema validation.
pub fn copter_catalog() -> Result<Catalog, FixtureError> {
	Ok(Catalog::read_from_str(COPTER_CATALOG_JSON, true)?)
}

/// `C` depends on `B` which depends on `A`, all in one category.
pub fn chain_catalog() -> Catalog {
	Catalog::new(None, [
		Feature::new("A", "Chain"),
		Feature::new("B", "Chain").with_dependencies(["A"]),
		Feature::new("C", "Chain").with_dependencies(["B"]),
	])
}

/// Three independent features in `Sensors` and two in `Telemetry`, `MAVLink` depends on `GPS`.
pub fn two_category_catalog() -> Catalog {
	Catalog::new(None, [
		Feature::new("GPS", "Sensors").with_default(true),
		Feature::new("Compass", "Sensors"),
		Feature::new("Airspeed", "Sensors"),
		Feature::new("MAVLink", "Telemetry").with_dependencies(["GPS"]).with_default(true),
		Feature::new("CRSF", "Telemetry"),
	])
}

/// `A` and `B` depend on each other, `C` depends on `A`.
pub fn cyclic_catalog() -> Catalog {
	Catalog::new(None, [
		Feature::new("A", "Loop").with_dependencies(["B"]),
		Feature::new("B", "Loop").with_dependencies(["A"]),
		Feature::new("C", "Loop").with_dependencies(["A"]),
	])
}

/// Options with the data directory inside a new temporary directory.
///
/// The directory is removed when the returned [`tempfile::TempDir`] is dropped.
pub fn temp_options() -> Result<(tempfile::TempDir, fwbuilder_rs::FwBuilderOptions), FixtureError> {
	let dir = tempfile::tempdir()?;
	let mut options = fwbuilder_rs::FwBuilderOptions::default();
	options.set_data_dir(dir.path().to_path_buf());
	Ok((dir, options))
}

/// Writes `contents` to `name` inside `dir` returning the full path.
pub fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> Result<std::path::PathBuf, FixtureError> {
	let path = dir.path().join(name);
	std::fs::write(&path, contents)?;
	Ok(path)
}

/// Reads the value of `key` from the JSON in [`COPTER_CATALOG_JSON`] for feature `id`.
pub fn copter_catalog_field(id: &str, key: &str) -> Option<serde_json::Value> {
	let json: serde_json::Value = serde_json::from_str(COPTER_CATALOG_JSON).ok()?;
	json.as_array()?
		.iter()
		.find(|f| f.get("id").and_then(|i| i.as_str()) == Some(id))?
		.get(key)
		.cloned()
}
