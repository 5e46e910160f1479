//! On disk cache of parsed catalogs.

use super::*;

/// Makes `s` safe to use as part of a file name.
fn sanitize_component(s: &str) -> String {
	let re = regex::Regex::new(r"[^A-Za-z0-9._-]").expect("sanitize pattern is valid");
	re.replace_all(s, "_").into_owned()
}

/// Gets the path a catalog for `target` is cached at.
pub fn get_catalog_cache_path(options: &crate::FwBuilderOptions, target: &CatalogTarget) -> std::path::PathBuf {
	options.data_dir().join("catalogs").join(format!(
		"{}-{}-{}.bin",
		sanitize_component(&target.vehicle_id),
		sanitize_component(&target.version_id),
		sanitize_component(&target.board_id),
	))
}

impl Catalog {
	/// Writes the catalog to the cache directory.
	///
	/// Catalogs without a target can't be looked up again so they are refused.
	pub fn save_to_disk(&self, options: &crate::FwBuilderOptions) -> crate::Result<std::path::PathBuf> {
		let target = self.target().ok_or_else(|| crate::Error::Validation("catalog has no target to cache it under".to_string()))?;
		let path = get_catalog_cache_path(options, target);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}

		log::trace!("Caching catalog for {} at {}", target, path.display());
		std::fs::write(&path, bincode::serialize(self)?)?;
		Ok(path)
	}

	pub fn load_from_disk(options: &crate::FwBuilderOptions, target: &CatalogTarget) -> crate::Result<Self> {
		let path = get_catalog_cache_path(options, target);
		let data = std::fs::read(&path)?;
		let catalog: Catalog = bincode::deserialize(&data)?;
		if catalog.target() != Some(target) {
			return Err(crate::Error::Validation(format!("cached catalog at {} is not for {}", path.display(), target)));
		}
		Ok(catalog)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn components_are_sanitized() {
		assert_eq!(sanitize_component("stable-4.5.7/../x"), "stable-4.5.7_.._x");
	}

	#[test]
	fn catalog_cache_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let mut options = crate::FwBuilderOptions::default();
		assert!(options.set_data_dir(dir.path().to_path_buf()));

		let target = CatalogTarget { vehicle_id: "copter".into(), version_id: "4.5.7".into(), board_id: "CubeOrange".into() };
		let catalog = Catalog::new(Some(target.clone()), [
			Feature::new("GPS", "Sensors").with_default(true).with_define("AP_GPS_ENABLED"),
			Feature::new("GPS_UBLOX", "Sensors").with_dependencies(["GPS"]),
		]);

		let path = catalog.save_to_disk(&options).expect("failed to cache catalog");
		assert!(path.starts_with(dir.path()));

		let loaded = Catalog::load_from_disk(&options, &target).expect("failed to load cached catalog");
		assert_eq!(loaded, catalog);
	}

	#[test]
	fn untargeted_catalog_is_not_cached() {
		let options = crate::FwBuilderOptions::default();
		let catalog = Catalog::new(None, [Feature::new("GPS", "Sensors")]);
		assert!(matches!(catalog.save_to_disk(&options), Err(crate::Error::Validation(_))));
	}
}
