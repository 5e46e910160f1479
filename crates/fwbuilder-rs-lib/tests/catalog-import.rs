use fwbuilder_rs::catalog::*;

fn init_logger() {
	let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn copter_catalog_is_read() {
	init_logger();
	let catalog = fwbuilder_rs_test_utils::copter_catalog().expect("failed to read copter catalog");

	assert_eq!(catalog.features().len(), 13);
	let names: Vec<_> = catalog.categories().iter().map(|c| c.name.as_str()).collect();
	assert_eq!(names, ["AHRS", "GPS Drivers", "Telemetry", "OSD"]);
	assert_eq!(catalog.get_category("GPS Drivers").unwrap().features, ["GPS_UBLOX", "GPS_MOVING_BASELINE", "GPS_BLENDED", "MSP_GPS"]);

	let target = catalog.target().expect("catalog should have a target");
	assert_eq!(target.to_string(), "copter-stable-4.5.7-MatekH743");

	let displayport = catalog.get_feature("MSP_DISPLAYPORT").unwrap();
	assert_eq!(displayport.dependencies, ["MSP", "OSD"]);
	assert_eq!(displayport.define.as_deref(), Some("HAL_WITH_MSP_DISPLAYPORT"));

	let extnav = catalog.get_feature("EKF3_EXTNAV").unwrap();
	assert!(extnav.dependencies.is_empty());
	assert_eq!(extnav.default, FeatureDefault { enabled: true, source: DefaultSource::BuildOptions });

	assert_eq!(
		fwbuilder_rs_test_utils::copter_catalog_field("GPS_MOVING_BASELINE", "dependencies"),
		Some(serde_json::json!("GPS_UBLOX"))
	);
	assert_eq!(catalog.get_feature("GPS_MOVING_BASELINE").unwrap().dependencies, ["GPS_UBLOX"]);
}

#[test]
fn catalog_is_read_from_path() {
	init_logger();
	let (dir, options) = fwbuilder_rs_test_utils::temp_options().expect("failed to create options");
	let path = fwbuilder_rs_test_utils::write_file(&dir, "features.json", fwbuilder_rs_test_utils::COPTER_CATALOG_JSON)
		.expect("failed to write catalog");

	let catalog = Catalog::read_from_path(&path, &options).expect("failed to read catalog");
	assert_eq!(Some(&catalog), fwbuilder_rs_test_utils::copter_catalog().ok().as_ref());

	let res = Catalog::read_from_path(dir.path().join("missing.json"), &options);
	assert!(matches!(res, Err(fwbuilder_rs::Error::IO(_))));

	let bad = fwbuilder_rs_test_utils::write_file(&dir, "bad.json", "[{").expect("failed to write catalog");
	assert!(matches!(Catalog::read_from_path(&bad, &options), Err(fwbuilder_rs::Error::SerdeJSON(_))));
}

#[test]
fn validation_can_be_disabled() {
	init_logger();
	let (dir, mut options) = fwbuilder_rs_test_utils::temp_options().expect("failed to create options");
	/* `default` as a string is not allowed by the schema */
	let json = r#"[{"id": "GPS", "category": {"name": "Sensors"}, "default": "yes"}]"#;
	let path = fwbuilder_rs_test_utils::write_file(&dir, "features.json", json).expect("failed to write catalog");

	assert!(matches!(Catalog::read_from_path(&path, &options), Err(fwbuilder_rs::Error::Validation(_))));
	options.set_validate_catalogs(false);
	assert!(matches!(Catalog::read_from_path(&path, &options), Err(fwbuilder_rs::Error::Parse(_))));
}

#[test]
fn duplicate_features_keep_first() {
	init_logger();
	let json = r#"[
		{"id": "GPS", "category": {"name": "Sensors"}, "default": true},
		{"id": "GPS", "category": {"name": "Telemetry"}, "default": false}
	]"#;
	let catalog = Catalog::read_from_str(json, true).expect("failed to read catalog");

	assert_eq!(catalog.features().len(), 1);
	assert!(catalog.get_feature("GPS").unwrap().default.enabled);
	assert!(catalog.get_category("Telemetry").is_none());
	assert!(catalog.target().is_none());
}

#[test]
fn cached_catalog_round_trip() {
	init_logger();
	let (_dir, options) = fwbuilder_rs_test_utils::temp_options().expect("failed to create options");
	let catalog = fwbuilder_rs_test_utils::copter_catalog().expect("failed to read copter catalog");
	let target = catalog.target().cloned().expect("catalog should have a target");

	let path = catalog.save_to_disk(&options).expect("failed to cache catalog");
	assert_eq!(path, get_catalog_cache_path(&options, &target));
	assert!(path.starts_with(options.data_dir()));

	let loaded = Catalog::load_from_disk(&options, &target).expect("failed to load cached catalog");
	assert_eq!(loaded, catalog);

	let other = CatalogTarget { board_id: "CubeOrange".into(), ..target };
	assert!(matches!(Catalog::load_from_disk(&options, &other), Err(fwbuilder_rs::Error::IO(_))));
}

#[test]
fn untargeted_catalog_is_not_cached() {
	init_logger();
	let (_dir, options) = fwbuilder_rs_test_utils::temp_options().expect("failed to create options");
	let res = fwbuilder_rs_test_utils::chain_catalog().save_to_disk(&options);
	assert!(matches!(res, Err(fwbuilder_rs::Error::Validation(_))));
}
