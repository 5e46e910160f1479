use std::io::Write;

use fwbuilder_rs::feature_resolver::*;

fn main() {
	env_logger::init();

	let mut opts;

	/* Parse console input */
	let parsed_options = {
		let args: Vec<String> = std::env::args().collect();

		opts = getopts::Options::new();
		opts.optflag( "h", "help",    "Show help");
		opts.optopt(  "c", "config",  "Config file to use instead of the default", "FILE");
		opts.optopt(  "t", "target",  "Load the cached catalog for a build target", "VEHICLE/VERSION/BOARD");
		opts.optopt(  "r", "rebuild", "Start from the features of a previous build", "FILE");
		opts.optmulti("e", "enable",  "Enable a feature and its dependencies", "FEATURE");
		opts.optmulti("d", "disable", "Disable a feature and its dependents", "FEATURE");
		opts.optflag( "",  "all",     "Enable every feature");
		opts.optflag( "",  "none",    "Disable every feature");
		opts.optflag( "y", "yes",     "Accept cascading disables without asking");
		opts.optopt(  "o", "output",  "Write the build request JSON to FILE", "FILE");
		opts.optopt(  "",  "hwdef",   "Write extra hwdef defines to FILE", "FILE");
		opts.parsing_style(getopts::ParsingStyle::FloatingFrees);

		let parsed_options = match opts.parse(&args[1..]) {
			Ok(m)  => { m }
			Err(e) => { println!("Unable to parse options: {}", e); return }
		};

		if parsed_options.opt_present("h") {
			eprintln!("{}", opts.usage("Usage: fwbuilder-rs-terminal [options] [CATALOG]"));
			return;
		}

		parsed_options
	};

	let config_path = parsed_options.opt_str("c")
		.map(std::path::PathBuf::from)
		.unwrap_or_else(fwbuilder_rs::config::default_config_path);
	let config = fwbuilder_rs::FwBuilderOptions::load_from_disk(&config_path).unwrap_or_else(|e| {
		log::warn!("Failed to read config file: {}", e);
		log::warn!("Using default config.");
		fwbuilder_rs::FwBuilderOptions::default()
	});

	if let Err(e) = run(&config, &parsed_options) {
		log::error!("{}", e);
		std::process::exit(1);
	}
}

fn run(config: &fwbuilder_rs::FwBuilderOptions, parsed_options: &getopts::Matches) -> Result<(), Error> {
	let catalog = load_catalog(config, parsed_options)?;
	if catalog.is_empty() {
		log::warn!("Catalog has no features.");
	}

	let mut selector = fwbuilder_rs::FeatureSelector::new(&catalog);

	match parsed_options.opt_str("r") {
		Some(path) => {
			let record = fwbuilder_rs::build_request::BuildRecord::read_from_path(&path)?;
			if catalog.target().map_or(false, |t| *t != record.target) {
				log::warn!("Build {} was for {}, features may not match this catalog.", record.build_id, record.target);
			}
			record.hydrate(&mut selector);
			for (feature, dependency) in selector.closure_violations() {
				println!("Warning: `{}` is selected without its dependency `{}`", feature, dependency);
			}
		},
		None => { selector.apply_defaults(); },
	}

	if parsed_options.opt_present("all") {
		selector.select_all(true);
	} else if parsed_options.opt_present("none") {
		selector.select_all(false);
	}

	let ask = config.confirm_cascading_disables() && !parsed_options.opt_present("y");
	for id in parsed_options.opt_strs("e") {
		report(&id, selector.toggle(&id, true, Origin::Programmatic))?;
	}
	for id in parsed_options.opt_strs("d") {
		let status = if ask {
			selector.toggle_with(&id, false, &mut prompt_confirmation)
		} else {
			selector.toggle(&id, false, Origin::Programmatic)
		};
		report(&id, status)?;
	}

	print_selection(&catalog, &selector);

	if let Some(path) = parsed_options.opt_str("o") {
		let target = catalog.target().ok_or(Error::MissingTarget)?;
		let request = fwbuilder_rs::BuildRequest::new(target, &selector);
		std::fs::write(&path, serde_json::to_vec_pretty(&request)?)?;
		log::info!("Wrote build request to {}", path);
	}

	if let Some(path) = parsed_options.opt_str("hwdef") {
		let hwdef = fwbuilder_rs::build_request::extra_hwdef(&catalog, selector.selected_ids())?;
		std::fs::write(&path, hwdef)?;
		log::info!("Wrote extra hwdef to {}", path);
	}

	Ok(())
}

/// Reads the catalog named on the command line, or the cached one for `--target`.
///
/// Catalogs read from a file are cached for later use with `--target`.
fn load_catalog(config: &fwbuilder_rs::FwBuilderOptions, parsed_options: &getopts::Matches) -> Result<fwbuilder_rs::Catalog, Error> {
	if let Some(path) = parsed_options.free.first() {
		let catalog = fwbuilder_rs::Catalog::read_from_path(path, config)?;
		match catalog.save_to_disk(config) {
			Ok(p) => log::debug!("Cached catalog at {}", p.display()),
			Err(e) => log::warn!("Failed to cache catalog: {}", e),
		}
		return Ok(catalog);
	}

	let target = parsed_options.opt_str("t").ok_or(Error::MissingArgument)?;
	let parts: Vec<&str> = target.split('/').collect();
	let [vehicle_id, version_id, board_id] = parts.as_slice() else {
		return Err(Error::InvalidTarget(target));
	};
	let target = fwbuilder_rs::catalog::CatalogTarget {
		vehicle_id: vehicle_id.to_string(),
		version_id: version_id.to_string(),
		board_id: board_id.to_string(),
	};
	Ok(fwbuilder_rs::Catalog::load_from_disk(config, &target)?)
}

fn report(id: &str, status: SelectionStatus) -> Result<(), Error> {
	match status {
		SelectionStatus::Committed(changes) => {
			for e in &changes.enabled {
				println!("+ {}", e);
			}
			for d in &changes.disabled {
				println!("- {}", d);
			}
		},
		SelectionStatus::Unchanged => log::info!("`{}` already in requested state.", id),
		SelectionStatus::ConfirmationRequired(_) | SelectionStatus::Blocked => return Err(Error::UserCancelled),
		SelectionStatus::UnknownFeature(id) => return Err(Error::UnknownFeature(id)),
		SelectionStatus::UnknownCategory(name) => log::warn!("Unknown category `{}`", name),
	}
	Ok(())
}

fn prompt_confirmation(info: &ConfirmationInfo) -> Decision {
	println!("Disabling {} will also disable:", info.feature);
	for a in &info.affected {
		println!("\t{}", a);
	}

	let stdin = std::io::stdin();
	print!("Continue? [y/(n)] ");
	let _ = std::io::stdout().flush();
	loop {
		let mut input = String::new();
		if stdin.read_line(&mut input).is_err() {
			return Decision::Reject;
		}
		let input = input.trim().to_lowercase();
		if input == "y" {
			return Decision::Accept;
		} else if input == "n" || input.is_empty() {
			return Decision::Reject;
		} else {
			println!("\nInput invalid.")
		}
	}
}

fn print_selection(catalog: &fwbuilder_rs::Catalog, selector: &fwbuilder_rs::FeatureSelector) {
	fn mark(indicator: Indicator) -> &'static str {
		match indicator {
			Indicator::Selected => "[x]",
			Indicator::Unselected => "[ ]",
			Indicator::Indeterminate => "[-]",
		}
	}

	for category in catalog.categories() {
		let indicator = selector.category_indicator(&category.name).unwrap_or_default();
		println!("{} {}", mark(indicator), category.name);
		for id in &category.features {
			let m = if selector.is_selected(id) { mark(Indicator::Selected) } else { mark(Indicator::Unselected) };
			println!("\t{} {}", m, id);
		}
	}
	println!("{} {} of {} features selected", mark(selector.global_indicator()), selector.selected_count(), selector.feature_count());
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("fwbuilder-rs error: {0}")]
	FwBuilderError(#[from] fwbuilder_rs::Error),
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("Missing argument, give a catalog file or --target")]
	MissingArgument,
	#[error("Invalid target `{0}`, expected VEHICLE/VERSION/BOARD")]
	InvalidTarget(String),
	#[error("Catalog has no target to build for")]
	MissingTarget,
	#[error("Unknown feature `{0}`")]
	UnknownFeature(String),
	#[error("User cancelled an action")]
	UserCancelled,
}
