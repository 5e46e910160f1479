//! Functions and methods for reading catalogs from JSON

use super::*;
use crate::Error::Parse;

/// Splits a dependency list written as `"A, B,C"`.
fn split_dependency_string(s: &str) -> Vec<String> {
	let re = regex::Regex::new(r"\s*,\s*").expect("separator pattern is valid");
	re.split(s.trim())
		.filter(|d| !d.is_empty())
		.map(str::to_string)
		.collect()
}

fn get_optional_string(obj: &serde_json::Map<String, serde_json::Value>, key: &str) -> crate::Result<Option<String>> {
	match obj.get(key) {
		None | Some(serde_json::Value::Null) => Ok(None),
		Some(serde_json::Value::String(s)) => Ok(Some(s.clone())),
		Some(_) => Err(Parse(format!("`{}` must be a string", key))),
	}
}

impl FeatureDefault {
	pub fn from_json(v: &serde_json::Value) -> crate::Result<Self> {
		match v {
			serde_json::Value::Null => Ok(Default::default()),
			serde_json::Value::Bool(enabled) => Ok(Self { enabled: *enabled, source: DefaultSource::Unspecified }),
			serde_json::Value::Object(obj) => {
				let enabled = obj.get("enabled")
					.and_then(|e| e.as_bool())
					.ok_or_else(|| Parse("default must contain a boolean `enabled`".to_string()))?;
				let source = match obj.get("source").and_then(|s| s.as_str()) {
					Some("firmware-server") => DefaultSource::FirmwareServer,
					Some("build-options-py") => DefaultSource::BuildOptions,
					None => DefaultSource::Unspecified,
					Some(other) => return Err(Parse(format!("unknown default source `{}`", other))),
				};
				Ok(Self { enabled, source })
			},
			_ => Err(Parse("default must be a boolean or an object".to_string())),
		}
	}
}

impl Feature {
	/// Reads one feature record.
	///
	/// Also returns the build target the record names, if it names one.
	pub fn read_from_json(v: &serde_json::Value) -> crate::Result<(Self, Option<CatalogTarget>)> {
		let obj = v.as_object().ok_or_else(|| Parse("feature must be an object".to_string()))?;

		let id = get_optional_string(obj, "id")?
			.filter(|id| !id.is_empty())
			.ok_or_else(|| Parse("feature is missing `id`".to_string()))?;

		let category = {
			let c = obj.get("category")
				.and_then(|c| c.as_object())
				.ok_or_else(|| Parse(format!("feature `{}` is missing `category`", id)))?;
			CategoryInfo {
				name: get_optional_string(c, "name")?
					.ok_or_else(|| Parse(format!("category of feature `{}` has no name", id)))?,
				description: get_optional_string(c, "description")?,
			}
		};

		let dependencies = {
			let mut v = Vec::<String>::new();
			let listed = match obj.get("dependencies") {
				None | Some(serde_json::Value::Null) => Vec::new(),
				Some(serde_json::Value::String(s)) => split_dependency_string(s),
				Some(serde_json::Value::Array(arr)) => {
					let mut listed = Vec::<String>::new();
					for d in arr {
						listed.push(
							d.as_str().ok_or_else(|| Parse(format!("dependencies of feature `{}` must be strings", id)))?.trim().to_string()
						);
					}
					listed
				},
				Some(_) => return Err(Parse(format!("dependencies of feature `{}` must be a list or a string", id))),
			};
			for d in listed {
				if !d.is_empty() && !v.contains(&d) {
					v.push(d);
				}
			}
			v
		};

		let target = match (
			get_optional_string(obj, "vehicle_id")?,
			get_optional_string(obj, "version_id")?,
			get_optional_string(obj, "board_id")?,
		) {
			(Some(vehicle_id), Some(version_id), Some(board_id)) => Some(CatalogTarget { vehicle_id, version_id, board_id }),
			_ => None,
		};

		let feature = Feature {
			name: get_optional_string(obj, "name")?.unwrap_or_else(|| id.clone()),
			description: get_optional_string(obj, "description")?,
			category,
			dependencies,
			default: FeatureDefault::from_json(obj.get("default").unwrap_or(&serde_json::Value::Null))?,
			define: get_optional_string(obj, "define")?,
			id,
		};

		Ok((feature, target))
	}
}

impl Catalog {
	/// Reads a catalog from the feature list JSON.
	///
	/// # Parameters
	/// - `json` - An array of feature records.
	/// - `do_validation` - Check the document against the catalog schema first.
	pub fn read_from_json(json: &serde_json::Value, do_validation: bool) -> crate::Result<Self> {
		if do_validation {
			validate_against_schema(json)?;
		}

		let records = json.as_array().ok_or_else(|| Parse("catalog must be an array of features".to_string()))?;

		let mut target: Option<CatalogTarget> = None;
		let mut features = Vec::<Feature>::with_capacity(records.len());
		for record in records {
			let (feature, record_target) = Feature::read_from_json(record)?;
			match (&target, record_target) {
				(Some(t), Some(r)) if *t != r => {
					return Err(crate::Error::Validation(format!("feature `{}` is for {} but the catalog is for {}", feature.id, r, t)));
				},
				(None, Some(r)) => target = Some(r),
				_ => {},
			}
			features.push(feature);
		}

		let catalog = Catalog::new(target, features);
		log::info!("Read catalog with {} features in {} categories", catalog.features().len(), catalog.categories().len());
		Ok(catalog)
	}

	pub fn read_from_str(s: &str, do_validation: bool) -> crate::Result<Self> {
		Self::read_from_json(&serde_json::from_str(s)?, do_validation)
	}

	pub fn read_from_path(path: impl AsRef<std::path::Path>, options: &crate::FwBuilderOptions) -> crate::Result<Self> {
		let data = std::fs::read(path.as_ref())?;
		log::trace!("Reading catalog from {}", path.as_ref().display());
		Self::read_from_json(&serde_json::from_slice(&data)?, options.validate_catalogs())
	}
}

fn validate_against_schema(json: &serde_json::Value) -> crate::Result<()> {
	let schema_json: serde_json::Value = serde_json::from_str(include_str!("catalog-json.schema"))?;
	let schema = jsonschema::JSONSchema::compile(&schema_json)
		.map_err(|e| crate::Error::Validation(format!("catalog schema failed to compile: {}", e)))?;

	let res = schema.validate(json).map_err(|errors| {
		let messages: Vec<String> = errors.map(|e| e.to_string()).collect();
		crate::Error::Validation(format!("catalog does not match schema: {}", messages.join("; ")))
	});
	res
}
