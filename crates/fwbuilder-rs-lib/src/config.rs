use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FwBuilderOptions {
	data_dir: std::path::PathBuf,
	/// Check imported catalogs against the bundled JSON schema before parsing them.
	validate_catalogs: bool,
	/// Ask before a user initiated disable removes other features.
	confirm_cascading_disables: bool,
}

/// Resolves a per-user base directory.
///
/// `xdg_var` is checked first, then `$HOME` joined with `home_fallback`.
/// On windows `%APPDATA%` is used instead.
fn user_dir(xdg_var: &str, home_fallback: &str) -> std::path::PathBuf {
	#[cfg(target_os = "windows")]
	let path = {
		let _ = (xdg_var, home_fallback);
		std::env::var("APPDATA").map(std::path::PathBuf::from).unwrap_or_else(|_| std::path::PathBuf::from("."))
	};

	#[cfg(not(target_os = "windows"))]
	let path = if let Ok(e) = std::env::var(xdg_var) {
		std::path::PathBuf::from(e)
	} else if let Ok(home) = std::env::var("HOME") {
		std::path::PathBuf::from(home).join(home_fallback)
	} else {
		log::warn!("HOME environment variable not set, using the working directory.");
		std::path::PathBuf::from(".")
	};

	path.join("fwbuilder-rs")
}

/// Location the terminal reads its config from when no path is given.
pub fn default_config_path() -> std::path::PathBuf {
	user_dir("XDG_CONFIG_HOME", ".config").join("config.json")
}

impl Default for FwBuilderOptions {
	fn default() -> Self {
		Self {
			data_dir: user_dir("XDG_DATA_HOME", ".local/share").join("data"),
			validate_catalogs: true,
			confirm_cascading_disables: true,
		}
	}
}

impl FwBuilderOptions {
	pub fn load_from_disk(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
		let data = std::fs::read(path.as_ref())?;
		let options = serde_json::from_slice::<Self>(&data)?;
		log::trace!("Loaded options from {}", path.as_ref().display());
		Ok(options)
	}

	pub fn save_to_disk(&self, path: impl AsRef<std::path::Path>) -> crate::Result<()> {
		let path = path.as_ref();
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, serde_json::to_vec_pretty(self)?)?;
		Ok(())
	}

	/// Directory holding cached catalogs.
	///
	/// Not created until something is written into it.
	pub fn data_dir(&self) -> &std::path::PathBuf {
		&self.data_dir
	}
	/// returns if the directory is valid or not.
	pub fn set_data_dir(&mut self, data_dir: std::path::PathBuf) -> bool {
		if data_dir.is_dir() {
			self.data_dir = data_dir;
			true
		} else {
			false
		}
	}

	pub fn validate_catalogs(&self) -> bool {
		self.validate_catalogs
	}
	pub fn set_validate_catalogs(&mut self, validate_catalogs: bool) {
		self.validate_catalogs = validate_catalogs;
	}

	pub fn confirm_cascading_disables(&self) -> bool {
		self.confirm_cascading_disables
	}
	pub fn set_confirm_cascading_disables(&mut self, confirm_cascading_disables: bool) {
		self.confirm_cascading_disables = confirm_cascading_disables;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn options_round_trip_through_disk() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested").join("config.json");

		let mut options = FwBuilderOptions::default();
		assert!(options.set_data_dir(dir.path().to_path_buf()));
		options.set_confirm_cascading_disables(false);
		options.save_to_disk(&path).expect("failed to save options");

		let loaded = FwBuilderOptions::load_from_disk(&path).expect("failed to load options");
		assert_eq!(loaded.data_dir(), dir.path());
		assert!(!loaded.confirm_cascading_disables());
		assert!(loaded.validate_catalogs());
	}

	#[test]
	fn set_data_dir_rejects_missing_directory() {
		let mut options = FwBuilderOptions::default();
		let before = options.data_dir().clone();
		assert!(!options.set_data_dir(std::path::PathBuf::from("/this/path/should/not/exist")));
		assert_eq!(options.data_dir(), &before);
	}

	#[test]
	fn missing_config_is_io_error() {
		let dir = tempfile::tempdir().unwrap();
		let res = FwBuilderOptions::load_from_disk(dir.path().join("absent.json"));
		assert!(matches!(res, Err(crate::Error::IO(_))));
	}
}
