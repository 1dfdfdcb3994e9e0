use std::{
	env::{
		current_dir, var_os,
	},
	fs::write,
	io::Error as IoError,
	path::{
		absolute, PathBuf,
	},
};
use tracing::info;

pub use buildconf_common_base::*;

pub mod logging;

/// Documented config file with default values, generated at build time.
pub const CONFIG_TEMPLATE: &str = include_str!(concat!(env!("OUT_DIR"), "/config.template"));

/// Environment variable naming the build-tools root directory.
pub const ROOT_VAR: &str = "BUILDCONF_ROOT";

/// Error that occurred while locating the build-tools root.
#[derive(Debug, thiserror::Error)]
pub enum RootError {
	#[error("couldn't get current directory: {0}")]
	CurrentDir(IoError),
	#[error("couldn't make {path} absolute: {error}")]
	Absolute {
		error: IoError,
		path: PathBuf,
	},
}

/// Return the build-tools root: `explicit` if given, else `BUILDCONF_ROOT`, else the current directory.
pub fn root_dir(explicit: Option<PathBuf>) -> Result<PathBuf, RootError> {
	let root = match explicit.or_else(move || var_os(ROOT_VAR).map(PathBuf::from)) {
		Some(root) => root,
		None => current_dir().map_err(RootError::CurrentDir)?,
	};
	absolute(&root).map_err(move |error| RootError::Absolute {
		error,
		path: root,
	})
}

/// Resolve the configuration of `layout` on the running host, spawning external programs for real.
pub fn resolve_host(layout: Layout, with_defaults: bool) -> Result<Configuration, ResolveError> {
	resolve_with(layout, with_defaults, &mut ProcessRunner)
}

/// Resolve the configuration of `layout` on the running host, launching external programs through `runner`.
pub fn resolve_with(layout: Layout, with_defaults: bool, runner: &mut dyn Runner) -> Result<Configuration, ResolveError> {
	let host = Host::detect();
	if with_defaults {
		Configuration::resolve(layout, host, runner)
	} else {
		Configuration::parse(layout, host, runner)
	}
}

/// Error that occurred in [`write_template`].
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
	#[error("{config_path} already exists")]
	Exists {
		config_path: PathBuf,
	},
	#[error("failed to write config template to {config_path}: {error}")]
	Write {
		error: IoError,
		config_path: PathBuf,
	},
}

macro_rules! handle_err {
	($expr:expr; $error:ident => $err:expr) => {
		match $expr {
			Ok(v) => v,
			Err($error) => return Err($err),
		}
	};
}

/// Write [`CONFIG_TEMPLATE`] to the config file of `layout`, returning its path.
///
/// An existing config file is only replaced if `force` is set.
pub fn write_template(layout: &Layout, force: bool) -> Result<PathBuf, TemplateError> {
	let config_path = layout.config_path();
	if config_path.exists() && !force {
		return Err(TemplateError::Exists { config_path })
	}

	handle_err!(
		write(&config_path, CONFIG_TEMPLATE);
		error => TemplateError::Write {
			error,
			config_path,
		}
	);
	info!(path = %config_path.display(), "wrote config template");
	Ok(config_path)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn explicit_root_wins() {
		let dir = tempfile::tempdir().unwrap();
		assert_eq!(root_dir(Some(dir.path().to_path_buf())).unwrap(), dir.path());
	}

	#[test]
	fn template_is_written_once() {
		let dir = tempfile::tempdir().unwrap();
		let layout = Layout::new(dir.path());

		let path = write_template(&layout, false).unwrap();
		assert_eq!(path, layout.config_path());
		assert!(matches!(write_template(&layout, false), Err(TemplateError::Exists { .. })));
		assert!(write_template(&layout, true).is_ok());

		let entries = kv::read(&path).unwrap();
		assert!(entries.iter().any(|e| e.name == "platform" && e.value == "native"));
	}
}
