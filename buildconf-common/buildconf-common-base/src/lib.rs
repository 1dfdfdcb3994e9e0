use clean_path::clean;
use std::path::{
	Path, PathBuf,
};

pub use documented;
pub use field_access;
pub use toml_edit;

mod compiler;
pub use compiler::*;
mod exec;
pub use exec::*;
mod host;
pub use host::*;
pub mod kv;
mod options;
pub use options::*;
mod platform;
pub use platform::*;
mod resolve;
pub use resolve::*;
mod sysroot;
pub use sysroot::*;
mod template;
pub use template::*;
mod toolchain;
pub use toolchain::*;
pub mod version;

/// Prefix of the environment variables that parsed options are exported as.
pub const EXPORT_PREFIX: &str = "OO_";

/// Branding used when `branding-name` isn't configured.
pub const DEFAULT_BRANDING: &str = "univaultoffice";

/// Well-known locations inside of a build-tools root directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Layout {
	root: PathBuf,
}

impl Layout {
	/// Create a layout for the build-tools directory at `root`.
	pub fn new(root: impl AsRef<Path>) -> Self {
		Self {
			root: clean(root),
		}
	}

	#[inline]
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Return the path to the operator's configuration file.
	pub fn config_path(&self) -> PathBuf {
		self.root.join("config")
	}

	/// Return the path to the stock defaults file.
	pub fn defaults_path(&self) -> PathBuf {
		self.root.join("defaults")
	}

	/// Return the path to the defaults file shipped by the `branding` checkout next to this one.
	pub fn branding_defaults_path(&self, branding: &str) -> PathBuf {
		let mut path = self.root.join("..");
		path.push(branding);
		path.push("build_tools");
		path.push("defaults");
		clean(path)
	}

	/// Return the directory holding Linux-specific helper tools.
	pub fn linux_tools_dir(&self) -> PathBuf {
		self.root.join("tools").join("linux")
	}

	/// Return the directory that fetched sysroots are cached in.
	pub fn sysroot_home(&self) -> PathBuf {
		self.linux_tools_dir().join("sysroot")
	}

	/// Return the directory the system Qt shim is installed to.
	pub fn system_qt_dir(&self) -> PathBuf {
		self.linux_tools_dir().join("system_qt")
	}
}

/// Render `path` the way it is stored in [`Options`].
pub(crate) fn path_value(path: &Path) -> String {
	path.to_string_lossy().into_owned()
}
