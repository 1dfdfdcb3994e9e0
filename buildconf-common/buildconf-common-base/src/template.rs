use serde::Serialize;

/// Build configuration for the product build tools.
///
/// Each line is `name=value`. Lines starting with `#` are ignored, as are empty ones.
/// `true` and `false` are read as `1` and `0`.
/// A value of `default` (or a `default` token inside of a list) is replaced with the value from the defaults file.
#[derive(documented::Documented, documented::DocumentedFields, field_access::FieldAccess)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigTemplate {
	/// Space-separated list of product modules to build.
	pub module: String,
	/// Space-separated list of target platforms.
	/// Besides concrete platforms (`win_64`, `linux_arm64`, `mac_arm64`, `ios`, `android_armv7`, ...), this accepts
	/// `all` (every desktop platform of the host), `native` (the host itself), `xp` and `android`.
	pub platform: String,
	/// Space-separated list of extra build configuration tokens.
	pub config: String,
	/// Qt installation to build against. Searched for on Windows when left out.
	pub qt_dir: String,
	/// Visual Studio release to build with on Windows (`2015`, `2019` or `2022`). Chosen automatically when left out.
	pub vs_version: String,
	/// Directory with the Visual Studio build environment scripts. Searched for when left out.
	pub vs_path: String,
	/// Compiler identifier overriding the per-platform default.
	pub compiler: String,
	/// Linux sysroot: `0` to use the host's libraries, `1` to use (and fetch if needed) the bundled sysroots, or the path
	/// of a sysroot to use for every architecture.
	pub sysroot: String,
	/// Set to `1` to build against the Qt packages of the Linux distribution.
	pub use_system_qt: String,
	/// Branding checkout whose defaults file replaces the stock one.
	pub branding: String,
	/// Product name used for output naming.
	pub branding_name: String,
}

impl Default for ConfigTemplate {
	fn default() -> Self {
		Self {
			module: "default".into(),
			platform: "native".into(),
			config: String::new(),
			qt_dir: String::new(),
			vs_version: String::new(),
			vs_path: String::new(),
			compiler: String::new(),
			sysroot: "0".into(),
			use_system_qt: "0".into(),
			branding: String::new(),
			branding_name: String::new(),
		}
	}
}
