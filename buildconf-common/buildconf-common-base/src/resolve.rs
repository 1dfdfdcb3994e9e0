//! Resolution of the operator's configuration into the options the build runs with.

use std::ops::{
	Deref, DerefMut,
};
use tracing::{
	debug, info,
};

use crate::{
	exec::{
		ExecError, Exports, Invocation, Runner,
	},
	host::{
		Host, HostOs,
	},
	kv::{
		self, Entry, ParseError,
	},
	options::Options,
	path_value,
	platform::{
		expand_platforms, Platform, ANDROID_TOKEN,
	},
	toolchain::{
		detect_qt_dir, find_vs_path, select_vs_version, VsVersion,
	},
	Layout,
};

/// Oldest system `gcc` that the current embedded runtimes can be built with.
pub const MIN_MODERN_GCC: &str = "5.4";

/// Token of the `default` macro in option values.
pub const DEFAULT_TOKEN: &str = "default";

/// Key of the defaults file whose value is always appended to `config`.
pub const CONFIG_ADDON: &str = "config_addon";

/// Error that occurred while resolving a [`Configuration`].
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
	#[error(transparent)]
	Parse(#[from] ParseError),
	#[error(transparent)]
	Exec(#[from] ExecError),
}

/// Resolved build configuration.
///
/// Dereferences to its [`Options`].
#[derive(Debug, Clone)]
pub struct Configuration {
	pub options: Options,
	pub host: Host,
	pub layout: Layout,
	/// Environment exported from the parsed config file.
	pub exports: Exports,
}

impl Deref for Configuration {
	type Target = Options;
	#[inline]
	fn deref(&self) -> &Self::Target {
		&self.options
	}
}

impl DerefMut for Configuration {
	#[inline]
	fn deref_mut(&mut self) -> &mut Self::Target {
		&mut self.options
	}
}

impl Configuration {
	/// Wrap already resolved `options`, without exporting anything.
	pub fn new(layout: Layout, host: Host, options: Options) -> Self {
		Self {
			options,
			host,
			layout,
			exports: Exports::default(),
		}
	}

	/// Read the config file of `layout` and resolve it for `host`.
	///
	/// External programs (sysroot fetching, system Qt setup) are launched through `runner`.
	pub fn parse(layout: Layout, host: Host, runner: &mut dyn Runner) -> Result<Self, ResolveError> {
		let path = layout.config_path();
		info!(path = %path.display(), "parsing build configuration");
		let mut config = Self::new(layout, host, Options::new());
		for Entry { name, value } in kv::read(&path)? {
			config.exports.export(&name, &value);
			config.options.set_option(name, value);
		}

		expand_platforms(&mut config.options, &config.host);
		config.detect_visual_studio();
		config.resolve_sysroot(runner)?;
		config.mark_compatibility();
		config.detect_vs_path();
		config.apply_bundling_rules();
		config.use_system_qt(runner)?;

		if !config.options.check_option("config", "core_enable_all_warnings") {
			config.options.extend_option("config", "core_disable_all_warnings");
		}

		Ok(config)
	}

	/// Like [`parse`](Self::parse), followed by [`parse_defaults`](Self::parse_defaults).
	pub fn resolve(layout: Layout, host: Host, runner: &mut dyn Runner) -> Result<Self, ResolveError> {
		let mut config = Self::parse(layout, host, runner)?;
		config.parse_defaults()?;
		Ok(config)
	}

	/// Detect Qt and pick a Visual Studio version on Windows hosts, unless configured.
	fn detect_visual_studio(&mut self) {
		if self.host.os != HostOs::Windows {
			return
		}

		if self.options.option("qt-dir").is_empty() {
			if let Some(qt_dir) = detect_qt_dir(&self.host) {
				debug!(qt_dir = %qt_dir.display(), "detected Qt");
				self.options.set_option("qt-dir", path_value(&qt_dir));
			}
		}

		if self.options.option("vs-version").is_empty() {
			let version = select_vs_version(&self.options, &self.host);
			self.options.set_option("vs-version", version.as_str());
		}

		let token = VsVersion::parse(self.options.option("vs-version")).and_then(VsVersion::config_token);
		if let Some(token) = token {
			self.options.extend_option("config", token);
		}
	}

	fn detect_vs_path(&mut self) {
		if self.host.os != HostOs::Windows || !self.options.option("vs-path").is_empty() {
			return
		}
		let vs_path = find_vs_path(&self.host, self.options.option("vs-version"))
			.map(move |p| path_value(&p))
			.unwrap_or_default();
		self.options.set_option("vs-path", vs_path);
	}

	/// Return `true` if the host's toolchain is too old for CEF newer than 107.
	pub fn is_cef_107(&self) -> bool {
		self.host.os == HostOs::Linux
			&& self.host.gcc_older_than(MIN_MODERN_GCC)
			&& !self.options.check_option("platform", ANDROID_TOKEN)
	}

	/// Return `true` if the host's toolchain is too old for V8 newer than 6.0.
	pub fn is_v8_60(&self) -> bool {
		if self.options.check_option("platform", Platform::LinuxArm64.as_str()) {
			return false
		}
		match self.host.os {
			HostOs::Linux => {
				self.host.gcc_older_than(MIN_MODERN_GCC)
					&& !self.options.check_option("platform", ANDROID_TOKEN)
			}
			HostOs::Windows => self.options.option("vs-version") == VsVersion::V2015.as_str(),
			HostOs::Mac => false,
		}
	}

	fn mark_compatibility(&mut self) {
		if self.is_cef_107() {
			self.options.extend_option("config", "cef_version_107");
		}
		if self.is_v8_60() {
			self.options.extend_option("config", "v8_version_60");
		}
	}

	fn extend_config_once(&mut self, token: &str) {
		if !self.options.check_option("config", token) {
			self.options.extend_option("config", token);
		}
	}

	fn apply_bundling_rules(&mut self) {
		for name in ["sdkjs-plugin", "sdkjs-plugin-server"] {
			if !self.options.contains(name) {
				self.options.set_option(name, DEFAULT_TOKEN);
			}
		}

		if
			self.options.check_option("platform", Platform::Ios.as_str())
			&& !self.options.check_option("config", "no_bundle_xcframeworks")
		{
			self.extend_config_once("bundle_xcframeworks");
		}

		if self.options.check_option("config", "bundle_xcframeworks") {
			self.extend_config_once("bundle_dylibs");
		}

		if self.host.os == HostOs::Mac && self.options.check_option("module", "desktop") {
			self.extend_config_once("bundle_dylibs");
		}
	}

	fn use_system_qt(&mut self, runner: &mut dyn Runner) -> Result<(), ExecError> {
		if !self.options.check_option("use-system-qt", "1") {
			return Ok(())
		}
		let setup = Invocation::new(self.layout.linux_tools_dir(), "python", &["use_system_qt.py"]);
		runner.run(&setup, &self.exports)?;
		self.options.set_option("qt-dir", path_value(&self.layout.system_qt_dir()));
		Ok(())
	}

	/// Merge the defaults file into the options.
	///
	/// Options that are already set have their `default` tokens replaced by the default value; unset options take
	/// the default value as-is. `config_addon` is always appended to `config`.
	pub fn parse_defaults(&mut self) -> Result<(), ParseError> {
		let mut path = self.layout.defaults_path();
		let branding = self.options.option("branding");
		if !branding.is_empty() {
			let branded = self.layout.branding_defaults_path(branding);
			if branded.is_file() {
				path = branded;
			}
		}

		info!(path = %path.display(), "merging defaults");
		let mut defaults: Vec<Entry> = Vec::new();
		for entry in kv::read(&path)? {
			match defaults.iter_mut().find(|e| e.name == entry.name) {
				Some(existing) => existing.value = entry.value,
				None => defaults.push(entry),
			}
		}

		for Entry { name, value } in &defaults {
			merge_default(&mut self.options, name, value);
		}

		if let Some(addon) = defaults.iter().find(move |e| e.name == CONFIG_ADDON) {
			self.options.extend_option("config", &addon.value);
		}
		Ok(())
	}
}

/// Merge a single default into `options`, substituting it for `default` tokens of an existing value.
pub fn merge_default(options: &mut Options, name: &str, default: &str) {
	let merged = match options.get(name) {
		Some(current) => {
			let mut merged = String::with_capacity(current.len());
			let mut done = 0;
			for (start, _) in current.match_indices(DEFAULT_TOKEN) {
				let end = start + DEFAULT_TOKEN.len();
				let is_token = current[..start].chars().next_back().is_none_or(char::is_whitespace)
					&& current[end..].chars().next().is_none_or(char::is_whitespace);
				merged.push_str(&current[done..start]);
				merged.push_str(if is_token { default } else { DEFAULT_TOKEN });
				done = end;
			}
			merged.push_str(&current[done..]);
			merged
		}
		None => default.to_string(),
	};
	options.set_option(name, merged);
}
