//! Sysroots used for building Linux targets.

use tracing::debug;

use crate::{
	exec::{
		ExecError, Invocation, Runner,
	},
	host::HostOs,
	path_value,
	platform::Platform,
	Configuration,
};

/// Directory of the cached amd64 sysroot, relative to the sysroot home.
pub const SYSROOT_AMD64_DIR: &str = "ubuntu16-amd64-sysroot";
/// Directory of the cached arm64 sysroot, relative to the sysroot home.
pub const SYSROOT_ARM64_DIR: &str = "ubuntu16-arm64-sysroot";

/// What the `sysroot` option asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SysrootMode<'a> {
	/// Build against the host's own headers and libraries.
	Disabled,
	/// Use the cached sysroots, fetching them first if needed.
	Cached,
	/// Use one explicit sysroot for every architecture.
	Explicit(&'a str),
}

impl<'a> SysrootMode<'a> {
	pub fn parse(value: &'a str) -> Self {
		match value {
			"" | "0" => Self::Disabled,
			"1" => Self::Cached,
			path => Self::Explicit(path),
		}
	}
}

/// Return the platform whose sysroot serves `platform`, cross compiling `linux_arm64` from `linux_64` on non-ARM hosts.
fn sysroot_platform(platform: &str, host_arm: bool) -> &str {
	if platform == Platform::LinuxArm64.as_str() && !host_arm {
		Platform::Linux64.as_str()
	} else {
		platform
	}
}

impl Configuration {
	/// Apply the `sysroot` policy for the host.
	pub(crate) fn resolve_sysroot(&mut self, runner: &mut dyn Runner) -> Result<(), ExecError> {
		let Some(value) = self.options.get("sysroot").map(str::to_string) else {
			return Ok(())
		};

		if self.host.os != HostOs::Linux {
			self.options.set_option("sysroot", "");
			return Ok(())
		}

		match SysrootMode::parse(&value) {
			SysrootMode::Disabled => {
				self.options.set_option("sysroot", "");
			}
			SysrootMode::Cached => {
				let home = self.layout.sysroot_home();
				let amd64 = home.join(SYSROOT_AMD64_DIR);
				let arm64 = home.join(SYSROOT_ARM64_DIR);
				if !amd64.is_dir() || !arm64.is_dir() {
					let fetch = Invocation::new(&home, "python3", &["./fetch.py", "all"]);
					runner.run(&fetch, &self.exports)?;
				} else {
					debug!(home = %home.display(), "sysroots are already cached");
				}
				self.options.set_option("sysroot_linux_64", path_value(&amd64));
				self.options.set_option("sysroot_linux_arm64", path_value(&arm64));
			}
			SysrootMode::Explicit(path) => {
				self.options.set_option("sysroot_linux_64", path);
				self.options.set_option("sysroot_linux_arm64", path);
				self.options.set_option("sysroot", "1");
			}
		}
		Ok(())
	}

	/// Return the `usr/bin` directory of the sysroot used for `platform`.
	pub fn get_custom_sysroot_bin(&self, platform: &str) -> String {
		let platform = sysroot_platform(platform, self.host.arm);
		let mut path = self.options.option(&format!("sysroot_{platform}")).to_string();
		path.push_str("/usr/bin");
		path
	}

	/// Return the library directory of the sysroot used for `platform`, or an empty string for non-Linux platforms.
	///
	/// If `natural` is `true`, `linux_arm64` always uses its own sysroot, even on non-ARM hosts.
	pub fn get_custom_sysroot_lib(&self, platform: &str, natural: bool) -> String {
		let platform = if natural {
			platform
		} else {
			sysroot_platform(platform, self.host.arm)
		};

		let (key, lib) = match Platform::parse(platform) {
			Some(Platform::Linux64) => ("sysroot_linux_64", "/usr/lib/x86_64-linux-gnu"),
			Some(Platform::LinuxArm64) => ("sysroot_linux_arm64", "/usr/lib/aarch64-linux-gnu"),
			_ => return String::new(),
		};
		let mut path = self.options.option(key).to_string();
		path.push_str(lib);
		path
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		exec::DryRunner,
		host::Host,
		options::Options,
		Layout,
	};
	use std::fs::create_dir_all;

	fn configuration(host: Host, layout: Layout, sysroot: &str) -> Configuration {
		let options: Options = [("sysroot", sysroot)].into_iter().collect();
		Configuration::new(layout, host, options)
	}

	#[test]
	fn mode_parsing() {
		assert_eq!(SysrootMode::parse(""), SysrootMode::Disabled);
		assert_eq!(SysrootMode::parse("0"), SysrootMode::Disabled);
		assert_eq!(SysrootMode::parse("1"), SysrootMode::Cached);
		assert_eq!(SysrootMode::parse("/opt/sysroot"), SysrootMode::Explicit("/opt/sysroot"));
	}

	#[test]
	fn non_linux_hosts_clear_sysroot() {
		let mut config = configuration(Host::new(HostOs::Windows), Layout::new("/bt"), "1");
		let mut runner = DryRunner::default();
		config.resolve_sysroot(&mut runner).unwrap();
		assert_eq!(config.options.get("sysroot"), Some(""));
		assert!(runner.invocations.is_empty());
	}

	#[test]
	fn missing_caches_are_fetched_once() {
		let dir = tempfile::tempdir().unwrap();
		let layout = Layout::new(dir.path());
		let mut config = configuration(Host::new(HostOs::Linux), layout.clone(), "1");
		let mut runner = DryRunner::default();
		config.resolve_sysroot(&mut runner).unwrap();

		assert_eq!(runner.invocations, vec![
			Invocation::new(layout.sysroot_home(), "python3", &["./fetch.py", "all"]),
		]);
		assert_eq!(
			config.options.option("sysroot_linux_64"),
			path_value(&layout.sysroot_home().join(SYSROOT_AMD64_DIR)),
		);
	}

	#[test]
	fn present_caches_are_not_fetched() {
		let dir = tempfile::tempdir().unwrap();
		let layout = Layout::new(dir.path());
		create_dir_all(layout.sysroot_home().join(SYSROOT_AMD64_DIR)).unwrap();
		create_dir_all(layout.sysroot_home().join(SYSROOT_ARM64_DIR)).unwrap();
		let mut config = configuration(Host::new(HostOs::Linux), layout.clone(), "1");
		let mut runner = DryRunner::default();
		config.resolve_sysroot(&mut runner).unwrap();

		assert!(runner.invocations.is_empty());
		assert_eq!(
			config.options.option("sysroot_linux_arm64"),
			path_value(&layout.sysroot_home().join(SYSROOT_ARM64_DIR)),
		);
	}

	#[test]
	fn explicit_sysroot_is_shared() {
		let mut config = configuration(Host::new(HostOs::Linux), Layout::new("/bt"), "/opt/sysroot");
		config.resolve_sysroot(&mut DryRunner::default()).unwrap();
		assert_eq!(config.options.option("sysroot"), "1");
		assert_eq!(config.options.option("sysroot_linux_64"), "/opt/sysroot");
		assert_eq!(config.options.option("sysroot_linux_arm64"), "/opt/sysroot");
	}

	#[test]
	fn sysroot_lib_cross_compiles_arm64_on_x64() {
		let mut config = configuration(Host::new(HostOs::Linux), Layout::new("/bt"), "");
		config.options.set_option("sysroot_linux_64", "/sr/amd64");
		config.options.set_option("sysroot_linux_arm64", "/sr/arm64");

		assert_eq!(config.get_custom_sysroot_lib("linux_arm64", false), "/sr/amd64/usr/lib/x86_64-linux-gnu");
		assert_eq!(config.get_custom_sysroot_lib("linux_arm64", true), "/sr/arm64/usr/lib/aarch64-linux-gnu");
		assert_eq!(config.get_custom_sysroot_lib("linux_64", false), "/sr/amd64/usr/lib/x86_64-linux-gnu");
		assert_eq!(config.get_custom_sysroot_lib("win_64", false), "");
		assert_eq!(config.get_custom_sysroot_bin("linux_arm64"), "/sr/amd64/usr/bin");

		config.host.arm = true;
		assert_eq!(config.get_custom_sysroot_lib("linux_arm64", false), "/sr/arm64/usr/lib/aarch64-linux-gnu");
		assert_eq!(config.get_custom_sysroot_bin("linux_arm64"), "/sr/arm64/usr/bin");
	}
}
