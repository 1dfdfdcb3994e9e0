//! Description of the machine that the build is configured on.

use rustc_hash::FxHashMap;
use std::{
	env::var,
	fmt,
	process::Command,
};
use tracing::debug;

use crate::{
	path_value,
	version::is_older_than,
};

/// Environment variables consulted while searching for installations.
pub const CONSUMED_VARS: [&str; 3] = ["ProgramFiles", "ProgramFiles(x86)", "LOCALAPPDATA"];

/// Operating system family of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HostOs {
	Windows,
	Linux,
	Mac,
}

impl HostOs {
	/// Return the family of the running system.
	pub const fn current() -> Self {
		if cfg!(windows) {
			Self::Windows
		} else if cfg!(target_os = "macos") {
			Self::Mac
		} else {
			Self::Linux
		}
	}

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Windows => "windows",
			Self::Linux => "linux",
			Self::Mac => "mac",
		}
	}
}

impl fmt::Display for HostOs {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Host machine along with the parts of its environment that influence resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
	pub os: HostOs,
	/// `true` if the host CPU is ARM.
	pub arm: bool,
	/// `true` if the host is a 64-bit machine.
	pub bits_64: bool,
	/// Full version of the system `gcc`, if one was found.
	pub gcc_version: Option<String>,
	vars: FxHashMap<String, String>,
}

impl Host {
	/// Create a 64-bit, non-ARM host of `os` without a `gcc` or any environment variables.
	pub fn new(os: HostOs) -> Self {
		Self {
			os,
			arm: false,
			bits_64: true,
			gcc_version: None,
			vars: FxHashMap::default(),
		}
	}

	/// Describe the running system.
	pub fn detect() -> Self {
		let os = HostOs::current();
		let mut host = Self::new(os);
		match detect_machine() {
			Some(machine) => {
				host = host.with_machine(&machine);
			}
			None => {
				host = host
					.with_arm(cfg!(any(target_arch = "aarch64", target_arch = "arm")))
					.with_bits_64(cfg!(target_pointer_width = "64"));
			}
		}

		for name in CONSUMED_VARS {
			if let Ok(value) = var(name) {
				host = host.with_var(name, value);
			}
		}
		if host.var("LOCALAPPDATA").is_none() {
			if let Some(dir) = dirs::data_local_dir() {
				host = host.with_var("LOCALAPPDATA", path_value(&dir));
			}
		}

		if os == HostOs::Linux {
			host.gcc_version = detect_gcc_version();
		}

		debug!(?host, "detected host");
		host
	}

	#[inline]
	pub fn with_arm(mut self, arm: bool) -> Self {
		self.arm = arm;
		self
	}

	#[inline]
	pub fn with_bits_64(mut self, bits_64: bool) -> Self {
		self.bits_64 = bits_64;
		self
	}

	/// Set [`arm`](Self::arm) and [`bits_64`](Self::bits_64) from a machine name such as `x86_64`, `AMD64` or
	/// `armv7l`.
	pub fn with_machine(self, machine: &str) -> Self {
		let machine = machine.trim().to_ascii_lowercase();
		let arm = machine.starts_with("arm") || machine.starts_with("aarch");
		let bits_64 = machine.ends_with("64");
		self.with_arm(arm).with_bits_64(bits_64)
	}

	#[inline]
	pub fn with_gcc_version(mut self, version: impl Into<String>) -> Self {
		self.gcc_version = Some(version.into());
		self
	}

	#[inline]
	pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.vars.insert(name.into(), value.into());
		self
	}

	/// Return the value of the environment variable `name`, treating empty values as unset.
	pub fn var(&self, name: &str) -> Option<&str> {
		self.vars.get(name)
			.map(String::as_str)
			.filter(move |v| !v.is_empty())
	}

	/// Return `true` if the system `gcc` is known and older than `minimum`.
	pub fn gcc_older_than(&self, minimum: &str) -> bool {
		self.gcc_version.as_deref().is_some_and(move |v| is_older_than(v, minimum))
	}
}

/// Return the hardware name of the running machine, which may differ from what this program was compiled for.
fn detect_machine() -> Option<String> {
	if cfg!(windows) {
		// Set for 32-bit processes on 64-bit Windows.
		return ["PROCESSOR_ARCHITEW6432", "PROCESSOR_ARCHITECTURE"].into_iter()
			.filter_map(move |name| var(name).ok())
			.find(move |v| !v.is_empty())
	}

	let output = match Command::new("uname").arg("-m").output() {
		Ok(output) if output.status.success() => output,
		Ok(output) => {
			debug!(status = %output.status, "uname refused to report the machine");
			return None
		}
		Err(e) => {
			debug!("couldn't run uname: {e}");
			return None
		}
	};
	let machine = String::from_utf8_lossy(&output.stdout).trim().to_string();
	(!machine.is_empty()).then_some(machine)
}

/// Ask the system `gcc` for its full version.
fn detect_gcc_version() -> Option<String> {
	let output = match Command::new("gcc").args(["-dumpfullversion", "-dumpversion"]).output() {
		Ok(output) if output.status.success() => output,
		Ok(output) => {
			debug!(status = %output.status, "gcc refused to report its version");
			return None
		}
		Err(e) => {
			debug!("couldn't run gcc: {e}");
			return None
		}
	};
	let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
	(!version.is_empty()).then_some(version)
}
