use std::{
	fmt,
	path::Path,
};

use crate::{
	host::HostOs,
	Configuration,
};

/// Compiler identifiers that a platform is built with, used to pick Qt kits and build output directories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Compiler {
	/// Identifier for 32-bit (or architecture-neutral) builds.
	pub compiler: String,
	/// Identifier for 64-bit builds.
	pub compiler_64: String,
}

impl Compiler {
	fn pair(compiler: impl Into<String>, compiler_64: impl Into<String>) -> Self {
		Self {
			compiler: compiler.into(),
			compiler_64: compiler_64.into(),
		}
	}

	fn same(compiler: &str) -> Self {
		Self::pair(compiler, compiler)
	}
}

impl fmt::Display for Compiler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}", self.compiler, self.compiler_64)
	}
}

impl Configuration {
	/// Derive the compiler identifiers for `platform`.
	///
	/// An explicit `compiler` option always wins.
	pub fn check_compiler(&self, platform: &str) -> Compiler {
		let explicit = self.options.option("compiler");
		if !explicit.is_empty() {
			return if platform == "ios" {
				Compiler::same(explicit)
			} else {
				Compiler::pair(explicit, format!("{explicit}_64"))
			}
		}

		let vs = self.options.option("vs-version");
		let mut compiler = if platform.starts_with("win_arm") {
			Compiler::pair(format!("msvc{vs}_arm"), format!("msvc{vs}_arm64"))
		} else if platform.starts_with("win") {
			Compiler::pair(format!("msvc{vs}"), format!("msvc{vs}_64"))
		} else if platform.starts_with("linux_arm") && !self.host.arm {
			Compiler::pair("gcc_arm", "gcc_arm64")
		} else if platform.starts_with("linux") {
			Compiler::pair("gcc", "gcc_64")
		} else if platform.starts_with("mac") {
			Compiler::pair("clang", "clang_64")
		} else if platform == "ios" {
			Compiler::same("ios")
		} else if platform.starts_with("android") {
			Compiler::same(platform)
		} else {
			Compiler::pair("", "_64")
		};

		let qt_dir = self.options.option("qt-dir");
		if self.host.os == HostOs::Mac && !qt_dir.is_empty() {
			let qt_dir = Path::new(qt_dir);
			if !qt_dir.join(&compiler.compiler_64).is_dir() && qt_dir.join("macos").is_dir() {
				compiler = Compiler::same("macos");
			}
		}

		compiler
	}
}
