//! Build target platforms and the expansion of symbolic `platform` tokens.

use std::fmt;
use tracing::debug;

use crate::{
	host::{
		Host, HostOs,
	},
	options::Options,
};

/// Token that requests every desktop platform native to the host.
pub const ALL_TOKEN: &str = "all";
/// Token that requests the single platform matching the host.
pub const NATIVE_TOKEN: &str = "native";
/// Token that requests the Windows XP compatible platforms.
pub const XP_TOKEN: &str = "xp";
/// Token that requests every Android ABI.
pub const ANDROID_TOKEN: &str = "android";

/// Whether `win_64` is added for `win_arm64` builds on non-ARM Windows hosts, mirroring the rule for Macs.
///
/// Kept off until ARM64 Windows output can be run under emulation when deploying.
const EMULATE_WIN_ARM64: bool = false;

/// Concrete target platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
	Win64,
	Win32,
	Win64Xp,
	Win32Xp,
	WinArm64,
	Linux64,
	Linux32,
	LinuxArm64,
	Mac64,
	MacArm64,
	Ios,
	AndroidArm64V8a,
	AndroidArmv7,
	AndroidX86,
	AndroidX86_64,
}

impl Platform {
	pub const ALL: [Self; 15] = [
		Self::Win64, Self::Win32, Self::Win64Xp, Self::Win32Xp, Self::WinArm64,
		Self::Linux64, Self::Linux32, Self::LinuxArm64,
		Self::Mac64, Self::MacArm64,
		Self::Ios,
		Self::AndroidArm64V8a, Self::AndroidArmv7, Self::AndroidX86, Self::AndroidX86_64,
	];

	pub const ANDROID: [Self; 4] = [
		Self::AndroidArm64V8a, Self::AndroidArmv7, Self::AndroidX86, Self::AndroidX86_64,
	];

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Win64 => "win_64",
			Self::Win32 => "win_32",
			Self::Win64Xp => "win_64_xp",
			Self::Win32Xp => "win_32_xp",
			Self::WinArm64 => "win_arm64",
			Self::Linux64 => "linux_64",
			Self::Linux32 => "linux_32",
			Self::LinuxArm64 => "linux_arm64",
			Self::Mac64 => "mac_64",
			Self::MacArm64 => "mac_arm64",
			Self::Ios => "ios",
			Self::AndroidArm64V8a => "android_arm64_v8a",
			Self::AndroidArmv7 => "android_armv7",
			Self::AndroidX86 => "android_x86",
			Self::AndroidX86_64 => "android_x86_64",
		}
	}

	pub fn parse(s: &str) -> Option<Self> {
		Self::ALL.into_iter().find(move |p| p.as_str() == s)
	}

	#[inline]
	pub const fn is_mobile(self) -> bool {
		matches!(self, Self::Ios) || self.is_android()
	}

	#[inline]
	pub const fn is_android(self) -> bool {
		matches!(self, Self::AndroidArm64V8a | Self::AndroidArmv7 | Self::AndroidX86 | Self::AndroidX86_64)
	}

	/// Return the desktop platforms that `all` expands to on `os`.
	pub const fn all_for(os: HostOs) -> &'static [Self] {
		match os {
			HostOs::Windows => &[Self::Win64, Self::Win32],
			HostOs::Linux => &[Self::Linux64, Self::Linux32],
			HostOs::Mac => &[Self::Mac64],
		}
	}

	/// Return the platform that `native` expands to on `host`.
	pub fn native_for(host: &Host) -> Self {
		match (host.os, host.bits_64) {
			(HostOs::Windows, true) => Self::Win64,
			(HostOs::Windows, false) => Self::Win32,
			(HostOs::Linux, true) => Self::Linux64,
			(HostOs::Linux, false) => Self::Linux32,
			(HostOs::Mac, _) => Self::Mac64,
		}
	}
}

impl fmt::Display for Platform {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

fn append_platforms(options: &mut Options, platforms: &[Platform]) {
	for platform in platforms {
		options.extend_option("platform", platform.as_str());
	}
}

/// Expand the symbolic tokens of the `platform` option into concrete platforms for `host`.
pub fn expand_platforms(options: &mut Options, host: &Host) {
	if options.check_option("platform", ALL_TOKEN) {
		append_platforms(options, Platform::all_for(host.os));
	}

	if options.check_option("platform", NATIVE_TOKEN) {
		append_platforms(options, &[Platform::native_for(host)]);
	}

	if
		host.os == HostOs::Mac && !host.arm
		&& options.check_option("platform", Platform::MacArm64.as_str())
		&& !options.check_option("platform", Platform::Mac64.as_str())
	{
		options.prepend_option("platform", Platform::Mac64.as_str());
	}

	if
		EMULATE_WIN_ARM64
		&& host.os == HostOs::Windows && !host.arm
		&& options.check_option("platform", Platform::WinArm64.as_str())
		&& !options.check_option("platform", Platform::Win64.as_str())
	{
		options.prepend_option("platform", Platform::Win64.as_str());
	}

	if options.check_option("platform", XP_TOKEN) && host.os == HostOs::Windows {
		append_platforms(options, &[Platform::Win64Xp, Platform::Win32Xp]);
	}

	if options.check_option("platform", ANDROID_TOKEN) {
		append_platforms(options, &Platform::ANDROID);
	}

	debug!(platform = options.option("platform"), "expanded platforms");
}
