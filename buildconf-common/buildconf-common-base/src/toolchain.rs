//! Detection of Qt and Visual Studio installations on Windows hosts.

use clean_path::clean;
use std::{
	ffi::OsString,
	fmt,
	fs::{
		read_dir, ReadDir,
	},
	io::Result as IoResult,
	path::{
		Path, PathBuf,
	},
};
use tracing::{
	debug, warn,
};

use crate::{
	host::Host,
	options::Options,
	platform::Platform,
};

/// File that marks a Qt installation.
pub const QMAKE_EXE: &str = "qmake.exe";

/// Qt kit tags, most preferred first.
pub const QT_PREFERENCE: [&str; 11] = [
	"msvc2022_64", "msvc2022",
	"msvc2019_64", "msvc2019",
	"msvc2017_64", "msvc2017",
	"msvc2015_64", "msvc2015",
	"mingw", "clang", "gcc",
];

/// Substrings of kit directory names that Qt nests its `bin` directory under.
const QT_COMPILER_DIR_MARKERS: [&str; 4] = ["msvc", "mingw", "winrt", "clang"];

/// Visual Studio editions, searched in this order.
pub const VS_EDITIONS: [&str; 4] = ["Enterprise", "Professional", "Community", "BuildTools"];

/// Visual Studio release that a build can be configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VsVersion {
	V2015,
	V2019,
	V2022,
}

impl VsVersion {
	/// Version used when nothing else decides.
	pub const FALLBACK: Self = Self::V2019;

	pub const fn as_str(self) -> &'static str {
		match self {
			Self::V2015 => "2015",
			Self::V2019 => "2019",
			Self::V2022 => "2022",
		}
	}

	pub fn parse(s: &str) -> Option<Self> {
		[Self::V2015, Self::V2019, Self::V2022].into_iter().find(move |v| v.as_str() == s)
	}

	/// Return the `config` token that selects the matching build system flavor, if any.
	pub const fn config_token(self) -> Option<&'static str> {
		match self {
			Self::V2015 => None,
			Self::V2019 => Some("vs2019"),
			Self::V2022 => Some("vs2022"),
		}
	}

	/// Return the names of the Qt kit directories built with this version.
	pub const fn qt_kits(self) -> [&'static str; 2] {
		match self {
			Self::V2015 => ["msvc2015_64", "msvc2015"],
			Self::V2019 => ["msvc2019_64", "msvc2019"],
			Self::V2022 => ["msvc2022_64", "msvc2022"],
		}
	}
}

impl fmt::Display for VsVersion {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Iterator over the names of directories located inside of another directory.
#[derive(Debug)]
#[repr(transparent)]
pub struct DirNames(pub ReadDir);
impl Iterator for DirNames {
	type Item = IoResult<OsString>;
	fn next(&mut self) -> Option<Self::Item> {
		loop {
			match self.0.next() {
				Some(Ok(entry)) => {
					if entry.path().is_dir() {
						break Some(Ok(entry.file_name()))
					}
				}
				Some(Err(e)) => break Some(Err(e)),
				None => break None,
			}
		}
	}
}

/// Return the non-hidden subdirectories of `dir` in name order, or nothing if `dir` can't be read.
fn sub_dirs(dir: &Path) -> Vec<PathBuf> {
	let Ok(names) = read_dir(dir).map(DirNames) else {
		return Vec::new()
	};
	let mut names: Vec<_> = names
		.flatten()
		.filter(move |n| !n.to_string_lossy().starts_with('.'))
		.collect();
	names.sort();
	names.into_iter().map(move |n| dir.join(n)).collect()
}

/// Return the `Program Files` directories of `host`, without duplicates.
pub fn program_files_dirs(host: &Host) -> Vec<PathBuf> {
	let mut dirs: Vec<PathBuf> = Vec::with_capacity(2);
	for name in ["ProgramFiles", "ProgramFiles(x86)"] {
		if let Some(dir) = host.var(name).map(PathBuf::from) {
			if !dirs.contains(&dir) {
				dirs.push(dir);
			}
		}
	}
	dirs
}

/// Return the directories that Qt installers put their installations in.
pub fn qt_search_roots(host: &Host) -> Vec<PathBuf> {
	let mut roots = vec![PathBuf::from("C:\\Qt"), PathBuf::from("C:\\Qt5")];
	if let Some(local) = host.var("LOCALAPPDATA") {
		roots.push(Path::new(local).join("Programs").join("Qt"));
	}
	roots.extend(program_files_dirs(host).into_iter().map(move |pf| pf.join("Qt")));
	roots
}

/// Find every `qmake.exe` matching `root/*/*/bin/qmake.exe` or `root/*/bin/qmake.exe`, in discovery order.
pub fn find_qmake_paths(roots: &[PathBuf]) -> Vec<PathBuf> {
	let mut results: Vec<PathBuf> = Vec::new();
	let mut push = |path: PathBuf| {
		if path.is_file() {
			let path = clean(path);
			if !results.contains(&path) {
				results.push(path);
			}
		}
	};

	for root in roots {
		for version in sub_dirs(root) {
			for kit in sub_dirs(&version) {
				push(kit.join("bin").join(QMAKE_EXE));
			}
		}
		for kit in sub_dirs(root) {
			push(kit.join("bin").join(QMAKE_EXE));
		}
	}
	results
}

/// Pick the installation whose path mentions the most preferred kit, or the first one found.
pub fn pick_preferred_qmake(paths: &[PathBuf]) -> Option<&Path> {
	let lowered: Vec<_> = paths.iter()
		.map(move |p| (p.as_path(), p.to_string_lossy().to_lowercase()))
		.collect();
	QT_PREFERENCE.iter()
		.find_map(|tag| lowered.iter().find(move |(.., lower)| lower.contains(tag)))
		.map(move |(path, ..)| *path)
		.or_else(move || paths.first().map(PathBuf::as_path))
}

/// Infer the root of a Qt installation from the path of its `qmake.exe`.
///
/// `<root>/<version>/<kit>/bin/qmake.exe` yields `<root>/<version>`, and `<root>/<version>/bin/qmake.exe` yields
/// `<root>/<version>`.
pub fn qt_root_from_qmake(qmake: &Path) -> Option<PathBuf> {
	let bin = qmake.parent()?;
	let is_bin = bin.file_name().is_some_and(move |n| n.to_string_lossy().eq_ignore_ascii_case("bin"));
	if !is_bin {
		return None
	}

	let kit = bin.parent()?;
	let kit_name = kit.file_name()?.to_string_lossy().to_lowercase();
	if QT_COMPILER_DIR_MARKERS.iter().any(move |m| kit_name.contains(m)) {
		kit.parent().map(Path::to_path_buf)
	} else {
		Some(kit.to_path_buf())
	}
}

/// Search the usual install locations of `host` for a Qt installation.
pub fn detect_qt_dir(host: &Host) -> Option<PathBuf> {
	let paths = find_qmake_paths(&qt_search_roots(host));
	debug!(?paths, "found qmake installations");
	let qmake = pick_preferred_qmake(&paths)?;
	let dir = qt_root_from_qmake(qmake);
	if dir.is_none() {
		warn!("couldn't infer Qt directory from {}", qmake.display());
	}
	dir
}

/// Return `true` if the Qt installation at `qt_dir` has a kit directory named `kit`.
pub fn qt_has_kit(qt_dir: &str, kit: &str) -> bool {
	!qt_dir.is_empty() && Path::new(qt_dir).join(kit).is_dir()
}

/// Find the directory holding the build environment scripts of Visual Studio `version`.
pub fn find_vs_path(host: &Host, version: &str) -> Option<PathBuf> {
	let roots = program_files_dirs(host);
	if version == VsVersion::V2015.as_str() {
		return roots.iter()
			.map(move |root| root.join("Microsoft Visual Studio 14.0").join("VC"))
			.find(move |path| path.is_dir())
	}

	roots.iter()
		.flat_map(move |root| VS_EDITIONS.iter().map(move |edition| {
			let mut path = root.join("Microsoft Visual Studio");
			path.push(version);
			path.push(edition);
			path.push("VC");
			path.push("Auxiliary");
			path.push("Build");
			path
		}))
		.find(move |path| path.is_dir())
}

/// Choose the Visual Studio version to build with, given the already resolved `options`.
pub fn select_vs_version(options: &Options, host: &Host) -> VsVersion {
	let wants_xp = options.check_option("platform", Platform::Win64Xp.as_str())
		|| options.check_option("platform", Platform::Win32Xp.as_str());
	if wants_xp {
		return VsVersion::V2015
	}

	let qt_dir = options.option("qt-dir");
	for version in [VsVersion::V2022, VsVersion::V2019] {
		if version.qt_kits().iter().any(move |kit| qt_has_kit(qt_dir, kit)) {
			debug!(%version, qt_dir, "Qt was built with this Visual Studio");
			return version
		}
	}

	for version in [VsVersion::V2022, VsVersion::V2019] {
		if find_vs_path(host, version.as_str()).is_some() {
			debug!(%version, "found Visual Studio installation");
			return version
		}
	}

	warn!("no Visual Studio installation found, assuming {}", VsVersion::FALLBACK);
	VsVersion::FALLBACK
}
