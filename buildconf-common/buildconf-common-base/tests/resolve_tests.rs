//! End-to-end resolution of config and defaults files on simulated hosts.

use buildconf_common_base::{
	Configuration, DryRunner, Host, HostOs, Invocation, Layout, Platform, ResolveError,
	kv::ParseError, SYSROOT_AMD64_DIR, SYSROOT_ARM64_DIR,
};
use pretty_assertions::assert_eq;
use std::{
	fs::{
		create_dir_all, write,
	},
	path::Path,
};
use tempfile::TempDir;

struct Fixture {
	dir: TempDir,
}

impl Fixture {
	fn new(config: &str, defaults: &str) -> Self {
		let dir = tempfile::tempdir().unwrap();
		let root = dir.path().join("build_tools");
		create_dir_all(&root).unwrap();
		write(root.join("config"), config).unwrap();
		write(root.join("defaults"), defaults).unwrap();
		Self { dir }
	}

	fn layout(&self) -> Layout {
		Layout::new(self.dir.path().join("build_tools"))
	}

	fn resolve(&self, host: Host) -> (Configuration, DryRunner) {
		let mut runner = DryRunner::default();
		let config = Configuration::resolve(self.layout(), host, &mut runner).unwrap();
		(config, runner)
	}
}

fn windows_host(program_files: &Path) -> Host {
	Host::new(HostOs::Windows).with_var("ProgramFiles", program_files.to_string_lossy())
}

#[test]
fn parses_and_exports_every_option() {
	let fixture = Fixture::new("module = 'core builder'\nqt-dir=\"/opt/qt\"\nclean=TRUE\n", "");
	let (config, runner) = fixture.resolve(Host::new(HostOs::Linux));

	assert_eq!(config.option("module"), "core builder");
	assert_eq!(config.option("qt-dir"), "/opt/qt");
	assert_eq!(config.option("clean"), "1");
	assert_eq!(config.exports.get("OO_MODULE"), Some("core builder"));
	assert_eq!(config.exports.get("OO_QT_DIR"), Some("/opt/qt"));
	assert_eq!(config.exports.get("OO_CLEAN"), Some("1"));
	assert!(runner.invocations.is_empty());
}

#[test]
fn linux_pipeline_adds_stock_config_tokens() {
	let fixture = Fixture::new("platform=native\n", "");
	let (config, _) = fixture.resolve(Host::new(HostOs::Linux));

	assert_eq!(config.option("platform"), "native linux_64");
	assert_eq!(config.platforms(), vec![Platform::Linux64]);
	assert_eq!(config.option("config"), "core_disable_all_warnings");
	assert_eq!(config.option("sdkjs-plugin"), "default");
	assert_eq!(config.option("sdkjs-plugin-server"), "default");
	assert!(!config.contains("vs-version"));
}

#[test]
fn enabled_warnings_are_respected() {
	let fixture = Fixture::new("config=core_enable_all_warnings\n", "");
	let (config, _) = fixture.resolve(Host::new(HostOs::Linux));
	assert_eq!(config.option("config"), "core_enable_all_warnings");
}

#[test]
fn old_gcc_selects_legacy_runtimes() {
	let fixture = Fixture::new("platform=linux_64\n", "");
	let (config, _) = fixture.resolve(Host::new(HostOs::Linux).with_gcc_version("4.8.5"));
	assert_eq!(config.option("config"), "cef_version_107 v8_version_60 core_disable_all_warnings");
}

#[test]
fn windows_detects_qt_and_visual_studio() {
	let fixture = Fixture::new("platform=all\n", "");
	let program_files = fixture.dir.path().join("Program Files");
	let qmake_dir = program_files.join("Qt/5.15.2/msvc2019_64/bin");
	create_dir_all(&qmake_dir).unwrap();
	write(qmake_dir.join("qmake.exe"), b"").unwrap();
	let vs_path = program_files.join("Microsoft Visual Studio/2019/Community/VC/Auxiliary/Build");
	create_dir_all(&vs_path).unwrap();

	let (config, _) = fixture.resolve(windows_host(&program_files));

	assert_eq!(config.option("platform"), "all win_64 win_32");
	assert_eq!(config.option("qt-dir"), program_files.join("Qt/5.15.2").to_string_lossy());
	assert_eq!(config.option("vs-version"), "2019");
	assert_eq!(config.option("vs-path"), vs_path.to_string_lossy());
	assert!(config.check_option("config", "vs2019"));
	assert_eq!(config.check_compiler("win_64").compiler_64, "msvc2019_64");
}

#[test]
fn windows_xp_forces_vs_2015() {
	let fixture = Fixture::new("platform=win_32 xp\n", "");
	let program_files = fixture.dir.path().join("Program Files");
	create_dir_all(program_files.join("Microsoft Visual Studio/2022/Community/VC/Auxiliary/Build")).unwrap();

	let (config, _) = fixture.resolve(windows_host(&program_files));

	assert_eq!(config.option("platform"), "win_32 xp win_64_xp win_32_xp");
	assert_eq!(config.option("vs-version"), "2015");
	assert_eq!(config.option("vs-path"), "");
	assert!(config.check_option("config", "v8_version_60"));
	assert!(!config.check_option("config", "vs2019"));
	assert!(!config.check_option("config", "vs2022"));
}

#[test]
fn configured_toolchain_is_not_searched() {
	let fixture = Fixture::new("qt-dir=D:\\Qt\\5.9\nvs-version=2022\nvs-path=D:\\VS\n", "");
	let (config, _) = fixture.resolve(Host::new(HostOs::Windows));
	assert_eq!(config.option("qt-dir"), "D:\\Qt\\5.9");
	assert_eq!(config.option("vs-path"), "D:\\VS");
	assert!(config.check_option("config", "vs2022"));
}

#[test]
fn sysroot_is_fetched_with_exported_environment() {
	let fixture = Fixture::new("sysroot=1\n", "");
	let (config, runner) = fixture.resolve(Host::new(HostOs::Linux));

	let home = fixture.layout().sysroot_home();
	assert_eq!(runner.invocations, vec![Invocation::new(&home, "python3", &["./fetch.py", "all"])]);
	assert_eq!(config.option("sysroot_linux_64"), home.join(SYSROOT_AMD64_DIR).to_string_lossy());
	assert_eq!(
		config.get_custom_sysroot_lib("linux_arm64", true),
		format!("{}/usr/lib/aarch64-linux-gnu", home.join(SYSROOT_ARM64_DIR).display()),
	);
}

#[test]
fn sysroot_is_a_no_op_off_linux() {
	let fixture = Fixture::new("sysroot=/opt/sysroot\n", "");
	let (config, runner) = fixture.resolve(Host::new(HostOs::Mac));
	assert_eq!(config.get("sysroot"), Some(""));
	assert!(!config.contains("sysroot_linux_64"));
	assert!(runner.invocations.is_empty());
}

#[test]
fn system_qt_is_set_up() {
	let fixture = Fixture::new("use-system-qt=true\n", "");
	let (config, runner) = fixture.resolve(Host::new(HostOs::Linux));
	let layout = fixture.layout();
	assert_eq!(runner.invocations, vec![
		Invocation::new(layout.linux_tools_dir(), "python", &["use_system_qt.py"]),
	]);
	assert_eq!(config.option("qt-dir"), layout.system_qt_dir().to_string_lossy());
}

#[test]
fn ios_bundles_frameworks_and_dylibs() {
	let fixture = Fixture::new("platform=ios\nmodule=desktop\n", "");
	let (config, _) = fixture.resolve(Host::new(HostOs::Mac));
	assert_eq!(config.option("config"), "bundle_xcframeworks bundle_dylibs core_disable_all_warnings");
	assert!(config.is_mobile_platform());

	let fixture = Fixture::new("platform=ios\nconfig=no_bundle_xcframeworks\n", "");
	let (config, _) = fixture.resolve(Host::new(HostOs::Mac));
	assert_eq!(config.option("config"), "no_bundle_xcframeworks core_disable_all_warnings");
}

#[test]
fn defaults_fill_and_substitute() {
	let fixture = Fixture::new(
		"module=core default\nplatform=native\n",
		"module=desktop builder\nbranch=master\nconfig_addon=no_vlc\n",
	);
	let (config, _) = fixture.resolve(Host::new(HostOs::Linux));

	assert_eq!(config.option("module"), "core desktop builder");
	assert_eq!(config.option("branch"), "master");
	assert_eq!(config.option("config"), "core_disable_all_warnings no_vlc");
	assert_eq!(config.option("sdkjs-plugin"), "default");
}

#[test]
fn sdkjs_plugins_default_through_defaults_file() {
	let fixture = Fixture::new("platform=native\n", "sdkjs-plugin=photoeditor macros\n");
	let (config, _) = fixture.resolve(Host::new(HostOs::Linux));
	assert_eq!(config.option("sdkjs-plugin"), "photoeditor macros");
	assert_eq!(config.option("sdkjs-plugin-server"), "default");
}

#[test]
fn branding_defaults_take_precedence() {
	let fixture = Fixture::new("branding=acme\n", "module=core\n");
	let branded = fixture.dir.path().join("acme/build_tools");
	create_dir_all(&branded).unwrap();
	write(branded.join("defaults"), "module=acme-desktop\nbranding-name=Acme\n").unwrap();

	let (config, _) = fixture.resolve(Host::new(HostOs::Linux));
	assert_eq!(config.option("module"), "acme-desktop");
	assert_eq!(config.branding(), "Acme");
}

#[test]
fn missing_branding_defaults_fall_back_to_stock() {
	let fixture = Fixture::new("branding=acme\n", "module=core\n");
	let (config, _) = fixture.resolve(Host::new(HostOs::Linux));
	assert_eq!(config.option("module"), "core");
	assert_eq!(config.branding(), "univaultoffice");
}

#[test]
fn missing_config_fails() {
	let dir = tempfile::tempdir().unwrap();
	let error = Configuration::parse(Layout::new(dir.path()), Host::new(HostOs::Linux), &mut DryRunner::default())
		.unwrap_err();
	assert!(matches!(error, ResolveError::Parse(ParseError::Read { .. })));
}

#[test]
fn missing_defaults_fail() {
	let fixture = Fixture::new("platform=native\n", "");
	std::fs::remove_file(fixture.layout().defaults_path()).unwrap();
	let mut config = Configuration::parse(fixture.layout(), Host::new(HostOs::Linux), &mut DryRunner::default())
		.unwrap();
	assert!(matches!(config.parse_defaults(), Err(ParseError::Read { .. })));
}

#[test]
fn malformed_config_line_fails() {
	let fixture = Fixture::new("platform=native\nnot an assignment\n", "");
	let error = Configuration::parse(fixture.layout(), Host::new(HostOs::Linux), &mut DryRunner::default())
		.unwrap_err();
	assert!(matches!(error, ResolveError::Parse(ParseError::Malformed { .. })));
}
