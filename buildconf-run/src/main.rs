use anyhow::{
	anyhow, bail,
	Context, Result as AResult,
};
use buildconf_common::{
	logging, resolve_host, root_dir,
	Layout,
};
use std::{
	env::args_os,
	ffi::OsString,
	process::{
		exit, Command, ExitCode, Stdio,
	},
};
use tracing::info;

fn main() -> ExitCode {
	if let Err(e) = logging::init() {
		eprintln!("couldn't set up logging: {e}");
	}

	let mut args = args_os();
	let exe = args.next();
	match run_main(args) {
		Ok(Some(code)) => exit(code),
		Ok(None) => {}
		Err(e) => {
			if let Some(exe) = exe.as_ref().and_then(move |s| s.to_str()) {
				eprint!("{exe}: ");
			}
			eprintln!("{e:#}");
		}
	}
	ExitCode::FAILURE
}

/// Resolve the build configuration and run the build step given in `args` with its exported environment.
///
/// Returns the exit code of the build step, or [`None`] if it was killed by a signal.
fn run_main(mut args: impl Iterator<Item = OsString>) -> AResult<Option<i32>> {
	let Some(program) = args.next() else {
		bail!("usage: buildconf-run <program> [args...]");
	};

	let layout = Layout::new(root_dir(None)?);
	let config = resolve_host(layout, true).context("failed to resolve build configuration")?;

	let mut command = Command::new(&program);
	command.args(args)
		.stdin(Stdio::inherit())
		.stdout(Stdio::inherit()).stderr(Stdio::inherit());
	config.exports.apply(&mut command);
	command.env("OO_BRANDING_NAME", config.branding());
	info!(program = %program.to_string_lossy(), exports = config.exports.len(), "running build step");

	let mut child = command.spawn()
		.map_err(|e| anyhow!("{}: {e}", program.to_string_lossy()))?;
	let status = child.wait()?;
	Ok(status.code())
}
