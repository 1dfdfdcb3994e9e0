use anyhow::{
	Context, Result as AResult,
};
use buildconf_common::{
	logging, resolve_with, root_dir, write_template,
	Configuration, DryRunner, Layout, ProcessRunner, Runner,
};
use clap::{
	Parser, Subcommand,
};
use std::{
	path::PathBuf,
	process::ExitCode,
};
use tracing::debug;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
	/// Build-tools directory holding `config` and `defaults`.
	///
	/// Defaults to `BUILDCONF_ROOT`, or the current directory.
	#[arg(long, global = true)]
	pub root: Option<PathBuf>,
	/// Don't merge the defaults file into the configuration.
	#[arg(long, global = true)]
	pub no_defaults: bool,
	/// Only print the external programs that resolving would run.
	#[arg(long, global = true)]
	pub dry_run: bool,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
	/// Show every resolved option.
	Show,
	/// Print the value of an option.
	Get {
		name: String,
	},
	/// Tell whether an option has a token.
	Check {
		name: String,
		value: String,
	},
	/// Show the concrete target platforms.
	Platforms,
	/// Show the compiler identifiers for a platform.
	Compiler {
		platform: String,
	},
	/// Show the sysroot library (or binary) directory for a platform.
	Sysroot {
		platform: String,
		/// Show the `usr/bin` directory instead.
		#[arg(long)]
		bin: bool,
		/// Use the platform's own sysroot even when cross compiling.
		#[arg(long, conflicts_with = "bin")]
		natural: bool,
	},
	/// Show the environment exported to build steps.
	Env,
	/// Show the branding name.
	Branding,
	/// Write a documented config file with default values.
	Init {
		/// Replace an existing config file.
		#[arg(long)]
		force: bool,
	},
}

fn resolve(cli: &Cli, layout: Layout) -> AResult<Configuration> {
	let mut process = ProcessRunner;
	let mut dry = DryRunner::default();
	let runner: &mut dyn Runner = if cli.dry_run { &mut dry } else { &mut process };
	let config = resolve_with(layout, !cli.no_defaults, runner).context("failed to resolve build configuration")?;
	for invocation in &dry.invocations {
		println!("would run: {invocation}");
	}
	Ok(config)
}

fn real_main() -> AResult<()> {
	let cli = Cli::parse();
	let layout = Layout::new(root_dir(cli.root.clone())?);
	debug!(root = %layout.root().display(), "using build-tools root");

	match &cli.command {
		Command::Init { force } => {
			let path = write_template(&layout, *force)?;
			println!("{}", path.display());
		}

		Command::Show => {
			let config = resolve(&cli, layout)?;
			for (name, value) in config.sorted() {
				println!("{name}={value}");
			}
		}

		Command::Get { name } => {
			println!("{}", resolve(&cli, layout)?.option(name));
		}

		Command::Check { name, value } => {
			let config = resolve(&cli, layout)?;
			println!("{}", bool_display(config.check_option(name, value)));
		}

		Command::Platforms => {
			let config = resolve(&cli, layout)?;
			for platform in config.platforms() {
				let kind = if platform.is_mobile() { "mobile" } else { "desktop" };
				println!("{platform} ({kind})");
			}
			println!("Mobile: {}", bool_display(config.is_mobile_platform()));
		}

		Command::Compiler { platform } => {
			let compiler = resolve(&cli, layout)?.check_compiler(platform);
			println!("compiler={}", compiler.compiler);
			println!("compiler_64={}", compiler.compiler_64);
		}

		Command::Sysroot { platform, bin, natural } => {
			let config = resolve(&cli, layout)?;
			if *bin {
				println!("{}", config.get_custom_sysroot_bin(platform));
			} else {
				println!("{}", config.get_custom_sysroot_lib(platform, *natural));
			}
		}

		Command::Env => {
			let config = resolve(&cli, layout)?;
			for (var, value) in config.exports.iter() {
				println!("{var}={value}");
			}
		}

		Command::Branding => {
			println!("{}", resolve(&cli, layout)?.branding());
		}
	}

	Ok(())
}

const fn bool_display(b: bool) -> &'static str {
	if b { "Yes" } else { "No" }
}

fn main() -> ExitCode {
	if let Err(e) = logging::init() {
		eprintln!("couldn't set up logging: {e}");
	}
	match real_main() {
		Ok(..) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("Fatal error: {e:#}");
			ExitCode::FAILURE
		}
	}
}
