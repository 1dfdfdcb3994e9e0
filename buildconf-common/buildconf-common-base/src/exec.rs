//! Exported environment and external processes launched during resolution.

use std::{
	fmt,
	io::Error as IoError,
	path::PathBuf,
	process::{
		Command, ExitStatus, Stdio,
	},
};
use tracing::info;

use crate::EXPORT_PREFIX;

/// Return the environment variable name that the option `name` is exported as.
pub fn export_name(name: &str) -> String {
	let mut buffer = String::with_capacity(EXPORT_PREFIX.len() + name.len());
	buffer.push_str(EXPORT_PREFIX);
	buffer.extend(name.chars().map(move |c| match c {
		'-' => '_',
		c => c.to_ascii_uppercase(),
	}));
	buffer
}

/// Ordered set of environment variables exported from parsed options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exports(Vec<(String, String)>);

impl Exports {
	/// Export the option `name` with `value`, replacing an earlier export of the same option.
	pub fn export(&mut self, name: &str, value: &str) {
		let var = export_name(name);
		match self.0.iter_mut().find(|(existing, ..)| *existing == var) {
			Some((.., existing)) => *existing = value.into(),
			None => self.0.push((var, value.into())),
		}
	}

	/// Return the value exported as the variable `var`.
	pub fn get(&self, var: &str) -> Option<&str> {
		self.0.iter()
			.find(move |(name, ..)| name == var)
			.map(move |(.., value)| value.as_str())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(move |(k, v)| (k.as_str(), v.as_str()))
	}

	/// Add every exported variable to the environment of `command`.
	pub fn apply<'c>(&self, command: &'c mut Command) -> &'c mut Command {
		command.envs(self.iter())
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// External program to run to completion in a specific directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Invocation {
	pub dir: PathBuf,
	pub program: String,
	pub args: Vec<String>,
}

impl Invocation {
	pub fn new(dir: impl Into<PathBuf>, program: impl Into<String>, args: &[&str]) -> Self {
		Self {
			dir: dir.into(),
			program: program.into(),
			args: args.iter().map(move |a| a.to_string()).collect(),
		}
	}
}

impl fmt::Display for Invocation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.program)?;
		for arg in &self.args {
			write!(f, " {arg}")?;
		}
		write!(f, " (in {})", self.dir.display())
	}
}

/// Error that occurred while running an [`Invocation`].
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
	#[error("failed to launch `{invocation}`: {error}")]
	Spawn {
		error: IoError,
		invocation: Invocation,
	},
	#[error("`{invocation}` failed with {status}")]
	Status {
		status: ExitStatus,
		invocation: Invocation,
	},
}

/// Strategy for running external programs while resolving.
pub trait Runner {
	/// Run `invocation` to completion, with `exports` added to its environment.
	fn run(&mut self, invocation: &Invocation, exports: &Exports) -> Result<(), ExecError>;
}

/// [`Runner`] that spawns real processes, inheriting standard I/O.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
	fn run(&mut self, invocation: &Invocation, exports: &Exports) -> Result<(), ExecError> {
		info!(%invocation, "running");
		let mut command = Command::new(&invocation.program);
		command.args(&invocation.args)
			.current_dir(&invocation.dir)
			.stdin(Stdio::inherit())
			.stdout(Stdio::inherit()).stderr(Stdio::inherit());
		exports.apply(&mut command);

		let status = match command.status() {
			Ok(status) => status,
			Err(error) => return Err(ExecError::Spawn {
				error,
				invocation: invocation.clone(),
			}),
		};
		if !status.success() {
			return Err(ExecError::Status {
				status,
				invocation: invocation.clone(),
			})
		}
		Ok(())
	}
}

/// [`Runner`] that only records what would have been run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DryRunner {
	pub invocations: Vec<Invocation>,
}

impl Runner for DryRunner {
	fn run(&mut self, invocation: &Invocation, _exports: &Exports) -> Result<(), ExecError> {
		info!(%invocation, "skipping (dry run)");
		self.invocations.push(invocation.clone());
		Ok(())
	}
}
