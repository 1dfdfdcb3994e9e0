//! Reader for the line-oriented `name=value` files that hold build options and their defaults.

use std::{
	fs::read_to_string,
	io::Error as IoError,
	path::{
		Path, PathBuf,
	},
};

/// Single `name=value` assignment read from a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
	pub name: String,
	pub value: String,
}

/// Line that has content but no `=` delimiter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: expected `name=value`, found {text:?}")]
pub struct MalformedLine {
	/// 1-based line number.
	pub line: usize,
	pub text: String,
}

/// Error that occurred in [`read`].
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
	#[error("failed to read {path}: {error}")]
	Read {
		error: IoError,
		path: PathBuf,
	},
	#[error("{path}: {error}")]
	Malformed {
		error: MalformedLine,
		path: PathBuf,
	},
}

/// Normalize a raw value: strip surrounding quotes and whitespace, and turn boolean words into `1` and `0`.
pub fn normalize_value(raw: &str) -> String {
	let value = raw.trim_matches(|c| matches!(c, ' ' | '\'' | '"' | '\r' | '\n'));
	if value.eq_ignore_ascii_case("true") {
		"1".into()
	} else if value.eq_ignore_ascii_case("false") {
		"0".into()
	} else {
		value.into()
	}
}

/// Parse a single line, returning [`None`] for blank lines and `#` comments.
pub fn parse_line(line: &str) -> Option<Result<Entry, &str>> {
	let trimmed = line.trim();
	if trimmed.is_empty() || trimmed.starts_with('#') {
		return None
	}

	let Some((name, value)) = line.split_once('=') else {
		return Some(Err(trimmed))
	};
	Some(Ok(Entry {
		name: name.trim().into(),
		value: normalize_value(value),
	}))
}

/// Parse every assignment in `text`, in file order.
pub fn parse_str(text: &str) -> Result<Vec<Entry>, MalformedLine> {
	text.lines()
		.enumerate()
		.filter_map(move |(index, line)| parse_line(line).map(move |r| (index, r)))
		.map(move |(index, result)| result.map_err(move |text| MalformedLine {
			line: index + 1,
			text: text.into(),
		}))
		.collect()
}

/// Read and parse the file at `path`.
pub fn read(path: &Path) -> Result<Vec<Entry>, ParseError> {
	let text = read_to_string(path).map_err(move |error| ParseError::Read {
		error,
		path: path.into(),
	})?;
	parse_str(&text).map_err(move |error| ParseError::Malformed {
		error,
		path: path.into(),
	})
}
