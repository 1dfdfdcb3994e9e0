//! Registry of build options.

use rustc_hash::FxHashMap;

use crate::{
	platform::Platform,
	DEFAULT_BRANDING,
};

/// Mapping of option names to their values.
///
/// List-valued options (such as `platform` or `config`) hold whitespace-separated tokens, and are queried with
/// [`check_option`](Self::check_option).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options(FxHashMap<String, String>);

impl Options {
	#[inline]
	pub fn new() -> Self {
		Self::default()
	}

	/// Return the value of `name`, or an empty string if it isn't set.
	#[inline]
	pub fn option(&self, name: &str) -> &str {
		self.get(name).unwrap_or_default()
	}

	#[inline]
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	#[inline]
	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	/// Return an iterator over the whitespace-separated tokens of `name`.
	pub fn tokens<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a str> + 'a {
		self.option(name).split_whitespace()
	}

	/// Return `true` if `value` is one of the tokens of `name`.
	pub fn check_option(&self, name: &str, value: &str) -> bool {
		self.tokens(name).any(move |t| t == value)
	}

	/// Append `value` as a new token of `name`, or set `name` to `value` if it isn't set.
	pub fn extend_option(&mut self, name: &str, value: &str) {
		match self.0.get_mut(name) {
			Some(existing) => {
				existing.push(' ');
				existing.push_str(value);
			}
			None => {
				self.0.insert(name.into(), value.into());
			}
		}
	}

	/// Insert `value` as the first token of `name`.
	pub fn prepend_option(&mut self, name: &str, value: &str) {
		match self.0.get_mut(name) {
			Some(existing) => {
				existing.insert(0, ' ');
				existing.insert_str(0, value);
			}
			None => {
				self.0.insert(name.into(), value.into());
			}
		}
	}

	#[inline]
	pub fn set_option(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.0.insert(name.into(), value.into());
	}

	/// Return the concrete platforms requested by `platform`, in order and without duplicates.
	///
	/// Symbolic tokens such as `all` or `native` are skipped.
	pub fn platforms(&self) -> Vec<Platform> {
		let mut platforms = Vec::new();
		for platform in self.tokens("platform").filter_map(Platform::parse) {
			if !platforms.contains(&platform) {
				platforms.push(platform);
			}
		}
		platforms
	}

	/// Return `true` if any mobile target is requested.
	pub fn is_mobile_platform(&self) -> bool {
		self.tokens("platform").any(move |t| t == "ios" || t.starts_with("android"))
	}

	/// Return the configured branding name, or [`DEFAULT_BRANDING`].
	pub fn branding(&self) -> &str {
		match self.option("branding-name") {
			"" => DEFAULT_BRANDING,
			name => name,
		}
	}

	/// Return all options sorted by name.
	pub fn sorted(&self) -> Vec<(&str, &str)> {
		let mut entries: Vec<_> = self.iter().collect();
		entries.sort_unstable();
		entries
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(move |(k, v)| (k.as_str(), v.as_str()))
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

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Options {
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self(iter.into_iter().map(move |(k, v)| (k.into(), v.into())).collect())
	}
}
