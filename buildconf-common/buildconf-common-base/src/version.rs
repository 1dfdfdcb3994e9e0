//! Items for comparing dotted version strings, such as the ones reported by `gcc -dumpfullversion`.

use core::{
	cmp::Ordering,
	str::Split,
};

/// Comparison adapter for a single part of a version.
///
/// Parts are compared by length first, so that `10` sorts after `9` without parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Part<'a>(pub &'a str);

impl Part<'_> {
	/// Part that stands in for parts missing from the shorter of two versions.
	pub const ZERO: Self = Part("0");
}

impl Ord for Part<'_> {
	fn cmp(&self, other: &Self) -> Ordering {
		let a = self.0.trim_start_matches('0');
		let b = other.0.trim_start_matches('0');
		match a.len().cmp(&b.len()) {
			Ordering::Equal => a.cmp(b),
			ord => ord,
		}
	}
}

impl PartialOrd for Part<'_> {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

/// Iterator over the [`Part`]s of a version string.
#[derive(Debug, Clone)]
#[repr(transparent)]
pub struct Parts<'a>(pub Split<'a, char>);

impl<'a> Parts<'a> {
	#[inline]
	pub fn new(version: &'a str) -> Self {
		Self(version.trim().split('.'))
	}
}

impl<'a> Iterator for Parts<'a> {
	type Item = Part<'a>;
	#[inline]
	fn next(&mut self) -> Option<Self::Item> {
		self.0.next().map(Part)
	}
}

/// Compare two versions part by part, treating missing parts as `0` (so `5.4` equals `5.4.0`).
pub fn version_ord(a: &str, b: &str) -> Ordering {
	let mut a = Parts::new(a);
	let mut b = Parts::new(b);
	loop {
		match (a.next(), b.next()) {
			(None, None) => break Ordering::Equal,
			(a, b) => {
				let ord = a.unwrap_or(Part::ZERO).cmp(&b.unwrap_or(Part::ZERO));
				if ord.is_ne() {
					break ord
				}
			}
		}
	}
}

/// Return `true` if `version` sorts before `minimum`.
#[inline]
pub fn is_older_than(version: &str, minimum: &str) -> bool {
	version_ord(version, minimum).is_lt()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn numeric_parts() {
		assert_eq!(version_ord("4.8.5", "5.4"), Ordering::Less);
		assert_eq!(version_ord("10.2.1", "9.4"), Ordering::Greater);
		assert_eq!(version_ord("5.4", "5.4.0"), Ordering::Equal);
		assert_eq!(version_ord("5.04", "5.4"), Ordering::Equal);
		assert_eq!(version_ord("5.3.1", "5.4"), Ordering::Less);
		assert_eq!(version_ord("5\n", "5.0.0"), Ordering::Equal);
	}

	#[test]
	fn older_than() {
		assert!(is_older_than("4.9", "5.4"));
		assert!(!is_older_than("5.5", "5.4"));
	}
}
