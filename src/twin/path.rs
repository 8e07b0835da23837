use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Ordered key names from the document root to one decoded value.
///
/// Object fields and map entries contribute their key; sequence elements do not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
	keys: Vec<String>,
}

impl FieldPath {
	/// Empty path naming the document root.
	pub fn root() -> Self {
		Self::default()
	}

	/// Key names in root-to-leaf order.
	pub fn keys(&self) -> &[String] {
		&self.keys
	}

	/// Number of keys.
	pub fn len(&self) -> usize {
		self.keys.len()
	}

	/// Whether this is the root path.
	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}

	pub(crate) fn push(&mut self, key: &str) {
		self.keys.push(key.to_owned());
	}

	pub(crate) fn pop(&mut self) {
		self.keys.pop();
	}
}

impl fmt::Display for FieldPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.keys.is_empty() {
			return f.write_str("(root)");
		}
		f.write_str(&self.keys.join("."))
	}
}

impl<S: Into<String>> FromIterator<S> for FieldPath {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self {
			keys: iter.into_iter().map(Into::into).collect(),
		}
	}
}

/// Dotted path text could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid field path: {path}")]
pub struct InvalidFieldPath {
	/// Original path text.
	pub path: String,
}

impl FromStr for FieldPath {
	type Err = InvalidFieldPath;

	/// Parse dotted key syntax (`parent.child`). Keys may not be empty.
	fn from_str(input: &str) -> Result<Self, Self::Err> {
		if input.is_empty() {
			return Err(InvalidFieldPath { path: input.to_owned() });
		}

		let mut keys = Vec::new();
		for key in input.split('.') {
			if key.is_empty() {
				return Err(InvalidFieldPath { path: input.to_owned() });
			}
			keys.push(key.to_owned());
		}

		Ok(Self { keys })
	}
}
