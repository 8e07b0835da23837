use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::twin::error::value_kind;
use crate::twin::{DecodeError, Result};

/// Input that normalizes into a top-level JSON object.
///
/// Raw text is tokenized by `serde_json`; value trees are borrowed as-is. `Ok(None)` means the
/// document is `null`.
pub trait Source<'a> {
	/// Produce the top-level object, or `None` for a `null` document.
	fn into_object(self) -> Result<Option<Cow<'a, Map<String, Value>>>>;
}

fn owned_object<'a>(value: Value) -> Result<Option<Cow<'a, Map<String, Value>>>> {
	match value {
		Value::Null => Ok(None),
		Value::Object(map) => Ok(Some(Cow::Owned(map))),
		other => Err(DecodeError::InvalidInput { got: value_kind(&other) }),
	}
}

impl<'a> Source<'a> for &'a [u8] {
	fn into_object(self) -> Result<Option<Cow<'a, Map<String, Value>>>> {
		owned_object(serde_json::from_slice(self)?)
	}
}

impl<'a> Source<'a> for &'a Vec<u8> {
	fn into_object(self) -> Result<Option<Cow<'a, Map<String, Value>>>> {
		self.as_slice().into_object()
	}
}

impl<'a> Source<'a> for &'a str {
	fn into_object(self) -> Result<Option<Cow<'a, Map<String, Value>>>> {
		owned_object(serde_json::from_str(self)?)
	}
}

impl<'a> Source<'a> for &'a String {
	fn into_object(self) -> Result<Option<Cow<'a, Map<String, Value>>>> {
		self.as_str().into_object()
	}
}

impl<'a> Source<'a> for &'a Map<String, Value> {
	fn into_object(self) -> Result<Option<Cow<'a, Map<String, Value>>>> {
		Ok(Some(Cow::Borrowed(self)))
	}
}

impl<'a> Source<'a> for Option<&'a Map<String, Value>> {
	fn into_object(self) -> Result<Option<Cow<'a, Map<String, Value>>>> {
		Ok(self.map(Cow::Borrowed))
	}
}

impl<'a> Source<'a> for &'a Value {
	fn into_object(self) -> Result<Option<Cow<'a, Map<String, Value>>>> {
		match self {
			Value::Null => Ok(None),
			Value::Object(map) => Ok(Some(Cow::Borrowed(map))),
			other => Err(DecodeError::InvalidInput { got: value_kind(other) }),
		}
	}
}

impl<'a> Source<'a> for Value {
	fn into_object(self) -> Result<Option<Cow<'a, Map<String, Value>>>> {
		owned_object(self)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::Source;
	use crate::twin::DecodeError;

	#[test]
	fn null_document_has_no_object() {
		assert!(b"null".as_slice().into_object().expect("null parses").is_none());
		assert!((&json!(null)).into_object().expect("null tree").is_none());
	}

	#[test]
	fn scalar_document_is_invalid_input() {
		let err = "12".into_object().expect_err("scalar is rejected");
		assert!(matches!(err, DecodeError::InvalidInput { got: "number" }));

		let err = (&json!([{"a": 1}])).into_object().expect_err("array is rejected");
		assert!(matches!(err, DecodeError::InvalidInput { got: "array" }));
	}

	#[test]
	fn malformed_bytes_are_syntax_errors() {
		let err = b"{\"a\":".as_slice().into_object().expect_err("truncated input fails");
		assert!(matches!(err, DecodeError::Syntax(_)));
	}

	#[test]
	fn text_and_tree_agree() {
		let tree = json!({"a": [1, 2], "b": {"c": null}});
		let text = tree.to_string();
		let parsed = text.as_str().into_object().expect("text parses").expect("object");
		let borrowed = (&tree).into_object().expect("tree borrows").expect("object");
		assert_eq!(parsed, borrowed);
	}
}
