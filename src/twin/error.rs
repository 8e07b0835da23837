use std::borrow::Cow;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::twin::FieldPath;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Boxed error raised by custom decode hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by the decode entry points.
#[derive(Debug, Error)]
pub enum DecodeError {
	/// Raw input could not be tokenized as JSON.
	#[error("invalid input: {0}")]
	Syntax(#[from] serde_json::Error),
	/// Top-level input is neither an object nor `null`.
	#[error("invalid input: expected a JSON object, got {got}")]
	InvalidInput {
		/// Kind of the top-level value.
		got: &'static str,
	},
	/// First field failure in fail-on-first-error mode.
	#[error(transparent)]
	Field(#[from] FieldError),
	/// Every field failure collected by the tolerant modes, with the partial map.
	#[error(transparent)]
	Multiple(#[from] MultipleErrors),
}

impl DecodeError {
	/// Field failures carried by this error, in the order they were recorded.
	pub fn field_errors(&self) -> &[FieldError] {
		match self {
			Self::Field(err) => std::slice::from_ref(err),
			Self::Multiple(errs) => errs.errors(),
			Self::Syntax(_) | Self::InvalidInput { .. } => &[],
		}
	}

	/// Dynamic map produced before the error was raised, when the mode keeps one.
	pub fn partial_map(&self) -> Option<&Map<String, Value>> {
		match self {
			Self::Multiple(errs) => Some(errs.map()),
			_ => None,
		}
	}
}

/// One field that could not be coerced onto its declared type.
#[derive(Debug, Error)]
pub enum FieldError {
	/// A present value has the wrong shape for the destination.
	#[error("{path}: unexpected type: expected {expected}, got {got}")]
	UnexpectedType {
		/// Keys from the document root to the failing value.
		path: FieldPath,
		/// Destination type name.
		expected: Cow<'static, str>,
		/// Kind of the input value.
		got: &'static str,
	},
	/// The destination type cannot be decoded at all.
	#[error("{path}: unsupported type {type_name}")]
	UnsupportedType {
		/// Keys from the document root to the failing value.
		path: FieldPath,
		/// Destination type name.
		type_name: Cow<'static, str>,
	},
	/// A custom decode hook rejected the value; displayed verbatim.
	#[error("{source}")]
	Custom {
		/// Keys from the document root to the failing value.
		path: FieldPath,
		/// Error returned by the hook.
		#[source]
		source: BoxError,
	},
}

impl FieldError {
	/// Keys from the document root to the failing value.
	pub fn path(&self) -> &FieldPath {
		match self {
			Self::UnexpectedType { path, .. } | Self::UnsupportedType { path, .. } | Self::Custom { path, .. } => path,
		}
	}
}

/// Aggregate of field failures returned by the tolerant modes.
///
/// Owns the dynamic map built alongside the errors so the caller keeps a usable result.
#[derive(Debug, Error)]
#[error("{} field error(s): {}", .errors.len(), join_errors(.errors))]
pub struct MultipleErrors {
	errors: Vec<FieldError>,
	map: Map<String, Value>,
}

impl MultipleErrors {
	pub(crate) fn new(errors: Vec<FieldError>, map: Map<String, Value>) -> Self {
		Self { errors, map }
	}

	/// Recorded failures, in traversal order.
	pub fn errors(&self) -> &[FieldError] {
		&self.errors
	}

	/// Number of recorded failures.
	pub fn len(&self) -> usize {
		self.errors.len()
	}

	/// Whether no failure was recorded.
	pub fn is_empty(&self) -> bool {
		self.errors.is_empty()
	}

	/// Dynamic map decoded alongside the failures.
	pub fn map(&self) -> &Map<String, Value> {
		&self.map
	}

	/// Split into the failures and the dynamic map.
	pub fn into_parts(self) -> (Vec<FieldError>, Map<String, Value>) {
		(self.errors, self.map)
	}
}

fn join_errors(errors: &[FieldError]) -> String {
	errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Short kind name of a generic value for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
		Value::Object(_) => "object",
	}
}
