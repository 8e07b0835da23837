use std::any::TypeId;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::twin::error::value_kind;
use crate::twin::{BoxError, CachedSchema, Coerce, DecodeOptions, Decoder, FieldError, FieldPath, Mode, Record, Schema};

/// Mutable state of one decode call: current path, recorded failures, and the active mode.
///
/// A [`Coerce`] implementation that returns [`crate::twin::Coerced::Failed`] must first record
/// the failure through one of the `*_type`/`custom_error` methods.
pub struct DecodeContext<'a> {
	decoder: &'a Decoder,
	options: DecodeOptions,
	path: FieldPath,
	errors: Vec<FieldError>,
	aborted: bool,
	schemas: HashMap<TypeId, CachedSchema>,
}

impl<'a> DecodeContext<'a> {
	pub(crate) fn new(decoder: &'a Decoder, options: DecodeOptions) -> Self {
		Self {
			decoder,
			options,
			path: FieldPath::root(),
			errors: Vec::new(),
			aborted: false,
			schemas: HashMap::new(),
		}
	}

	/// Options of the running call.
	pub fn options(&self) -> &DecodeOptions {
		&self.options
	}

	/// Active failure handling policy.
	pub fn mode(&self) -> Mode {
		self.options.mode
	}

	/// Keys from the document root to the value being coerced.
	pub fn path(&self) -> &FieldPath {
		&self.path
	}

	/// Whether a failure ended the call in fail-on-first-error mode.
	pub fn is_aborted(&self) -> bool {
		self.aborted
	}

	/// Run `f` with `key` appended to the current path.
	pub fn nested<T>(&mut self, key: &str, f: impl FnOnce(&mut Self) -> T) -> T {
		self.path.push(key);
		let out = f(self);
		self.path.pop();
		out
	}

	/// Schema of `R`, built at most once per call and shared through the decoder cache.
	pub fn schema<R: Record>(&mut self) -> Arc<Schema<R>> {
		let key = TypeId::of::<R>();
		if let Some(schema) = self.schemas.get(&key).and_then(|entry| entry.clone().downcast::<Schema<R>>().ok()) {
			return schema;
		}
		let schema = self.decoder.schema::<R>();
		self.schemas.insert(key, schema.clone());
		schema
	}

	/// Record that `value` does not have the shape `T` expects.
	pub fn unexpected_type<T: Coerce>(&mut self, value: &Value) {
		self.mismatch(T::type_name(), value_kind(value));
	}

	/// Record a shape mismatch with explicit names.
	pub fn mismatch(&mut self, expected: Cow<'static, str>, got: &'static str) {
		let path = self.path.clone();
		self.record(FieldError::UnexpectedType { path, expected, got });
	}

	/// Record that `T` cannot be decoded at all.
	pub fn unsupported_type<T: Coerce>(&mut self) {
		let path = self.path.clone();
		self.record(FieldError::UnsupportedType {
			path,
			type_name: T::type_name(),
		});
	}

	/// Record an error raised by a custom decode hook.
	pub fn custom_error(&mut self, source: BoxError) {
		let path = self.path.clone();
		self.record(FieldError::Custom { path, source });
	}

	/// Whether a failed container should hand its raw input back to the enclosing field.
	pub(crate) fn fails_over(&self) -> bool {
		self.options.mode == Mode::FailOverToOriginalValue
	}

	pub(crate) fn into_errors(self) -> Vec<FieldError> {
		self.errors
	}

	fn record(&mut self, err: FieldError) {
		if self.aborted {
			return;
		}
		debug!(path = %err.path(), mode = %self.options.mode, error = %err, "field coercion failed");
		if self.options.mode == Mode::FailOnFirstError {
			self.aborted = true;
		}
		self.errors.push(err);
	}
}
