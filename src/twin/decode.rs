use std::any::{TypeId, type_name};
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::twin::populate::{Sink, populate};
use crate::twin::{DecodeContext, DecodeError, DecodeOptions, MultipleErrors, Record, Result, Schema, SchemaCache, Source, TypeCache};

/// Reusable decoder holding an optional schema cache.
///
/// `Decoder` is `Send + Sync`; share one instance to reuse schemas across calls and threads.
#[derive(Clone, Default)]
pub struct Decoder {
	cache: Option<Arc<dyn SchemaCache>>,
}

impl Decoder {
	/// Decoder without a cache; schemas are rebuilt once per call.
	pub fn new() -> Self {
		Self::default()
	}

	/// Decoder with a fresh [`TypeCache`].
	pub fn cached() -> Self {
		Self::with_cache(Arc::new(TypeCache::new()))
	}

	/// Decoder backed by a caller-supplied cache.
	pub fn with_cache(cache: Arc<dyn SchemaCache>) -> Self {
		Self { cache: Some(cache) }
	}

	/// Configured schema cache, if any.
	pub fn cache(&self) -> Option<&Arc<dyn SchemaCache>> {
		self.cache.as_ref()
	}

	/// Schema of `R`, loaded from the cache or built and stored on a miss.
	pub fn schema<R: Record>(&self) -> Arc<Schema<R>> {
		let key = TypeId::of::<R>();
		if let Some(cache) = &self.cache {
			if let Some(schema) = cache.load(key).and_then(|entry| entry.downcast::<Schema<R>>().ok()) {
				trace!(record = type_name::<R>(), "schema cache hit");
				return schema;
			}
			trace!(record = type_name::<R>(), "schema cache miss");
		}

		let schema = Arc::new(R::schema());
		if let Some(cache) = &self.cache {
			cache.store(key, schema.clone());
		}
		schema
	}

	/// Decode `source` into `target` and return the dynamic map of every input key.
	///
	/// A `null` document leaves `target` untouched and returns an empty map.
	///
	/// # Errors
	///
	/// * [`DecodeError::Syntax`] and [`DecodeError::InvalidInput`] before any field is read.
	/// * [`DecodeError::Field`] on the first failure in [`crate::twin::Mode::FailOnFirstError`].
	/// * [`DecodeError::Multiple`], holding the map, when the tolerant modes recorded failures.
	pub fn decode<'a, S: Source<'a>, R: Record>(&self, source: S, target: &mut R, options: DecodeOptions) -> Result<Map<String, Value>> {
		let Some(object) = source.into_object()? else {
			debug!(record = type_name::<R>(), "null document");
			return Ok(Map::new());
		};

		let mut cx = DecodeContext::new(self, options);
		let schema = cx.schema::<R>();
		let mut map = Map::new();
		populate(&mut cx, &schema, &object, target, Sink::Document(&mut map), !options.skip_populate);
		let errors = cx.into_errors();

		debug!(
			record = type_name::<R>(),
			mode = %options.mode,
			keys = object.len(),
			errors = errors.len(),
			"decoded object"
		);

		if !options.mode.collects_errors() {
			return match errors.into_iter().next() {
				Some(first) => Err(DecodeError::Field(first)),
				None => Ok(map),
			};
		}
		if errors.is_empty() {
			Ok(map)
		} else {
			Err(DecodeError::Multiple(MultipleErrors::new(errors, map)))
		}
	}

	/// Decode raw JSON bytes.
	pub fn from_slice<R: Record>(&self, input: &[u8], target: &mut R, options: DecodeOptions) -> Result<Map<String, Value>> {
		self.decode(input, target, options)
	}

	/// Decode JSON text.
	pub fn from_str<R: Record>(&self, input: &str, target: &mut R, options: DecodeOptions) -> Result<Map<String, Value>> {
		self.decode(input, target, options)
	}

	/// Decode an already-parsed object, skipping tokenization.
	pub fn from_map<R: Record>(&self, data: &Map<String, Value>, target: &mut R, options: DecodeOptions) -> Result<Map<String, Value>> {
		self.decode(data, target, options)
	}

	/// Decode an already-parsed value tree; it must be an object or `null`.
	pub fn from_value<R: Record>(&self, data: &Value, target: &mut R, options: DecodeOptions) -> Result<Map<String, Value>> {
		self.decode(data, target, options)
	}
}

impl fmt::Debug for Decoder {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Decoder").field("cached", &self.cache.is_some()).finish()
	}
}

/// Decode any [`Source`] with a cache-less [`Decoder`].
pub fn decode<'a, S: Source<'a>, R: Record>(source: S, target: &mut R, options: DecodeOptions) -> Result<Map<String, Value>> {
	Decoder::new().decode(source, target, options)
}

/// Decode raw JSON bytes with a cache-less [`Decoder`].
pub fn from_slice<R: Record>(input: &[u8], target: &mut R, options: DecodeOptions) -> Result<Map<String, Value>> {
	Decoder::new().from_slice(input, target, options)
}

/// Decode JSON text with a cache-less [`Decoder`].
pub fn from_str<R: Record>(input: &str, target: &mut R, options: DecodeOptions) -> Result<Map<String, Value>> {
	Decoder::new().from_str(input, target, options)
}

/// Decode an already-parsed object with a cache-less [`Decoder`].
pub fn from_map<R: Record>(data: &Map<String, Value>, target: &mut R, options: DecodeOptions) -> Result<Map<String, Value>> {
	Decoder::new().from_map(data, target, options)
}

/// Decode an already-parsed value tree with a cache-less [`Decoder`].
pub fn from_value<R: Record>(data: &Value, target: &mut R, options: DecodeOptions) -> Result<Map<String, Value>> {
	Decoder::new().from_value(data, target, options)
}
