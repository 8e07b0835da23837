mod cache;
mod coerce;
mod context;
mod decode;
mod error;
mod macros;
mod options;
mod path;
mod populate;
mod schema;
mod source;

/// Schema cache trait and the default thread-safe store.
pub use cache::{CachedSchema, SchemaCache, TypeCache};
/// Type-directed coercion trait, outcome, and capability hooks.
pub use coerce::{Coerce, Coerced, DecodeValue, MapKey, coerce_custom, coerce_record};
/// Per-call decoding state shared with `Coerce` implementations.
pub use context::DecodeContext;
/// Reusable decoder and free-function entry points.
pub use decode::{Decoder, decode, from_map, from_slice, from_str, from_value};
/// Error and result aliases.
pub use error::{BoxError, DecodeError, FieldError, MultipleErrors, Result};
/// Error handling modes and per-call options.
pub use options::{DecodeOptions, Mode, UnknownMode};
/// Key breadcrumbs identifying where a field error occurred.
pub use path::{FieldPath, InvalidFieldPath};
/// Record schema declaration types.
pub use schema::{FieldSpec, Record, Schema, SchemaBuilder};
/// Input normalization into a generic value tree.
pub use source::Source;
/// Generic JSON value tree used for input and the dynamic map.
pub use serde_json::{Map, Value};
