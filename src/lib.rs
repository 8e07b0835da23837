//! Decode a JSON object into a typed record and a dynamic map that keeps every input field.

/// Schemas, coercion, population, error policy, and decode entry points.
pub mod twin;
