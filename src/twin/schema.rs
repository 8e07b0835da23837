use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::twin::{Coerce, Coerced, DecodeContext};

/// A fixed-schema struct that can be populated from a JSON object.
///
/// Implement through [`crate::record!`], or by hand with [`Schema::builder`]. Nested use as a
/// field type additionally needs a [`Coerce`] impl delegating to [`crate::twin::coerce_record`].
pub trait Record: Default + 'static {
	/// Describe the record's decodable fields.
	fn schema() -> Schema<Self>;
}

/// Immutable field table of one record type.
pub struct Schema<R> {
	fields: Vec<FieldSpec<R>>,
	index: HashMap<String, usize>,
}

/// One declared field of a [`Schema`].
pub struct FieldSpec<R> {
	name: String,
	position: usize,
	type_name: Cow<'static, str>,
	slot: Option<Box<dyn FieldSlot<R>>>,
}

/// Type-erased access to one field: coerce a value and store it.
trait FieldSlot<R>: Send + Sync {
	/// Returns the mirror value on success, `None` when the failure was recorded.
	fn decode(&self, cx: &mut DecodeContext<'_>, value: &Value, record: &mut R, write: bool) -> Option<Value>;
}

struct Accessor<R, F> {
	get_mut: fn(&mut R) -> &mut F,
}

impl<R, F: Coerce> FieldSlot<R> for Accessor<R, F> {
	fn decode(&self, cx: &mut DecodeContext<'_>, value: &Value, record: &mut R, write: bool) -> Option<Value> {
		match F::coerce(cx, value, false) {
			Coerced::Value(item, mirror) => {
				if write {
					*(self.get_mut)(record) = item;
				}
				Some(mirror)
			}
			Coerced::Null => {
				if write {
					*(self.get_mut)(record) = F::zero();
				}
				Some(Value::Null)
			}
			Coerced::Failed => None,
		}
	}
}

impl<R> Schema<R> {
	/// Start declaring a schema.
	pub fn builder() -> SchemaBuilder<R> {
		SchemaBuilder { fields: Vec::new() }
	}

	/// Declared fields in declaration order, ignored ones included.
	pub fn fields(&self) -> &[FieldSpec<R>] {
		&self.fields
	}

	/// Look up a decodable field by JSON name.
	pub fn field(&self, name: &str) -> Option<&FieldSpec<R>> {
		self.index.get(name).map(|position| &self.fields[*position])
	}

	/// Position of a decodable field by JSON name.
	pub fn position(&self, name: &str) -> Option<usize> {
		self.index.get(name).copied()
	}

	/// Mapping from JSON name to field position for every decodable field.
	pub fn positions(&self) -> &HashMap<String, usize> {
		&self.index
	}

	/// Number of decodable fields.
	pub fn len(&self) -> usize {
		self.index.len()
	}

	/// Whether the record has no decodable fields.
	pub fn is_empty(&self) -> bool {
		self.index.is_empty()
	}
}

impl<R> fmt::Debug for Schema<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Schema").field("fields", &self.fields).finish()
	}
}

impl<R> FieldSpec<R> {
	/// JSON name the field is matched by.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Declaration ordinal.
	pub fn position(&self) -> usize {
		self.position
	}

	/// Destination type name.
	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	/// Whether the field was declared as ignored and never matches input keys.
	pub fn is_ignored(&self) -> bool {
		self.slot.is_none()
	}

	/// Coerce `value` into this field, returning the mirror value on success.
	pub(crate) fn decode(&self, cx: &mut DecodeContext<'_>, value: &Value, record: &mut R, write: bool) -> Option<Value> {
		let slot = self.slot.as_ref()?;
		slot.decode(cx, value, record, write)
	}
}

impl<R> fmt::Debug for FieldSpec<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldSpec")
			.field("name", &self.name)
			.field("position", &self.position)
			.field("type_name", &self.type_name)
			.field("ignored", &self.is_ignored())
			.finish()
	}
}

/// Incremental [`Schema`] declaration.
pub struct SchemaBuilder<R> {
	fields: Vec<FieldSpec<R>>,
}

impl<R: 'static> SchemaBuilder<R> {
	/// Declare a decodable field matched by JSON `name`.
	pub fn field<F: Coerce + 'static>(mut self, name: impl Into<String>, get_mut: fn(&mut R) -> &mut F) -> Self {
		let position = self.fields.len();
		self.fields.push(FieldSpec {
			name: name.into(),
			position,
			type_name: F::type_name(),
			slot: Some(Box::new(Accessor { get_mut })),
		});
		self
	}

	/// Declare a field that keeps its position but never matches; its key stays unknown.
	pub fn ignore(mut self, name: impl Into<String>) -> Self {
		let position = self.fields.len();
		self.fields.push(FieldSpec {
			name: name.into(),
			position,
			type_name: Cow::Borrowed("ignored"),
			slot: None,
		});
		self
	}

	/// Finish the schema. When two fields share a JSON name the later one wins.
	pub fn build(self) -> Schema<R> {
		let mut index = HashMap::with_capacity(self.fields.len());
		for field in &self.fields {
			if field.is_ignored() {
				index.remove(&field.name);
			} else {
				index.insert(field.name.clone(), field.position);
			}
		}
		Schema { fields: self.fields, index }
	}
}

#[cfg(test)]
mod tests {
	use super::Schema;

	#[derive(Debug, Default)]
	struct Sample {
		foo: String,
		boo: Vec<i64>,
		secret: String,
	}

	impl crate::twin::Record for Sample {
		fn schema() -> Schema<Self> {
			Schema::builder()
				.field("foo", |record: &mut Self| &mut record.foo)
				.field("boo", |record: &mut Self| &mut record.boo)
				.ignore("secret")
				.build()
		}
	}

	#[test]
	fn positions_follow_declaration_order() {
		let schema = <Sample as crate::twin::Record>::schema();
		assert_eq!(schema.position("foo"), Some(0));
		assert_eq!(schema.position("boo"), Some(1));
		assert_eq!(schema.len(), 2);
		assert_eq!(schema.fields().len(), 3);
	}

	#[test]
	fn ignored_field_is_never_matched() {
		let schema = <Sample as crate::twin::Record>::schema();
		assert!(schema.field("secret").is_none());
		assert!(schema.fields()[2].is_ignored());
	}

	#[test]
	fn later_duplicate_name_wins() {
		let schema: Schema<Sample> = Schema::builder()
			.field("foo", |record: &mut Sample| &mut record.foo)
			.field("foo", |record: &mut Sample| &mut record.secret)
			.build();
		assert_eq!(schema.position("foo"), Some(1));
		assert_eq!(schema.field("foo").map(|field| field.type_name()), Some("String"));
	}

	#[test]
	fn empty_schema_is_valid() {
		let schema: Schema<Sample> = Schema::builder().build();
		assert!(schema.is_empty());
		assert!(schema.positions().is_empty());
	}
}
