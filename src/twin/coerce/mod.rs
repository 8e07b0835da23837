use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::Hash;
use std::marker::PhantomData;

use serde_json::{Map, Value};

use crate::twin::populate::{Sink, populate};
use crate::twin::{BoxError, DecodeContext, Record};

mod number;

/// Outcome of coercing one generic value onto one target type.
#[derive(Debug, Clone, PartialEq)]
pub enum Coerced<T> {
	/// Converted value and its mirror for the dynamic map.
	Value(T, Value),
	/// Absent result; the destination takes [`Coerce::zero`] and the mirror is `null`.
	Null,
	/// Conversion failed and the failure was recorded on the context.
	Failed,
}

impl<T> Coerced<T> {
	/// Transform the converted value, keeping its mirror.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Coerced<U> {
		match self {
			Self::Value(item, mirror) => Coerced::Value(f(item), mirror),
			Self::Null => Coerced::Null,
			Self::Failed => Coerced::Failed,
		}
	}

	/// Whether the conversion failed.
	pub fn is_failed(&self) -> bool {
		matches!(self, Self::Failed)
	}
}

/// Type-directed conversion of a generic JSON value.
///
/// `optional` is set when the destination is wrapped in `Option`: primitives then report
/// `null` input as [`Coerced::Null`] instead of their zero value.
///
/// The default `coerce` rejects every input as an unsupported type.
pub trait Coerce: Sized {
	/// Name used in error messages.
	fn type_name() -> Cow<'static, str>;

	/// Value the destination takes when coercion yields `null`.
	fn zero() -> Self;

	/// Mirror of [`Coerce::zero`] for positions the input never held.
	fn zero_mirror() -> Value {
		Value::Null
	}

	/// Convert `value`, recording any failure on `cx`.
	fn coerce(cx: &mut DecodeContext<'_>, value: &Value, optional: bool) -> Coerced<Self> {
		let _ = (value, optional);
		cx.unsupported_type::<Self>();
		Coerced::Failed
	}
}

/// Opt-in hook for types that decode themselves from one generic value.
///
/// Wire it into coercion with [`crate::custom_coerce!`]. The hook also receives `null`.
pub trait DecodeValue: Sized + Default {
	/// Build `Self` from `value`; an error is surfaced verbatim.
	fn decode_value(value: &Value) -> Result<Self, BoxError>;
}

/// Delegate coercion to a [`DecodeValue`] hook. The raw input is used as the mirror.
pub fn coerce_custom<T: DecodeValue>(cx: &mut DecodeContext<'_>, value: &Value) -> Coerced<T> {
	match T::decode_value(value) {
		Ok(item) => Coerced::Value(item, value.clone()),
		Err(err) => {
			cx.custom_error(err);
			Coerced::Failed
		}
	}
}

/// Coerce an object into a fresh nested record.
///
/// The mirror holds only the record's successfully coerced known fields.
pub fn coerce_record<R: Record + Coerce>(cx: &mut DecodeContext<'_>, value: &Value) -> Coerced<R> {
	let object = match value {
		Value::Null => return Coerced::Null,
		Value::Object(object) => object,
		other => {
			cx.unexpected_type::<R>(other);
			return Coerced::Failed;
		}
	};

	let schema = cx.schema::<R>();
	let mut record = R::default();
	let mut mirror = Map::new();
	if populate(cx, &schema, object, &mut record, Sink::Nested(&mut mirror), true) {
		Coerced::Value(record, Value::Object(mirror))
	} else {
		Coerced::Failed
	}
}

/// Outcome of a container whose element failed: fail over to the raw input, or resolve to `null`.
fn abandon<T>(cx: &DecodeContext<'_>) -> Coerced<T> {
	if cx.fails_over() { Coerced::Failed } else { Coerced::Null }
}

impl Coerce for bool {
	fn type_name() -> Cow<'static, str> {
		Cow::Borrowed("bool")
	}

	fn zero() -> Self {
		false
	}

	fn zero_mirror() -> Value {
		Value::Bool(false)
	}

	fn coerce(cx: &mut DecodeContext<'_>, value: &Value, optional: bool) -> Coerced<Self> {
		match value {
			Value::Null if optional => Coerced::Null,
			Value::Null => Coerced::Value(false, Self::zero_mirror()),
			Value::Bool(item) => Coerced::Value(*item, Value::Bool(*item)),
			other => {
				cx.unexpected_type::<Self>(other);
				Coerced::Failed
			}
		}
	}
}

macro_rules! coerce_int {
	($($ty:ty),* $(,)?) => {
		$(
			impl Coerce for $ty {
				fn type_name() -> Cow<'static, str> {
					Cow::Borrowed(stringify!($ty))
				}

				fn zero() -> Self {
					0
				}

				fn zero_mirror() -> Value {
					number::int_mirror(0)
				}

				fn coerce(cx: &mut DecodeContext<'_>, value: &Value, optional: bool) -> Coerced<Self> {
					match value {
						Value::Null if optional => Coerced::Null,
						Value::Null => Coerced::Value(0, Self::zero_mirror()),
						Value::Number(item) => match number::to_int::<$ty>(item) {
							Some(converted) => Coerced::Value(converted, number::int_mirror(converted as i128)),
							None => {
								cx.unexpected_type::<Self>(value);
								Coerced::Failed
							}
						},
						other => {
							cx.unexpected_type::<Self>(other);
							Coerced::Failed
						}
					}
				}
			}
		)*
	};
}

coerce_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl Coerce for u128 {
	fn type_name() -> Cow<'static, str> {
		Cow::Borrowed("u128")
	}

	fn zero() -> Self {
		0
	}

	fn zero_mirror() -> Value {
		number::int_mirror(0)
	}

	fn coerce(cx: &mut DecodeContext<'_>, value: &Value, optional: bool) -> Coerced<Self> {
		match value {
			Value::Null if optional => Coerced::Null,
			Value::Null => Coerced::Value(0, Self::zero_mirror()),
			Value::Number(item) => match number::to_int::<u128>(item) {
				// to_int goes through i128, so the value always fits back
				Some(converted) => Coerced::Value(converted, number::int_mirror(converted as i128)),
				None => {
					cx.unexpected_type::<Self>(value);
					Coerced::Failed
				}
			},
			other => {
				cx.unexpected_type::<Self>(other);
				Coerced::Failed
			}
		}
	}
}

impl Coerce for f64 {
	fn type_name() -> Cow<'static, str> {
		Cow::Borrowed("f64")
	}

	fn zero() -> Self {
		0.0
	}

	fn zero_mirror() -> Value {
		number::float_mirror(0.0)
	}

	fn coerce(cx: &mut DecodeContext<'_>, value: &Value, optional: bool) -> Coerced<Self> {
		match value {
			Value::Null if optional => Coerced::Null,
			Value::Null => Coerced::Value(0.0, Self::zero_mirror()),
			Value::Number(item) => match number::to_f64(item) {
				Some(converted) => Coerced::Value(converted, Value::Number(item.clone())),
				None => {
					cx.unexpected_type::<Self>(value);
					Coerced::Failed
				}
			},
			other => {
				cx.unexpected_type::<Self>(other);
				Coerced::Failed
			}
		}
	}
}

impl Coerce for f32 {
	fn type_name() -> Cow<'static, str> {
		Cow::Borrowed("f32")
	}

	fn zero() -> Self {
		0.0
	}

	fn zero_mirror() -> Value {
		number::float_mirror(0.0)
	}

	fn coerce(cx: &mut DecodeContext<'_>, value: &Value, optional: bool) -> Coerced<Self> {
		match value {
			Value::Null if optional => Coerced::Null,
			Value::Null => Coerced::Value(0.0, Self::zero_mirror()),
			Value::Number(item) => match number::to_f32(item) {
				Some(converted) => Coerced::Value(converted, number::float_mirror(f64::from(converted))),
				None => {
					cx.unexpected_type::<Self>(value);
					Coerced::Failed
				}
			},
			other => {
				cx.unexpected_type::<Self>(other);
				Coerced::Failed
			}
		}
	}
}

impl Coerce for String {
	fn type_name() -> Cow<'static, str> {
		Cow::Borrowed("String")
	}

	fn zero() -> Self {
		String::new()
	}

	fn zero_mirror() -> Value {
		Value::String(String::new())
	}

	fn coerce(cx: &mut DecodeContext<'_>, value: &Value, optional: bool) -> Coerced<Self> {
		match value {
			Value::Null if optional => Coerced::Null,
			Value::Null => Coerced::Value(String::new(), Self::zero_mirror()),
			Value::String(item) => Coerced::Value(item.clone(), value.clone()),
			other => {
				cx.unexpected_type::<Self>(other);
				Coerced::Failed
			}
		}
	}
}

impl Coerce for char {
	fn type_name() -> Cow<'static, str> {
		Cow::Borrowed("char")
	}

	fn zero() -> Self {
		'\0'
	}

	fn zero_mirror() -> Value {
		Value::String('\0'.to_string())
	}

	fn coerce(cx: &mut DecodeContext<'_>, value: &Value, optional: bool) -> Coerced<Self> {
		match value {
			Value::Null if optional => Coerced::Null,
			Value::Null => Coerced::Value('\0', Self::zero_mirror()),
			Value::String(item) => {
				let mut chars = item.chars();
				match (chars.next(), chars.next()) {
					(Some(single), None) => Coerced::Value(single, value.clone()),
					_ => {
						cx.unexpected_type::<Self>(value);
						Coerced::Failed
					}
				}
			}
			other => {
				cx.unexpected_type::<Self>(other);
				Coerced::Failed
			}
		}
	}
}

/// Dynamic destination: any value is kept verbatim, `null` included.
impl Coerce for Value {
	fn type_name() -> Cow<'static, str> {
		Cow::Borrowed("Value")
	}

	fn zero() -> Self {
		Value::Null
	}

	fn coerce(_cx: &mut DecodeContext<'_>, value: &Value, _optional: bool) -> Coerced<Self> {
		Coerced::Value(value.clone(), value.clone())
	}
}

/// Coerce every element, or `None` after the first failure.
fn coerce_items<T: Coerce>(cx: &mut DecodeContext<'_>, items: &[Value]) -> Option<(Vec<T>, Vec<Value>)> {
	let mut out = Vec::with_capacity(items.len());
	let mut mirror = Vec::with_capacity(items.len());
	for item in items {
		match T::coerce(cx, item, false) {
			Coerced::Value(converted, item_mirror) => {
				out.push(converted);
				mirror.push(item_mirror);
			}
			Coerced::Null => {
				out.push(T::zero());
				mirror.push(Value::Null);
			}
			Coerced::Failed => return None,
		}
	}
	Some((out, mirror))
}

impl<T: Coerce> Coerce for Vec<T> {
	fn type_name() -> Cow<'static, str> {
		Cow::Owned(format!("Vec<{}>", T::type_name()))
	}

	fn zero() -> Self {
		Vec::new()
	}

	fn coerce(cx: &mut DecodeContext<'_>, value: &Value, _optional: bool) -> Coerced<Self> {
		let items = match value {
			Value::Null => return Coerced::Null,
			Value::Array(items) => items,
			other => {
				cx.unexpected_type::<Self>(other);
				return Coerced::Failed;
			}
		};
		match coerce_items::<T>(cx, items) {
			Some((out, mirror)) => Coerced::Value(out, Value::Array(mirror)),
			None => abandon(cx),
		}
	}
}

impl<T: Coerce> Coerce for VecDeque<T> {
	fn type_name() -> Cow<'static, str> {
		Cow::Owned(format!("VecDeque<{}>", T::type_name()))
	}

	fn zero() -> Self {
		VecDeque::new()
	}

	fn coerce(cx: &mut DecodeContext<'_>, value: &Value, _optional: bool) -> Coerced<Self> {
		let items = match value {
			Value::Null => return Coerced::Null,
			Value::Array(items) => items,
			other => {
				cx.unexpected_type::<Self>(other);
				return Coerced::Failed;
			}
		};
		match coerce_items::<T>(cx, items) {
			Some((out, mirror)) => Coerced::Value(VecDeque::from(out), Value::Array(mirror)),
			None => abandon(cx),
		}
	}
}

/// Fixed-length sequence. Extra input elements are ignored, missing ones take zero values,
/// and `null` materializes a fully zero-valued array unless the destination is optional.
/// Positions absent from the input are never coerced.
impl<T: Coerce, const N: usize> Coerce for [T; N] {
	fn type_name() -> Cow<'static, str> {
		Cow::Owned(format!("[{}; {N}]", T::type_name()))
	}

	fn zero() -> Self {
		std::array::from_fn(|_| T::zero())
	}

	fn zero_mirror() -> Value {
		Value::Array((0..N).map(|_| T::zero_mirror()).collect())
	}

	fn coerce(cx: &mut DecodeContext<'_>, value: &Value, optional: bool) -> Coerced<Self> {
		let items = match value {
			Value::Null if optional => return Coerced::Null,
			Value::Null => return Coerced::Value(Self::zero(), Self::zero_mirror()),
			Value::Array(items) => &items[..items.len().min(N)],
			other => {
				cx.unexpected_type::<Self>(other);
				return Coerced::Failed;
			}
		};

		let Some((out, mut mirror)) = coerce_items::<T>(cx, items) else {
			if cx.fails_over() {
				return Coerced::Failed;
			}
			return Coerced::Value(Self::zero(), Self::zero_mirror());
		};
		mirror.resize_with(N, T::zero_mirror);

		let mut converted = out.into_iter();
		let array = std::array::from_fn(|_| converted.next().unwrap_or_else(T::zero));
		Coerced::Value(array, Value::Array(mirror))
	}
}

/// Key types of string-keyed maps, parsed from the JSON object key.
pub trait MapKey: Sized {
	/// Name used in error messages.
	fn type_name() -> Cow<'static, str>;

	/// Parse a key, or `None` when it does not fit the type.
	fn from_key(key: &str) -> Option<Self>;
}

impl MapKey for String {
	fn type_name() -> Cow<'static, str> {
		Cow::Borrowed("String")
	}

	fn from_key(key: &str) -> Option<Self> {
		Some(key.to_owned())
	}
}

macro_rules! parsed_key {
	($($ty:ty),* $(,)?) => {
		$(
			impl MapKey for $ty {
				fn type_name() -> Cow<'static, str> {
					Cow::Borrowed(stringify!($ty))
				}

				fn from_key(key: &str) -> Option<Self> {
					key.parse().ok()
				}
			}
		)*
	};
}

parsed_key!(bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Coerce every entry, or `None` after the first failed key or value.
fn coerce_entries<K: MapKey, V: Coerce>(cx: &mut DecodeContext<'_>, object: &Map<String, Value>) -> Option<(Vec<(K, V)>, Map<String, Value>)> {
	let mut out = Vec::with_capacity(object.len());
	let mut mirror = Map::new();
	for (key, item) in object {
		let (converted_key, converted, item_mirror) = cx.nested(key, |cx| {
			let Some(converted_key) = K::from_key(key) else {
				cx.mismatch(K::type_name(), "string");
				return None;
			};
			match V::coerce(cx, item, false) {
				Coerced::Value(converted, item_mirror) => Some((converted_key, converted, item_mirror)),
				Coerced::Null => Some((converted_key, V::zero(), Value::Null)),
				Coerced::Failed => None,
			}
		})?;
		out.push((converted_key, converted));
		mirror.insert(key.clone(), item_mirror);
	}
	Some((out, mirror))
}

impl<K: MapKey + Eq + Hash, V: Coerce> Coerce for HashMap<K, V> {
	fn type_name() -> Cow<'static, str> {
		Cow::Owned(format!("HashMap<{}, {}>", K::type_name(), V::type_name()))
	}

	fn zero() -> Self {
		HashMap::new()
	}

	fn coerce(cx: &mut DecodeContext<'_>, value: &Value, _optional: bool) -> Coerced<Self> {
		let object = match value {
			Value::Null => return Coerced::Null,
			Value::Object(object) => object,
			other => {
				cx.unexpected_type::<Self>(other);
				return Coerced::Failed;
			}
		};
		match coerce_entries::<K, V>(cx, object) {
			Some((entries, mirror)) => Coerced::Value(entries.into_iter().collect(), Value::Object(mirror)),
			None => abandon(cx),
		}
	}
}

impl<K: MapKey + Ord, V: Coerce> Coerce for BTreeMap<K, V> {
	fn type_name() -> Cow<'static, str> {
		Cow::Owned(format!("BTreeMap<{}, {}>", K::type_name(), V::type_name()))
	}

	fn zero() -> Self {
		BTreeMap::new()
	}

	fn coerce(cx: &mut DecodeContext<'_>, value: &Value, _optional: bool) -> Coerced<Self> {
		let object = match value {
			Value::Null => return Coerced::Null,
			Value::Object(object) => object,
			other => {
				cx.unexpected_type::<Self>(other);
				return Coerced::Failed;
			}
		};
		match coerce_entries::<K, V>(cx, object) {
			Some((entries, mirror)) => Coerced::Value(entries.into_iter().collect(), Value::Object(mirror)),
			None => abandon(cx),
		}
	}
}

/// Nullable destination: an absent inner result becomes `None`, never `Some` of a zero value.
impl<T: Coerce> Coerce for Option<T> {
	fn type_name() -> Cow<'static, str> {
		Cow::Owned(format!("Option<{}>", T::type_name()))
	}

	fn zero() -> Self {
		None
	}

	fn coerce(cx: &mut DecodeContext<'_>, value: &Value, _optional: bool) -> Coerced<Self> {
		match T::coerce(cx, value, true) {
			Coerced::Value(item, mirror) => Coerced::Value(Some(item), mirror),
			Coerced::Null => Coerced::Value(None, Value::Null),
			Coerced::Failed => Coerced::Failed,
		}
	}
}

impl<T: Coerce> Coerce for Box<T> {
	fn type_name() -> Cow<'static, str> {
		T::type_name()
	}

	fn zero() -> Self {
		Box::new(T::zero())
	}

	fn zero_mirror() -> Value {
		T::zero_mirror()
	}

	fn coerce(cx: &mut DecodeContext<'_>, value: &Value, optional: bool) -> Coerced<Self> {
		T::coerce(cx, value, optional).map(Box::new)
	}
}

impl Coerce for () {
	fn type_name() -> Cow<'static, str> {
		Cow::Borrowed("()")
	}

	fn zero() -> Self {}
}

impl<T: ?Sized> Coerce for PhantomData<T> {
	fn type_name() -> Cow<'static, str> {
		Cow::Owned(format!("PhantomData<{}>", std::any::type_name::<T>()))
	}

	fn zero() -> Self {
		PhantomData
	}
}
