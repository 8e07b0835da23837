use serde_json::{Number, Value};

/// Bounds of `i128` as `f64`; `MAX` is exclusive because `2^127` is not representable.
const I128_MIN_F64: f64 = -170_141_183_460_469_231_731_687_303_715_884_105_728.0;
const I128_MAX_F64: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;

/// Widen a JSON number to `i128`, truncating fractions toward zero.
///
/// Returns `None` for non-finite floats and values outside `i128`.
pub(crate) fn to_wide(number: &Number) -> Option<i128> {
	if let Some(value) = number.as_i64() {
		return Some(i128::from(value));
	}
	if let Some(value) = number.as_u64() {
		return Some(i128::from(value));
	}
	let value = number.as_f64()?;
	if !value.is_finite() {
		return None;
	}
	let truncated = value.trunc();
	if !(I128_MIN_F64..I128_MAX_F64).contains(&truncated) {
		return None;
	}
	Some(truncated as i128)
}

/// Convert a JSON number to an integer type, failing instead of wrapping.
pub(crate) fn to_int<T: TryFrom<i128>>(number: &Number) -> Option<T> {
	to_wide(number).and_then(|wide| T::try_from(wide).ok())
}

/// JSON number as `f64`, finite only.
pub(crate) fn to_f64(number: &Number) -> Option<f64> {
	number.as_f64().filter(|value| value.is_finite())
}

/// JSON number as `f32`; finite values beyond the `f32` range fail.
pub(crate) fn to_f32(number: &Number) -> Option<f32> {
	let value = to_f64(number)?;
	if value.abs() > f64::from(f32::MAX) {
		return None;
	}
	Some(value as f32)
}

/// Mirror an integer as a JSON number, falling back to a float beyond 64 bits.
pub(crate) fn int_mirror(value: i128) -> Value {
	if let Ok(small) = i64::try_from(value) {
		return Value::from(small);
	}
	if let Ok(small) = u64::try_from(value) {
		return Value::from(small);
	}
	float_mirror(value as f64)
}

/// Mirror a float as a JSON number; non-finite values mirror as `null`.
pub(crate) fn float_mirror(value: f64) -> Value {
	Number::from_f64(value).map_or(Value::Null, Value::Number)
}
