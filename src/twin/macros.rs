/// Implement [`crate::twin::Record`] and [`crate::twin::Coerce`] for a struct from a field list.
///
/// Fields not listed are ignored; their JSON keys are treated as unknown.
///
/// ```
/// use jsontwin::record;
/// use jsontwin::twin::{DecodeOptions, from_str};
///
/// #[derive(Debug, Default)]
/// struct Example {
/// 	foo: String,
/// 	boo: Vec<i32>,
/// }
///
/// record!(Example {
/// 	"foo" => foo,
/// 	"boo" => boo,
/// });
///
/// let mut example = Example::default();
/// let map = from_str(r#"{"foo":"bar","boo":[1,2,3],"extra":true}"#, &mut example, DecodeOptions::default()).unwrap();
/// assert_eq!(example.boo, [1, 2, 3]);
/// assert_eq!(map.len(), 3);
/// ```
#[macro_export]
macro_rules! record {
	($ty:ty { $($name:literal => $field:ident),* $(,)? }) => {
		impl $crate::twin::Record for $ty {
			fn schema() -> $crate::twin::Schema<Self> {
				$crate::twin::Schema::builder()
					$(.field($name, |record: &mut Self| &mut record.$field))*
					.build()
			}
		}

		impl $crate::twin::Coerce for $ty {
			fn type_name() -> ::std::borrow::Cow<'static, str> {
				::std::borrow::Cow::Borrowed(stringify!($ty))
			}

			fn zero() -> Self {
				<Self as ::std::default::Default>::default()
			}

			fn coerce(cx: &mut $crate::twin::DecodeContext<'_>, value: &$crate::twin::Value, _optional: bool) -> $crate::twin::Coerced<Self> {
				$crate::twin::coerce_record::<Self>(cx, value)
			}
		}
	};
}

/// Route coercion of a [`crate::twin::DecodeValue`] type through its hook.
///
/// ```
/// use jsontwin::custom_coerce;
/// use jsontwin::twin::{BoxError, DecodeValue, Value};
///
/// #[derive(Debug, Default)]
/// struct Celsius(f64);
///
/// impl DecodeValue for Celsius {
/// 	fn decode_value(value: &Value) -> Result<Self, BoxError> {
/// 		let text = value.as_str().ok_or("expected a temperature string")?;
/// 		let degrees = text.trim_end_matches("C").parse::<f64>()?;
/// 		Ok(Celsius(degrees))
/// 	}
/// }
///
/// custom_coerce!(Celsius);
/// ```
#[macro_export]
macro_rules! custom_coerce {
	($ty:ty) => {
		impl $crate::twin::Coerce for $ty {
			fn type_name() -> ::std::borrow::Cow<'static, str> {
				::std::borrow::Cow::Borrowed(stringify!($ty))
			}

			fn zero() -> Self {
				<Self as ::std::default::Default>::default()
			}

			fn coerce(cx: &mut $crate::twin::DecodeContext<'_>, value: &$crate::twin::Value, _optional: bool) -> $crate::twin::Coerced<Self> {
				$crate::twin::coerce_custom::<Self>(cx, value)
			}
		}
	};
}
