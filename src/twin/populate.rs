use serde_json::{Map, Value};
use tracing::trace;

use crate::twin::{DecodeContext, Mode, Schema};

/// Destination of the values mirrored while populating one record.
pub(crate) enum Sink<'m> {
	/// Top-level dynamic map: every input key is accounted for, known or not.
	Document(&'m mut Map<String, Value>),
	/// Nested record mirror: only successfully coerced known fields.
	Nested(&'m mut Map<String, Value>),
}

impl Sink<'_> {
	fn insert(&mut self, key: &str, value: Value) {
		match self {
			Self::Document(map) | Self::Nested(map) => {
				map.insert(key.to_owned(), value);
			}
		}
	}
}

/// Populate `record` from `object`, mirroring into `sink` under the active mode.
///
/// Returns `false` when population stopped early (fail-on-first-error), or when a nested
/// record must fail over to its raw input.
pub(crate) fn populate<R>(cx: &mut DecodeContext<'_>, schema: &Schema<R>, object: &Map<String, Value>, record: &mut R, mut sink: Sink<'_>, write: bool) -> bool {
	for (key, input) in object {
		let Some(field) = schema.field(key) else {
			if let Sink::Document(map) = &mut sink {
				trace!(key = %key, "keeping unknown field");
				map.insert(key.clone(), input.clone());
			}
			continue;
		};

		match cx.nested(key, |cx| field.decode(cx, input, record, write)) {
			Some(mirror) => sink.insert(key, mirror),
			None => match cx.mode() {
				Mode::FailOnFirstError => return false,
				Mode::AllowMultipleErrors => {}
				Mode::FailOverToOriginalValue => match &mut sink {
					Sink::Document(map) => {
						map.insert(key.clone(), input.clone());
					}
					Sink::Nested(_) => return false,
				},
			},
		}

		if cx.is_aborted() {
			return false;
		}
	}
	true
}
