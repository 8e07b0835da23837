#![allow(missing_docs)]

use std::collections::HashMap;

use jsontwin::twin::{BoxError, DecodeError, DecodeOptions, DecodeValue, Decoder, FieldError, FieldPath, Mode, Value};
use jsontwin::{custom_coerce, record};
use jsontwin_testkit::{fixture_value, read_fixture};
use serde_json::json;

#[derive(Debug, Default, Clone, PartialEq)]
struct Child {
	name: String,
	flag: bool,
	count: i64,
	tiny: i8,
	byte: u8,
	ratio: f32,
	score: f64,
	label: Option<String>,
	level: Option<i64>,
	any: Value,
	tags: Vec<String>,
	slots: [String; 4],
}

record!(Child {
	"child_field1" => name,
	"child_field2" => flag,
	"child_field3" => count,
	"child_field4" => tiny,
	"child_field9" => byte,
	"child_field13" => ratio,
	"child_field14" => score,
	"child_field15" => label,
	"child_field17" => level,
	"child_field29" => any,
	"child_field30" => tags,
	"child_field31" => slots,
});

#[derive(Debug, Default, PartialEq)]
struct Stamp {
	year: u16,
	month: u8,
	day: u8,
}

impl DecodeValue for Stamp {
	fn decode_value(value: &Value) -> Result<Self, BoxError> {
		let text = value.as_str().ok_or("stamp must be a string")?;
		let mut parts = text.splitn(3, '-');
		let (Some(year), Some(month), Some(day)) = (parts.next(), parts.next(), parts.next()) else {
			return Err(format!("malformed stamp: {text}").into());
		};
		let stamp = Stamp {
			year: year.parse()?,
			month: month.parse()?,
			day: day.parse()?,
		};
		if !(1..=12).contains(&stamp.month) {
			return Err(format!("month out of range: {}", stamp.month).into());
		}
		Ok(stamp)
	}
}

custom_coerce!(Stamp);

#[derive(Debug, Default, PartialEq)]
struct Parent {
	child: Child,
	boxed: Option<Box<Child>>,
	children: Vec<Child>,
	quad: [Child; 4],
	labels: HashMap<String, String>,
	by_name: HashMap<String, Child>,
	stamp: Stamp,
	maybe_stamp: Option<Stamp>,
}

record!(Parent {
	"parent_field1" => child,
	"parent_field2" => boxed,
	"parent_field3" => children,
	"parent_field4" => quad,
	"parent_field7" => labels,
	"parent_field8" => by_name,
	"parent_field10" => stamp,
	"parent_field11" => maybe_stamp,
});

const MODES: [Mode; 3] = [Mode::FailOnFirstError, Mode::AllowMultipleErrors, Mode::FailOverToOriginalValue];

fn decode_fixture(name: &str, mode: Mode) -> (Parent, Result<serde_json::Map<String, Value>, DecodeError>) {
	let mut parent = Parent::default();
	let result = Decoder::cached().from_slice(&read_fixture(name), &mut parent, DecodeOptions::default().with_mode(mode));
	(parent, result)
}

#[test]
fn full_document_populates_every_field() {
	for mode in MODES {
		let (parent, result) = decode_fixture("parent.json", mode);
		let map = result.expect("fixture decodes");

		assert_eq!(parent.child.name, "name");
		assert!(parent.child.flag);
		assert_eq!(parent.child.count, -42);
		assert_eq!(parent.child.tiny, -8);
		assert_eq!(parent.child.byte, 255);
		assert_eq!(parent.child.ratio, 1.5);
		assert_eq!(parent.child.score, 2.25);
		assert_eq!(parent.child.label.as_deref(), Some("opt"));
		assert_eq!(parent.child.level, None);
		assert_eq!(parent.child.any, json!({"any": [1, "two"]}));
		assert_eq!(parent.child.tags, ["a", "b"]);
		assert_eq!(parent.child.slots, ["w", "x", "", ""].map(String::from));

		let boxed = parent.boxed.as_deref().expect("boxed child is set");
		assert_eq!(boxed.name, "boxed");
		assert_eq!(boxed.count, 7);

		assert_eq!(parent.children.len(), 2);
		assert_eq!(parent.children[1].tags, ["x"]);
		assert_eq!(parent.quad.each_ref().map(|child| child.count), [1, 2, 0, 0]);
		assert_eq!(parent.labels.get("k2").map(String::as_str), Some("v2"));
		assert!(parent.by_name["one"].flag);
		assert_eq!(parent.stamp, Stamp { year: 2024, month: 1, day: 2 });
		assert_eq!(parent.maybe_stamp, Some(Stamp { year: 2023, month: 12, day: 31 }));

		assert_eq!(map.len(), 9, "mode {mode}");
		assert_eq!(map["extra_field"], json!({"nested": [1, 2]}));
		assert_eq!(map["parent_field10"], json!("2024-01-02"));
		assert_eq!(map["parent_field2"], json!({"child_field1": "boxed", "child_field3": 7}));
		assert_eq!(map["parent_field4"], json!([{"child_field3": 1}, {"child_field3": 2}, null, null]));
	}
}

#[test]
fn nested_mirror_holds_known_fields_only() {
	let (_, result) = decode_fixture("parent.json", Mode::FailOnFirstError);
	let map = result.expect("fixture decodes");
	let child = map["parent_field1"].as_object().expect("child mirror is an object");

	assert!(!child.contains_key("child_unknown"));
	assert_eq!(child["child_field31"], json!(["w", "x", "", ""]));
	assert_eq!(child["child_field17"], Value::Null);
	assert_eq!(child["child_field13"], json!(1.5));
}

#[test]
fn mismatch_fails_on_first_error() {
	let (parent, result) = decode_fixture("parent_mismatch.json", Mode::FailOnFirstError);
	let err = result.expect_err("mismatch fails");

	let DecodeError::Field(FieldError::UnexpectedType { path, expected, got }) = &err else {
		panic!("expected a single type error, got {err}");
	};
	assert_eq!(path.to_string(), "parent_field1");
	assert_eq!(expected, "Child");
	assert_eq!(*got, "number");
	assert!(parent.boxed.is_none(), "decoding stops at the first failure");
}

#[test]
fn mismatch_collects_errors_and_omits_keys() {
	let (parent, result) = decode_fixture("parent_mismatch.json", Mode::AllowMultipleErrors);
	let err = result.expect_err("mismatch is reported");

	let paths = err.field_errors().iter().map(|err| err.path().clone()).collect::<Vec<_>>();
	let expected = ["parent_field1", "parent_field10", "parent_field3.child_field3", "parent_field7.a"]
		.map(|text| text.parse::<FieldPath>().expect("path parses"));
	assert_eq!(paths, expected);
	assert_eq!(err.field_errors()[1].to_string(), "month out of range: 13");

	let map = err.partial_map().expect("aggregate keeps the map");
	assert_eq!(
		Value::Object(map.clone()),
		json!({
			"extra_field": true,
			"parent_field2": {"child_field1": "boxed"},
			"parent_field3": [{"child_field1": "a"}],
			"parent_field7": null,
		})
	);

	assert_eq!(parent.children.len(), 1);
	assert_eq!(parent.children[0].name, "a");
	assert!(parent.labels.is_empty());
	assert_eq!(parent.stamp, Stamp::default());
}

#[test]
fn mismatch_fails_over_to_raw_input() {
	let (parent, result) = decode_fixture("parent_mismatch.json", Mode::FailOverToOriginalValue);
	let err = result.expect_err("mismatch is reported");
	assert_eq!(err.field_errors().len(), 4);

	let input = fixture_value("parent_mismatch.json");
	let map = err.partial_map().expect("aggregate keeps the map");
	for key in ["parent_field1", "parent_field10", "parent_field3", "parent_field7", "extra_field"] {
		assert_eq!(map[key], input[key], "{key} keeps its raw input");
	}
	assert_eq!(map.len(), 6);

	assert!(parent.children.is_empty());
	assert_eq!(parent.boxed.map(|child| child.name), Some("boxed".to_owned()));
}

#[test]
fn tree_input_matches_byte_input() {
	let tree = fixture_value("parent.json");
	let mut from_tree = Parent::default();
	let tree_map = jsontwin::twin::from_value(&tree, &mut from_tree, DecodeOptions::default()).expect("tree decodes");
	let (from_bytes, byte_map) = decode_fixture("parent.json", Mode::FailOnFirstError);

	assert_eq!(tree_map, byte_map.expect("bytes decode"));
	assert_eq!(from_tree.child, from_bytes.child);
	assert_eq!(from_tree.quad, from_bytes.quad);
}

#[test]
fn redecoding_the_map_is_idempotent() {
	for mode in MODES {
		let (first, result) = decode_fixture("parent.json", mode);
		let map = result.expect("fixture decodes");

		let mut second = Parent::default();
		let again = Decoder::new().from_map(&map, &mut second, DecodeOptions::default().with_mode(mode)).expect("map decodes");
		assert_eq!(first, second, "mode {mode}");
		assert_eq!(map, again, "mode {mode}");
	}
}
