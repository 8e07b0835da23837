//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

use serde_json::Value;

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve a fixture path under `<workspace>/fixtures`.
pub fn fixture_path(name: &str) -> PathBuf {
	workspace_root().join("fixtures").join(name)
}

/// Read a fixture as raw bytes.
///
/// # Panics
///
/// Panics when the fixture is missing.
pub fn read_fixture(name: &str) -> Vec<u8> {
	let path = fixture_path(name);
	std::fs::read(&path).unwrap_or_else(|err| panic!("fixture {} is readable: {err}", path.display()))
}

/// Read a fixture and parse it as a JSON value tree.
///
/// # Panics
///
/// Panics when the fixture is missing or is not valid JSON.
pub fn fixture_value(name: &str) -> Value {
	serde_json::from_slice(&read_fixture(name)).unwrap_or_else(|err| panic!("fixture {name} is valid JSON: {err}"))
}
