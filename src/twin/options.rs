use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How field coercion failures affect the rest of a decode call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
	/// Abort on the first failure and return it alone, without a map.
	#[default]
	FailOnFirstError,
	/// Keep decoding, omit failed keys from the map, and return every failure.
	AllowMultipleErrors,
	/// Keep decoding, store failed keys' raw input in the map, and return every failure.
	FailOverToOriginalValue,
}

impl Mode {
	/// Stable `snake_case` name, as used in configuration files.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::FailOnFirstError => "fail_on_first_error",
			Self::AllowMultipleErrors => "allow_multiple_errors",
			Self::FailOverToOriginalValue => "fail_over_to_original_value",
		}
	}

	/// Whether failures are collected instead of aborting the call.
	pub fn collects_errors(self) -> bool {
		!matches!(self, Self::FailOnFirstError)
	}
}

impl fmt::Display for Mode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Mode name was not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown decode mode: {name}")]
pub struct UnknownMode {
	/// Name that failed to parse.
	pub name: String,
}

impl FromStr for Mode {
	type Err = UnknownMode;

	fn from_str(input: &str) -> Result<Self, Self::Err> {
		match input.trim().replace('-', "_").to_ascii_lowercase().as_str() {
			"fail_on_first_error" => Ok(Self::FailOnFirstError),
			"allow_multiple_errors" => Ok(Self::AllowMultipleErrors),
			"fail_over_to_original_value" => Ok(Self::FailOverToOriginalValue),
			_ => Err(UnknownMode { name: input.to_owned() }),
		}
	}
}

/// Per-call decoding switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
	/// Failure handling policy.
	pub mode: Mode,
	/// Use the top-level record only as a schema and leave its fields untouched.
	pub skip_populate: bool,
}

impl DecodeOptions {
	/// Preset that collects every failure and omits failed keys.
	pub fn lenient() -> Self {
		Self {
			mode: Mode::AllowMultipleErrors,
			skip_populate: false,
		}
	}

	/// Preset that collects every failure and keeps failed keys' raw input.
	pub fn fail_over() -> Self {
		Self {
			mode: Mode::FailOverToOriginalValue,
			skip_populate: false,
		}
	}

	/// Replace the failure handling policy.
	pub fn with_mode(mut self, mode: Mode) -> Self {
		self.mode = mode;
		self
	}

	/// Toggle writing into the top-level record.
	pub fn with_skip_populate(mut self, skip_populate: bool) -> Self {
		self.skip_populate = skip_populate;
		self
	}
}
