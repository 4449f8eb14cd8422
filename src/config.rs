//! User-tunable analysis settings.
//!
//! Hosts receive these as the `angells` section of the editor's workspace
//! configuration and hand the raw JSON value to [`Config::from_json`].

use serde::Deserialize;

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
	/// The script-declared template which `T[]` is shorthand for.
	pub array_type: String,
	/// The type deduced for string literals.
	pub string_type: String,
	pub report_unresolved: bool,
	/// `None` keeps every diagnostic.
	pub max_diagnostics: Option<usize>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			array_type: "array".to_string(),
			string_type: "string".to_string(),
			report_unresolved: true,
			max_diagnostics: None,
		}
	}
}

impl Config {
	/// Accepts either the section object itself or a whole settings object
	/// with an `angells` key. `null` yields the defaults.
	pub fn from_json(value: &serde_json::Value) -> Result<Self, Error> {
		if value.is_null() {
			return Ok(Self::default());
		}

		let section = value
			.as_object()
			.and_then(|obj| obj.get("angells"))
			.unwrap_or(value);

		Ok(Config::deserialize(section)?)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn smoke() {
		let cfg = Config::from_json(&serde_json::json!({
			"angells": { "arrayType": "list", "maxDiagnostics": 10 }
		}))
		.unwrap();

		assert_eq!(cfg.array_type, "list");
		assert_eq!(cfg.string_type, "string");
		assert_eq!(cfg.max_diagnostics, Some(10));
		assert!(cfg.report_unresolved);

		assert_eq!(Config::from_json(&serde_json::Value::Null).unwrap(), Config::default());
		assert!(Config::from_json(&serde_json::json!({ "reportUnresolved": 5 })).is_err());
	}
}
