use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::CorpusError;

/// In-memory documents grouped by index name.
#[derive(Clone, Debug, Default)]
pub struct Corpus {
	indices: BTreeMap<String, Vec<Value>>,
}

impl Corpus {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Load a corpus from a JSON object mapping index names to document arrays.
	pub fn from_path(path: &Path) -> Result<Self, CorpusError> {
		let raw = fs::read_to_string(path).map_err(|source| CorpusError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		let indices = serde_json::from_str(&raw).map_err(|source| CorpusError::Parse {
			path: path.to_path_buf(),
			source,
		})?;
		Ok(Self { indices })
	}

	/// Append documents to `index`, creating it when missing.
	pub fn insert(&mut self, index: impl Into<String>, documents: Vec<Value>) {
		self.indices
			.entry(index.into())
			.or_default()
			.extend(documents);
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.indices.values().map(Vec::len).sum()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Documents of every index matched by `patterns`.
	///
	/// A trailing `*` matches by prefix. Each index contributes at most once,
	/// in the order its first matching pattern appears. Unknown indices are
	/// skipped.
	#[must_use]
	pub fn documents(&self, patterns: &[String]) -> Vec<&Value> {
		let mut seen: Vec<&str> = Vec::new();
		let mut documents = Vec::new();
		for pattern in patterns {
			for (name, docs) in &self.indices {
				if seen.contains(&name.as_str()) || !index_matches(pattern, name) {
					continue;
				}
				seen.push(name);
				documents.extend(docs.iter());
			}
		}
		documents
	}
}

fn index_matches(pattern: &str, name: &str) -> bool {
	match pattern.strip_suffix('*') {
		Some(prefix) => name.starts_with(prefix),
		None => pattern == name,
	}
}

/// Resolve a dotted field path, accepting both flattened keys
/// (`"host.name": ..`) and nested objects (`"host": {"name": ..}`).
#[must_use]
pub fn field_value<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
	let object = document.as_object()?;
	if let Some(value) = object.get(path) {
		return Some(value);
	}
	let (head, rest) = path.split_once('.')?;
	field_value(object.get(head)?, rest)
}

/// Whether the field at `path` holds `expected`, directly or as an array
/// element.
#[must_use]
pub(crate) fn field_matches(document: &Value, path: &str, expected: &str) -> bool {
	fn scalar_matches(value: &Value, expected: &str) -> bool {
		match value {
			Value::String(text) => text == expected,
			Value::Number(number) => number.to_string() == expected,
			Value::Bool(flag) => flag.to_string() == expected,
			_ => false,
		}
	}

	match field_value(document, path) {
		Some(Value::Array(values)) => values.iter().any(|value| scalar_matches(value, expected)),
		Some(value) => scalar_matches(value, expected),
		None => false,
	}
}
