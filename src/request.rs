//! Request values and the builder that keeps them referentially stable.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Sort order applied to the primary timestamp.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
	#[default]
	Asc,
	Desc,
}

impl Direction {
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Direction::Asc => "asc",
			Direction::Desc => "desc",
		}
	}
}

impl fmt::Display for Direction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Auxiliary field fetched alongside the primary hit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocValueField {
	pub field: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub format: Option<String>,
}

impl DocValueField {
	pub fn new(field: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			format: None,
		}
	}

	#[must_use]
	pub fn with_format(mut self, format: impl Into<String>) -> Self {
		self.format = Some(format.into());
		self
	}
}

/// Produces request values, reusing the previous instance when the inputs
/// are structurally unchanged.
///
/// Downstream code compares requests with [`Arc::ptr_eq`], so an unchanged
/// request never triggers a second search.
#[derive(Debug)]
pub struct RequestBuilder<R> {
	previous: Option<Arc<R>>,
}

impl<R> Default for RequestBuilder<R> {
	fn default() -> Self {
		Self { previous: None }
	}
}

impl<R: PartialEq> RequestBuilder<R> {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Return a shared request for `next`, or the prior instance if equal.
	pub fn build(&mut self, next: R) -> Arc<R> {
		if let Some(previous) = &self.previous {
			if **previous == next {
				return Arc::clone(previous);
			}
		}
		let request = Arc::new(next);
		self.previous = Some(Arc::clone(&request));
		request
	}

	/// Whether `request` is the instance most recently handed out.
	#[must_use]
	pub fn is_current(&self, request: &Arc<R>) -> bool {
		self.previous
			.as_ref()
			.is_some_and(|previous| Arc::ptr_eq(previous, request))
	}

	/// Most recently built request, if any.
	#[must_use]
	pub fn current(&self) -> Option<&Arc<R>> {
		self.previous.as_ref()
	}
}
