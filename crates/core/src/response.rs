use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::promise::LoadPromise;

/// Whether a field's value is final for the invocation that produced it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LoadStatus {
	/// The value is not final yet. A response that never sets a status is loading.
	#[default]
	Loading,
	/// The value is final.
	Complete,
}

impl LoadStatus {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Loading => "loading",
			Self::Complete => "complete",
		}
	}

	pub const fn is_loading(self) -> bool {
		matches!(self, Self::Loading)
	}

	pub const fn is_complete(self) -> bool {
		matches!(self, Self::Complete)
	}
}

impl fmt::Display for LoadStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A failure reported by a load function.
///
/// Handles are cheap to clone and compare by identity: two handles are equal only
/// when they refer to the same reported failure.
#[derive(Clone)]
pub struct LoadError(Arc<anyhow::Error>);

impl LoadError {
	/// Wraps any error type.
	pub fn new(error: impl Into<anyhow::Error>) -> Self {
		Self(Arc::new(error.into()))
	}

	/// Creates an error from a plain message.
	pub fn msg<M>(message: M) -> Self
	where
		M: fmt::Display + fmt::Debug + Send + Sync + 'static,
	{
		Self(Arc::new(anyhow::Error::msg(message)))
	}

	/// Returns the underlying error.
	pub fn inner(&self) -> &anyhow::Error {
		&self.0
	}
}

impl PartialEq for LoadError {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl Eq for LoadError {}

impl fmt::Debug for LoadError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("LoadError").field(&format_args!("{}", self.0)).finish()
	}
}

impl fmt::Display for LoadError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}

impl std::error::Error for LoadError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		self.0.source()
	}
}

impl From<anyhow::Error> for LoadError {
	fn from(error: anyhow::Error) -> Self {
		Self(Arc::new(error))
	}
}

/// The result of one load function invocation.
///
/// Created fresh on every invocation and superseded by the next one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadResponse {
	/// The value, if available now.
	pub data: Option<Value>,
	pub status: LoadStatus,
	/// Set when loading failed.
	pub error: Option<LoadError>,
	/// Resolves with the eventual value.
	pub promise: Option<LoadPromise>,
	/// Excludes this field from aggregate status/error computation and from
	/// halting a sequence.
	pub noncritical: bool,
}

impl LoadResponse {
	/// A pending response with no data.
	pub fn loading() -> Self {
		Self::default()
	}

	/// A complete response carrying `data`.
	pub fn complete(data: impl Into<Value>) -> Self {
		Self {
			data: Some(data.into()),
			status: LoadStatus::Complete,
			..Self::default()
		}
	}

	/// A complete response that failed with `error`.
	pub fn failed(error: LoadError) -> Self {
		Self {
			status: LoadStatus::Complete,
			error: Some(error),
			..Self::default()
		}
	}

	pub fn with_data(mut self, data: impl Into<Value>) -> Self {
		self.data = Some(data.into());
		self
	}

	pub fn with_status(mut self, status: LoadStatus) -> Self {
		self.status = status;
		self
	}

	pub fn with_error(mut self, error: LoadError) -> Self {
		self.error = Some(error);
		self
	}

	pub fn with_promise(mut self, promise: LoadPromise) -> Self {
		self.promise = Some(promise);
		self
	}

	/// Marks the response noncritical.
	pub fn into_noncritical(mut self) -> Self {
		self.noncritical = true;
		self
	}

	/// Returns true when this response counts toward aggregate failure.
	pub fn is_critical_failure(&self) -> bool {
		self.error.is_some() && !self.noncritical
	}

	/// Returns the response's promise, or an already-resolved promise yielding the
	/// synchronous data (`null` when absent).
	pub fn promise_or_data(&self) -> LoadPromise {
		match &self.promise {
			Some(promise) => promise.clone(),
			None => LoadPromise::resolved(self.data.clone().unwrap_or(Value::Null)),
		}
	}
}

/// Named responses, one per declared asynchronous field, in declaration order.
pub type LoadResponseMap = IndexMap<String, LoadResponse>;
