use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future::{self, FutureExt, LocalBoxFuture, Shared};
use serde_json::Value;

use crate::response::LoadError;

/// The eventual outcome of a load.
///
/// A shared, clonable future: every clone observes the same settlement, and the
/// underlying work runs at most once no matter how many clones are awaited. Like
/// every future it is lazy, so something must poll it (an awaiting caller or a
/// spawned task) for the work to progress.
#[derive(Clone)]
pub struct LoadPromise(Shared<LocalBoxFuture<'static, Result<Value, LoadError>>>);

impl LoadPromise {
	pub fn new<F>(future: F) -> Self
	where
		F: Future<Output = Result<Value, LoadError>> + 'static,
	{
		Self(future.boxed_local().shared())
	}

	/// A promise already resolved with `value`.
	pub fn resolved(value: impl Into<Value>) -> Self {
		Self::new(future::ready(Ok(value.into())))
	}

	/// A promise already rejected with `error`.
	pub fn rejected(error: LoadError) -> Self {
		Self::new(future::ready(Err(error)))
	}

	/// Returns a promise that resolves to `null` instead of rejecting.
	pub fn recover(self) -> Self {
		Self::new(async move {
			match self.await {
				Ok(value) => Ok(value),
				Err(error) => {
					tracing::debug!(%error, "load.promise_recovered");
					Ok(Value::Null)
				}
			}
		})
	}

	/// Returns the settled outcome without polling.
	pub fn peek(&self) -> Option<&Result<Value, LoadError>> {
		self.0.peek()
	}

	pub fn is_settled(&self) -> bool {
		self.peek().is_some()
	}
}

impl Future for LoadPromise {
	type Output = Result<Value, LoadError>;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		self.0.poll_unpin(cx)
	}
}

impl PartialEq for LoadPromise {
	fn eq(&self, other: &Self) -> bool {
		self.0.ptr_eq(&other.0)
	}
}

impl fmt::Debug for LoadPromise {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LoadPromise").field("settled", &self.is_settled()).finish()
	}
}

/// Awaits `promise` and discards a rejection.
///
/// Combined promises built during interactive rendering are not consumed by
/// anyone; spawning them through this keeps a failed load from surfacing as an
/// unobserved error.
pub async fn handle_rejection(promise: LoadPromise) {
	if let Err(error) = promise.await {
		tracing::debug!(%error, "load.rejection_swallowed");
	}
}
