//! One-shot rendering seam.
//!
//! An external walker visits every bound component before producing the first
//! output, calls [`Bootstrap::bootstrap`] on each, and awaits what they return.

use futures::future::{self, LocalBoxFuture};

/// Implemented by components that can pre-resolve their data.
pub trait Bootstrap {
	/// Starts loading and returns a future that completes once every load settled,
	/// successfully or not. Returns `None` when there is nothing to await.
	fn bootstrap(&self) -> Option<LocalBoxFuture<'static, ()>>;
}

/// Bootstraps every item and waits for all of them concurrently.
///
/// Returns how many items had something to await.
pub async fn bootstrap_all<'a, B>(items: impl IntoIterator<Item = &'a B>) -> usize
where
	B: Bootstrap + ?Sized + 'a,
{
	let pending: Vec<_> = items.into_iter().filter_map(Bootstrap::bootstrap).collect();
	let count = pending.len();
	tracing::debug!(pending = count, "bootstrap.walk");
	future::join_all(pending).await;
	count
}
