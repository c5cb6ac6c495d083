//! The application store seen by bound containers.

use std::fmt;
use std::rc::Rc;

/// Change notification callback registered with a store.
pub type Listener = Rc<dyn Fn()>;

/// A centralized application store.
///
/// Containers only read state and subscribe. Load functions dispatch through the
/// store they close over; containers never dispatch themselves.
pub trait Store {
	type State;
	type Action;
	/// Whatever dispatching returns, e.g. the action itself or the result of a
	/// thunk. Containers ignore it.
	type Output;

	/// Snapshot of the current state.
	fn get_state(&self) -> Self::State;

	fn dispatch(&self, action: Self::Action) -> Self::Output;

	/// Registers `listener` to run after every dispatch completes.
	///
	/// The listener stays registered until the returned subscription is released.
	fn subscribe(&self, listener: Listener) -> Subscription;
}

/// Registration handle returned by [`Store::subscribe`].
///
/// Dropping the handle unsubscribes.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
	release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
	pub fn new(release: impl FnOnce() + 'static) -> Self {
		Self {
			release: Some(Box::new(release)),
		}
	}

	/// A subscription with nothing to release.
	pub fn detached() -> Self {
		Self { release: None }
	}

	pub fn unsubscribe(mut self) {
		self.release_now();
	}

	fn release_now(&mut self) {
		if let Some(release) = self.release.take() {
			release();
		}
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.release_now();
	}
}

impl fmt::Debug for Subscription {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription").field("active", &self.release.is_some()).finish()
	}
}
