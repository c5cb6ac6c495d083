//! One-shot rendering flag.
//!
//! Records whether output is being produced once from a fully resolved state
//! (pre-rendering) rather than through a long-lived interactive session. The flag
//! defaults to interactive and only changes through [`enable`], [`reset`] or a
//! [`scoped`] override; nothing resets it automatically.
//!
//! The flag is thread-local. Loading is single-threaded, and test threads never
//! observe each other's flag.

use std::cell::Cell;
use std::marker::PhantomData;

thread_local! {
	static ONE_SHOT: Cell<bool> = const { Cell::new(false) };
}

/// Rendering mode seen by load functions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
	/// Long-lived session driven by store notifications.
	#[default]
	Interactive,
	/// Single pass over a fully resolved state.
	OneShot,
}

impl RenderMode {
	pub const fn is_one_shot(self) -> bool {
		matches!(self, Self::OneShot)
	}

	const fn from_flag(one_shot: bool) -> Self {
		if one_shot { Self::OneShot } else { Self::Interactive }
	}
}

/// Switches the current thread to one-shot rendering.
pub fn enable() {
	ONE_SHOT.with(|flag| flag.set(true));
	tracing::debug!("render_mode.enable");
}

/// Switches the current thread back to interactive rendering.
pub fn reset() {
	ONE_SHOT.with(|flag| flag.set(false));
}

pub fn is_enabled() -> bool {
	ONE_SHOT.with(Cell::get)
}

pub fn current() -> RenderMode {
	RenderMode::from_flag(is_enabled())
}

/// Sets `mode` until the returned guard is dropped, then restores the previous mode.
pub fn scoped(mode: RenderMode) -> RenderModeGuard {
	let previous = ONE_SHOT.with(|flag| flag.replace(mode.is_one_shot()));
	RenderModeGuard {
		previous,
		_not_send: PhantomData,
	}
}

/// Restores the previous render mode on drop.
#[must_use = "the previous render mode is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct RenderModeGuard {
	previous: bool,
	_not_send: PhantomData<*const ()>,
}

impl Drop for RenderModeGuard {
	fn drop(&mut self) {
		ONE_SHOT.with(|flag| flag.set(self.previous));
	}
}
