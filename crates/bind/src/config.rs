//! Binding configuration with layered overrides.
//!
//! A [`Config`] holds shared defaults. Each binder may carry [`ConfigOverrides`];
//! [`with_defaults`] resolves the two into the effective configuration, with the
//! local value winning for every option it sets.

use std::fmt;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use futures::task::{LocalSpawn, LocalSpawnExt};
use sluice_core::{DataMap, ErrorMap, StatusMap};

use crate::store::Listener;

/// Wraps the store change listener, e.g. to debounce it.
pub type Limiter = Rc<dyn Fn(Listener) -> Listener>;

/// Equality test used for change detection. Returns true when the two sections are
/// equal and no re-render is needed.
pub type Comparator = Rc<dyn Fn(Section<'_>, Section<'_>) -> bool>;

/// One of the three reduced views compared during change detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Section<'a> {
	Data(&'a DataMap),
	Status(&'a StatusMap),
	Errors(&'a ErrorMap),
}

impl Section<'_> {
	pub const fn name(&self) -> &'static str {
		match self {
			Self::Data(_) => "data",
			Self::Status(_) => "status",
			Self::Errors(_) => "errors",
		}
	}
}

/// Returns the listener unchanged.
pub fn identity_limiter() -> Limiter {
	Rc::new(|listener: Listener| listener)
}

/// Key-by-key equality of two sections of the same kind.
///
/// Field errors compare by identity. Sections of different kinds are never equal.
pub fn shallow_equal(a: Section<'_>, b: Section<'_>) -> bool {
	match (a, b) {
		(Section::Data(a), Section::Data(b)) => a == b,
		(Section::Status(a), Section::Status(b)) => a == b,
		(Section::Errors(a), Section::Errors(b)) => a == b,
		_ => false,
	}
}

/// Effective binding configuration.
///
/// Options are typed fields rather than an open key set. Selecting the slice of
/// store state that gates recomputation is configured per binder through
/// [`Binder::skip_unchanged`](crate::Binder::skip_unchanged), not here.
#[derive(Clone)]
pub struct Config {
	pub state_change_limiter: Limiter,
	pub state_change_comparator: Comparator,
	/// Drives the combined promise of each recomputation during interactive
	/// rendering. Without one, that promise only progresses when awaited.
	pub spawner: Option<Rc<dyn LocalSpawn>>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			state_change_limiter: identity_limiter(),
			state_change_comparator: Rc::new(shallow_equal),
			spawner: None,
		}
	}
}

impl Config {
	/// Applies every option set in `overrides`.
	pub fn extend(mut self, overrides: ConfigOverrides) -> Self {
		if let Some(limiter) = overrides.state_change_limiter {
			self.state_change_limiter = limiter;
		}
		if let Some(comparator) = overrides.state_change_comparator {
			self.state_change_comparator = comparator;
		}
		if let Some(spawner) = overrides.spawner {
			self.spawner = Some(spawner);
		}
		self
	}

	pub fn limit(&self, listener: Listener) -> Listener {
		(self.state_change_limiter)(listener)
	}

	pub fn compare(&self, a: Section<'_>, b: Section<'_>) -> bool {
		(self.state_change_comparator)(a, b)
	}

	/// Spawns `task` on the configured spawner. Returns false when there is no
	/// spawner or it refused the task.
	pub fn spawn(&self, task: LocalBoxFuture<'static, ()>) -> bool {
		let Some(spawner) = &self.spawner else {
			return false;
		};
		match spawner.spawn_local(task) {
			Ok(()) => true,
			Err(error) => {
				tracing::warn!(%error, "binding.spawn_failed");
				false
			}
		}
	}
}

impl fmt::Debug for Config {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Config")
			.field("spawner", &self.spawner.is_some())
			.finish_non_exhaustive()
	}
}

/// Per-binder options. Unset options fall back to the shared [`Config`].
#[derive(Clone, Default)]
pub struct ConfigOverrides {
	pub state_change_limiter: Option<Limiter>,
	pub state_change_comparator: Option<Comparator>,
	pub spawner: Option<Rc<dyn LocalSpawn>>,
}

impl ConfigOverrides {
	pub fn is_empty(&self) -> bool {
		self.state_change_limiter.is_none() && self.state_change_comparator.is_none() && self.spawner.is_none()
	}
}

impl fmt::Debug for ConfigOverrides {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ConfigOverrides")
			.field("state_change_limiter", &self.state_change_limiter.is_some())
			.field("state_change_comparator", &self.state_change_comparator.is_some())
			.field("spawner", &self.spawner.is_some())
			.finish()
	}
}

/// Resolves `local` over `global`.
pub fn with_defaults(local: &ConfigOverrides, global: &Config) -> Config {
	global.clone().extend(local.clone())
}
