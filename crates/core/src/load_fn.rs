use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::render_mode::RenderMode;
use crate::response::LoadResponse;

/// Input passed to every load function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadContext {
	pub render_mode: RenderMode,
}

impl LoadContext {
	pub const fn new(render_mode: RenderMode) -> Self {
		Self { render_mode }
	}

	/// Context reflecting the current thread's render mode.
	pub fn current() -> Self {
		Self::new(crate::render_mode::current())
	}

	pub const fn is_one_shot(&self) -> bool {
		self.render_mode.is_one_shot()
	}
}

/// A named data dependency: inspects its input and reports a [`LoadResponse`].
///
/// Must be cheap to call repeatedly; side effects beyond dispatching to a store
/// are the caller's responsibility.
pub type LoadFn<I = LoadContext> = Rc<dyn Fn(&I) -> LoadResponse>;

/// Named load functions in declaration order.
pub type LoadFnMap = IndexMap<String, LoadFn>;

/// Boxes a closure as a [`LoadFn`].
pub fn load_fn<I, F>(f: F) -> LoadFn<I>
where
	F: Fn(&I) -> LoadResponse + 'static,
{
	Rc::new(f)
}

/// Builds a [`LoadFnMap`] from component inputs.
///
/// `render_mode_enabled` marks the factory as wanting to run during one-shot
/// rendering; factories without it are skipped there and report loading.
pub struct Factory<I> {
	build: Rc<dyn Fn(&I) -> LoadFnMap>,
	render_mode_enabled: bool,
}

impl<I> Factory<I> {
	pub fn new<F>(build: F) -> Self
	where
		F: Fn(&I) -> LoadFnMap + 'static,
	{
		Self {
			build: Rc::new(build),
			render_mode_enabled: false,
		}
	}

	pub fn render_mode_enabled(mut self, enabled: bool) -> Self {
		self.render_mode_enabled = enabled;
		self
	}

	pub fn runs_in_render_mode(&self) -> bool {
		self.render_mode_enabled
	}

	pub fn build(&self, input: &I) -> LoadFnMap {
		(self.build)(input)
	}
}

impl<I> Clone for Factory<I> {
	fn clone(&self) -> Self {
		Self {
			build: Rc::clone(&self.build),
			render_mode_enabled: self.render_mode_enabled,
		}
	}
}

impl<I> fmt::Debug for Factory<I> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Factory")
			.field("render_mode_enabled", &self.render_mode_enabled)
			.finish_non_exhaustive()
	}
}
