//! Store-driven containers.
//!
//! A [`Binder`] describes how a component loads its data: a factory of named load
//! functions plus configuration. [`Binder::instantiate`] creates a [`Container`] for
//! one component instance, computing its initial state right away.
//!
//! A mounted container subscribes to its store. Each notification recomputes the
//! reduced state from the current store snapshot and own props; the state is only
//! replaced, and render listeners only run, when the configured comparator reports
//! a difference in the data, status or errors section.
//!
//! Recomputation never awaits. The combined promise of each recomputation is handed
//! to the configured spawner with its rejection swallowed; only the one-shot
//! [`Bootstrap`](crate::Bootstrap) path awaits it.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use futures::future::LocalBoxFuture;
use sluice_core::{
	Factory, LoadContext, LoadPromise, LoadResponse, LoadResponseMap, ReducedState, RenderMode, handle_rejection,
	invoke_all, reduce_promise, render_mode,
};

use crate::bootstrap::Bootstrap;
use crate::config::{Comparator, Config, ConfigOverrides, Limiter, Section, with_defaults};
use crate::error::{BindError, Result};
use crate::props::{BoundProps, OwnProps};
use crate::store::{Listener, Store, Subscription};


/// Input of a binder's factory.
pub struct BindInput<S> {
	pub store: Rc<S>,
	pub own_props: OwnProps,
}

type RenderListener = Rc<dyn Fn(&ReducedState)>;

/// Projection of store state recorded by [`Binder::skip_unchanged`].
trait Selected {
	fn same_as(&self, other: &dyn Selected) -> bool;
	fn as_any(&self) -> &dyn Any;
}

impl<T: PartialEq + 'static> Selected for T {
	fn same_as(&self, other: &dyn Selected) -> bool {
		other.as_any().downcast_ref::<T>().is_some_and(|other| other == self)
	}

	fn as_any(&self) -> &dyn Any {
		self
	}
}

type Selector<S> = Rc<dyn Fn(&<S as Store>::State) -> Box<dyn Selected>>;

/// Describes how instances of one component load their data.
pub struct Binder<S: Store> {
	factory: Factory<BindInput<S>>,
	overrides: ConfigOverrides,
	config: Config,
	render_mode: Option<RenderMode>,
	selector: Option<Selector<S>>,
}

impl<S: Store> Clone for Binder<S> {
	fn clone(&self) -> Self {
		Self {
			factory: self.factory.clone(),
			overrides: self.overrides.clone(),
			config: self.config.clone(),
			render_mode: self.render_mode,
			selector: self.selector.clone(),
		}
	}
}

impl<S: Store> fmt::Debug for Binder<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Binder")
			.field("factory", &self.factory)
			.field("overrides", &self.overrides)
			.field("render_mode", &self.render_mode)
			.field("skip_unchanged", &self.selector.is_some())
			.finish_non_exhaustive()
	}
}

impl<S: Store + 'static> Binder<S> {
	/// A binder using the default configuration.
	pub fn new(factory: Factory<BindInput<S>>) -> Self {
		Self::with_config(factory, Config::default())
	}

	/// A binder falling back to `config` for every option not overridden locally.
	pub fn with_config(factory: Factory<BindInput<S>>, config: Config) -> Self {
		Self {
			factory,
			overrides: ConfigOverrides::default(),
			config,
			render_mode: None,
			selector: None,
		}
	}

	pub fn state_change_limiter(mut self, limiter: Limiter) -> Self {
		self.overrides.state_change_limiter = Some(limiter);
		self
	}

	pub fn state_change_comparator(mut self, comparator: Comparator) -> Self {
		self.overrides.state_change_comparator = Some(comparator);
		self
	}

	/// Pins the render mode instead of reading the thread's flag at each
	/// recomputation. Load functions composed with `reduce` or `defer` inside the
	/// factory see the pinned mode too.
	pub fn render_mode(mut self, mode: RenderMode) -> Self {
		self.render_mode = Some(mode);
		self
	}

	/// Ignores store notifications while `selector` projects the store state to the
	/// same value as at the last recomputation.
	pub fn skip_unchanged<T, F>(mut self, selector: F) -> Self
	where
		T: PartialEq + 'static,
		F: Fn(&S::State) -> T + 'static,
	{
		self.selector = Some(Rc::new(move |state: &S::State| Box::new(selector(state)) as Box<dyn Selected>));
		self
	}

	pub fn factory(&self) -> &Factory<BindInput<S>> {
		&self.factory
	}

	/// The configuration instances of this binder use.
	pub fn effective_config(&self) -> Config {
		with_defaults(&self.overrides, &self.config)
	}

	/// Creates an unmounted container and computes its initial state.
	pub fn instantiate(&self, store: Rc<S>, own_props: OwnProps) -> Container<S> {
		let inner = Rc::new(Inner {
			config: self.effective_config(),
			binder: self.clone(),
			store,
			own_props: RefCell::new(own_props),
			state: RefCell::new(ReducedState::default()),
			selected: RefCell::new(None),
			mounted: Cell::new(false),
			torn_down: Cell::new(false),
			subscription: RefCell::new(None),
			render_listeners: RefCell::new(Vec::new()),
		});
		let own_props = inner.own_props.borrow().clone();
		let initial = inner.build_detached(&own_props);
		*inner.state.borrow_mut() = initial;
		Container { inner }
	}
}

struct Inner<S: Store> {
	binder: Binder<S>,
	config: Config,
	store: Rc<S>,
	own_props: RefCell<OwnProps>,
	state: RefCell<ReducedState>,
	selected: RefCell<Option<Box<dyn Selected>>>,
	mounted: Cell<bool>,
	torn_down: Cell<bool>,
	subscription: RefCell<Option<Subscription>>,
	render_listeners: RefCell<Vec<RenderListener>>,
}

impl<S: Store + 'static> Inner<S> {
	fn mode(&self) -> RenderMode {
		self.binder.render_mode.unwrap_or_else(render_mode::current)
	}

	/// Invokes the factory and its load functions against the current store.
	///
	/// The thread's render mode is set to the container's mode for the duration, so
	/// nested `reduce` and `defer` compositions observe the same mode as direct
	/// fields.
	fn build(&self, own_props: &OwnProps) -> (ReducedState, LoadPromise) {
		let mode = self.mode();
		let input = BindInput {
			store: Rc::clone(&self.store),
			own_props: own_props.clone(),
		};
		let responses: LoadResponseMap = {
			let _mode = render_mode::scoped(mode);
			let functions = self.binder.factory.build(&input);
			if mode.is_one_shot() && !self.binder.factory.runs_in_render_mode() {
				functions.keys().map(|name| (name.clone(), LoadResponse::loading())).collect()
			} else {
				invoke_all(&functions, &LoadContext::new(mode))
			}
		};
		let promise = reduce_promise(&responses);

		if let Some(selector) = &self.binder.selector {
			let selected = selector(&self.store.get_state());
			*self.selected.borrow_mut() = Some(selected);
		}

		tracing::trace!(fields = responses.len(), one_shot = mode.is_one_shot(), "binding.build_state");
		(ReducedState::from_responses(&responses), promise)
	}

	/// Like [`Self::build`], handing the combined promise to the spawner.
	fn build_detached(&self, own_props: &OwnProps) -> ReducedState {
		let (state, promise) = self.build(own_props);
		self.config.spawn(Box::pin(handle_rejection(promise)));
		state
	}

	fn selection_unchanged(&self) -> bool {
		let Some(selector) = &self.binder.selector else {
			return false;
		};
		let selected = selector(&self.store.get_state());
		self.selected
			.borrow()
			.as_ref()
			.is_some_and(|previous| previous.same_as(&*selected))
	}

	fn on_store_change(&self) -> Option<ReducedState> {
		if self.torn_down.get() {
			tracing::trace!("binding.change_after_teardown");
			return None;
		}
		if self.selection_unchanged() {
			tracing::trace!("binding.selection_unchanged");
			return None;
		}
		let own_props = self.own_props.borrow().clone();
		let next = self.build_detached(&own_props);
		self.set_state_if_necessary(next)
	}

	fn receive_props(&self, next_props: OwnProps) -> Option<ReducedState> {
		if self.torn_down.get() || *self.own_props.borrow() == next_props {
			return None;
		}
		*self.own_props.borrow_mut() = next_props.clone();
		let next = self.build_detached(&next_props);
		self.set_state_if_necessary(next)
	}

	fn set_state_if_necessary(&self, next: ReducedState) -> Option<ReducedState> {
		let changed = {
			let current = self.state.borrow();
			let data_equal = self.config.compare(Section::Data(&current.data), Section::Data(&next.data));
			let status_equal = self.config.compare(Section::Status(&current.status), Section::Status(&next.status));
			let errors_equal = self.config.compare(Section::Errors(&current.errors), Section::Errors(&next.errors));
			!(data_equal && status_equal && errors_equal)
		};
		if !changed {
			tracing::trace!("binding.state_unchanged");
			return None;
		}

		*self.state.borrow_mut() = next.clone();
		let listeners = self.render_listeners.borrow().clone();
		tracing::debug!(fields = next.data.len(), all = %next.status.all, listeners = listeners.len(), "binding.state_replaced");
		for listener in listeners {
			listener(&next);
		}
		Some(next)
	}
}

/// One bound component instance.
pub struct Container<S: Store> {
	inner: Rc<Inner<S>>,
}

impl<S: Store + 'static> Container<S> {
	/// Subscribes to the store.
	///
	/// # Errors
	///
	/// [`BindError::AlreadyMounted`] when already subscribed, [`BindError::TornDown`]
	/// after [`Self::unmount`].
	pub fn mount(&self) -> Result<()> {
		if self.inner.torn_down.get() {
			return Err(BindError::TornDown);
		}
		if self.inner.mounted.replace(true) {
			return Err(BindError::AlreadyMounted);
		}

		let weak = Rc::downgrade(&self.inner);
		let on_change: Listener = Rc::new(move || {
			if let Some(inner) = weak.upgrade() {
				inner.on_store_change();
			}
		});
		let limited = self.inner.config.limit(on_change);
		let weak: Weak<Inner<S>> = Rc::downgrade(&self.inner);
		let subscription = self.inner.store.subscribe(Rc::new(move || {
			if weak.upgrade().is_some_and(|inner| inner.mounted.get()) {
				limited();
			}
		}));
		*self.inner.subscription.borrow_mut() = Some(subscription);
		tracing::debug!("binding.mounted");
		Ok(())
	}

	/// Unsubscribes and disables further state updates. Calling it again does
	/// nothing.
	pub fn unmount(&self) {
		self.inner.mounted.set(false);
		if self.inner.torn_down.replace(true) {
			return;
		}
		let subscription = self.inner.subscription.borrow_mut().take();
		if let Some(subscription) = subscription {
			subscription.unsubscribe();
		}
		tracing::debug!("binding.unmounted");
	}

	pub fn is_mounted(&self) -> bool {
		self.inner.mounted.get()
	}

	/// Recomputes after a store change. Returns the new state when it replaced the
	/// current one.
	pub fn on_store_change(&self) -> Option<ReducedState> {
		self.inner.on_store_change()
	}

	/// Applies new own props. Recomputes only when they differ from the current
	/// ones, and returns the new state when it replaced the current one.
	pub fn receive_props(&self, own_props: OwnProps) -> Option<ReducedState> {
		self.inner.receive_props(own_props)
	}

	pub fn state(&self) -> ReducedState {
		self.inner.state.borrow().clone()
	}

	pub fn own_props(&self) -> OwnProps {
		self.inner.own_props.borrow().clone()
	}

	/// Props for the wrapped component.
	pub fn props(&self) -> BoundProps {
		BoundProps::new(&self.inner.state.borrow(), &self.inner.own_props.borrow())
	}

	pub fn is_loading(&self, fields: Option<&[&str]>) -> bool {
		self.inner.state.borrow().status.is_loading(fields)
	}

	pub fn loaded_with_errors(&self, fields: Option<&[&str]>) -> bool {
		self.inner.state.borrow().errors.loaded_with_errors(fields)
	}

	/// Runs `listener` with every state that replaces the current one.
	pub fn on_render(&self, listener: impl Fn(&ReducedState) + 'static) {
		self.inner.render_listeners.borrow_mut().push(Rc::new(listener));
	}
}

impl<S: Store + 'static> Bootstrap for Container<S> {
	fn bootstrap(&self) -> Option<LocalBoxFuture<'static, ()>> {
		if !self.inner.binder.factory.runs_in_render_mode() {
			tracing::trace!("binding.bootstrap_skipped");
			return None;
		}
		let own_props = self.inner.own_props.borrow().clone();
		let (_, promise) = self.inner.build(&own_props);
		Some(Box::pin(handle_rejection(promise)))
	}
}

impl<S: Store> fmt::Debug for Container<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Container")
			.field("mounted", &self.inner.mounted.get())
			.field("torn_down", &self.inner.torn_down.get())
			.field("state", &self.inner.state.borrow())
			.finish_non_exhaustive()
	}
}
