//! Declarative asynchronous data loading for store-driven components.
//!
//! Components declare named load functions; [`reduce`] and [`sequence`] compose
//! them, [`defer`] and [`noncritical`] adjust how they count, and a [`Binder`] keeps
//! a component's props in sync with a [`Store`].
//!
//! ```
//! use sluice::{LoadContext, LoadFnMap, LoadResponse, LoadStatus, ReducedState, invoke_all, load_fn};
//!
//! let mut functions = LoadFnMap::new();
//! functions.insert("user".into(), load_fn(|_: &LoadContext| LoadResponse::complete("ada")));
//! functions.insert("feed".into(), load_fn(|_: &LoadContext| LoadResponse::loading()));
//!
//! let state = ReducedState::from_responses(&invoke_all(&functions, &LoadContext::default()));
//! assert_eq!(state.status.all, LoadStatus::Loading);
//! assert!(state.status.is_loading(Some(&["feed"])));
//! ```

pub use sluice_bind::{
	BindError, BindInput, Binder, Bootstrap, BoundProps, Comparator, Config, ConfigOverrides, Container, Limiter,
	Listener, OwnProps, RESERVED_PROPS, Section, Store, Subscription, bootstrap_all, identity_limiter, merge_props,
	shallow_equal, with_defaults,
};
pub use sluice_core::{
	DataMap, Error, ErrorMap, Factory, LoadContext, LoadError, LoadFn, LoadFnMap, LoadPromise, LoadResponse,
	LoadResponseMap, LoadStatus, ReduceOptions, ReducedState, RenderMode, Result, SequenceInput, Step, StatusMap, Value,
	defer, handle_rejection, invoke_all, json, load_fn, noncritical, reduce, reduce_data, reduce_errors, reduce_promise,
	reduce_promise_object, reduce_status, render_mode, sequence,
};
