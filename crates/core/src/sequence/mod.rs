//! Chains of dependent loads.
//!
//! [`sequence`] turns an ordered list of [`Step`]s into one load function per step.
//! Calling the function for step *i* first evaluates every step before it, then:
//!
//! - if step *i − 1* is still loading, reports loading without calling step *i*'s
//!   handler;
//! - if step *i − 1* failed critically, mirrors its status and error without
//!   calling step *i*'s handler;
//! - otherwise calls the handler with the data resolved so far.
//!
//! Whatever the branch, the response's promise resolves to the accumulated data of
//! every step up to and including *i*, once the previous promise and the handler's
//! own promise have settled. The handler behind that promise is only invoked after
//! the previous step resolved.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::load_fn::{LoadContext, LoadFn, LoadFnMap};
use crate::promise::LoadPromise;
use crate::response::LoadResponse;


/// Data resolved by earlier steps, keyed by step key.
pub type SequenceInput = Map<String, Value>;

/// One link of a sequence chain.
#[derive(Clone)]
pub struct Step {
	pub key: String,
	pub handler: LoadFn<SequenceInput>,
}

impl Step {
	pub fn new<F>(key: impl Into<String>, handler: F) -> Self
	where
		F: Fn(&SequenceInput) -> LoadResponse + 'static,
	{
		Self::from_load_fn(key, Rc::new(handler))
	}

	/// Uses an existing load function, e.g. the output of [`reduce`](crate::reduce()),
	/// [`defer`](crate::defer) or [`noncritical`](crate::noncritical).
	pub fn from_load_fn(key: impl Into<String>, handler: LoadFn<SequenceInput>) -> Self {
		Self { key: key.into(), handler }
	}
}

impl fmt::Debug for Step {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Step").field("key", &self.key).finish_non_exhaustive()
	}
}

/// Builds one load function per step, keyed and ordered like `steps`.
///
/// All returned functions share one accumulator of synchronously available data, so
/// a later call observes what earlier calls recorded. Newer data for a key replaces
/// older data.
///
/// # Errors
///
/// Returns [`Error::DuplicateStepKey`] when two steps share a key.
pub fn sequence(steps: Vec<Step>) -> Result<LoadFnMap> {
	let accumulated = Rc::new(RefCell::new(SequenceInput::new()));
	let mut mapped = LoadFnMap::with_capacity(steps.len());
	let mut previous: Option<(String, LoadFn)> = None;

	for (index, step) in steps.into_iter().enumerate() {
		if mapped.contains_key(&step.key) {
			return Err(Error::DuplicateStepKey(step.key));
		}

		let f: LoadFn = match previous.take() {
			None => {
				let handler = step.handler.clone();
				Rc::new(move |_: &LoadContext| handler(&SequenceInput::new()))
			}
			Some((prev_key, prev_fn)) => Rc::new(Link {
				index,
				prev_key,
				prev_fn,
				key: step.key.clone(),
				handler: step.handler.clone(),
				accumulated: Rc::clone(&accumulated),
			})
			.into_load_fn(),
		};

		mapped.insert(step.key.clone(), Rc::clone(&f));
		previous = Some((step.key, f));
	}

	Ok(mapped)
}

/// A step after the first, closing over the mapped function of its predecessor.
struct Link {
	index: usize,
	prev_key: String,
	prev_fn: LoadFn,
	key: String,
	handler: LoadFn<SequenceInput>,
	accumulated: Rc<RefCell<SequenceInput>>,
}

impl Link {
	fn into_load_fn(self: Rc<Self>) -> LoadFn {
		Rc::new(move |context: &LoadContext| self.call(context))
	}

	fn call(&self, context: &LoadContext) -> LoadResponse {
		let previous = (self.prev_fn)(context);
		self.accumulated
			.borrow_mut()
			.insert(self.prev_key.clone(), previous.data.clone().unwrap_or(Value::Null));
		let promise = self.chain(previous.promise_or_data());

		if previous.status.is_loading() {
			tracing::trace!(step = %self.key, index = self.index, "sequence.waiting");
			return LoadResponse::loading().with_promise(promise);
		}
		if previous.is_critical_failure() {
			tracing::trace!(step = %self.key, index = self.index, "sequence.halted");
			return LoadResponse {
				status: previous.status,
				error: previous.error,
				promise: Some(promise),
				..LoadResponse::default()
			};
		}

		let input = self.accumulated.borrow().clone();
		let mut response = (self.handler)(&input);
		response.promise = Some(promise);
		response
	}

	/// Waits for the previous step, then this step's own promise, resolving to the
	/// accumulated data including this step.
	fn chain(&self, previous: LoadPromise) -> LoadPromise {
		let index = self.index;
		let prev_key = self.prev_key.clone();
		let key = self.key.clone();
		let handler = Rc::clone(&self.handler);

		LoadPromise::new(async move {
			let mut resolved = match previous.await? {
				Value::Object(map) if index > 1 => map,
				value => SequenceInput::from_iter([(prev_key, value)]),
			};
			let current = handler(&resolved).promise_or_data().await?;
			resolved.insert(key, current);
			Ok(Value::Object(resolved))
		})
	}
}
