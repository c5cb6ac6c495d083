//! Reduction of named load responses into aggregate views.
//!
//! Every function here is pure over a [`LoadResponseMap`]. Noncritical entries keep
//! their own key in every view but never influence [`StatusMap::all`] or
//! [`ErrorMap::any`].

use std::rc::Rc;

use futures::future;
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::load_fn::{Factory, LoadContext, LoadFn, LoadFnMap};
use crate::promise::LoadPromise;
use crate::response::{LoadError, LoadResponse, LoadResponseMap, LoadStatus};


/// Data per field. `None` when the field had nothing available.
pub type DataMap = IndexMap<String, Option<Value>>;

/// Status per field plus the aggregate over critical fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMap {
	pub fields: IndexMap<String, LoadStatus>,
	/// [`LoadStatus::Complete`] iff every critical field is complete.
	pub all: LoadStatus,
}

impl StatusMap {
	pub fn get(&self, field: &str) -> Option<LoadStatus> {
		self.fields.get(field).copied()
	}

	/// Returns true when any of `fields` (or any field at all) is still loading.
	///
	/// Unknown field names are ignored.
	pub fn is_loading(&self, fields: Option<&[&str]>) -> bool {
		match fields {
			None => self.fields.values().any(|status| status.is_loading()),
			Some(names) => names.iter().any(|name| self.get(name).is_some_and(LoadStatus::is_loading)),
		}
	}
}

/// Error per field plus whether any critical field failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap {
	pub fields: IndexMap<String, Option<LoadError>>,
	pub any: bool,
}

impl ErrorMap {
	pub fn get(&self, field: &str) -> Option<&LoadError> {
		self.fields.get(field).and_then(Option::as_ref)
	}

	/// Returns true when any of `fields` (or any field at all) reported an error.
	///
	/// Noncritical fields count here; only the aggregate `any` excludes them.
	pub fn loaded_with_errors(&self, fields: Option<&[&str]>) -> bool {
		match fields {
			None => self.fields.values().any(Option::is_some),
			Some(names) => names.iter().any(|name| self.get(name).is_some()),
		}
	}
}

/// The three reduced views of one response map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReducedState {
	pub data: DataMap,
	pub status: StatusMap,
	pub errors: ErrorMap,
}

impl ReducedState {
	pub fn from_responses(responses: &LoadResponseMap) -> Self {
		Self {
			data: reduce_data(responses),
			status: reduce_status(responses),
			errors: reduce_errors(responses),
		}
	}
}

pub fn reduce_data(responses: &LoadResponseMap) -> DataMap {
	responses.iter().map(|(name, response)| (name.clone(), response.data.clone())).collect()
}

pub fn reduce_status(responses: &LoadResponseMap) -> StatusMap {
	let fields = responses.iter().map(|(name, response)| (name.clone(), response.status)).collect();
	let complete = responses
		.values()
		.filter(|response| !response.noncritical)
		.all(|response| response.status.is_complete());
	StatusMap {
		fields,
		all: if complete { LoadStatus::Complete } else { LoadStatus::Loading },
	}
}

pub fn reduce_errors(responses: &LoadResponseMap) -> ErrorMap {
	let fields = responses.iter().map(|(name, response)| (name.clone(), response.error.clone())).collect();
	ErrorMap {
		fields,
		any: responses.values().any(LoadResponse::is_critical_failure),
	}
}

/// Resolves with every field's value in map order, or rejects with the first
/// rejection observed.
pub fn reduce_promise(responses: &LoadResponseMap) -> LoadPromise {
	let pending: Vec<_> = responses.values().map(LoadResponse::promise_or_data).collect();
	LoadPromise::new(async move { future::try_join_all(pending).await.map(Value::Array) })
}

/// Like [`reduce_promise`], but resolves to an object keyed by field name.
pub fn reduce_promise_object(responses: &LoadResponseMap) -> LoadPromise {
	let (names, pending): (Vec<_>, Vec<_>) = responses
		.iter()
		.map(|(name, response)| (name.clone(), response.promise_or_data()))
		.unzip();
	LoadPromise::new(async move {
		let values = future::try_join_all(pending).await?;
		Ok(Value::Object(names.into_iter().zip(values).collect::<Map<_, _>>()))
	})
}

/// Invokes every load function with `context`, preserving order.
pub fn invoke_all(functions: &LoadFnMap, context: &LoadContext) -> LoadResponseMap {
	functions.iter().map(|(name, f)| (name.clone(), f(context))).collect()
}

/// Options for [`reduce`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReduceOptions {
	/// Resolve the combined promise to an object keyed by field name instead of an
	/// array in field order.
	pub promise_as_object: bool,
}

/// Composes a factory of parallel loads into a single load function.
///
/// The returned function's response carries:
/// - `data`: an object of field data (`null` for fields without data);
/// - `status`: the aggregate over critical fields;
/// - `error`: the first critical field error in map order;
/// - `promise`: the combined promise selected by `options`.
///
/// During one-shot rendering, a factory not marked render-mode enabled is never
/// called and the response is plain loading.
pub fn reduce<I: 'static>(factory: Factory<I>, options: ReduceOptions) -> LoadFn<I> {
	Rc::new(move |input: &I| {
		let context = LoadContext::current();
		if context.is_one_shot() && !factory.runs_in_render_mode() {
			tracing::trace!("reduce.skipped");
			return LoadResponse::loading();
		}

		let responses = invoke_all(&factory.build(input), &context);
		let status = reduce_status(&responses);
		let error = responses
			.values()
			.find(|response| response.is_critical_failure())
			.and_then(|response| response.error.clone());
		let promise = if options.promise_as_object {
			reduce_promise_object(&responses)
		} else {
			reduce_promise(&responses)
		};
		let data = responses
			.into_iter()
			.map(|(name, response)| (name, response.data.unwrap_or(Value::Null)))
			.collect::<Map<_, _>>();

		tracing::trace!(fields = data.len(), all = %status.all, failed = error.is_some(), "reduce.invoke");
		LoadResponse {
			data: Some(Value::Object(data)),
			status: status.all,
			error,
			promise: Some(promise),
			noncritical: false,
		}
	})
}
