use std::rc::Rc;

use serde_json::Value;

use crate::load_fn::LoadFn;
use crate::promise::LoadPromise;
use crate::render_mode;
use crate::response::LoadResponse;

/// Skips `f` during one-shot rendering.
///
/// Outside one-shot rendering `f` is returned unchanged. Inside it, the returned
/// function never calls `f` and reports a noncritical loading field whose promise
/// resolves immediately, so the field neither blocks nor fails the aggregate.
///
/// The render mode is read when `defer` is called, not per invocation.
pub fn defer<I: 'static>(f: LoadFn<I>) -> LoadFn<I> {
	if !render_mode::is_enabled() {
		return f;
	}
	tracing::trace!("load.deferred");
	Rc::new(|_: &I| LoadResponse::loading().with_promise(LoadPromise::resolved(Value::Null)).into_noncritical())
}

/// Marks `f`'s field noncritical and turns a rejected promise into `null`.
pub fn noncritical<I: 'static>(f: LoadFn<I>) -> LoadFn<I> {
	Rc::new(move |input: &I| {
		let mut response = f(input);
		response.promise = response.promise.map(LoadPromise::recover);
		response.noncritical = true;
		response
	})
}
