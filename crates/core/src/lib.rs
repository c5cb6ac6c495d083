//! Load primitives for binding asynchronous data to UI components.
//!
//! A component declares named *load functions*. Each one inspects whatever state it
//! closes over and returns a [`LoadResponse`]: data that is available now, a status,
//! an optional error, and an optional [`LoadPromise`] resolving to the eventual value.
//!
//! This crate provides the pieces that operate on those responses:
//!
//! - [`reduce`](mod@reduce): merges a map of named responses into aggregate
//!   data/status/error views and combined promises.
//! - [`sequence`](mod@sequence): chains dependent loads so each step receives the
//!   resolved data of every step before it.
//! - [`defer`] and [`noncritical`]: decorators that skip a load during one-shot
//!   rendering or exclude its failure from the aggregate.
//! - [`render_mode`]: the flag distinguishing one-shot rendering from an
//!   interactive session.
//!
//! # Invariants
//!
//! 1. `status.all` is [`LoadStatus::Complete`] iff every critical field is complete.
//! 2. `errors.any` is true iff some critical field reported an error.
//! 3. Noncritical fields appear under their own key but never affect `all`/`any`.
//! 4. A field without a promise behaves as an already-resolved promise yielding its
//!    synchronous data (or `null`).
//!
//! Everything here is single-threaded: responses, promises and load functions are
//! `Rc`-based and futures are polled on one thread.

mod error;
mod helpers;
mod load_fn;
mod promise;
pub mod reduce;
pub mod render_mode;
mod response;
pub mod sequence;

pub use error::{Error, Result};
pub use helpers::{defer, noncritical};
pub use load_fn::{Factory, LoadContext, LoadFn, LoadFnMap, load_fn};
pub use promise::{LoadPromise, handle_rejection};
pub use reduce::{
	DataMap, ErrorMap, ReduceOptions, ReducedState, StatusMap, invoke_all, reduce, reduce_data, reduce_errors, reduce_promise,
	reduce_promise_object, reduce_status,
};
pub use render_mode::RenderMode;
pub use response::{LoadError, LoadResponse, LoadResponseMap, LoadStatus};
pub use sequence::{SequenceInput, Step, sequence};
#[doc(no_inline)]
pub use serde_json::{Value, json};
