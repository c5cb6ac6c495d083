//! Common utilities for binding integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::{Map, Value, json};
use sluice::{
	BindInput, Factory, Listener, LoadContext, LoadFnMap, LoadPromise, LoadResponse, OwnProps, Store, Subscription, load_fn,
};

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt::try_init();
}

pub type AppState = Map<String, Value>;

/// Actions understood by [`MemoryStore`].
#[derive(Debug, Clone)]
pub enum Action {
	UpdateParam(String),
	AddData { param: String, data: Value },
}

fn reducer(state: &AppState, action: Action) -> AppState {
	let mut next = state.clone();
	match action {
		Action::UpdateParam(param) => {
			next.insert("param".into(), Value::String(param));
		}
		Action::AddData { param, data } => {
			next.insert(param, data);
		}
	}
	next
}

/// In-memory application store with snapshot notification.
pub struct MemoryStore {
	state: RefCell<AppState>,
	listeners: Rc<RefCell<Vec<(u64, Listener)>>>,
	next_id: Cell<u64>,
	dispatched: Cell<usize>,
}

impl MemoryStore {
	pub fn new() -> Rc<Self> {
		Self::with_state(json!({"param": "x", "x": "populated data"}))
	}

	pub fn with_state(state: Value) -> Rc<Self> {
		Rc::new(Self {
			state: RefCell::new(object(state)),
			listeners: Rc::default(),
			next_id: Cell::new(0),
			dispatched: Cell::new(0),
		})
	}

	pub fn listener_count(&self) -> usize {
		self.listeners.borrow().len()
	}

	pub fn dispatched(&self) -> usize {
		self.dispatched.get()
	}

	pub fn get_state_value(&self, key: &str) -> Option<Value> {
		self.state.borrow().get(key).cloned()
	}
}

impl Store for MemoryStore {
	type State = AppState;
	type Action = Action;
	/// Number of actions dispatched so far, including this one.
	type Output = usize;

	fn get_state(&self) -> AppState {
		self.state.borrow().clone()
	}

	fn dispatch(&self, action: Action) -> usize {
		let next = reducer(&self.state.borrow(), action);
		*self.state.borrow_mut() = next;
		let sequence = self.dispatched.get() + 1;
		self.dispatched.set(sequence);
		let listeners: Vec<Listener> = self.listeners.borrow().iter().map(|(_, listener)| Rc::clone(listener)).collect();
		for listener in listeners {
			listener();
		}
		sequence
	}

	fn subscribe(&self, listener: Listener) -> Subscription {
		let id = self.next_id.replace(self.next_id.get() + 1);
		self.listeners.borrow_mut().push((id, listener));
		let listeners = Rc::downgrade(&self.listeners);
		Subscription::new(move || {
			if let Some(listeners) = listeners.upgrade() {
				listeners.borrow_mut().retain(|(other, _)| *other != id);
			}
		})
	}
}

pub fn object(value: Value) -> OwnProps {
	match value {
		Value::Object(map) => map,
		_ => OwnProps::new(),
	}
}

/// Counts invocations of the load function built by [`async_data_factory`].
#[derive(Debug, Clone, Default)]
pub struct LoadCalls(Rc<Cell<usize>>);

impl LoadCalls {
	pub fn get(&self) -> usize {
		self.0.get()
	}

	fn hit(&self) {
		self.0.set(self.0.get() + 1);
	}
}

/// One field, `myAsyncData`, holding `state[param]` where `param` comes from own
/// props or the store. Missing data is fetched by a promise that dispatches
/// `"more populated data"` once driven.
pub fn async_data_factory(calls: &LoadCalls) -> Factory<BindInput<MemoryStore>> {
	let calls = calls.clone();
	Factory::new(move |input: &BindInput<MemoryStore>| {
		let store = Rc::clone(&input.store);
		let own_param = input.own_props.get("param").and_then(Value::as_str).map(str::to_string);
		let calls = calls.clone();
		let mut functions = LoadFnMap::new();
		functions.insert(
			"myAsyncData".into(),
			load_fn(move |_: &LoadContext| {
				calls.hit();
				let state = store.get_state();
				let param = own_param
					.clone()
					.or_else(|| state.get("param").and_then(Value::as_str).map(str::to_string))
					.unwrap_or_default();
				if let Some(data) = state.get(&param) {
					return LoadResponse::complete(data.clone()).with_promise(LoadPromise::resolved(data.clone()));
				}
				let store = Rc::clone(&store);
				LoadResponse::loading().with_promise(LoadPromise::new(async move {
					let data = json!("more populated data");
					store.dispatch(Action::AddData {
						param,
						data: data.clone(),
					});
					Ok(data)
				}))
			}),
		);
		functions
	})
}
