//! Props handed to the wrapped component.

use serde_json::{Map, Value};
use sluice_core::{DataMap, ErrorMap, LoadError, LoadStatus, ReducedState, StatusMap};

/// Caller-supplied inputs of a bound component.
pub type OwnProps = Map<String, Value>;

/// Names the binding publishes itself. Neither loaded data nor caller props may
/// use them.
pub const RESERVED_PROPS: [&str; 4] = ["loadStatus", "loadErrors", "isLoading", "loadedWithErrors"];

pub fn is_reserved(name: &str) -> bool {
	RESERVED_PROPS.contains(&name)
}

/// Layers loaded data under caller props; caller values win.
///
/// Fields without data are left out. Reserved names are dropped from both sides.
pub fn merge_props(data: &DataMap, own: &OwnProps) -> Map<String, Value> {
	let mut merged: Map<String, Value> = data
		.iter()
		.filter(|(name, _)| !is_reserved(name))
		.filter_map(|(name, value)| value.clone().map(|value| (name.clone(), value)))
		.collect();
	for (name, value) in own.iter().filter(|(name, _)| !is_reserved(name)) {
		merged.insert(name.clone(), value.clone());
	}
	merged
}

/// Everything the wrapped component receives for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundProps {
	/// Loaded data merged with caller props.
	pub props: Map<String, Value>,
	pub load_status: StatusMap,
	pub load_errors: ErrorMap,
}

impl BoundProps {
	pub fn new(state: &ReducedState, own: &OwnProps) -> Self {
		Self {
			props: merge_props(&state.data, own),
			load_status: state.status.clone(),
			load_errors: state.errors.clone(),
		}
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.props.get(name)
	}

	pub fn status(&self, field: &str) -> Option<LoadStatus> {
		self.load_status.get(field)
	}

	pub fn error(&self, field: &str) -> Option<&LoadError> {
		self.load_errors.get(field)
	}

	/// See [`StatusMap::is_loading`].
	pub fn is_loading(&self, fields: Option<&[&str]>) -> bool {
		self.load_status.is_loading(fields)
	}

	/// See [`ErrorMap::loaded_with_errors`].
	pub fn loaded_with_errors(&self, fields: Option<&[&str]>) -> bool {
		self.load_errors.loaded_with_errors(fields)
	}
}
