use thiserror::Error;

/// Lifecycle misuse of a bound container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BindError {
	/// The container is already subscribed to its store.
	#[error("container is already mounted")]
	AlreadyMounted,
	/// The container was unmounted and cannot subscribe again.
	#[error("container was torn down")]
	TornDown,
}

pub type Result<T> = std::result::Result<T, BindError>;
