//! Error types for composing load functions.
//!
//! Field load failures are never reported through this type; they travel as
//! [`LoadError`](crate::LoadError) values inside responses. `Error` only covers
//! malformed composition, which is a programming mistake.

use thiserror::Error;

/// Errors raised while composing load functions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
	/// Two sequence steps declared the same key.
	#[error("duplicate sequence step key: {0}")]
	DuplicateStepKey(String),
}

/// Result type for load composition.
pub type Result<T> = std::result::Result<T, Error>;
