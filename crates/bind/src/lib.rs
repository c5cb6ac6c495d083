//! Binds load functions to stateful, store-driven components.
//!
//! A [`Binder`] pairs a [`Factory`](sluice_core::Factory) of named load functions
//! with [`Config`]. Each [`Container`] it instantiates subscribes to a [`Store`],
//! recomputes its reduced state on every notification, and republishes
//! [`BoundProps`] only when the comparator reports a change.

mod bootstrap;
pub mod config;
mod container;
mod error;
mod props;
mod store;

pub use bootstrap::{Bootstrap, bootstrap_all};
pub use config::{Comparator, Config, ConfigOverrides, Limiter, Section, identity_limiter, shallow_equal, with_defaults};
pub use container::{BindInput, Binder, Container};
pub use error::{BindError, Result};
pub use props::{BoundProps, OwnProps, RESERVED_PROPS, is_reserved, merge_props};
pub use store::{Listener, Store, Subscription};
