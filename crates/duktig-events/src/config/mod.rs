//! Listener configuration
//!
//! Applications usually declare which services listen to which events in a
//! configuration file rather than in code. This module loads that file and
//! registers the declared services with a dispatcher.

pub mod loader;

pub use loader::{ConfigLoader, ListenerConfig};
