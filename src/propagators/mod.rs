//! Contains the propagator implementations of this crate.
//!
//! See [`crate::engine::cp::propagation`] for the interface propagators implement.

pub mod table;
