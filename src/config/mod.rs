//! JSON runtime configuration for the demo tools.
pub mod demo;
