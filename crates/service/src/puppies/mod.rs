//! Puppy store interface consumed by the HTTP layer.

pub mod store;
