//! Record model shared by the store and the HTTP layer.

pub mod errors;
pub mod puppy;

pub use puppy::{Puppy, PuppyData, PuppyInput};
