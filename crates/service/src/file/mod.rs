pub mod puppy_store;
