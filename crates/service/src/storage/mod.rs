//! Storage abstractions for service layer
//!
//! Contains the file-backed JSON document store shared by the puppy store
//! and by anything else that persists one small document as JSON.

pub mod json_document_store;
