//! Conjunctive content search.
//!
//! A search takes up to three independent criteria (title substring, format
//! substring, module ids) and returns the content satisfying all supplied
//! ones. Omitted criteria restrict nothing.
//!
//! # Modules
//!
//! - `request`: the validated request shape
//! - `engine`: `FilterEngine`, which resolves a request against a store

pub mod engine;
pub mod request;

pub use engine::{apply_to_loaded, FilterEngine};
pub use request::FilterRequest;
