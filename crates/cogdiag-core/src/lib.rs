//! cogdiag-core — Core training and evaluation engine.
//!
//! This crate defines the data model, the parameter store, the online
//! gradient-descent training loop, and the evaluator that the rest of the
//! cogdiag system builds on.

pub mod engine;
pub mod error;
pub mod evaluate;
pub mod index;
pub mod model;
pub mod params;
pub mod parser;
pub mod report;
pub mod train;
