//! End-to-end node identity suite
//!
//! Exercises handles, ordering, annotations, pooling and evaluation
//! through the `arbordb` facade against a stored document.

#[path = "../common/mod.rs"]
mod common;

mod annotations;
mod evaluation;
mod ordering;
mod pooling;
