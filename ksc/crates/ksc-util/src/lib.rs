//! ksc-util - Shared foundation types for the KS interpreter.
//!
//! This crate holds the types every pipeline stage needs: source location
//! tracking ([`Span`]) and the diagnostic values the driver renders to
//! stderr ([`Diagnostic`], [`Level`]). It also re-exports the hash map
//! used for environment binding tables so the evaluator and any future
//! passes agree on one implementation.

pub mod diagnostic;
pub mod span;

pub use diagnostic::{Diagnostic, Level};
pub use span::Span;

// Re-export the map type used on hot lookup paths.
pub use rustc_hash::FxHashMap;
