//! Semantic analysis for the SLC compiler.
//!
//! A single-pass depth-first walker that creates scopes, resolves names,
//! infers types (through recursive calls via if-branch witnesses), and
//! diagnoses conflicts. The walker annotates the shared node arena in
//! place; IR generation assumes a fully annotated arena and must only run
//! after analysis succeeds.

mod analyzer;
mod calls;
mod exprs;
mod loops;
mod problem;

#[cfg(test)]
mod tests;

pub use analyzer::{analyze, SemanticAnalyzer};
pub use problem::{DefinitionKind, SemaProblem};
