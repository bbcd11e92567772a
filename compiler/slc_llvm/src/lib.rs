//! LLVM backend for the SLC compiler.
//!
//! Lowers a semantically analyzed node arena to an LLVM module through
//! `inkwell`. The crate follows a two-tier layout:
//!
//! - **Context** ([`CodegenCx`], [`SimpleCx`]): LLVM context, module, and
//!   the SLC type mapping.
//! - **Builder** ([`Builder`]): instruction generation, separated from
//!   type-level concerns.
//! - **Generator** ([`IrGen`]): the walker over the arena, organized by
//!   concern (`functions`, `operators`, `lists`, `control_flow`,
//!   `variables`, `conversions`).
//!
//! The runtime ABI for cons lists is declared by
//! [`runtime_decl::declare_runtime`] before any lowering.
//!
//! # Debugging
//!
//! Enable tracing with `SLC_LOG=slc_llvm=debug` (or `RUST_LOG`).

pub mod builder;
pub mod context;
pub mod runtime_decl;

mod control_flow;
mod conversions;
mod functions;
mod gen;
mod lists;
mod operators;
mod variables;

#[cfg(test)]
mod tests;

pub use builder::Builder;
pub use context::{CodegenCx, SimpleCx};
pub use gen::IrGen;
pub use runtime_decl::{declare_runtime, ListWidth};
