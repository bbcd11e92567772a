//! SLC compiler driver.
//!
//! Orchestrates one compilation: parse (via the front-end seam), dump the
//! AST, analyze, lower to LLVM IR, verify, write the `.ll` artifact, and
//! hand off to the native toolchain (`llc`, then `gcc` against the
//! `slc_runtime` library) when an output executable was requested.
//!
//! Exit codes: `0` success, `1` usage/semantic/IR errors, `2` I/O or
//! child-process failures. Artifacts land next to the input `P`:
//! `P.yml` (pretty-printed AST), `P.ll` (textual IR), and `P.s` (native
//! assembly, produced by `llc`).

pub mod cli;
pub mod compile;
pub mod frontend;
pub mod toolchain;
pub mod tracing_setup;

pub use cli::CliArgs;
pub use compile::run_compilation;
