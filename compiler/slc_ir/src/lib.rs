//! AST node model, node arena, and scope arena for the SLC compiler.
//!
//! The tree is stored flat: every [`Node`] lives in a [`NodeArena`] and is
//! addressed by a [`NodeId`] index. Children are owned by their parent's
//! index list; parent links and resolution pointers (use → definition) are
//! plain indices, never owning handles. Scopes live in their own
//! [`ScopeArena`] with parent indices forming the lexical chain.
//!
//! The parser contract: the front end populates the root's children with
//! top-level definitions, sets every node's source location, literal
//! values, and formal parameter types, and links list heads and tails. No
//! type or scope slots are set before semantic analysis.

mod arena;
mod location;
mod node;
mod pretty;
mod scope;

pub use arena::NodeArena;
pub use location::LocationInfo;
pub use node::{LiteralValue, Node, NodeId, NodeKind, OpKind, VisitState};
pub use scope::{Scope, ScopeArena, ScopeId};
